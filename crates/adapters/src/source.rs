// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the source-fetching subsystem: idempotent unpack of a
//! revision's source archive, and GC of revisions no longer referenced.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use aim_core::{Runtime, RevisionKey};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SourceManagerError {
    #[error("failed to fetch source archive: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to unpack source archive: {0}")]
    Unpack(String),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetches, extracts, and keeps track of revision source code.
#[async_trait]
pub trait SourceManager: Send + Sync {
    /// Idempotently unpacks `source_url` to `UNPACK_ROOT/<revision_key>`.
    /// Safe to call concurrently for the same key.
    async fn ensure(
        &self,
        revision_key: &RevisionKey,
        source_url: &str,
        runtime: Runtime,
    ) -> Result<PathBuf, SourceManagerError>;

    /// Deletes unpacked trees whose key is not covered by `active_set`.
    ///
    /// `active_set` is a coarse upper bound (see `RevisionGC`): a tree is
    /// kept if its own key is a member, or if some member is a
    /// `<member>-`-prefix of it (an entry-name-derived hint only ever
    /// narrows down to project/service/version, not the full tuple).
    async fn clean_old_revisions(&self, active_set: &HashSet<String>) -> Result<(), SourceManagerError>;
}

fn is_active(candidate: &str, active_set: &HashSet<String>) -> bool {
    active_set.iter().any(|hint| candidate == hint || candidate.starts_with(&format!("{hint}-")))
}

/// Production `SourceManager`: downloads the archive over HTTP and unpacks
/// it under `unpack_root`.
pub struct SourceManagerHttpClient {
    unpack_root: PathBuf,
    client: reqwest::Client,
}

impl SourceManagerHttpClient {
    pub fn new(unpack_root: impl Into<PathBuf>) -> Self {
        Self { unpack_root: unpack_root.into(), client: reqwest::Client::new() }
    }

    fn revision_dir(&self, revision_key: &RevisionKey) -> PathBuf {
        self.unpack_root.join(revision_key.as_str())
    }

    fn app_dir(&self, revision_key: &RevisionKey) -> PathBuf {
        self.revision_dir(revision_key).join("app")
    }

    async fn fetch_and_unpack(&self, source_url: &str, dest: &Path) -> Result<(), SourceManagerError> {
        let response = self.client.get(source_url).send().await?;
        let bytes = response.bytes().await?;
        std::fs::create_dir_all(dest)?;
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || zip_extract_bytes(&bytes, &dest))
            .await
            .map_err(|error| SourceManagerError::Unpack(error.to_string()))??;
        Ok(())
    }
}

/// Extracts a zip archive's bytes into `dest`. Kept as a free function so
/// it can be swapped or stubbed independently of the HTTP fetch step.
fn zip_extract_bytes(bytes: &[u8], dest: &Path) -> Result<(), SourceManagerError> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|error| SourceManagerError::Unpack(error.to_string()))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|error| SourceManagerError::Unpack(error.to_string()))?;
        let Some(relative_path) = entry.enclosed_name() else {
            return Err(SourceManagerError::Unpack(format!("unsafe path in archive entry {index}")));
        };
        let out_path = dest.join(relative_path);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out_file = std::fs::File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out_file)?;
    }
    Ok(())
}

#[async_trait]
impl SourceManager for SourceManagerHttpClient {
    async fn ensure(
        &self,
        revision_key: &RevisionKey,
        source_url: &str,
        runtime: Runtime,
    ) -> Result<PathBuf, SourceManagerError> {
        let app_dir = self.app_dir(revision_key);
        if app_dir.exists() {
            debug!(revision_key = revision_key.as_str(), "revision already unpacked");
            return Ok(app_dir);
        }

        info!(revision_key = revision_key.as_str(), %runtime, "fetching and unpacking revision");
        self.fetch_and_unpack(source_url, &app_dir).await?;
        Ok(app_dir)
    }

    async fn clean_old_revisions(&self, active_set: &HashSet<String>) -> Result<(), SourceManagerError> {
        let Ok(entries) = std::fs::read_dir(&self.unpack_root) else {
            return Ok(());
        };
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else { continue };
            if !file_type.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else { continue };
            if is_active(&name, active_set) {
                continue;
            }
            info!(revision_key = name, "removing obsolete revision tree");
            if let Err(error) = std::fs::remove_dir_all(entry.path()) {
                warn!(revision_key = name, %error, "failed to remove obsolete revision tree");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
