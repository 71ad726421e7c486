// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only view of the `projectId -> serviceId -> versionId -> VersionDetails`
//! mapping, kept consistent out-of-band by a coordination service.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use aim_core::{ProjectId, ServiceId, VersionDetails, VersionId};
use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ProjectsManagerError {
    #[error("unknown project/service/version: {project}/{service}/{version}")]
    UnknownVersion { project: String, service: String, version: String },

    #[error("failed to read projects snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse projects snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ProjectsSnapshot = HashMap<String, HashMap<String, HashMap<String, VersionDetails>>>;

/// Read-only accessor over the current projects/versions mapping.
#[async_trait]
pub trait ProjectsManagerView: Send + Sync {
    async fn version_details(
        &self,
        project_id: &ProjectId,
        service_id: &ServiceId,
        version_id: &VersionId,
    ) -> Result<VersionDetails, ProjectsManagerError>;

    /// A flat snapshot of every `(project, service, version)` currently
    /// known, used by `RevisionGC` to compute the active set.
    async fn snapshot(&self) -> Result<ProjectsSnapshot, ProjectsManagerError>;
}

/// Polls a JSON document on disk on a fixed interval, standing in for the
/// coordination-service watch (out of scope per the external-collaborator
/// boundary this crate treats `ProjectsManager` as sitting behind).
pub struct PollingProjectsManager {
    path: PathBuf,
    cache: RwLock<ProjectsSnapshot>,
}

impl PollingProjectsManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), cache: RwLock::new(HashMap::new()) }
    }

    fn load_from_disk(&self) -> Result<ProjectsSnapshot, ProjectsManagerError> {
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn refresh(&self) -> Result<(), ProjectsManagerError> {
        let loaded = self.load_from_disk()?;
        *self.cache.write() = loaded;
        Ok(())
    }

    /// Spawns a background task that refreshes the cache every `interval`.
    /// Refresh failures are logged and the previous snapshot is kept, so a
    /// transient read glitch never blocks request handling.
    pub fn spawn_refresh_loop(self: std::sync::Arc<Self>, interval: Duration) {
        tokio::spawn(async move {
            loop {
                if let Err(error) = self.refresh() {
                    warn!(%error, "failed to refresh projects snapshot");
                } else {
                    debug!("refreshed projects snapshot");
                }
                tokio::time::sleep(interval).await;
            }
        });
    }
}

#[async_trait]
impl ProjectsManagerView for PollingProjectsManager {
    async fn version_details(
        &self,
        project_id: &ProjectId,
        service_id: &ServiceId,
        version_id: &VersionId,
    ) -> Result<VersionDetails, ProjectsManagerError> {
        let cache = self.cache.read();
        cache
            .get(project_id.as_str())
            .and_then(|services| services.get(service_id.as_str()))
            .and_then(|versions| versions.get(version_id.as_str()))
            .cloned()
            .ok_or_else(|| ProjectsManagerError::UnknownVersion {
                project: project_id.as_str().to_string(),
                service: service_id.as_str().to_string(),
                version: version_id.as_str().to_string(),
            })
    }

    async fn snapshot(&self) -> Result<ProjectsSnapshot, ProjectsManagerError> {
        Ok(self.cache.read().clone())
    }
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
