// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the supervisor (a Monit-compatible process monitor) and the
//! writer for its per-instance config files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use aim_core::EntryName;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from supervisor HTTP calls or config-file I/O.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("supervisor request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("supervisor returned unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("supervisor busy after retries")]
    TransientExhausted,

    #[error("config file I/O failed: {0}")]
    ConfigIo(#[from] std::io::Error),
}

/// Result of an `unmonitor` call. A 404 means "not present" and is not an
/// error — the caller treats it as already stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmonitorOutcome {
    Stopped,
    AlreadyStopped,
}

/// A Monit-compatible process supervisor.
#[async_trait]
pub trait Supervisor: Send + Sync {
    /// All entry names the supervisor currently knows about.
    async fn list_entries(&self) -> Result<Vec<String>, SupervisorError>;

    /// Starts a single entry (never the whole group it belongs to, unless
    /// `as_group` is set) — starting single entries avoids Monit's slower
    /// O(N) group semantics at scale.
    async fn start(&self, entry: &str, as_group: bool) -> Result<(), SupervisorError>;

    /// Stops every entry in `group` (e.g. all ports of a project) in one call.
    async fn stop_group(&self, group: &str) -> Result<(), SupervisorError>;

    /// Unmonitors a single entry, retrying up to 5 times on a 503 ("busy")
    /// response before surfacing `TransientExhausted`.
    async fn unmonitor(&self, entry: &str) -> Result<UnmonitorOutcome, SupervisorError>;

    /// Asks the supervisor to reload its configuration from disk.
    async fn reload(&self) -> Result<(), SupervisorError>;
}

/// Production `Supervisor` backed by the Monit-compatible HTTP API.
pub struct SupervisorHttpClient {
    base_url: String,
    client: reqwest::Client,
    max_unmonitor_retries: u32,
}

impl SupervisorHttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            max_unmonitor_retries: 5,
        }
    }

    async fn action(&self, entry: &str, action: &str) -> Result<reqwest::Response, SupervisorError> {
        let url = format!("{}/{entry}", self.base_url);
        Ok(self
            .client
            .post(&url)
            .query(&[("action", action)])
            .send()
            .await?)
    }
}

#[async_trait]
impl Supervisor for SupervisorHttpClient {
    async fn list_entries(&self) -> Result<Vec<String>, SupervisorError> {
        let response = self.client.get(&self.base_url).send().await?;
        if !response.status().is_success() {
            return Err(SupervisorError::UnexpectedStatus(response.status().as_u16()));
        }
        Ok(response.json::<Vec<String>>().await?)
    }

    async fn start(&self, entry: &str, as_group: bool) -> Result<(), SupervisorError> {
        debug!(entry, as_group, "starting supervisor entry");
        let response = self.action(entry, "start").await?;
        match response.status().as_u16() {
            200..=299 => Ok(()),
            status => Err(SupervisorError::UnexpectedStatus(status)),
        }
    }

    async fn stop_group(&self, group: &str) -> Result<(), SupervisorError> {
        let response = self.action(group, "stop").await?;
        match response.status().as_u16() {
            200..=299 => Ok(()),
            status => Err(SupervisorError::UnexpectedStatus(status)),
        }
    }

    async fn unmonitor(&self, entry: &str) -> Result<UnmonitorOutcome, SupervisorError> {
        let mut retries_left = self.max_unmonitor_retries;
        loop {
            let response = self.action(entry, "unmonitor").await?;
            match response.status().as_u16() {
                200..=299 => return Ok(UnmonitorOutcome::Stopped),
                404 => return Ok(UnmonitorOutcome::AlreadyStopped),
                503 => {
                    if retries_left == 0 {
                        return Err(SupervisorError::TransientExhausted);
                    }
                    retries_left -= 1;
                    warn!(entry, retries_left, "supervisor busy, retrying unmonitor");
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
                status => return Err(SupervisorError::UnexpectedStatus(status)),
            }
        }
    }

    async fn reload(&self) -> Result<(), SupervisorError> {
        let url = format!("{}/_reload", self.base_url);
        let response = self.client.post(&url).send().await?;
        match response.status().as_u16() {
            200..=299 => Ok(()),
            status => Err(SupervisorError::UnexpectedStatus(status)),
        }
    }
}

/// Writes and removes the per-instance supervisor config files AIM owns
/// (`appscale-app___*.cfg`) and reads the PID files the supervisor
/// maintains alongside them.
pub struct SupervisorConfigWriter {
    conf_dir: PathBuf,
    pid_dir: PathBuf,
}

impl SupervisorConfigWriter {
    pub fn new(conf_dir: impl Into<PathBuf>, pid_dir: impl Into<PathBuf>) -> Self {
        Self { conf_dir: conf_dir.into(), pid_dir: pid_dir.into() }
    }

    pub fn config_path(&self, entry: &EntryName) -> PathBuf {
        self.conf_dir.join(format!("appscale-{entry}.cfg"))
    }

    pub fn pid_path(&self, entry: &EntryName) -> PathBuf {
        self.pid_dir.join(format!("{entry}.pid"))
    }

    /// Renders the config file contents. Pure and golden-string-testable.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        entry: &EntryName,
        cmd: &str,
        pidfile: &Path,
        port: u16,
        env: &BTreeMap<String, String>,
        max_memory_mb: u32,
        syslog_target: &str,
        check_port: bool,
    ) -> String {
        let mut out = String::new();
        out.push_str(&format!("check process {entry}\n"));
        out.push_str(&format!("  matching \"{cmd}\"\n"));
        out.push_str(&format!("  start program = \"{cmd}\"\n"));
        out.push_str(&format!("  pidfile \"{}\"\n", pidfile.display()));
        if check_port {
            out.push_str(&format!("  if failed port {port} then restart\n"));
        }
        out.push_str(&format!("  group app___{}\n", entry.strip_to_revision_root()));
        out.push_str(&format!("  limit memory {max_memory_mb}MB\n"));
        out.push_str(&format!("  syslog {syslog_target}\n"));
        for (key, value) in env {
            out.push_str(&format!("  env {key}={value}\n"));
        }
        out
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        entry: &EntryName,
        cmd: &str,
        port: u16,
        env: &BTreeMap<String, String>,
        max_memory_mb: u32,
        syslog_target: &str,
        check_port: bool,
    ) -> Result<(), SupervisorError> {
        let pidfile = self.pid_path(entry);
        let contents = Self::render(entry, cmd, &pidfile, port, env, max_memory_mb, syslog_target, check_port);
        std::fs::create_dir_all(&self.conf_dir)?;
        std::fs::write(self.config_path(entry), contents)?;
        Ok(())
    }

    /// Best-effort removal of a single entry's config file.
    pub fn remove(&self, entry: &EntryName) {
        if let Err(error) = std::fs::remove_file(self.config_path(entry)) {
            warn!(entry = entry.as_str(), %error, "failed to remove supervisor config");
        }
    }

    /// Removes every config file belonging to a project's group
    /// (`appscale-app___<project>-*.cfg`), best-effort per file.
    pub fn remove_group(&self, project: &aim_core::ProjectId) -> Vec<PathBuf> {
        let prefix = format!("appscale-app___{project}-");
        let mut removed = Vec::new();
        let Ok(entries) = std::fs::read_dir(&self.conf_dir) else {
            return removed;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&prefix) && name.ends_with(".cfg") {
                let path = entry.path();
                if let Err(error) = std::fs::remove_file(&path) {
                    warn!(path = %path.display(), %error, "failed to remove supervisor config");
                } else {
                    removed.push(path);
                }
            }
        }
        removed
    }

    pub fn read_pid(&self, entry: &EntryName) -> std::io::Result<i32> {
        let contents = std::fs::read_to_string(self.pid_path(entry))?;
        contents.trim().parse().map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "pidfile did not contain an integer")
        })
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
