// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writes and removes the per-project logrotate config.

use std::path::PathBuf;

use aim_core::ProjectId;
use tracing::warn;

/// Default per-instance-server log size before rotation (`APP_LOG_SIZE`).
pub const APP_LOG_SIZE_BYTES: u64 = 10 * 1024 * 1024;
/// The dashboard project gets a larger budget (`DASHBOARD_LOG_SIZE`).
pub const DASHBOARD_LOG_SIZE_BYTES: u64 = 250 * 1024 * 1024;
pub const DASHBOARD_PROJECT_ID: &str = "appscaledashboard";

/// Picks the log-size budget for a project: the dashboard gets a larger
/// allowance than every other project.
pub fn log_size_for(project_id: &ProjectId) -> u64 {
    if project_id.as_str() == DASHBOARD_PROJECT_ID {
        DASHBOARD_LOG_SIZE_BYTES
    } else {
        APP_LOG_SIZE_BYTES
    }
}

/// Writes/removes `LOGROTATE_DIR/appscale-<projectId>`.
pub struct LogRotationWriter {
    logrotate_dir: PathBuf,
}

impl LogRotationWriter {
    pub fn new(logrotate_dir: impl Into<PathBuf>) -> Self {
        Self { logrotate_dir: logrotate_dir.into() }
    }

    pub fn config_path(&self, project_id: &ProjectId) -> PathBuf {
        self.logrotate_dir.join(format!("appscale-{project_id}"))
    }

    /// Pure rendering, golden-string testable.
    pub fn render(watch: &str, size_bytes: u64) -> String {
        format!(
            "/var/log/appscale/{watch}*.log {{\n  size {size_bytes}\n  missingok\n  rotate 7\n  compress\n  delaycompress\n  notifempty\n  copytruncate\n}}\n"
        )
    }

    /// `install(projectId, watch, size_bytes)` — `watch` is the supervisor
    /// group name (`app___<projectId>`), passed explicitly rather than
    /// recomputed so the caller's `EntryName::group` stays the single
    /// source of truth for that string.
    pub fn install(&self, project_id: &ProjectId, watch: &str, size_bytes: u64) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.logrotate_dir)?;
        std::fs::write(self.config_path(project_id), Self::render(watch, size_bytes))
    }

    /// Best-effort removal; failures are logged, never surfaced — a
    /// missing logrotate config never blocks a stop from succeeding.
    pub fn remove(&self, project_id: &ProjectId) {
        if let Err(error) = std::fs::remove_file(self.config_path(project_id)) {
            warn!(project_id = project_id.as_str(), %error, "failed to remove logrotate config");
        }
    }
}

#[cfg(test)]
#[path = "logrotate_tests.rs"]
mod tests;
