// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `stop_one`/`stop_all` operations — spec.md §4.5.3/§4.5.4.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::time::Instant;
use tracing::{info, warn};

use aim_adapters::UnmonitorOutcome;
use aim_core::{AimError, EntryName, ProjectId};

use crate::health_probe::Sleeper;

use super::context::{LifecycleContext, LifecycleEvent};

impl LifecycleContext {
    /// Stops a single `(projectId, port)` instance. On a 404 from
    /// `unmonitor` ("already stopped"), returns immediately without
    /// touching the config file, reload, or GC — matching the original's
    /// early return on `ProcessNotFound`.
    pub async fn stop_one(&self, project_id: ProjectId, port: u16) -> Result<(), AimError> {
        let inner = &self.0;
        let entry = EntryName::new(project_id.clone(), port);

        let pid = inner.config_writer.read_pid(&entry).map_err(|error| {
            AimError::Internal(format!("{} does not exist: {error}", inner.config_writer.pid_path(&entry).display()))
        })?;

        match inner.supervisor.unmonitor(entry.as_str()).await {
            Ok(UnmonitorOutcome::AlreadyStopped) => return Ok(()),
            Ok(UnmonitorOutcome::Stopped) => {}
            Err(error) => return Err(AimError::SupervisorFailure(error.to_string())),
        }

        inner.config_writer.remove(&entry);

        inner.supervisor.reload().await.map_err(|error| AimError::SupervisorFailure(error.to_string()))?;

        inner.gc.collect().await.map_err(|error| AimError::Internal(error.to_string()))?;

        self.spawn_reaper(project_id, port, pid);
        Ok(())
    }

    /// Stops every port of a project in one group call. Deliberately does
    /// not reload the supervisor afterwards — preserved verbatim from a TODO
    /// in the original (spec.md §9(a)): the config files are already gone,
    /// so the next restart is gated by their recreation regardless.
    pub async fn stop_all(&self, project_id: ProjectId) -> Result<(), AimError> {
        let inner = &self.0;
        let group = EntryName::group(&project_id);

        inner.supervisor.stop_group(&group).await.map_err(|error| AimError::SupervisorFailure(error.to_string()))?;

        inner.config_writer.remove_group(&project_id);
        inner.logrotate.remove(&project_id);

        inner.gc.collect().await.map_err(|error| AimError::Internal(error.to_string()))?;
        Ok(())
    }

    fn spawn_reaper(&self, project_id: ProjectId, port: u16, pid: i32) {
        let ctx = self.clone();
        tokio::spawn(async move {
            ctx.reap(project_id, port, pid).await;
        });
    }

    /// Sends SIGTERM, waits up to `reaper_grace` for the process to exit
    /// (polling liveness with signal 0), then escalates to SIGKILL.
    async fn reap(&self, project_id: ProjectId, port: u16, pid: i32) {
        let inner = &self.0;
        let target = Pid::from_raw(pid);

        if let Err(error) = kill(target, Signal::SIGTERM) {
            warn!(project_id = %project_id, port, pid, %error, "failed to send SIGTERM, assuming already gone");
            self.emit(LifecycleEvent::Reaped { project_id, port, forced: false });
            return;
        }

        let deadline = Instant::now() + inner.timing.reaper_grace;
        let forced = loop {
            if kill(target, None).is_err() {
                break false;
            }
            if Instant::now() >= deadline {
                let _ = kill(target, Signal::SIGKILL);
                break true;
            }
            inner.sleeper.sleep(inner.timing.reaper_poll_interval).await;
        };

        info!(project_id = %project_id, port, pid, forced, "finished stopping instance");
        self.emit(LifecycleEvent::Reaped { project_id, port, forced });
    }
}

#[cfg(test)]
#[path = "stop_tests.rs"]
mod tests;
