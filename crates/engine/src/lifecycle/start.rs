// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `start` operation — spec.md §4.5.2's seven-step sequence.

use std::collections::HashMap;

use aim_adapters::RoutingResult;
use aim_core::{AimError, EntryName, ProjectId, RevisionKey, ServiceId, VersionId};
use tracing::{info, warn};

use crate::command_builder::{self, CommandInputs};
use crate::health_probe::Sleeper;
use crate::logrotate;

use super::context::{LifecycleContext, LifecycleEvent};

/// `_ah/health_check` — the App Engine liveness endpoint every runtime serves.
pub const HEALTH_CHECK_PATH: &str = "/_ah/health_check";

impl LifecycleContext {
    /// Resolves the version, ensures its source is unpacked, builds and
    /// writes the supervisor config, and asks the supervisor to start the
    /// single entry. Returns as soon as the supervisor accepts the start —
    /// health-probing and routing registration continue in the background.
    pub async fn start(
        &self,
        project_id: ProjectId,
        service_id: ServiceId,
        version_id: VersionId,
        app_port: u16,
        env_vars: HashMap<String, String>,
    ) -> Result<(), AimError> {
        let inner = &self.0;

        let version = inner
            .projects
            .version_details(&project_id, &service_id, &version_id)
            .await
            .map_err(|error| AimError::BadConfiguration(format!("version not found: {error}")))?;

        let max_memory = inner.deployment_config.instance_classes().max_memory(
            version.instance_class.as_deref(),
            inner.deployment_config.default_max_memory(),
        );
        let revision_key = RevisionKey::new(&project_id, &service_id, &version_id, version.revision);

        inner
            .source
            .ensure(&revision_key, version.source_url(), version.runtime)
            .await
            .map_err(|error| AimError::SourceFailure(error.to_string()))?;

        info!(project_id = %project_id, runtime = %version.runtime, "starting application");

        let entry = EntryName::new(project_id.clone(), app_port);
        let pidfile = inner.config_writer.pid_path(&entry);

        let command = command_builder::build(&CommandInputs {
            project_id: &project_id,
            runtime: version.runtime,
            port: app_port,
            pidfile: &pidfile,
            unpack_root: &inner.unpack_root,
            revision_key: revision_key.as_str(),
            max_memory_mb: max_memory,
            options: &inner.options,
            gcs_host: inner.deployment_config.gcs_host_url(),
        })?;

        // Request-supplied env vars are the base; CommandBuilder's computed
        // vars win on collision, mirroring the original's `env_vars.update(...)`.
        let mut env = env_vars;
        env.extend(command.env);

        inner
            .config_writer
            .create(&entry, &command.argv, app_port, &env, max_memory, &inner.options.syslog_server, true)
            .map_err(|error| AimError::Internal(format!("failed to write supervisor config: {error}")))?;

        inner
            .supervisor
            .start(entry.as_str(), false)
            .await
            .map_err(|error| AimError::SupervisorFailure(error.to_string()))?;

        self.spawn_probe_and_register(project_id.clone(), app_port);

        let group = EntryName::group(&project_id);
        if let Err(error) = inner.logrotate.install(&project_id, &group, logrotate::log_size_for(&project_id)) {
            warn!(project_id = %project_id, %error, "failed to install log rotation, continuing");
        }

        Ok(())
    }

    fn spawn_probe_and_register(&self, project_id: ProjectId, port: u16) {
        let ctx = self.clone();
        tokio::spawn(async move {
            ctx.probe_and_register(project_id, port).await;
        });
    }

    async fn probe_and_register(&self, project_id: ProjectId, port: u16) {
        let inner = &self.0;
        let alive = inner
            .health_probe
            .wait(
                &inner.options.private_ip,
                port,
                HEALTH_CHECK_PATH,
                inner.timing.health_probe_timeout,
                inner.timing.health_probe_interval,
            )
            .await;

        if !alive {
            warn!(project_id = %project_id, port, "health probe timed out, leaving instance for external reaper");
            self.emit(LifecycleEvent::ProbeTimedOut { project_id, port });
            return;
        }

        loop {
            match inner.routing.register(&project_id, &inner.options.private_ip, port).await {
                Ok(RoutingResult::Ok) => {
                    info!(project_id = %project_id, port, "registered with routing controller");
                    self.emit(LifecycleEvent::Registered { project_id, port });
                    return;
                }
                Ok(RoutingResult::NotReady) => {
                    inner.sleeper.sleep(inner.timing.routing_retry_interval).await;
                }
                Err(error) => {
                    warn!(project_id = %project_id, port, %error, "routing controller registration failed");
                    self.emit(LifecycleEvent::RoutingFailed { project_id, port });
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "start_tests.rs"]
mod tests;
