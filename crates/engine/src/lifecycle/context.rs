// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LifecycleContext` — the single Arc-backed bundle of collaborators every
//! `start`/`stop_one`/`stop_all` call reads from. Constructed once in
//! `ProcessBootstrap` and cloned (cheaply — one `Arc` clone) into every
//! request handler, replacing the module-level globals the original kept.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use aim_adapters::{DeploymentConfigView, ProjectsManagerView, RoutingController, SourceManager, Supervisor, SupervisorConfigWriter};
use aim_core::{BootstrapOptions, ProjectId};
use tokio::sync::mpsc;

use crate::health_probe::{HealthProbe, Sleeper, TokioSleeper};
use crate::logrotate::LogRotationWriter;
use crate::revision_gc::RevisionGc;

/// Emitted once a background task (probe-then-register, reaper) finishes.
/// The request path never awaits these; tests observe them by injecting a
/// channel via [`LifecycleDeps::events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Registered { project_id: ProjectId, port: u16 },
    ProbeTimedOut { project_id: ProjectId, port: u16 },
    RoutingFailed { project_id: ProjectId, port: u16 },
    Reaped { project_id: ProjectId, port: u16, forced: bool },
}

/// Timing knobs split out of the production constants so tests can run the
/// same code paths without waiting on real wall-clock budgets.
#[derive(Debug, Clone)]
pub struct LifecycleTiming {
    pub health_probe_timeout: Duration,
    pub health_probe_interval: Duration,
    /// Delay between `RoutingController::register` retries on `NOT_READY`.
    pub routing_retry_interval: Duration,
    /// `MAX_INSTANCE_RESPONSE_TIME` — grace period between SIGTERM and SIGKILL.
    pub reaper_grace: Duration,
    /// Poll interval while waiting to observe the child's exit.
    pub reaper_poll_interval: Duration,
}

impl Default for LifecycleTiming {
    fn default() -> Self {
        Self {
            health_probe_timeout: crate::health_probe::DEFAULT_TOTAL_TIMEOUT,
            health_probe_interval: crate::health_probe::DEFAULT_INTERVAL,
            routing_retry_interval: Duration::from_secs(5),
            reaper_grace: Duration::from_secs(600),
            reaper_poll_interval: Duration::from_millis(250),
        }
    }
}

/// Everything needed to build a [`LifecycleContext`]. Kept as a plain,
/// field-by-field struct (rather than a generated builder) since most
/// fields are trait objects a caller must supply explicitly anyway.
pub struct LifecycleDeps {
    pub supervisor: Arc<dyn Supervisor>,
    pub routing: Arc<dyn RoutingController>,
    pub source: Arc<dyn SourceManager>,
    pub projects: Arc<dyn ProjectsManagerView>,
    pub deployment_config: Arc<dyn DeploymentConfigView>,
    pub config_writer: SupervisorConfigWriter,
    pub logrotate: LogRotationWriter,
    pub options: BootstrapOptions,
    pub unpack_root: PathBuf,
    /// Shared by the health probe's backoff and the reaper's exit-poll loop.
    pub sleeper: Arc<dyn Sleeper>,
    pub timing: LifecycleTiming,
    pub events: Option<mpsc::UnboundedSender<LifecycleEvent>>,
}

impl LifecycleDeps {
    /// Production defaults: a real tokio sleeper, the spec's timing
    /// constants, and no event sink.
    pub fn new(
        supervisor: Arc<dyn Supervisor>,
        routing: Arc<dyn RoutingController>,
        source: Arc<dyn SourceManager>,
        projects: Arc<dyn ProjectsManagerView>,
        deployment_config: Arc<dyn DeploymentConfigView>,
        config_writer: SupervisorConfigWriter,
        logrotate: LogRotationWriter,
        options: BootstrapOptions,
        unpack_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            supervisor,
            routing,
            source,
            projects,
            deployment_config,
            config_writer,
            logrotate,
            options,
            unpack_root: unpack_root.into(),
            sleeper: Arc::new(TokioSleeper),
            timing: LifecycleTiming::default(),
            events: None,
        }
    }
}

pub(crate) struct Inner {
    pub(crate) supervisor: Arc<dyn Supervisor>,
    pub(crate) routing: Arc<dyn RoutingController>,
    pub(crate) source: Arc<dyn SourceManager>,
    pub(crate) projects: Arc<dyn ProjectsManagerView>,
    pub(crate) deployment_config: Arc<dyn DeploymentConfigView>,
    pub(crate) config_writer: SupervisorConfigWriter,
    pub(crate) logrotate: LogRotationWriter,
    pub(crate) gc: RevisionGc,
    pub(crate) health_probe: HealthProbe<Arc<dyn Sleeper>>,
    pub(crate) sleeper: Arc<dyn Sleeper>,
    pub(crate) options: BootstrapOptions,
    pub(crate) unpack_root: PathBuf,
    pub(crate) timing: LifecycleTiming,
    pub(crate) events: Option<mpsc::UnboundedSender<LifecycleEvent>>,
}

/// Cheap (`Arc`-backed) handle to the instance lifecycle state machine.
/// `Clone` is a pointer copy — every HTTP handler owns one.
#[derive(Clone)]
pub struct LifecycleContext(pub(crate) Arc<Inner>);

impl LifecycleContext {
    pub fn new(deps: LifecycleDeps) -> Self {
        let gc = RevisionGc::new(deps.supervisor.clone(), deps.projects.clone(), deps.source.clone());
        let health_probe = HealthProbe::with_sleeper(deps.sleeper.clone());

        Self(Arc::new(Inner {
            supervisor: deps.supervisor,
            routing: deps.routing,
            source: deps.source,
            projects: deps.projects,
            deployment_config: deps.deployment_config,
            config_writer: deps.config_writer,
            logrotate: deps.logrotate,
            gc,
            health_probe,
            sleeper: deps.sleeper,
            options: deps.options,
            unpack_root: deps.unpack_root,
            timing: deps.timing,
            events: deps.events,
        }))
    }

    pub(crate) fn emit(&self, event: LifecycleEvent) {
        if let Some(sender) = &self.0.events {
            let _ = sender.send(event);
        }
    }
}


#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
