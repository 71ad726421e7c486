// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory test doubles for every collaborator trait, used by
//! `aim-engine`'s lifecycle unit tests instead of spinning up HTTP
//! fixtures.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use aim_core::{InstanceClassTable, ProjectId, RevisionKey, Runtime, ServiceId, VersionDetails, VersionId};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::deployment_config::DeploymentConfigView;
use crate::projects::{ProjectsManagerError, ProjectsManagerView, ProjectsSnapshot};
use crate::routing::{RoutingController, RoutingControllerError, RoutingResult};
use crate::source::{SourceManager, SourceManagerError};
use crate::supervisor::{Supervisor, SupervisorError, UnmonitorOutcome};

struct FakeSupervisorState {
    entries: Vec<String>,
    started: Vec<(String, bool)>,
    stopped_groups: Vec<String>,
    unmonitor_outcome: UnmonitorOutcome,
    unmonitor_error: Option<String>,
    reload_count: u32,
}

/// In-memory `Supervisor`. Defaults to reporting every entry as cleanly
/// stopped; configure `set_unmonitor_outcome`/`fail_unmonitor` to exercise
/// the 404/503 branches.
#[derive(Clone)]
pub struct FakeSupervisor {
    state: Arc<Mutex<FakeSupervisorState>>,
}

impl Default for FakeSupervisor {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeSupervisorState {
                entries: Vec::new(),
                started: Vec::new(),
                stopped_groups: Vec::new(),
                unmonitor_outcome: UnmonitorOutcome::Stopped,
                unmonitor_error: None,
                reload_count: 0,
            })),
        }
    }
}

impl FakeSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entries(&self, entries: Vec<String>) {
        self.state.lock().entries = entries;
    }

    pub fn set_unmonitor_outcome(&self, outcome: UnmonitorOutcome) {
        self.state.lock().unmonitor_outcome = outcome;
    }

    /// Forces the next `unmonitor` call to return `TransientExhausted`,
    /// simulating retries exhausted against a stuck supervisor.
    pub fn fail_unmonitor_transient(&self) {
        self.state.lock().unmonitor_error = Some("transient".to_string());
    }

    pub fn started(&self) -> Vec<(String, bool)> {
        self.state.lock().started.clone()
    }

    pub fn stopped_groups(&self) -> Vec<String> {
        self.state.lock().stopped_groups.clone()
    }

    pub fn reload_count(&self) -> u32 {
        self.state.lock().reload_count
    }
}

#[async_trait]
impl Supervisor for FakeSupervisor {
    async fn list_entries(&self) -> Result<Vec<String>, SupervisorError> {
        Ok(self.state.lock().entries.clone())
    }

    async fn start(&self, entry: &str, as_group: bool) -> Result<(), SupervisorError> {
        self.state.lock().started.push((entry.to_string(), as_group));
        Ok(())
    }

    async fn stop_group(&self, group: &str) -> Result<(), SupervisorError> {
        self.state.lock().stopped_groups.push(group.to_string());
        Ok(())
    }

    async fn unmonitor(&self, _entry: &str) -> Result<UnmonitorOutcome, SupervisorError> {
        let mut state = self.state.lock();
        if state.unmonitor_error.take().is_some() {
            return Err(SupervisorError::TransientExhausted);
        }
        Ok(state.unmonitor_outcome)
    }

    async fn reload(&self) -> Result<(), SupervisorError> {
        self.state.lock().reload_count += 1;
        Ok(())
    }
}

struct FakeRoutingState {
    results: HashMap<(String, u16), RoutingResult>,
    default_result: RoutingResult,
    calls: Vec<(String, String, u16)>,
}

/// In-memory `RoutingController`. Defaults to `RoutingResult::Ok`;
/// `set_result_for` lets a test make a specific `(project, port)` pair
/// return `NotReady` a configured number of times before the lifecycle
/// retry loop is expected to succeed.
#[derive(Clone)]
pub struct FakeRoutingController {
    state: Arc<Mutex<FakeRoutingState>>,
}

impl Default for FakeRoutingController {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeRoutingState {
                results: HashMap::new(),
                default_result: RoutingResult::Ok,
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeRoutingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default_result(&self, result: RoutingResult) {
        self.state.lock().default_result = result;
    }

    pub fn set_result_for(&self, project_id: &str, port: u16, result: RoutingResult) {
        self.state.lock().results.insert((project_id.to_string(), port), result);
    }

    pub fn calls(&self) -> Vec<(String, String, u16)> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl RoutingController for FakeRoutingController {
    async fn register(
        &self,
        project_id: &ProjectId,
        ip: &str,
        port: u16,
    ) -> Result<RoutingResult, RoutingControllerError> {
        let mut state = self.state.lock();
        state.calls.push((project_id.as_str().to_string(), ip.to_string(), port));
        Ok(state
            .results
            .get(&(project_id.as_str().to_string(), port))
            .copied()
            .unwrap_or(state.default_result))
    }
}

struct FakeSourceState {
    ensure_calls: Vec<String>,
    clean_calls: Vec<HashSet<String>>,
}

/// In-memory `SourceManager`. `ensure` always succeeds, returning a path
/// derived from the revision key rather than touching the filesystem.
#[derive(Clone)]
pub struct FakeSourceManager {
    state: Arc<Mutex<FakeSourceState>>,
}

impl Default for FakeSourceManager {
    fn default() -> Self {
        Self { state: Arc::new(Mutex::new(FakeSourceState { ensure_calls: Vec::new(), clean_calls: Vec::new() })) }
    }
}

impl FakeSourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_calls(&self) -> Vec<String> {
        self.state.lock().ensure_calls.clone()
    }

    pub fn clean_calls(&self) -> Vec<HashSet<String>> {
        self.state.lock().clean_calls.clone()
    }
}

#[async_trait]
impl SourceManager for FakeSourceManager {
    async fn ensure(
        &self,
        revision_key: &RevisionKey,
        _source_url: &str,
        _runtime: Runtime,
    ) -> Result<std::path::PathBuf, SourceManagerError> {
        self.state.lock().ensure_calls.push(revision_key.as_str().to_string());
        Ok(std::path::PathBuf::from(format!("/fake-unpack-root/{}/app", revision_key.as_str())))
    }

    async fn clean_old_revisions(&self, active_set: &HashSet<String>) -> Result<(), SourceManagerError> {
        self.state.lock().clean_calls.push(active_set.clone());
        Ok(())
    }
}

/// In-memory `ProjectsManagerView` backed by a plain nested map the test
/// populates directly, with no polling or file I/O.
#[derive(Clone, Default)]
pub struct FakeProjectsManager {
    snapshot: Arc<Mutex<ProjectsSnapshot>>,
}

impl FakeProjectsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, project_id: &str, service_id: &str, version_id: &str, details: VersionDetails) {
        self.snapshot
            .lock()
            .entry(project_id.to_string())
            .or_default()
            .entry(service_id.to_string())
            .or_default()
            .insert(version_id.to_string(), details);
    }
}

#[async_trait]
impl ProjectsManagerView for FakeProjectsManager {
    async fn version_details(
        &self,
        project_id: &ProjectId,
        service_id: &ServiceId,
        version_id: &VersionId,
    ) -> Result<VersionDetails, ProjectsManagerError> {
        self.snapshot
            .lock()
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
        Ok(self.snapshot.lock().clone())
    }
}

/// In-memory `DeploymentConfigView` with a fixed standard instance-class
/// table unless overridden.
pub struct FakeDeploymentConfig {
    default_max_memory: u32,
    instance_classes: InstanceClassTable,
    gcs_host_url: Option<String>,
}

impl Default for FakeDeploymentConfig {
    fn default() -> Self {
        Self {
            default_max_memory: aim_core::DEFAULT_MAX_MEMORY_MB,
            instance_classes: InstanceClassTable::standard(),
            gcs_host_url: None,
        }
    }
}

impl FakeDeploymentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_max_memory(mut self, value: u32) -> Self {
        self.default_max_memory = value;
        self
    }

    pub fn with_gcs_host_url(mut self, value: impl Into<String>) -> Self {
        self.gcs_host_url = Some(value.into());
        self
    }
}

impl DeploymentConfigView for FakeDeploymentConfig {
    fn default_max_memory(&self) -> u32 {
        self.default_max_memory
    }

    fn instance_classes(&self) -> InstanceClassTable {
        self.instance_classes.clone()
    }

    fn gcs_host_url(&self) -> Option<String> {
        self.gcs_host_url.clone()
    }
}

#[cfg(test)]
#[path = "fakes_tests.rs"]
mod tests;
