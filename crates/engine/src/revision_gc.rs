// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Computes the active revision set (supervisor entries ∪ projects
//! manager) and asks `SourceManager` to delete everything else.

use std::collections::HashSet;
use std::sync::Arc;

use aim_core::{ProjectId, RevisionKey, ServiceId, VersionId};
use aim_adapters::{ProjectsManagerError, ProjectsManagerView, SourceManager, SourceManagerError, Supervisor, SupervisorError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RevisionGcError {
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Projects(#[from] ProjectsManagerError),

    #[error(transparent)]
    Source(#[from] SourceManagerError),
}

/// Reads the supervisor's live entries and the projects manager's full
/// version tree, unions them into an active set, and asks `SourceManager`
/// to reclaim everything else. Safe to run concurrently with starts: the
/// active set is always a superset of truly-live revisions.
pub struct RevisionGc {
    supervisor: Arc<dyn Supervisor>,
    projects: Arc<dyn ProjectsManagerView>,
    source: Arc<dyn SourceManager>,
}

impl RevisionGc {
    pub fn new(
        supervisor: Arc<dyn Supervisor>,
        projects: Arc<dyn ProjectsManagerView>,
        source: Arc<dyn SourceManager>,
    ) -> Self {
        Self { supervisor, projects, source }
    }

    pub async fn collect(&self) -> Result<(), RevisionGcError> {
        let mut active_set = self.entry_derived_hints().await?;
        active_set.extend(self.projects_manager_revision_keys().await?);

        info!(active_set_size = active_set.len(), "running revision GC");
        self.source.clean_old_revisions(&active_set).await?;
        Ok(())
    }

    async fn entry_derived_hints(&self) -> Result<HashSet<String>, RevisionGcError> {
        let entries = self.supervisor.list_entries().await?;
        Ok(entries
            .iter()
            .filter_map(|raw| aim_core::EntryName::decode(raw))
            .map(|entry| entry.strip_to_revision_root().to_string())
            .collect())
    }

    async fn projects_manager_revision_keys(&self) -> Result<HashSet<String>, RevisionGcError> {
        let snapshot = self.projects.snapshot().await?;
        let mut keys = HashSet::new();
        for (project_id, services) in snapshot {
            let Ok(project_id) = ProjectId::parse(project_id.clone()) else {
                warn!(project_id, "skipping malformed project id during GC");
                continue;
            };
            for (service_id, versions) in services {
                let service_id = ServiceId::new(service_id);
                for (version_id, details) in versions {
                    let version_id = VersionId::new(version_id);
                    let key = RevisionKey::new(&project_id, &service_id, &version_id, details.revision);
                    keys.insert(key.as_str().to_string());
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
#[path = "revision_gc_tests.rs"]
mod tests;
