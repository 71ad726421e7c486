// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `VersionDetails` — the snapshot read from the projects manager.

use serde::{Deserialize, Serialize};

use crate::runtime::Runtime;

/// `deployment.zip.sourceUrl` — an opaque locator consumed by the source
/// manager. AIM never interprets it; it is handed verbatim to
/// `SourceManager::ensure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentZip {
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub zip: DeploymentZip,
}

/// A single version's configuration, as observed via `ProjectsManager`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDetails {
    pub runtime: Runtime,
    pub revision: u64,
    pub deployment: Deployment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_class: Option<String>,
}

impl VersionDetails {
    pub fn source_url(&self) -> &str {
        &self.deployment.zip.source_url
    }
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
