// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only accessor for deployment-wide configuration: the
//! instance-class memory table and GCS-adjacent settings, reloaded from
//! a TOML file.

use std::path::PathBuf;

use aim_core::InstanceClassTable;
use parking_lot::RwLock;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentConfigError {
    #[error("failed to read deployment config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse deployment config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct RuntimeParams {
    #[serde(default = "default_max_memory")]
    max_memory: u32,
}

fn default_max_memory() -> u32 {
    aim_core::DEFAULT_MAX_MEMORY_MB
}

fn default_gcs_scheme() -> String {
    "https".to_string()
}

fn default_gcs_port() -> u16 {
    443
}

#[derive(Debug, Clone, Deserialize)]
struct GcsConfig {
    #[serde(default)]
    host: Option<String>,
    #[serde(default = "default_gcs_scheme")]
    scheme: String,
    #[serde(default = "default_gcs_port")]
    port: u16,
}

#[derive(Debug, Clone, Deserialize)]
struct RawDeploymentConfig {
    #[serde(default)]
    runtime_params: Option<RuntimeParams>,
    #[serde(default)]
    instance_classes: std::collections::HashMap<String, u32>,
    #[serde(default)]
    gcs: Option<GcsConfig>,
}

/// Read-only view over deployment-wide configuration.
pub trait DeploymentConfigView: Send + Sync {
    fn default_max_memory(&self) -> u32;
    fn instance_classes(&self) -> InstanceClassTable;

    /// `<scheme>://<host>:<port>` for Java's `GCS_HOST` env var, or `None`
    /// when no GCS host is configured for this deployment.
    fn gcs_host_url(&self) -> Option<String>;
}

/// Loads `RawDeploymentConfig` from a TOML file, matching the teacher's
/// `toml`-backed config-loading convention. Reloaded explicitly via
/// `reload()`; bootstrap calls it once before serving traffic.
pub struct FileDeploymentConfig {
    path: PathBuf,
    state: RwLock<RawDeploymentConfig>,
}

impl FileDeploymentConfig {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, DeploymentConfigError> {
        let path = path.into();
        let state = Self::read(&path)?;
        Ok(Self { path, state: RwLock::new(state) })
    }

    fn read(path: &PathBuf) -> Result<RawDeploymentConfig, DeploymentConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn reload(&self) -> Result<(), DeploymentConfigError> {
        let fresh = Self::read(&self.path)?;
        *self.state.write() = fresh;
        Ok(())
    }
}

impl DeploymentConfigView for FileDeploymentConfig {
    fn default_max_memory(&self) -> u32 {
        self.state
            .read()
            .runtime_params
            .as_ref()
            .map(|params| params.max_memory)
            .unwrap_or(aim_core::DEFAULT_MAX_MEMORY_MB)
    }

    fn instance_classes(&self) -> InstanceClassTable {
        let state = self.state.read();
        if state.instance_classes.is_empty() {
            InstanceClassTable::standard()
        } else {
            InstanceClassTable::new(state.instance_classes.clone())
        }
    }

    fn gcs_host_url(&self) -> Option<String> {
        let state = self.state.read();
        let gcs = state.gcs.as_ref()?;
        let host = gcs.host.as_ref()?;
        Some(format!("{}://{}:{}", gcs.scheme, host, gcs.port))
    }
}

#[cfg(test)]
#[path = "deployment_config_tests.rs"]
mod tests;
