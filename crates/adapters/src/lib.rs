// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! aim-adapters: clients for AIM's external collaborators.
//!
//! Each collaborator (Supervisor, RoutingController, SourceManager,
//! ProjectsManager, DeploymentConfig) is a trait plus a reqwest- or
//! file-backed production implementation, plus an in-memory fake for
//! tests. `aim-engine` depends only on the traits.

pub mod deployment_config;
pub mod projects;
pub mod routing;
pub mod source;
pub mod supervisor;

pub use deployment_config::{DeploymentConfigError, DeploymentConfigView, FileDeploymentConfig};
pub use projects::{PollingProjectsManager, ProjectsManagerError, ProjectsManagerView, ProjectsSnapshot};
pub use routing::{RoutingController, RoutingControllerError, RoutingHttpClient, RoutingResult};
pub use source::{SourceManager, SourceManagerError, SourceManagerHttpClient};
pub use supervisor::{Supervisor, SupervisorConfigWriter, SupervisorError, SupervisorHttpClient, UnmonitorOutcome};

#[cfg(any(test, feature = "test-support"))]
pub mod fakes;
