// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The instance-lifecycle business logic: command construction, health
//! probing, revision garbage collection, log rotation, and the state
//! machine that ties them together. Pure logic and in-process state only —
//! every external system is reached through an `aim-adapters` trait.

pub mod command_builder;
pub mod health_probe;
pub mod lifecycle;
pub mod logrotate;
pub mod revision_gc;

pub use command_builder::{CommandInputs, StartCommand};
pub use health_probe::HealthProbe;
pub use lifecycle::{LifecycleContext, LifecycleDeps, LifecycleEvent, LifecycleTiming};
pub use logrotate::LogRotationWriter;
pub use revision_gc::{RevisionGc, RevisionGcError};
