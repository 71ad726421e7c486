// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The typed error taxonomy backing AIM's HTTP responses.
//!
//! Internal layers (engine, adapters) only ever raise `AimError`; only the
//! dispatcher at the HTTP boundary converts a variant into a status code.

use thiserror::Error;

/// Errors produced anywhere in the instance lifecycle.
#[derive(Debug, Error)]
pub enum AimError {
    /// Invalid project id, missing request field, unknown version, unknown
    /// runtime, Java memory <= 250MB, missing `appengine-web.xml`.
    #[error("bad configuration: {0}")]
    BadConfiguration(String),

    /// A non-recoverable response from the supervisor (start/stop/unmonitor).
    #[error("supervisor failure: {0}")]
    SupervisorFailure(String),

    /// `SourceManager::ensure` failed.
    #[error("source failure: {0}")]
    SourceFailure(String),

    /// Any other I/O or internal failure that should surface as HTTP 500
    /// (e.g. a missing PID file on stop).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AimError {
    /// Maps a variant to the HTTP status code spec.md §7 assigns it.
    ///
    /// `NotFound`/`TransientSupervisor`/`RoutingNotReady`/`HealthTimeout`/
    /// `ReaperTimeout` from the spec's error table never reach this point —
    /// they are swallowed, retried, or logged-and-ignored before an
    /// `AimError` is ever constructed.
    pub fn status_code(&self) -> u16 {
        match self {
            AimError::BadConfiguration(_) => 400,
            AimError::SupervisorFailure(_) => 500,
            AimError::SourceFailure(_) => 500,
            AimError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
