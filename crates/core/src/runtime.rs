// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The application server runtimes AIM knows how to launch.

use serde::{Deserialize, Serialize};

/// A runtime as reported by `VersionDetails`.
///
/// `Python27`, `Go` and `Php` share a single launcher and command shape;
/// `Java` has a distinct one (see `aim-engine::command_builder`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    #[serde(rename = "python27")]
    Python27,
    Go,
    Php,
    Java,
}

crate::simple_display! {
    Runtime {
        Python27 => "python27",
        Go => "go",
        Php => "php",
        Java => "java",
    }
}

impl Runtime {
    /// `true` for the runtimes that share the `dev_appserver.py` launcher.
    pub fn uses_shared_launcher(self) -> bool {
        matches!(self, Runtime::Python27 | Runtime::Go | Runtime::Php)
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
