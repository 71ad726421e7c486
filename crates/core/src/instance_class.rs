// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instance-class to max-memory mapping.
//!
//! The mapping itself is deployment configuration (see
//! `DeploymentConfigView::instance_classes` in aim-adapters); this module
//! just holds the lookup table and the fallback default once it has been
//! loaded.

use std::collections::HashMap;

/// Applied when a version has no `instanceClass`, or names one this
/// deployment doesn't recognize.
pub const DEFAULT_MAX_MEMORY_MB: u32 = 300;

/// Amount reserved for the JVM's permgen, the parent process and thread
/// stacks before the remainder is handed to the child as `-Xmx`.
pub const JAVA_OVERHEAD_MB: u32 = 250;

/// A loaded `instanceClass -> max memory (MB)` table.
#[derive(Debug, Clone, Default)]
pub struct InstanceClassTable(HashMap<String, u32>);

impl InstanceClassTable {
    pub fn new(classes: HashMap<String, u32>) -> Self {
        Self(classes)
    }

    /// The standard App Engine-style class table, used when no deployment
    /// override is configured.
    pub fn standard() -> Self {
        Self(HashMap::from([
            ("F1".to_string(), 128),
            ("F2".to_string(), 256),
            ("F4".to_string(), 512),
            ("F4_1G".to_string(), 1024),
            ("B1".to_string(), 128),
            ("B2".to_string(), 256),
            ("B4".to_string(), 512),
            ("B4_1G".to_string(), 1024),
            ("B8".to_string(), 1024),
        ]))
    }

    /// Resolves `instance_class` to a max-memory value, falling back to
    /// `default_max_memory` when absent or unrecognized.
    pub fn max_memory(&self, instance_class: Option<&str>, default_max_memory: u32) -> u32 {
        instance_class
            .and_then(|class| self.0.get(class).copied())
            .unwrap_or(default_max_memory)
    }
}

#[cfg(test)]
#[path = "instance_class_tests.rs"]
mod tests;
