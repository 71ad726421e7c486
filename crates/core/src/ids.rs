// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for projects, services, versions, revisions and instances.
//!
//! `EntryName` is the one identifier whose textual shape is load-bearing:
//! the supervisor knows instances only by this string, and `RevisionGC`
//! recovers a coarse revision key by splitting it back apart. Keeping the
//! encode/decode logic in one place means the `app___` prefix and the
//! trailing `-<port>` can never be mis-parsed by a caller that forgot the
//! convention.

use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AimError;

const ENTRY_PREFIX: &str = "app___";

fn project_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("static pattern is valid"))
}

/// A project identifier, validated against `[a-z0-9-]+`.
///
/// Used as a directory and supervisor entry name component, so it is
/// validated eagerly at construction rather than at each use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    pub fn parse(value: impl Into<String>) -> Result<Self, AimError> {
        let value = value.into();
        if value.is_empty() || !project_id_pattern().is_match(&value) {
            return Err(AimError::BadConfiguration(format!(
                "invalid project ID: {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ProjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectId {
    type Error = AimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ProjectId> for String {
    fn from(value: ProjectId) -> Self {
        value.0
    }
}

macro_rules! plain_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

plain_id!(ServiceId);
plain_id!(VersionId);

/// Identifies an immutable unpacked source tree at `UNPACK_ROOT/<revision_key>/app`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevisionKey(String);

impl RevisionKey {
    /// Path separator used to join the tuple components. Matches the
    /// rendering used by the active-set examples in the revision GC spec
    /// (`"p-s-v-1"` for `(p, s, v, 1)`).
    pub const SEPARATOR: char = '-';

    pub fn new(project: &ProjectId, service: &ServiceId, version: &VersionId, revision: u64) -> Self {
        Self(format!(
            "{}{sep}{}{sep}{}{sep}{}",
            project.as_str(),
            service.as_str(),
            version.as_str(),
            revision,
            sep = Self::SEPARATOR
        ))
    }

    /// Wraps an already-rendered key, e.g. one recovered from an entry name.
    pub fn from_rendered(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `(projectId, port)` — identifies a single supervised instance.
///
/// AIM never allocates ports; the caller (control plane) always supplies one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    pub project_id: ProjectId,
    pub port: u16,
}

impl InstanceId {
    pub fn new(project_id: ProjectId, port: u16) -> Self {
        Self { project_id, port }
    }

    pub fn entry_name(&self) -> EntryName {
        EntryName::new(self.project_id.clone(), self.port)
    }
}

/// The structured supervisor entry name `app___<projectId>-<port>`.
///
/// The triple-underscore prefix and the trailing `-<port>` are load-bearing
/// for `RevisionGC`'s prefix scan; this type exists so that convention is
/// expressed once, as `encode`/`decode`, rather than re-spliced at each call
/// site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryName(String);

impl EntryName {
    pub fn new(project_id: ProjectId, port: u16) -> Self {
        Self(format!("{ENTRY_PREFIX}{project_id}-{port}"))
    }

    /// The group watch name for all instances of a project: `app___<projectId>`.
    pub fn group(project_id: &ProjectId) -> String {
        format!("{ENTRY_PREFIX}{project_id}")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a raw supervisor entry name, returning `None` if it doesn't
    /// carry the `app___` prefix (i.e. it belongs to something AIM doesn't
    /// own).
    pub fn decode(raw: &str) -> Option<EntryName> {
        if raw.starts_with(ENTRY_PREFIX) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    /// Recover the coarse revision-root string this entry name was derived
    /// from: strip the `app___` prefix and the trailing `-<port>`.
    ///
    /// This is a *project/service/version* identifier at best — entry names
    /// don't carry the full `(project, service, version, revision)` tuple,
    /// so `RevisionGC` treats the result as a prefix hint, not an exact
    /// `RevisionKey`.
    pub fn strip_to_revision_root(&self) -> &str {
        let without_prefix = &self.0[ENTRY_PREFIX.len()..];
        match without_prefix.rsplit_once('-') {
            Some((root, _port)) => root,
            None => without_prefix,
        }
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
