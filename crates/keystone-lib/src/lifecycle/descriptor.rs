//! Component descriptors and the loader that produces them

use super::hook::Hook;
use crate::dependency::{Bound, Version, VersionRange};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a [`ComponentLoader`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoaderError {
    #[error("Component reference {reference} not found")]
    NotFound { reference: String },

    #[error("Invalid descriptor for {reference}: {reason}")]
    InvalidDescriptor { reference: String, reason: String },

    #[error("Failed to create hook {class}: {reason}")]
    HookCreation { class: String, reason: String },
}

fn inclusive() -> bool {
    true
}

/// One declared requirement: capability name plus optional bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequireSpec {
    pub name: String,
    #[serde(default)]
    pub min_version: Option<Version>,
    #[serde(default = "inclusive")]
    pub min_inclusive: bool,
    #[serde(default)]
    pub max_version: Option<Version>,
    #[serde(default = "inclusive")]
    pub max_inclusive: bool,
}

impl RequireSpec {
    /// Any version of `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_version: None,
            min_inclusive: true,
            max_version: None,
            max_inclusive: true,
        }
    }

    pub fn min(mut self, version: Version, inclusive: bool) -> Self {
        self.min_version = Some(version);
        self.min_inclusive = inclusive;
        self
    }

    pub fn max(mut self, version: Version, inclusive: bool) -> Self {
        self.max_version = Some(version);
        self.max_inclusive = inclusive;
        self
    }

    pub fn range(&self) -> VersionRange {
        let bound = |version: &Option<Version>, inclusive: bool| {
            version.clone().map(|version| Bound { version, inclusive })
        };
        VersionRange::new(
            bound(&self.min_version, self.min_inclusive),
            bound(&self.max_version, self.max_inclusive),
        )
    }
}

/// A capability a component offers to others
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSpec {
    pub name: String,
    pub version: Version,
}

impl ExportSpec {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// Already-parsed declarations of one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Logical id, also the name of the component's own capability
    pub id: String,
    pub version: Version,
    /// Hook classes, created and activated in this order
    #[serde(default)]
    pub hooks: Vec<String>,
    #[serde(default)]
    pub requires: Vec<RequireSpec>,
    #[serde(default)]
    pub exports: Vec<ExportSpec>,
}

impl ComponentDescriptor {
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
            hooks: Vec::new(),
            requires: Vec::new(),
            exports: Vec::new(),
        }
    }

    pub fn hook(mut self, class: impl Into<String>) -> Self {
        self.hooks.push(class.into());
        self
    }

    pub fn requires(mut self, require: RequireSpec) -> Self {
        self.requires.push(require);
        self
    }

    pub fn exports(mut self, export: ExportSpec) -> Self {
        self.exports.push(export);
        self
    }
}

/// Turns a component reference into a descriptor and hook objects
///
/// Manifest parsing and code loading live behind this trait.
pub trait ComponentLoader: Send {
    fn load_descriptor(&self, reference: &str) -> Result<ComponentDescriptor, LoaderError>;

    /// Create one hook of `class` for component `component`
    fn create_hook(&self, component: &str, class: &str) -> Result<Box<dyn Hook>, LoaderError>;
}
