//! Test support for keystone
//!
//! Compiled for the crate's own tests and, behind the `test-utils` feature,
//! for downstream test crates:
//! - An in-memory [`ComponentLoader`](crate::lifecycle::ComponentLoader)
//! - Scripted hooks that record every callback and fail on demand
//! - Descriptor shorthands
//! - Temporary directories for `.env` files

pub mod filesystem;
pub mod hooks;
pub mod loader;

pub use filesystem::TempDirFixture;
pub use hooks::{CallLog, HookScript, ScriptedHook};
pub use loader::InMemoryLoader;

use crate::dependency::Version;
use crate::lifecycle::{ComponentDescriptor, ExportSpec, RequireSpec};

/// Parse a version literal
pub fn version(text: &str) -> Version {
    Version::parse(text).unwrap_or_else(|e| panic!("bad version literal {text:?}: {e}"))
}

/// Descriptor with no hooks, requires or exports
pub fn descriptor(id: &str, version_text: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(id, version(version_text))
}

/// Requirement on any version of `name`
pub fn require_any(name: &str) -> RequireSpec {
    RequireSpec::new(name)
}

/// Requirement on `[min, max)`
pub fn require_range(name: &str, min: &str, max: &str) -> RequireSpec {
    RequireSpec::new(name)
        .min(version(min), true)
        .max(version(max), false)
}

pub fn export(name: &str, version_text: &str) -> ExportSpec {
    ExportSpec::new(name, version(version_text))
}
