//! Versioned capabilities, their providers, and the requirements between them

pub mod manager;
pub mod model;
pub mod version;

pub use manager::{DependencyError, DependencyManager};
pub use model::{Dependency, ProviderEntry, Requirement};
pub use version::{Bound, Version, VersionError, VersionRange, version_in_range};
