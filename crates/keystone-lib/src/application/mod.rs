//! Application layer: platform configuration
//!
//! Organizes configuration defaults, environment handling and loading.

pub mod config;
pub mod env;
pub mod loader;

// Re-export main types for convenience
pub use config::{ENV_PREFIX, PlatformConfig};
pub use env::{ColorOverride, EnvironmentConfig};
