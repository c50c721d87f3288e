//! # keystone Library
//!
//! Plugin runtime: components export named capabilities, require others in
//! version ranges, and are driven through an install/activate/deactivate
//! lifecycle in dependency order with per-component fault isolation.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Foundation types, errors, and lifecycle states
//! - [`graph`] - Directed graph of named vertices, traversal and cycle detection
//! - [`dependency`] - Versions, providers, requirements and install order
//! - [`lifecycle`] - Descriptors, hooks and the per-component state machine
//! - [`platform`] - Component manager and platform facade
//! - [`application`] - Configuration loading
//! - [`logger`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use keystone_lib::{Platform, PlatformConfig};
//! # fn run<L: keystone_lib::ComponentLoader>(loader: L) -> Result<(), Box<dyn std::error::Error>> {
//! let config = PlatformConfig::load()?;
//! keystone_lib::Logger::init(config.to_logger_config())?;
//!
//! let mut platform = Platform::from_config(loader, &config);
//! let report = platform.start()?;
//! for failure in &report.activate.failed {
//!     eprintln!("{}: {}", failure.component, failure.error);
//! }
//! platform.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod dependency;
pub mod graph;
pub mod lifecycle;
pub mod logger;
pub mod platform;
pub mod primitives;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use application::PlatformConfig;
pub use dependency::{DependencyError, DependencyManager, Version, VersionRange};
pub use graph::{Graph, GraphError};
pub use lifecycle::{
    ComponentContainer, ComponentDescriptor, ComponentLoader, Hook, HookAdapter, HookError,
    LifecycleError, LoaderError,
};
pub use logger::Logger;
pub use platform::{
    BatchReport, ComponentError, ComponentManager, Platform, PlatformError, PlatformState,
};
pub use primitives::{
    ComponentState, ConfigError, LogFormat, LogLevel, LogOutput, LoggerError, Transition,
};
