//! Orchestration: the component manager and the platform facade

pub mod manager;
pub mod runtime;

pub use manager::{BatchFailure, BatchReport, ComponentError, ComponentManager, ComponentStatus};
pub use runtime::{Platform, PlatformError, PlatformState, ShutdownReport, StartupReport};
