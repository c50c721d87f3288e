//! Component lifecycle: descriptors, hooks and the per-component state machine

pub mod container;
pub mod descriptor;
pub mod hook;

pub use container::{ComponentContainer, LifecycleError};
pub use descriptor::{ComponentDescriptor, ComponentLoader, ExportSpec, LoaderError, RequireSpec};
pub use hook::{Hook, HookAdapter, HookError};
