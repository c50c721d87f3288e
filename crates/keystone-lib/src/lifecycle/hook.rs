//! Hook objects: the code a component runs on lifecycle events

use crate::primitives::ComponentState;
use std::fmt;
use thiserror::Error;

/// Hook callback failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HookError {
    #[error("Hook {hook} failed: {reason}")]
    Failed { hook: String, reason: String },
}

impl HookError {
    pub fn failed(hook: impl Into<String>, reason: impl Into<String>) -> Self {
        HookError::Failed {
            hook: hook.into(),
            reason: reason.into(),
        }
    }
}

/// Lifecycle callbacks of one hook object
///
/// Hooks are created by a [`super::ComponentLoader`] during install and owned
/// by the component's container until it is disposed.
pub trait Hook: Send {
    /// Name used in logs and errors, usually the hook class
    fn name(&self) -> &str;

    fn activate(&mut self) -> Result<(), HookError>;

    fn deactivate(&mut self) -> Result<(), HookError>;

    /// Called after every state change of the owning container
    fn on_state_change(&mut self, state: ComponentState) -> Result<(), HookError>;
}

type Callback = Box<dyn FnMut() -> Result<(), HookError> + Send>;
type StateCallback = Box<dyn FnMut(ComponentState) -> Result<(), HookError> + Send>;

/// Builds a full [`Hook`] out of whichever callbacks an object offers
///
/// Missing callbacks succeed without doing anything.
pub struct HookAdapter {
    name: String,
    on_activate: Option<Callback>,
    on_deactivate: Option<Callback>,
    on_state: Option<StateCallback>,
}

impl HookAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_activate: None,
            on_deactivate: None,
            on_state: None,
        }
    }

    pub fn on_activate<F>(mut self, callback: F) -> Self
    where
        F: FnMut() -> Result<(), HookError> + Send + 'static,
    {
        self.on_activate = Some(Box::new(callback));
        self
    }

    pub fn on_deactivate<F>(mut self, callback: F) -> Self
    where
        F: FnMut() -> Result<(), HookError> + Send + 'static,
    {
        self.on_deactivate = Some(Box::new(callback));
        self
    }

    pub fn on_state<F>(mut self, callback: F) -> Self
    where
        F: FnMut(ComponentState) -> Result<(), HookError> + Send + 'static,
    {
        self.on_state = Some(Box::new(callback));
        self
    }
}

impl Hook for HookAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self) -> Result<(), HookError> {
        match self.on_activate.as_mut() {
            Some(callback) => callback(),
            None => Ok(()),
        }
    }

    fn deactivate(&mut self) -> Result<(), HookError> {
        match self.on_deactivate.as_mut() {
            Some(callback) => callback(),
            None => Ok(()),
        }
    }

    fn on_state_change(&mut self, state: ComponentState) -> Result<(), HookError> {
        match self.on_state.as_mut() {
            Some(callback) => callback(state),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for HookAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookAdapter")
            .field("name", &self.name)
            .field("on_activate", &self.on_activate.is_some())
            .field("on_deactivate", &self.on_deactivate.is_some())
            .field("on_state", &self.on_state.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    include!("hook.test.rs");
}
