//! Lifecycle state machine for one component
//!
//! A container owns the component's descriptor, its state and the hooks
//! created for it. Every transition is guarded by [`Transition::is_valid_from`];
//! a rejected transition leaves the container untouched.

use super::descriptor::{ComponentDescriptor, ComponentLoader, LoaderError};
use super::hook::{Hook, HookError};
use crate::dependency::DependencyManager;
use crate::primitives::{ComponentState, Transition, describe_state};
use std::fmt::{self, Debug};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Cannot {operation} component {component} while {}", describe_state(.state))]
    InvalidTransition {
        component: String,
        operation: Transition,
        state: Option<ComponentState>,
    },

    #[error("Component {component} is disposed")]
    Disposed { component: String },

    #[error("Component {component} has no descriptor loaded")]
    NotLoaded { component: String },

    #[error("Component {component} has unsatisfied requirements: {}", .missing.join(", "))]
    UnsatisfiedDependencies {
        component: String,
        missing: Vec<String>,
    },

    #[error("Loader failed for component {component}: {source}")]
    Loader {
        component: String,
        #[source]
        source: LoaderError,
    },

    #[error("Activation of component {component} failed in hook {hook}: {source}")]
    ActivationFailed {
        component: String,
        hook: String,
        #[source]
        source: HookError,
    },
}

/// One managed component and its hooks
pub struct ComponentContainer {
    reference: String,
    state: Option<ComponentState>,
    descriptor: Option<ComponentDescriptor>,
    hooks: Vec<Box<dyn Hook>>,
}

impl ComponentContainer {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            state: None,
            descriptor: None,
            hooks: Vec::new(),
        }
    }

    /// Reference the container was created from
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Logical id from the descriptor, or the reference before loading
    pub fn id(&self) -> &str {
        self.descriptor
            .as_ref()
            .map_or(self.reference.as_str(), |d| d.id.as_str())
    }

    /// `None` until the descriptor is loaded
    pub fn state(&self) -> Option<ComponentState> {
        self.state
    }

    pub fn descriptor(&self) -> Option<&ComponentDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn can(&self, operation: Transition) -> bool {
        operation.is_valid_from(self.state)
    }

    /// Read the descriptor through `loader`
    pub fn load<L>(&mut self, loader: &L) -> Result<&ComponentDescriptor, LifecycleError>
    where
        L: ComponentLoader + ?Sized,
    {
        self.guard(Transition::Load)?;

        let descriptor =
            loader
                .load_descriptor(&self.reference)
                .map_err(|source| LifecycleError::Loader {
                    component: self.reference.clone(),
                    source,
                })?;

        debug!(
            reference = %self.reference,
            component = %descriptor.id,
            version = %descriptor.version,
            "Component loaded"
        );
        self.state = Some(ComponentState::Uninstalled);
        Ok(self.descriptor.insert(descriptor))
    }

    /// Check requirements and create hooks; any failure disposes the container
    pub fn install<L, P>(
        &mut self,
        loader: &L,
        dependencies: &DependencyManager<P>,
    ) -> Result<(), LifecycleError>
    where
        L: ComponentLoader + ?Sized,
        P: Clone + PartialEq + Debug,
    {
        self.guard(Transition::Install)?;

        if let Err(err) = self.resolve(loader, dependencies) {
            error!(component = %self.id(), error = %err, "Install failed");
            self.hooks.clear();
            self.state = Some(ComponentState::Disposed);
            return Err(err);
        }

        self.enter(ComponentState::Installed);
        info!(component = %self.id(), "Component installed");
        Ok(())
    }

    /// Activate every hook in order, rolling back on the first failure
    pub fn activate(&mut self) -> Result<(), LifecycleError> {
        self.guard(Transition::Activate)?;

        for index in 0..self.hooks.len() {
            let Err(source) = self.hooks[index].activate() else {
                continue;
            };

            let hook = self.hooks[index].name().to_string();
            error!(component = %self.id(), hook = %hook, error = %source, "Hook activation failed");

            for earlier in self.hooks[..index].iter_mut().rev() {
                if let Err(err) = earlier.deactivate() {
                    warn!(
                        component = %self.reference,
                        hook = %earlier.name(),
                        error = %err,
                        "Rollback deactivation failed"
                    );
                }
            }

            self.enter(ComponentState::Deactivated);
            return Err(LifecycleError::ActivationFailed {
                component: self.id().to_string(),
                hook,
                source,
            });
        }

        self.enter(ComponentState::Active);
        info!(component = %self.id(), "Component activated");
        Ok(())
    }

    /// Deactivate every hook; failures are logged and do not stop the rest
    pub fn deactivate(&mut self) -> Result<(), LifecycleError> {
        self.guard(Transition::Deactivate)?;

        let component = self.id().to_string();
        for hook in self.hooks.iter_mut() {
            if let Err(err) = hook.deactivate() {
                warn!(component = %component, hook = %hook.name(), error = %err, "Hook deactivation failed");
            }
        }

        self.enter(ComponentState::Deactivated);
        info!(component = %component, "Component deactivated");
        Ok(())
    }

    /// Back to `Uninstalled`; hooks are kept
    pub fn uninstall(&mut self) -> Result<(), LifecycleError> {
        self.guard(Transition::Uninstall)?;
        self.enter(ComponentState::Uninstalled);
        info!(component = %self.id(), "Component uninstalled");
        Ok(())
    }

    /// Release the hooks; terminal
    pub fn dispose(&mut self) -> Result<(), LifecycleError> {
        self.guard(Transition::Dispose)?;
        self.enter(ComponentState::Disposed);
        self.hooks.clear();
        debug!(component = %self.id(), "Component disposed");
        Ok(())
    }

    /// Tell every hook about `state`; one failing hook does not stop the others
    pub fn notify_state_change(&mut self, state: ComponentState) {
        let component = self.id().to_string();
        for hook in self.hooks.iter_mut() {
            if let Err(err) = hook.on_state_change(state) {
                warn!(
                    component = %component,
                    hook = %hook.name(),
                    state = %state,
                    error = %err,
                    "State change notification failed"
                );
            }
        }
    }

    fn enter(&mut self, state: ComponentState) {
        self.state = Some(state);
        self.notify_state_change(state);
    }

    fn guard(&self, operation: Transition) -> Result<(), LifecycleError> {
        if self.state == Some(ComponentState::Disposed) {
            return Err(LifecycleError::Disposed {
                component: self.id().to_string(),
            });
        }

        if !operation.is_valid_from(self.state) {
            return Err(LifecycleError::InvalidTransition {
                component: self.id().to_string(),
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn resolve<L, P>(
        &mut self,
        loader: &L,
        dependencies: &DependencyManager<P>,
    ) -> Result<(), LifecycleError>
    where
        L: ComponentLoader + ?Sized,
        P: Clone + PartialEq + Debug,
    {
        let descriptor = self
            .descriptor
            .as_ref()
            .ok_or_else(|| LifecycleError::NotLoaded {
                component: self.reference.clone(),
            })?;

        let missing: Vec<String> = dependencies
            .unsatisfied_requirements(&descriptor.id)
            .into_iter()
            .map(|(name, requirement)| format!("{} {}", name, requirement.range()))
            .collect();
        if !missing.is_empty() {
            return Err(LifecycleError::UnsatisfiedDependencies {
                component: descriptor.id.clone(),
                missing,
            });
        }

        let mut hooks = Vec::with_capacity(descriptor.hooks.len());
        for class in &descriptor.hooks {
            let hook = loader
                .create_hook(&descriptor.id, class)
                .map_err(|source| LifecycleError::Loader {
                    component: descriptor.id.clone(),
                    source,
                })?;
            hooks.push(hook);
        }

        self.hooks = hooks;
        Ok(())
    }
}

impl fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("reference", &self.reference)
            .field("state", &self.state)
            .field("hooks", &self.hook_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    include!("container.test.rs");
}
