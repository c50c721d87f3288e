//! Platform facade: one component manager plus a platform-wide state

use super::manager::{BatchFailure, BatchReport, ComponentError, ComponentManager};
use crate::application::PlatformConfig;
use crate::lifecycle::ComponentLoader;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

/// Platform-wide lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformState {
    /// Created, never started
    Initializing,
    Active,
    ShuttingDown,
    /// Shut down, or a start was refused; may be started again
    Stopped,
}

impl fmt::Display for PlatformState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformState::Initializing => write!(f, "initializing"),
            PlatformState::Active => write!(f, "active"),
            PlatformState::ShuttingDown => write!(f, "shutting-down"),
            PlatformState::Stopped => write!(f, "stopped"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Cannot {operation} the platform while {state}")]
    InvalidState {
        operation: &'static str,
        state: PlatformState,
    },

    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// What `start` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupReport {
    /// References that could not be added
    pub rejected: Vec<BatchFailure>,
    pub install: BatchReport,
    pub activate: BatchReport,
}

impl StartupReport {
    pub fn is_success(&self) -> bool {
        self.rejected.is_empty() && self.install.is_success() && self.activate.is_success()
    }
}

/// What `shutdown` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShutdownReport {
    pub deactivate: BatchReport,
    pub uninstall: BatchReport,
    pub dispose: BatchReport,
}

impl ShutdownReport {
    pub fn is_success(&self) -> bool {
        self.deactivate.is_success() && self.uninstall.is_success() && self.dispose.is_success()
    }
}

/// A running set of components
#[derive(Debug)]
pub struct Platform<L> {
    state: PlatformState,
    references: Vec<String>,
    manager: ComponentManager<L>,
}

impl<L: ComponentLoader> Platform<L> {
    /// Platform that will add `references` (in order) when started
    pub fn new(loader: L, references: Vec<String>) -> Self {
        Self {
            state: PlatformState::Initializing,
            references,
            manager: ComponentManager::new(loader),
        }
    }

    /// Platform for the components named by `config`
    pub fn from_config(loader: L, config: &PlatformConfig) -> Self {
        Self::new(loader, config.components.clone())
    }

    pub fn state(&self) -> PlatformState {
        self.state
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn manager(&self) -> &ComponentManager<L> {
        &self.manager
    }

    /// Direct access for single-component operations
    pub fn manager_mut(&mut self) -> &mut ComponentManager<L> {
        &mut self.manager
    }

    /// Add the configured references, install all, activate all
    ///
    /// Component failures are reported, not returned; only a circular
    /// requirement graph refuses the start.
    pub fn start(&mut self) -> Result<StartupReport, PlatformError> {
        if !matches!(
            self.state,
            PlatformState::Initializing | PlatformState::Stopped
        ) {
            return Err(PlatformError::InvalidState {
                operation: "start",
                state: self.state,
            });
        }

        info!(components = self.references.len(), "Starting platform");

        let mut rejected = Vec::new();
        for reference in &self.references {
            if self.manager.has_reference(reference) {
                continue;
            }
            if let Err(err) = self.manager.add_component(reference) {
                warn!(reference = %reference, error = %err, "Component rejected");
                rejected.push(BatchFailure {
                    component: reference.clone(),
                    error: err.to_string(),
                });
            }
        }

        let install = match self.manager.install_all() {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, "Platform start refused");
                self.state = PlatformState::Stopped;
                return Err(err.into());
            }
        };
        let activate = self.manager.activate_all();

        self.state = PlatformState::Active;
        let report = StartupReport {
            rejected,
            install,
            activate,
        };
        if report.is_success() {
            info!("Platform started");
        } else {
            warn!("Platform started with component failures");
        }
        Ok(report)
    }

    /// Deactivate, uninstall and dispose everything, dependents first
    pub fn shutdown(&mut self) -> Result<ShutdownReport, PlatformError> {
        if self.state != PlatformState::Active {
            return Err(PlatformError::InvalidState {
                operation: "shut down",
                state: self.state,
            });
        }

        info!("Shutting down platform");
        self.state = PlatformState::ShuttingDown;

        let report = ShutdownReport {
            deactivate: self.manager.deactivate_all(),
            uninstall: self.manager.uninstall_all(),
            dispose: self.manager.dispose_all(),
        };

        self.state = PlatformState::Stopped;
        info!(remaining = self.manager.len(), "Platform stopped");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    include!("runtime.test.rs");
}
