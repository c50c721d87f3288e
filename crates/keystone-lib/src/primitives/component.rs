use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of a managed component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentState {
    /// Descriptor loaded, not yet part of the platform
    Uninstalled,
    /// Requirements satisfied and hooks created
    Installed,
    /// Every hook activated without error
    Active,
    /// Still installed but not running (after deactivation or a failed activation)
    Deactivated,
    /// Terminal: hooks released, awaiting removal
    Disposed,
}

impl ComponentState {
    /// No transition leaves this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComponentState::Disposed)
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentState::Uninstalled => write!(f, "uninstalled"),
            ComponentState::Installed => write!(f, "installed"),
            ComponentState::Active => write!(f, "active"),
            ComponentState::Deactivated => write!(f, "deactivated"),
            ComponentState::Disposed => write!(f, "disposed"),
        }
    }
}

/// Render an optional state, `None` meaning the component was never loaded
pub fn describe_state(state: &Option<ComponentState>) -> String {
    match state {
        Some(state) => state.to_string(),
        None => "unloaded".to_string(),
    }
}

/// Lifecycle operations a container can be asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    /// Read the descriptor: (unloaded | Uninstalled) -> Uninstalled
    Load,
    /// Resolve requirements and create hooks: Uninstalled -> Installed
    Install,
    /// Installed | Deactivated -> Active
    Activate,
    /// Active -> Deactivated
    Deactivate,
    /// Installed | Deactivated -> Uninstalled
    Uninstall,
    /// Uninstalled -> Disposed
    Dispose,
}

impl Transition {
    /// Check if this transition may start from `state` (pure function)
    pub fn is_valid_from(&self, state: Option<ComponentState>) -> bool {
        use ComponentState::*;

        match (self, state) {
            (Transition::Load, None | Some(Uninstalled)) => true,
            (Transition::Install, Some(Uninstalled)) => true,
            (Transition::Activate, Some(Installed | Deactivated)) => true,
            (Transition::Deactivate, Some(Active)) => true,
            (Transition::Uninstall, Some(Installed | Deactivated)) => true,
            (Transition::Dispose, Some(Uninstalled)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Load => write!(f, "load"),
            Transition::Install => write!(f, "install"),
            Transition::Activate => write!(f, "activate"),
            Transition::Deactivate => write!(f, "deactivate"),
            Transition::Uninstall => write!(f, "uninstall"),
            Transition::Dispose => write!(f, "dispose"),
        }
    }
}
