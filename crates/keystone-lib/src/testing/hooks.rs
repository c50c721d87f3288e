//! Recording hooks with scripted failures

use crate::lifecycle::{Hook, HookError};
use crate::primitives::ComponentState;
use std::sync::{Arc, Mutex};

/// Shared, ordered record of hook callbacks
///
/// Entries read `component/class:event`, where event is `activate`,
/// `deactivate` or `state=<state>`.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        if let Ok(mut entries) = self.0.lock() {
            entries.push(entry.into());
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// `component/class` of every entry for `event`, in call order
    pub fn events(&self, event: &str) -> Vec<String> {
        let suffix = format!(":{event}");
        self.entries()
            .into_iter()
            .filter_map(|entry| entry.strip_suffix(&suffix).map(str::to_string))
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.0.lock() {
            entries.clear();
        }
    }
}

/// Which callbacks of a [`ScriptedHook`] fail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookScript {
    pub fail_activate: bool,
    pub fail_deactivate: bool,
    pub fail_state_change: bool,
}

impl HookScript {
    pub fn failing_activate() -> Self {
        Self {
            fail_activate: true,
            ..Self::default()
        }
    }

    pub fn failing_deactivate() -> Self {
        Self {
            fail_deactivate: true,
            ..Self::default()
        }
    }

    pub fn failing_state_change() -> Self {
        Self {
            fail_state_change: true,
            ..Self::default()
        }
    }
}

/// Hook that records its callbacks and fails as scripted
#[derive(Debug)]
pub struct ScriptedHook {
    component: String,
    class: String,
    script: HookScript,
    log: CallLog,
}

impl ScriptedHook {
    pub fn new(component: &str, class: &str, script: HookScript, log: CallLog) -> Self {
        Self {
            component: component.to_string(),
            class: class.to_string(),
            script,
            log,
        }
    }

    fn call(&self, event: &str, fail: bool) -> Result<(), HookError> {
        self.log
            .record(format!("{}/{}:{}", self.component, self.class, event));
        if fail {
            return Err(HookError::failed(
                &self.class,
                format!("scripted {event} failure"),
            ));
        }
        Ok(())
    }
}

impl Hook for ScriptedHook {
    fn name(&self) -> &str {
        &self.class
    }

    fn activate(&mut self) -> Result<(), HookError> {
        self.call("activate", self.script.fail_activate)
    }

    fn deactivate(&mut self) -> Result<(), HookError> {
        self.call("deactivate", self.script.fail_deactivate)
    }

    fn on_state_change(&mut self, state: ComponentState) -> Result<(), HookError> {
        self.call(&format!("state={state}"), self.script.fail_state_change)
    }
}
