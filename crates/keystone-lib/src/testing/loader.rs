//! In-memory component loader

use super::hooks::{CallLog, HookScript, ScriptedHook};
use crate::lifecycle::{ComponentDescriptor, ComponentLoader, Hook, LoaderError};
use std::collections::{HashMap, HashSet};
use std::fmt;

type HookFactory = Box<dyn Fn(&str) -> Box<dyn Hook> + Send + Sync>;

/// Loader serving descriptors from a map
///
/// Hook classes become [`ScriptedHook`]s sharing one [`CallLog`], unless a
/// factory is registered for the class or the class is marked broken.
#[derive(Default)]
pub struct InMemoryLoader {
    descriptors: HashMap<String, ComponentDescriptor>,
    scripts: HashMap<String, HookScript>,
    factories: HashMap<String, HookFactory>,
    broken: HashSet<String>,
    log: CallLog,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `descriptor` for `reference`
    pub fn with_component(mut self, reference: &str, descriptor: ComponentDescriptor) -> Self {
        self.add_component(reference, descriptor);
        self
    }

    /// Serve `descriptor` under its own id
    pub fn with(self, descriptor: ComponentDescriptor) -> Self {
        let reference = descriptor.id.clone();
        self.with_component(&reference, descriptor)
    }

    pub fn with_script(mut self, class: &str, script: HookScript) -> Self {
        self.scripts.insert(class.to_string(), script);
        self
    }

    pub fn with_factory<F>(mut self, class: &str, factory: F) -> Self
    where
        F: Fn(&str) -> Box<dyn Hook> + Send + Sync + 'static,
    {
        self.factories.insert(class.to_string(), Box::new(factory));
        self
    }

    /// Hook creation for `class` fails
    pub fn with_broken_hook(mut self, class: &str) -> Self {
        self.broken.insert(class.to_string());
        self
    }

    pub fn add_component(&mut self, reference: &str, descriptor: ComponentDescriptor) {
        self.descriptors.insert(reference.to_string(), descriptor);
    }

    /// Log shared by every scripted hook this loader creates
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl ComponentLoader for InMemoryLoader {
    fn load_descriptor(&self, reference: &str) -> Result<ComponentDescriptor, LoaderError> {
        self.descriptors
            .get(reference)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound {
                reference: reference.to_string(),
            })
    }

    fn create_hook(&self, component: &str, class: &str) -> Result<Box<dyn Hook>, LoaderError> {
        if self.broken.contains(class) {
            return Err(LoaderError::HookCreation {
                class: class.to_string(),
                reason: "class is marked broken".to_string(),
            });
        }

        if let Some(factory) = self.factories.get(class) {
            return Ok(factory(component));
        }

        let script = self.scripts.get(class).copied().unwrap_or_default();
        Ok(Box::new(ScriptedHook::new(
            component,
            class,
            script,
            self.log.clone(),
        )))
    }
}

impl fmt::Debug for InMemoryLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryLoader")
            .field("descriptors", &self.descriptors.keys().collect::<Vec<_>>())
            .field("scripts", &self.scripts)
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("broken", &self.broken)
            .finish()
    }
}
