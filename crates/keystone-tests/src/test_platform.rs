//! Hermetic platform builder for end-to-end tests

use crate::fixtures::load_component_set;
use anyhow::Result;
use keystone_lib::Platform;
use keystone_lib::lifecycle::ComponentDescriptor;
use keystone_lib::primitives::ComponentState;
use keystone_lib::testing::{CallLog, HookScript, InMemoryLoader};

/// Builder for a platform backed by an in-memory loader
#[derive(Debug, Default)]
pub struct TestPlatformBuilder {
    loader: InMemoryLoader,
    references: Vec<String>,
}

impl TestPlatformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a fixture's descriptors and queue its start references
    pub fn with_fixture(mut self, name: &str) -> Result<Self> {
        let set = load_component_set(name)?;
        set.install_into(&mut self.loader);
        self.references.extend(set.references());
        Ok(self)
    }

    /// Serve one extra descriptor under its id and queue it for start
    pub fn with_component(mut self, descriptor: ComponentDescriptor) -> Self {
        let reference = descriptor.id.clone();
        self.loader.add_component(&reference, descriptor);
        self.references.push(reference);
        self
    }

    /// Queue a reference the loader may or may not know
    pub fn with_reference(mut self, reference: &str) -> Self {
        self.references.push(reference.to_string());
        self
    }

    pub fn with_script(mut self, class: &str, script: HookScript) -> Self {
        self.loader = self.loader.with_script(class, script);
        self
    }

    pub fn with_broken_hook(mut self, class: &str) -> Self {
        self.loader = self.loader.with_broken_hook(class);
        self
    }

    pub fn build(self) -> TestPlatform {
        let log = self.loader.log();
        TestPlatform {
            platform: Platform::new(self.loader, self.references),
            log,
        }
    }
}

/// A platform plus the log every scripted hook writes to
#[derive(Debug)]
pub struct TestPlatform {
    pub platform: Platform<InMemoryLoader>,
    pub log: CallLog,
}

impl TestPlatform {
    /// State of a managed component, `None` when it is not managed
    pub fn state_of(&self, id: &str) -> Option<ComponentState> {
        self.platform
            .manager()
            .get_component(id)
            .ok()
            .and_then(|c| c.state())
    }

    /// Component ids whose hooks ran `event`, in call order, deduplicated
    pub fn components_with(&self, event: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for entry in self.log.events(event) {
            let component = entry.split('/').next().unwrap_or_default().to_string();
            if !seen.contains(&component) {
                seen.push(component);
            }
        }
        seen
    }
}
