//! Fixture infrastructure for end-to-end tests
//!
//! Component sets are JSON files under `fixtures/components/`, each holding
//! the descriptors a loader should serve plus the references to start with.

use anyhow::{Context, Result};
use keystone_lib::lifecycle::ComponentDescriptor;
use keystone_lib::testing::InMemoryLoader;
use serde::Deserialize;
use std::path::PathBuf;

/// A named set of component descriptors
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentSet {
    pub name: String,
    /// References handed to the platform, in start order
    #[serde(default)]
    pub start: Vec<String>,
    pub components: Vec<ComponentFixture>,
}

/// One descriptor, optionally served under a reference other than its id
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentFixture {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(flatten)]
    pub descriptor: ComponentDescriptor,
}

impl ComponentFixture {
    pub fn reference(&self) -> &str {
        self.reference.as_deref().unwrap_or(&self.descriptor.id)
    }
}

impl ComponentSet {
    /// References to start: the explicit list, else every component in file order
    pub fn references(&self) -> Vec<String> {
        if !self.start.is_empty() {
            return self.start.clone();
        }
        self.components
            .iter()
            .map(|c| c.reference().to_string())
            .collect()
    }

    /// Add every descriptor of this set to `loader`
    pub fn install_into(&self, loader: &mut InMemoryLoader) {
        for component in &self.components {
            loader.add_component(component.reference(), component.descriptor.clone());
        }
    }

    pub fn into_loader(self) -> InMemoryLoader {
        let mut loader = InMemoryLoader::new();
        self.install_into(&mut loader);
        loader
    }
}

/// Absolute path of `fixtures/components/<name>.json`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("components")
        .join(format!("{name}.json"))
}

/// Load and parse a component set fixture
pub fn load_component_set(name: &str) -> Result<ComponentSet> {
    let path = fixture_path(name);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to load component set '{}'", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse component set '{}'", path.display()))
}
