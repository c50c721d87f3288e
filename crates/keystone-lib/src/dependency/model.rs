//! Dependency vertices and requirement edges

use super::version::{Version, VersionRange, version_in_range};
use crate::graph::Vertex;
use serde::Serialize;

/// Providers registered under one version
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderEntry<P> {
    pub version: Version,
    pub providers: Vec<P>,
}

/// A named capability and the providers offering it
#[derive(Debug, Clone, Serialize)]
pub struct Dependency<P> {
    name: String,
    providers: Vec<ProviderEntry<P>>,
}

impl<P: Clone + PartialEq> Dependency<P> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            providers: Vec::new(),
        }
    }

    /// Register `provider` under `version`
    ///
    /// Returns `false` when the same provider is already listed under an
    /// equal version.
    pub fn add_provider(&mut self, version: Version, provider: P) -> bool {
        match self.providers.iter_mut().find(|e| e.version == version) {
            Some(entry) => {
                if entry.providers.contains(&provider) {
                    return false;
                }
                entry.providers.push(provider);
            }
            None => self.providers.push(ProviderEntry {
                version,
                providers: vec![provider],
            }),
        }
        true
    }

    /// Drop `provider` from every version; returns whether anything changed
    pub fn remove_provider(&mut self, provider: &P) -> bool {
        let before = self.provider_count();
        for entry in &mut self.providers {
            entry.providers.retain(|p| p != provider);
        }
        self.providers.retain(|e| !e.providers.is_empty());
        before != self.provider_count()
    }

    /// Entries in registration order
    pub fn providers(&self) -> &[ProviderEntry<P>] {
        &self.providers
    }

    /// Providers whose version falls in `range`, as `(version, provider)`
    pub fn providers_in(&self, range: &VersionRange) -> Vec<(&Version, &P)> {
        self.providers
            .iter()
            .filter(|e| version_in_range(&e.version, range))
            .flat_map(|e| e.providers.iter().map(move |p| (&e.version, p)))
            .collect()
    }

    pub fn has_provider_in(&self, range: &VersionRange) -> bool {
        self.providers
            .iter()
            .any(|e| version_in_range(&e.version, range))
    }

    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.providers.iter().map(|e| &e.version)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.iter().map(|e| e.providers.len()).sum()
    }

    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }
}

impl<P> Vertex for Dependency<P> {
    fn name(&self) -> &str {
        &self.name
    }
}

/// "tail requires head within `range`"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    range: VersionRange,
    satisfied: bool,
}

impl Requirement {
    pub fn new(range: VersionRange) -> Self {
        Self {
            range,
            satisfied: false,
        }
    }

    pub fn range(&self) -> &VersionRange {
        &self.range
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    /// Whether a provider at `version` would satisfy this requirement
    pub fn is_satisfied_with(&self, version: &Version) -> bool {
        version_in_range(version, &self.range)
    }

    pub(crate) fn set_range(&mut self, range: VersionRange) {
        self.range = range;
    }

    pub(crate) fn set_satisfied(&mut self, satisfied: bool) {
        self.satisfied = satisfied;
    }
}
