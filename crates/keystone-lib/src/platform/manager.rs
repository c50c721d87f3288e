//! Orchestrator: owns every container and drives them in dependency order
//!
//! Each component is registered with the dependency manager under its own id
//! (provided by itself at its version), plus one requirement edge per
//! declared require and one provider per export. Bulk operations walk the
//! install order derived from [`DependencyManager::reverse_dependency_order`];
//! per-component failures are logged and reported, never fatal to the batch.

use crate::dependency::{DependencyError, DependencyManager, Version, VersionRange};
use crate::graph::Vertex;
use crate::lifecycle::{ComponentContainer, ComponentDescriptor, ComponentLoader, LifecycleError};
use crate::primitives::{ComponentState, Transition};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("Component reference {reference} is already registered")]
    DuplicateReference { reference: String },

    #[error("Component {id} is not managed by this platform")]
    UnknownComponent { id: String },

    #[error("Circular dependencies detected: {}", format_cycles(.cycles))]
    CircularDependency { cycles: Vec<Vec<String>> },

    #[error("Component {component} requires {dependency}, which has no active provider")]
    InactiveDependency {
        component: String,
        dependency: String,
    },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),
}

fn format_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|cycle| format!("[{}]", cycle.join(" -> ")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One component that failed during a bulk operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub component: String,
    pub error: String,
}

/// Outcome of one bulk operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub operation: Transition,
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn new(operation: Transition) -> Self {
        Self {
            operation,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.component.as_str()).collect()
    }

    fn succeed(&mut self, component: &str) {
        self.succeeded.push(component.to_string());
    }

    fn fail(&mut self, component: &str, error: &dyn std::error::Error) {
        self.failed.push(BatchFailure {
            component: component.to_string(),
            error: error.to_string(),
        });
    }
}

/// Snapshot of one managed component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentStatus {
    pub id: String,
    pub reference: String,
    pub version: Option<Version>,
    pub state: Option<ComponentState>,
    pub hooks: Vec<String>,
    pub requirements_satisfied: bool,
}

/// Owns all component containers of one platform instance
pub struct ComponentManager<L> {
    loader: L,
    dependencies: DependencyManager<String>,
    /// Registration order
    containers: Vec<ComponentContainer>,
    /// Reference -> logical id
    references: HashMap<String, String>,
}

impl<L: ComponentLoader> ComponentManager<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            dependencies: DependencyManager::new(),
            containers: Vec::new(),
            references: HashMap::new(),
        }
    }

    /// Load `reference` and register its capabilities and requirements
    ///
    /// A component whose id is already managed is reloaded: the previous
    /// container is shut down and its registrations replaced.
    pub fn add_component(&mut self, reference: &str) -> Result<&ComponentContainer, ComponentError> {
        if self.references.contains_key(reference) {
            return Err(ComponentError::DuplicateReference {
                reference: reference.to_string(),
            });
        }

        let mut container = ComponentContainer::new(reference);
        let descriptor = container.load(&self.loader)?.clone();
        let id = descriptor.id.clone();

        if let Some(index) = self.index_of(&id) {
            info!(component = %id, reference = %reference, "Reloading component");
            let previous = self.containers.remove(index);
            self.retire(previous);
        }

        self.register(&descriptor)?;
        self.references.insert(reference.to_string(), id.clone());
        self.containers.push(container);

        info!(
            component = %id,
            version = %descriptor.version,
            requires = descriptor.requires.len(),
            exports = descriptor.exports.len(),
            "Component added"
        );
        self.get_component(&id)
    }

    /// Install every uninstalled component in dependency order
    ///
    /// Fails only when the requirement graph is circular.
    pub fn install_all(&mut self) -> Result<BatchReport, ComponentError> {
        let cycles = self.dependencies.find_cycles();
        if !cycles.is_empty() {
            let err = ComponentError::CircularDependency { cycles };
            error!(error = %err, "Refusing to install");
            return Err(err);
        }

        let mut report = BatchReport::new(Transition::Install);
        for id in self.install_order() {
            if self.state_of(&id) != Some(ComponentState::Uninstalled) {
                continue;
            }
            match self.install_component(&id) {
                Ok(()) => report.succeed(&id),
                Err(err) => report.fail(&id, &err),
            }
        }

        Self::summarize(&report);
        Ok(report)
    }

    /// Activate installed or deactivated components in dependency order
    pub fn activate_all(&mut self) -> BatchReport {
        let mut report = BatchReport::new(Transition::Activate);
        for id in self.install_order() {
            if !self.can(&id, Transition::Activate) {
                continue;
            }
            match self.activate_component(&id) {
                Ok(()) => report.succeed(&id),
                Err(err) => report.fail(&id, &err),
            }
        }

        Self::summarize(&report);
        report
    }

    /// Deactivate active components, dependents first
    pub fn deactivate_all(&mut self) -> BatchReport {
        self.shutdown_step(Transition::Deactivate)
    }

    /// Uninstall installed or deactivated components, dependents first
    pub fn uninstall_all(&mut self) -> BatchReport {
        self.shutdown_step(Transition::Uninstall)
    }

    /// Dispose uninstalled components, dependents first, and drop them
    ///
    /// Containers already disposed by a failed install are dropped as well.
    pub fn dispose_all(&mut self) -> BatchReport {
        let report = self.shutdown_step(Transition::Dispose);

        let disposed: Vec<String> = self
            .containers
            .iter()
            .filter(|c| c.state() == Some(ComponentState::Disposed))
            .map(|c| c.id().to_string())
            .collect();
        for id in disposed {
            self.drop_component(&id);
        }

        report
    }

    /// Install one component; a failed resolve withdraws its provider registrations
    pub fn install_component(&mut self, id: &str) -> Result<(), ComponentError> {
        let index = self.require_index(id)?;
        if !self.containers[index].can(Transition::Install) {
            // Rejected transition leaves the container and its providers as they were
            self.containers[index].install(&self.loader, &self.dependencies)?;
            return Ok(());
        }
        let result = self.containers[index].install(&self.loader, &self.dependencies);

        if let Err(err) = result {
            warn!(component = %id, error = %err, "Install failed, withdrawing providers");
            self.dependencies.withdraw_provider(&id.to_string());
            return Err(err.into());
        }
        Ok(())
    }

    /// Activate one component once every requirement has an active provider
    pub fn activate_component(&mut self, id: &str) -> Result<(), ComponentError> {
        let index = self.require_index(id)?;
        if !self.containers[index].can(Transition::Activate) {
            // Invalid transitions are reported ahead of dependency checks
            self.containers[index].activate()?;
            return Ok(());
        }

        if let Some(dependency) = self.inactive_dependency(id) {
            let err = ComponentError::InactiveDependency {
                component: id.to_string(),
                dependency,
            };
            warn!(component = %id, error = %err, "Activation skipped");
            return Err(err);
        }

        let container = &mut self.containers[index];
        if let Err(err) = container.activate() {
            if container.state() == Some(ComponentState::Active) {
                if let Err(cleanup) = container.deactivate() {
                    warn!(component = %id, error = %cleanup, "Cleanup deactivation failed");
                }
            }
            return Err(err.into());
        }
        Ok(())
    }

    /// Deactivate one component; a no-op unless it is active
    pub fn deactivate_component(&mut self, id: &str) -> Result<(), ComponentError> {
        let index = self.require_index(id)?;
        let container = &mut self.containers[index];
        if container.state() != Some(ComponentState::Active) {
            debug!(component = %id, state = ?container.state(), "Not active, nothing to deactivate");
            return Ok(());
        }
        container.deactivate()?;
        Ok(())
    }

    pub fn uninstall_component(&mut self, id: &str) -> Result<(), ComponentError> {
        let index = self.require_index(id)?;
        self.containers[index].uninstall()?;
        Ok(())
    }

    /// Dispose one component, withdraw its registrations and drop it
    pub fn dispose_component(&mut self, id: &str) -> Result<(), ComponentError> {
        let index = self.require_index(id)?;
        self.containers[index].dispose()?;
        self.drop_component(id);
        Ok(())
    }

    pub fn get_component(&self, id: &str) -> Result<&ComponentContainer, ComponentError> {
        self.index_of(id)
            .map(|index| &self.containers[index])
            .ok_or_else(|| ComponentError::UnknownComponent { id: id.to_string() })
    }

    /// Containers in registration order
    pub fn components(&self) -> impl Iterator<Item = &ComponentContainer> {
        self.containers.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn has_reference(&self, reference: &str) -> bool {
        self.references.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Managed component ids, each after the components it requires
    ///
    /// A component is placed at its own vertex, which follows every
    /// capability it requires and every exporter those capabilities link to.
    pub fn install_order(&self) -> Vec<String> {
        let order: Vec<String> = self
            .dependencies
            .reverse_dependency_order()
            .into_iter()
            .map(|dependency| dependency.name())
            .filter(|name| self.contains(name))
            .map(str::to_string)
            .collect();

        debug!(order = ?order, "Install order computed");
        order
    }

    /// Status rows in registration order
    pub fn status(&self) -> Vec<ComponentStatus> {
        self.containers
            .iter()
            .map(|container| ComponentStatus {
                id: container.id().to_string(),
                reference: container.reference().to_string(),
                version: container.descriptor().map(|d| d.version.clone()),
                state: container.state(),
                hooks: container
                    .hook_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                requirements_satisfied: self
                    .dependencies
                    .all_requirements_satisfied(container.id()),
            })
            .collect()
    }

    /// Read-only view of the dependency graph
    pub fn dependencies(&self) -> &DependencyManager<String> {
        &self.dependencies
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    fn register(&mut self, descriptor: &ComponentDescriptor) -> Result<(), ComponentError> {
        let id = &descriptor.id;

        self.dependencies.dependency(id);
        self.dependencies
            .add_provider(id, descriptor.version.clone(), id.clone())?;

        for require in &descriptor.requires {
            self.dependencies
                .require(id, &require.name, require.range())?;
        }

        for export in &descriptor.exports {
            self.dependencies.dependency(&export.name);
            self.dependencies
                .add_provider(&export.name, export.version.clone(), id.clone())?;
            // A component that also requires the capability it exports is ordered by
            // that requirement; linking it back would close a cycle
            let consumes = descriptor.requires.iter().any(|r| r.name == export.name);
            if export.name != *id && !consumes {
                // Orders the exporter ahead of its capability
                self.dependencies.require(
                    &export.name,
                    id,
                    VersionRange::exactly(descriptor.version.clone()),
                )?;
            }
        }
        Ok(())
    }

    fn unregister(&mut self, descriptor: &ComponentDescriptor) {
        let id = &descriptor.id;
        self.dependencies.withdraw_provider(id);
        for require in &descriptor.requires {
            self.dependencies.remove_requirement(id, &require.name);
        }
        for export in &descriptor.exports {
            self.dependencies.remove_requirement(&export.name, id);
        }
    }

    /// Best-effort shutdown of a replaced container, then drop its registrations
    fn retire(&mut self, mut container: ComponentContainer) {
        let id = container.id().to_string();

        let steps = [
            Transition::Deactivate,
            Transition::Uninstall,
            Transition::Dispose,
        ];
        for step in steps {
            if !container.can(step) {
                continue;
            }
            let result = match step {
                Transition::Deactivate => container.deactivate(),
                Transition::Uninstall => container.uninstall(),
                _ => container.dispose(),
            };
            if let Err(err) = result {
                warn!(component = %id, operation = %step, error = %err, "Shutdown of replaced component failed");
            }
        }

        if let Some(descriptor) = container.descriptor() {
            self.unregister(descriptor);
        }
        self.references.retain(|_, managed| *managed != id);
    }

    fn drop_component(&mut self, id: &str) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let container = self.containers.remove(index);
        if let Some(descriptor) = container.descriptor() {
            self.unregister(descriptor);
        }
        self.references.remove(container.reference());
        debug!(component = %id, "Component dropped");
    }

    /// First requirement of `id` without an in-range provider in `Active` state
    fn inactive_dependency(&self, id: &str) -> Option<String> {
        self.dependencies
            .requirements_of(id)
            .into_iter()
            .find(|(name, requirement)| {
                !self
                    .dependencies
                    .providers_in_range(name, requirement.range())
                    .into_iter()
                    .any(|(_, provider)| self.state_of(provider) == Some(ComponentState::Active))
            })
            .map(|(name, _)| name.to_string())
    }

    /// Apply `operation` in reverse install order where it is valid
    fn shutdown_step(&mut self, operation: Transition) -> BatchReport {
        let mut order = self.install_order();
        for container in &self.containers {
            if !order.iter().any(|id| id == container.id()) {
                order.push(container.id().to_string());
            }
        }

        let mut report = BatchReport::new(operation);
        for id in order.into_iter().rev() {
            if !self.can(&id, operation) {
                continue;
            }
            let result = match operation {
                Transition::Deactivate => self.deactivate_component(&id),
                Transition::Uninstall => self.uninstall_component(&id),
                Transition::Dispose => self.dispose_component(&id),
                other => {
                    debug!(operation = %other, "Not a shutdown step");
                    continue;
                }
            };
            match result {
                Ok(()) => report.succeed(&id),
                Err(err) => {
                    warn!(component = %id, operation = %operation, error = %err, "Shutdown step failed");
                    report.fail(&id, &err);
                }
            }
        }

        Self::summarize(&report);
        report
    }

    fn summarize(report: &BatchReport) {
        if report.is_success() {
            info!(
                operation = %report.operation,
                succeeded = report.succeeded.len(),
                "Batch finished"
            );
        } else {
            warn!(
                operation = %report.operation,
                succeeded = report.succeeded.len(),
                failed = ?report.failed_ids(),
                "Batch finished with failures"
            );
        }
    }

    fn can(&self, id: &str, operation: Transition) -> bool {
        self.index_of(id)
            .is_some_and(|index| self.containers[index].can(operation))
    }

    fn state_of(&self, id: &str) -> Option<ComponentState> {
        self.index_of(id)
            .and_then(|index| self.containers[index].state())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.containers.iter().position(|c| c.id() == id)
    }

    fn require_index(&self, id: &str) -> Result<usize, ComponentError> {
        self.index_of(id)
            .ok_or_else(|| ComponentError::UnknownComponent { id: id.to_string() })
    }
}

impl<L> std::fmt::Debug for ComponentManager<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentManager")
            .field("containers", &self.containers)
            .field("dependencies", &self.dependencies.graph().vertex_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    include!("manager.test.rs");
}
