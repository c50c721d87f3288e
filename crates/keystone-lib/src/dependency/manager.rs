//! Dependency manager: the dependency graph of one platform instance
//!
//! Vertices are [`Dependency`] capabilities; an edge `tail -> head` is a
//! [`Requirement`] meaning "tail requires head in a version range". The
//! satisfied flag on every requirement is kept current whenever providers are
//! registered or withdrawn and whenever a requirement is (re)declared.

use super::model::{Dependency, Requirement};
use super::version::{Version, VersionRange};
use crate::graph::{EdgeId, Graph, GraphError, Mark, Marks, VertexId};
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("Dependency {name} has never been registered")]
    UnknownDependency { name: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Owns the dependency graph; the only way to mutate it
#[derive(Debug, Clone)]
pub struct DependencyManager<P> {
    graph: Graph<Dependency<P>, Requirement>,
}

impl<P: Clone + PartialEq + Debug> DependencyManager<P> {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    /// Get or create the dependency called `name`
    pub fn dependency(&mut self, name: &str) -> &Dependency<P> {
        let id = self.upsert(name);
        &self.graph[id]
    }

    pub fn get_dependency(&self, name: &str) -> Option<&Dependency<P>> {
        self.graph.vertex(name)
    }

    /// Register `provider` for dependency `name` at `version`
    ///
    /// Returns `Ok(false)` when the provider was already registered under an
    /// equal version. Every requirement on `name` whose range includes
    /// `version` becomes satisfied.
    pub fn add_provider(
        &mut self,
        name: &str,
        version: Version,
        provider: P,
    ) -> Result<bool, DependencyError> {
        let id = self.known(name)?;
        let added = match self.graph.vertex_by_id_mut(id) {
            Some(dependency) => dependency.add_provider(version.clone(), provider),
            None => false,
        };

        if !added {
            trace!(dependency = %name, version = %version, "Provider already registered");
            return Ok(false);
        }

        debug!(dependency = %name, version = %version, "Provider registered");
        self.refresh(id);
        Ok(true)
    }

    /// Withdraw `provider` from dependency `name`
    pub fn remove_provider(&mut self, name: &str, provider: &P) -> Result<bool, DependencyError> {
        let id = self.known(name)?;
        let removed = self
            .graph
            .vertex_by_id_mut(id)
            .is_some_and(|dependency| dependency.remove_provider(provider));

        if removed {
            debug!(dependency = %name, provider = ?provider, "Provider withdrawn");
            self.refresh(id);
        }
        Ok(removed)
    }

    /// Withdraw `provider` from every dependency, returning the affected names
    pub fn withdraw_provider(&mut self, provider: &P) -> Vec<String> {
        let mut affected = Vec::new();
        for id in self.graph.vertex_ids() {
            let removed = self
                .graph
                .vertex_by_id_mut(id)
                .is_some_and(|dependency| dependency.remove_provider(provider));
            if removed {
                self.refresh(id);
                if let Some(name) = self.graph.name_of(id) {
                    affected.push(name.to_string());
                }
            }
        }

        if !affected.is_empty() {
            debug!(provider = ?provider, dependencies = ?affected, "Provider withdrawn");
        }
        affected
    }

    /// Declare that `dependent` requires `required` within `range`
    ///
    /// Both dependencies are created if absent. Re-declaring replaces the
    /// range. Satisfaction is evaluated against the providers already known.
    pub fn require(
        &mut self,
        dependent: &str,
        required: &str,
        range: VersionRange,
    ) -> Result<&Requirement, DependencyError> {
        let tail = self.upsert(dependent);
        let head = self.upsert(required);

        let mut requirement = Requirement::new(range);
        let satisfied = self.graph[head].has_provider_in(requirement.range());
        requirement.set_satisfied(satisfied);

        debug!(
            dependent = %dependent,
            required = %required,
            range = %requirement.range(),
            satisfied,
            "Requirement declared"
        );

        let id = self.graph.update_edge(tail, head, requirement)?;
        Ok(&self.graph[id])
    }

    /// Drop the requirement `dependent -> required`
    pub fn remove_requirement(&mut self, dependent: &str, required: &str) -> Option<Requirement> {
        let removed = self.graph.remove_edge(required, dependent);
        if removed.is_some() {
            debug!(dependent = %dependent, required = %required, "Requirement removed");
        }
        removed
    }

    /// Delete a dependency and every requirement touching it
    pub fn remove_dependency(&mut self, name: &str) -> Option<Dependency<P>> {
        let removed = self.graph.remove_vertex(name);
        if removed.is_some() {
            debug!(dependency = %name, "Dependency removed");
        }
        removed
    }

    pub fn requirement(&self, dependent: &str, required: &str) -> Option<&Requirement> {
        self.graph.edge(required, dependent)
    }

    /// What `dependent` requires, in declaration order
    pub fn requirements_of(&self, dependent: &str) -> Vec<(&str, &Requirement)> {
        self.edges_of(dependent, true)
    }

    /// Who requires `name`, in declaration order
    pub fn dependents_of(&self, name: &str) -> Vec<(&str, &Requirement)> {
        self.edges_of(name, false)
    }

    /// Requirements of `dependent` that no registered provider satisfies
    pub fn unsatisfied_requirements(&self, dependent: &str) -> Vec<(&str, &Requirement)> {
        self.requirements_of(dependent)
            .into_iter()
            .filter(|(_, requirement)| !requirement.is_satisfied())
            .collect()
    }

    pub fn all_requirements_satisfied(&self, dependent: &str) -> bool {
        self.unsatisfied_requirements(dependent).is_empty()
    }

    /// Providers of `name` whose version falls in `range`
    pub fn providers_in_range(&self, name: &str, range: &VersionRange) -> Vec<(&Version, &P)> {
        self.graph
            .vertex(name)
            .map(|dependency| dependency.providers_in(range))
            .unwrap_or_default()
    }

    /// Every dependency, each one after everything it requires
    ///
    /// Vertices on a cycle are never emitted.
    pub fn reverse_dependency_order(&self) -> Vec<&Dependency<P>> {
        let mut vertices = Marks::new();
        let mut edges = Marks::new();
        let mut order = Vec::new();

        for id in self.graph.vertex_ids() {
            self.follow(id, &mut vertices, &mut edges, &mut order);
        }

        trace!(count = order.len(), "Reverse dependency order computed");
        order.into_iter().map(|id| &self.graph[id]).collect()
    }

    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        self.graph.find_cycles()
    }

    pub fn is_circular(&self) -> bool {
        self.graph.is_circular()
    }

    /// Read-only view of the graph
    pub fn graph(&self) -> &Graph<Dependency<P>, Requirement> {
        &self.graph
    }

    fn upsert(&mut self, name: &str) -> VertexId {
        if !self.graph.contains(name) {
            debug!(dependency = %name, "Dependency registered");
        }
        self.graph.get_or_insert_with(name, || Dependency::new(name))
    }

    fn known(&self, name: &str) -> Result<VertexId, DependencyError> {
        self.graph
            .vertex_id(name)
            .ok_or_else(|| DependencyError::UnknownDependency {
                name: name.to_string(),
            })
    }

    /// Recompute the satisfied flag of every requirement on `head`
    fn refresh(&mut self, head: VertexId) {
        let updates: Vec<(EdgeId, bool)> = self
            .graph
            .in_edges(head)
            .into_iter()
            .map(|link| {
                let requirement = &self.graph[link.id];
                (link.id, self.graph[head].has_provider_in(requirement.range()))
            })
            .collect();

        for (id, satisfied) in updates {
            if let Some(requirement) = self.graph.edge_by_id_mut(id) {
                requirement.set_satisfied(satisfied);
            }
        }
    }

    fn edges_of(&self, name: &str, outgoing: bool) -> Vec<(&str, &Requirement)> {
        let Some(id) = self.graph.vertex_id(name) else {
            return Vec::new();
        };

        let links = if outgoing {
            self.graph.out_edges(id)
        } else {
            self.graph.in_edges(id)
        };

        links
            .into_iter()
            .filter_map(|link| {
                let other = if outgoing { link.head } else { link.tail };
                Some((self.graph.name_of(other)?, &self.graph[link.id]))
            })
            .collect()
    }

    /// Emit `id` once all of its out-edges are visited, then follow its
    /// dependents; otherwise explore what it requires first.
    fn follow(
        &self,
        id: VertexId,
        vertices: &mut Marks<VertexId>,
        edges: &mut Marks<EdgeId>,
        order: &mut Vec<VertexId>,
    ) {
        if vertices.has(id, Mark::Visited) {
            return;
        }

        let out = self.graph.out_edges(id);
        if out.iter().all(|link| edges.is_marked(link.id)) {
            vertices.mark(id, Mark::Visited);
            order.push(id);
            for link in self.graph.in_edges(id) {
                edges.mark(link.id, Mark::Visited);
                self.follow(link.tail, vertices, edges, order);
            }
        } else if !vertices.has(id, Mark::OnPath) {
            vertices.mark(id, Mark::OnPath);
            for link in out {
                self.follow(link.head, vertices, edges, order);
            }
            if vertices.has(id, Mark::OnPath) {
                vertices.unmark(id);
            }
        }
    }
}

impl<P: Clone + PartialEq + Debug> Default for DependencyManager<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    include!("manager.test.rs");
}
