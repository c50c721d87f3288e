//! Generic directed graph of named vertices
//!
//! Storage is a petgraph `StableDiGraph` so vertex and edge ids survive
//! removals. Edge direction follows the requirement: the edge source is the
//! *tail* (the dependent) and the target is the *head* (what it depends on).
//! The graph knows nothing about plugins or versions; traversal state lives in
//! [`marks::Marks`], never on the vertices.

pub mod marks;
pub mod traversal;

pub use marks::{Mark, Marks};
pub use traversal::DepthFirst;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::ops::Index;
use thiserror::Error;
use tracing::trace;

/// Vertex identifier, stable across removals
pub type VertexId = NodeIndex;

/// Edge identifier, stable across removals
pub type EdgeId = EdgeIndex;

/// Anything stored as a vertex is identified by its name
pub trait Vertex {
    fn name(&self) -> &str;
}

/// Structural errors, always fatal to the single operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Vertex {name} already added")]
    DuplicateVertex { name: String },

    #[error("Vertex {name} is not known to this graph")]
    UnknownVertex { name: String },

    #[error("Edge ({tail} -> {head}) already exists")]
    DuplicateEdge { tail: String, head: String },
}

/// Resolved endpoints of one edge: `tail` requires `head`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeLink {
    pub id: EdgeId,
    pub tail: VertexId,
    pub head: VertexId,
}

/// Edge weight plus its insertion sequence, used to keep incidence lists ordered
#[derive(Debug, Clone)]
struct Slot<E> {
    seq: u64,
    weight: E,
}

/// Directed graph with unique vertex names and at most one edge per (tail, head)
#[derive(Debug, Clone)]
pub struct Graph<V, E> {
    inner: StableDiGraph<V, Slot<E>>,
    /// Name -> vertex id for lookup
    by_name: HashMap<String, VertexId>,
    /// Vertex insertion order, the root order of every traversal
    order: Vec<VertexId>,
    next_seq: u64,
}

impl<V: Vertex, E> Graph<V, E> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            inner: StableDiGraph::default(),
            by_name: HashMap::new(),
            order: Vec::new(),
            next_seq: 0,
        }
    }

    /// Register a vertex; names are unique
    pub fn add_vertex(&mut self, vertex: V) -> Result<VertexId, GraphError> {
        if self.by_name.contains_key(vertex.name()) {
            return Err(GraphError::DuplicateVertex {
                name: vertex.name().to_string(),
            });
        }

        let name = vertex.name().to_string();
        let id = self.inner.add_node(vertex);
        trace!(vertex = %name, "Vertex added");
        self.by_name.insert(name, id);
        self.order.push(id);
        Ok(id)
    }

    /// Id of vertex `name`, inserting `make()` when it is absent
    ///
    /// `make` must build a vertex named `name`.
    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> V) -> VertexId {
        if let Some(id) = self.vertex_id(name) {
            return id;
        }

        let id = self.inner.add_node(make());
        trace!(vertex = %name, "Vertex added");
        self.by_name.insert(name.to_string(), id);
        self.order.push(id);
        id
    }

    /// Delete a vertex and every edge touching it
    pub fn remove_vertex(&mut self, name: &str) -> Option<V> {
        let id = self.by_name.remove(name)?;
        self.order.retain(|v| *v != id);
        self.inner.remove_node(id)
    }

    /// Link `tail -> head` by vertex id
    pub fn add_edge(
        &mut self,
        tail: VertexId,
        head: VertexId,
        weight: E,
    ) -> Result<EdgeId, GraphError> {
        let tail_name = self.known_name(tail)?;
        let head_name = self.known_name(head)?;

        if self.inner.find_edge(tail, head).is_some() {
            return Err(GraphError::DuplicateEdge {
                tail: tail_name,
                head: head_name,
            });
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let id = self.inner.add_edge(tail, head, Slot { seq, weight });
        trace!(tail = %tail_name, head = %head_name, "Edge added");
        Ok(id)
    }

    /// Link `tail -> head`, replacing the weight when the edge already exists
    ///
    /// An existing edge keeps its place in the incidence order.
    pub fn update_edge(
        &mut self,
        tail: VertexId,
        head: VertexId,
        weight: E,
    ) -> Result<EdgeId, GraphError> {
        self.known_name(tail)?;
        self.known_name(head)?;

        if let Some(id) = self.inner.find_edge(tail, head) {
            if let Some(slot) = self.inner.edge_weight_mut(id) {
                slot.weight = weight;
            }
            return Ok(id);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        Ok(self.inner.add_edge(tail, head, Slot { seq, weight }))
    }

    /// Link `tail -> head` by vertex name
    pub fn create_edge(&mut self, tail: &str, head: &str, weight: E) -> Result<EdgeId, GraphError> {
        let tail_id = self.vertex_id(tail).ok_or_else(|| GraphError::UnknownVertex {
            name: tail.to_string(),
        })?;
        let head_id = self.vertex_id(head).ok_or_else(|| GraphError::UnknownVertex {
            name: head.to_string(),
        })?;
        self.add_edge(tail_id, head_id, weight)
    }

    /// Delete the edge `tail -> head`, returning its weight
    pub fn remove_edge(&mut self, head: &str, tail: &str) -> Option<E> {
        let id = self.edge_id(head, tail)?;
        self.inner.remove_edge(id).map(|slot| slot.weight)
    }

    pub fn vertex(&self, name: &str) -> Option<&V> {
        self.vertex_by_id(self.vertex_id(name)?)
    }

    pub fn vertex_mut(&mut self, name: &str) -> Option<&mut V> {
        let id = self.vertex_id(name)?;
        self.inner.node_weight_mut(id)
    }

    pub fn vertex_id(&self, name: &str) -> Option<VertexId> {
        self.by_name.get(name).copied()
    }

    pub fn vertex_by_id(&self, id: VertexId) -> Option<&V> {
        self.inner.node_weight(id)
    }

    pub fn vertex_by_id_mut(&mut self, id: VertexId) -> Option<&mut V> {
        self.inner.node_weight_mut(id)
    }

    /// Name of the vertex behind `id`
    pub fn name_of(&self, id: VertexId) -> Option<&str> {
        self.vertex_by_id(id).map(|v| v.name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Edge where `tail` requires `head`
    pub fn edge(&self, head: &str, tail: &str) -> Option<&E> {
        self.edge_by_id(self.edge_id(head, tail)?)
    }

    pub fn edge_id(&self, head: &str, tail: &str) -> Option<EdgeId> {
        let head = self.vertex_id(head)?;
        let tail = self.vertex_id(tail)?;
        self.inner.find_edge(tail, head)
    }

    pub fn edge_by_id(&self, id: EdgeId) -> Option<&E> {
        self.inner.edge_weight(id).map(|slot| &slot.weight)
    }

    pub fn edge_by_id_mut(&mut self, id: EdgeId) -> Option<&mut E> {
        self.inner.edge_weight_mut(id).map(|slot| &mut slot.weight)
    }

    /// Endpoints of an edge
    pub fn link(&self, id: EdgeId) -> Option<EdgeLink> {
        let (tail, head) = self.inner.edge_endpoints(id)?;
        Some(EdgeLink { id, tail, head })
    }

    /// Edges where `id` is the tail (what it depends on), in insertion order
    pub fn out_edges(&self, id: VertexId) -> Vec<EdgeLink> {
        self.incident(id, Direction::Outgoing)
    }

    /// Edges where `id` is the head (its dependents), in insertion order
    pub fn in_edges(&self, id: VertexId) -> Vec<EdgeLink> {
        self.incident(id, Direction::Incoming)
    }

    /// Vertex ids in insertion order
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.order.clone()
    }

    /// Vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(|id| self.inner.node_weight(*id))
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    fn known_name(&self, id: VertexId) -> Result<String, GraphError> {
        self.name_of(id)
            .map(str::to_string)
            .ok_or_else(|| GraphError::UnknownVertex {
                name: format!("#{}", id.index()),
            })
    }

    fn incident(&self, id: VertexId, direction: Direction) -> Vec<EdgeLink> {
        if !self.inner.contains_node(id) {
            return Vec::new();
        }

        let mut edges: Vec<(u64, EdgeLink)> = self
            .inner
            .edges_directed(id, direction)
            .filter_map(|edge| {
                let link = self.link(edge.id())?;
                Some((edge.weight().seq, link))
            })
            .collect();
        edges.sort_by_key(|(seq, _)| *seq);
        edges.into_iter().map(|(_, link)| link).collect()
    }
}

impl<V, E> Index<VertexId> for Graph<V, E> {
    type Output = V;

    fn index(&self, id: VertexId) -> &V {
        &self.inner[id]
    }
}

impl<V, E> Index<EdgeId> for Graph<V, E> {
    type Output = E;

    fn index(&self, id: EdgeId) -> &E {
        &self.inner[id].weight
    }
}

impl<V: Vertex, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
