//! Depth-first traversal and cycle detection

use super::{Graph, Mark, Marks, Vertex, VertexId};
use tracing::debug;

/// Depth-first walk along out-edges, restarting from the next undiscovered
/// vertex (in insertion order) whenever the current tree is exhausted.
///
/// Each iterator owns its "discovered" marks, so every call to
/// [`Graph::depth_first`] starts a fresh walk.
pub struct DepthFirst<'g, V, E> {
    graph: &'g Graph<V, E>,
    roots: Vec<VertexId>,
    cursor: usize,
    stack: Vec<VertexId>,
    marks: Marks<VertexId>,
}

impl<'g, V: Vertex, E> Iterator for DepthFirst<'g, V, E> {
    type Item = &'g V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(id) = self.stack.pop() {
                if self.marks.is_marked(id) {
                    continue;
                }
                self.marks.mark(id, Mark::Discovered);

                // Reversed so the first out-edge is walked first
                for link in self.graph.out_edges(id).into_iter().rev() {
                    if !self.marks.is_marked(link.head) {
                        self.stack.push(link.head);
                    }
                }

                if let Some(vertex) = self.graph.vertex_by_id(id) {
                    return Some(vertex);
                }
            }

            let root = self.roots.get(self.cursor).copied()?;
            self.cursor += 1;
            if !self.marks.is_marked(root) {
                self.stack.push(root);
            }
        }
    }
}

impl<V: Vertex, E> Graph<V, E> {
    /// Start a fresh depth-first walk over the whole graph
    pub fn depth_first(&self) -> DepthFirst<'_, V, E> {
        DepthFirst {
            graph: self,
            roots: self.vertex_ids(),
            cursor: 0,
            stack: Vec::new(),
            marks: Marks::new(),
        }
    }

    /// Find every cycle closed by a back-edge, as vertex ids in edge order
    ///
    /// Only edges to a vertex on the current path count; edges into finished
    /// subtrees (cross or forward edges) are never reported.
    pub fn find_cycle_ids(&self) -> Vec<Vec<VertexId>> {
        let mut marks = Marks::new();
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for id in self.vertex_ids() {
            if !marks.is_marked(id) {
                self.walk_cycles(id, &mut marks, &mut path, &mut cycles);
            }
        }

        if !cycles.is_empty() {
            debug!(count = cycles.len(), "Cycles detected");
        }
        cycles
    }

    /// Find every cycle, as vertex names in edge order
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        self.find_cycle_ids()
            .into_iter()
            .map(|cycle| {
                cycle
                    .into_iter()
                    .filter_map(|id| self.name_of(id).map(str::to_string))
                    .collect()
            })
            .collect()
    }

    /// Check if the graph contains at least one cycle
    pub fn is_circular(&self) -> bool {
        !self.find_cycle_ids().is_empty()
    }

    fn walk_cycles(
        &self,
        id: VertexId,
        marks: &mut Marks<VertexId>,
        path: &mut Vec<VertexId>,
        cycles: &mut Vec<Vec<VertexId>>,
    ) {
        marks.mark(id, Mark::OnPath);
        path.push(id);

        for link in self.out_edges(id) {
            match marks.get(link.head) {
                Some(Mark::OnPath) => {
                    if let Some(start) = path.iter().position(|v| *v == link.head) {
                        cycles.push(path[start..].to_vec());
                    }
                }
                Some(_) => {}
                None => self.walk_cycles(link.head, marks, path, cycles),
            }
        }

        path.pop();
        marks.mark(id, Mark::Finished);
    }
}

#[cfg(test)]
mod tests {
    include!("traversal.test.rs");
}
