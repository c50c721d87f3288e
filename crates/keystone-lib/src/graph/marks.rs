//! Traversal-scoped marks
//!
//! Every traversal creates its own `Marks` and drops it when done, so repeated
//! or interleaved traversals over the same graph never see each other's state.

use std::collections::HashMap;
use std::hash::Hash;

/// Mark values used by the graph algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Yielded by a depth-first walk
    Discovered,
    /// On the current depth-first path
    OnPath,
    /// Subtree fully explored
    Finished,
    /// Processed by an ordering pass
    Visited,
}

/// A set of marks keyed by vertex or edge id
#[derive(Debug, Clone)]
pub struct Marks<K> {
    marks: HashMap<K, Mark>,
}

impl<K: Copy + Eq + Hash> Marks<K> {
    pub fn new() -> Self {
        Self {
            marks: HashMap::new(),
        }
    }

    /// Set the mark for `key`, returning the previous one
    pub fn mark(&mut self, key: K, mark: Mark) -> Option<Mark> {
        self.marks.insert(key, mark)
    }

    pub fn get(&self, key: K) -> Option<Mark> {
        self.marks.get(&key).copied()
    }

    pub fn is_marked(&self, key: K) -> bool {
        self.marks.contains_key(&key)
    }

    /// Check if `key` carries exactly `mark`
    pub fn has(&self, key: K, mark: Mark) -> bool {
        self.get(key) == Some(mark)
    }

    pub fn unmark(&mut self, key: K) -> Option<Mark> {
        self.marks.remove(&key)
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

impl<K: Copy + Eq + Hash> Default for Marks<K> {
    fn default() -> Self {
        Self::new()
    }
}
