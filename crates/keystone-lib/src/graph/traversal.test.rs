// Tests for depth-first traversal and cycle detection

use super::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
struct Node(String);

impl Vertex for Node {
    fn name(&self) -> &str {
        &self.0
    }
}

/// Build a graph from `(tail, head)` pairs, creating vertices on first sight
fn graph_of(vertices: &[&str], edges: &[(&str, &str)]) -> Graph<Node, ()> {
    let mut graph = Graph::new();
    for name in vertices {
        graph.add_vertex(Node(name.to_string())).unwrap();
    }
    for (tail, head) in edges {
        graph.create_edge(tail, head, ()).unwrap();
    }
    graph
}

fn as_set(cycle: &[String]) -> BTreeSet<String> {
    cycle.iter().cloned().collect()
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Depth-first walk
// ============================================================================

#[test]
fn test_depth_first_visits_every_vertex_once() {
    let graph = graph_of(
        &["a", "b", "c", "d", "e", "f"],
        &[
            ("a", "b"),
            ("a", "e"),
            ("a", "d"),
            ("b", "e"),
            ("c", "e"),
            ("c", "f"),
            ("c", "d"),
            ("f", "d"),
            ("d", "e"),
        ],
    );

    let walked: Vec<&str> = graph.depth_first().map(|v| v.name()).collect();
    assert_eq!(walked, vec!["a", "b", "e", "d", "c", "f"]);
}

#[test]
fn test_depth_first_restarts_per_call() {
    let graph = graph_of(&["a", "b"], &[("a", "b")]);
    assert_eq!(graph.depth_first().count(), 2);
    assert_eq!(graph.depth_first().count(), 2);
}

#[test]
fn test_depth_first_terminates_on_cycles() {
    let graph = graph_of(&["a", "b"], &[("a", "b"), ("b", "a")]);
    let walked: Vec<&str> = graph.depth_first().map(|v| v.name()).collect();
    assert_eq!(walked, vec!["a", "b"]);
}

// ============================================================================
// Cycle detection
// ============================================================================

#[test]
fn test_acyclic_graph_has_no_cycles() {
    let graph = graph_of(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
    assert!(graph.find_cycles().is_empty());
    assert!(!graph.is_circular());
}

#[test]
fn test_single_three_vertex_cycle() {
    let graph = graph_of(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
    let cycles = graph.find_cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(as_set(&cycles[0]), set(&["a", "b", "c"]));
    // Reported in dependency direction starting at the ancestor
    assert_eq!(cycles[0], vec!["a", "b", "c"]);
    assert!(graph.is_circular());
}

#[test]
fn test_two_disjoint_cycles_are_reported_separately() {
    let graph = graph_of(
        &["a", "b", "c", "d", "e"],
        &[("a", "b"), ("b", "c"), ("c", "a"), ("d", "e"), ("e", "d")],
    );
    let cycles: Vec<BTreeSet<String>> = graph.find_cycles().iter().map(|c| as_set(c)).collect();
    assert_eq!(cycles.len(), 2);
    assert!(cycles.contains(&set(&["a", "b", "c"])));
    assert!(cycles.contains(&set(&["d", "e"])));
}

#[test]
fn test_self_loop_is_single_vertex_cycle() {
    let graph = graph_of(&["a", "b"], &[("a", "b"), ("b", "b")]);
    assert_eq!(graph.find_cycles(), vec![vec!["b".to_string()]]);
}

#[test]
fn test_cross_edges_are_not_cycles() {
    // Diamond plus an edge into an already finished sibling subtree
    let graph = graph_of(
        &["root", "left", "right", "shared"],
        &[
            ("root", "left"),
            ("root", "right"),
            ("left", "shared"),
            ("right", "shared"),
            ("right", "left"),
        ],
    );
    assert!(graph.find_cycles().is_empty());
}

#[test]
fn test_edge_into_earlier_tree_is_not_a_cycle() {
    // "z" is walked first, then "y" points into the finished tree
    let graph = graph_of(&["z", "x", "y"], &[("z", "x"), ("y", "z"), ("y", "x")]);
    assert!(!graph.is_circular());
}

#[test]
fn test_cycle_below_acyclic_prefix() {
    let graph = graph_of(
        &["app", "core", "io", "net"],
        &[("app", "core"), ("core", "io"), ("io", "net"), ("net", "io")],
    );
    assert_eq!(graph.find_cycles(), vec![vec!["io".to_string(), "net".to_string()]]);
}
