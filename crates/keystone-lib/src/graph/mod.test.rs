// Tests for the graph engine

use super::*;

// ============================================================================
// Test Utilities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node(String);

impl Vertex for Node {
    fn name(&self) -> &str {
        &self.0
    }
}

fn graph_with(names: &[&str]) -> Graph<Node, u32> {
    let mut graph = Graph::new();
    for name in names {
        graph.add_vertex(Node(name.to_string())).unwrap();
    }
    graph
}

fn names(graph: &Graph<Node, u32>, links: &[EdgeLink], head: bool) -> Vec<String> {
    links
        .iter()
        .map(|l| {
            let id = if head { l.head } else { l.tail };
            graph.name_of(id).unwrap().to_string()
        })
        .collect()
}

// ============================================================================
// Vertices
// ============================================================================

#[test]
fn test_new_graph_is_empty() {
    let graph: Graph<Node, u32> = Graph::new();
    assert_eq!(graph.vertex_count(), 0);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_duplicate_vertex_is_rejected() {
    let mut graph = graph_with(&["a"]);
    let err = graph.add_vertex(Node("a".to_string())).unwrap_err();
    assert_eq!(
        err,
        GraphError::DuplicateVertex {
            name: "a".to_string()
        }
    );
    assert_eq!(graph.vertex_count(), 1);
}

#[test]
fn test_lookup_misses_return_none() {
    let graph = graph_with(&["a", "b"]);
    assert!(graph.vertex("zzz").is_none());
    assert!(graph.edge("a", "b").is_none());
    assert!(graph.edge("a", "zzz").is_none());
}

#[test]
fn test_vertices_keep_insertion_order() {
    let graph = graph_with(&["c", "a", "b"]);
    let order: Vec<&str> = graph.vertices().map(|v| v.name()).collect();
    assert_eq!(order, vec!["c", "a", "b"]);
}

// ============================================================================
// Edges
// ============================================================================

#[test]
fn test_create_edge_links_both_endpoints() {
    let mut graph = graph_with(&["app", "lib"]);
    graph.create_edge("app", "lib", 7).unwrap();

    let app = graph.vertex_id("app").unwrap();
    let lib = graph.vertex_id("lib").unwrap();

    assert_eq!(graph.edge("lib", "app"), Some(&7));
    assert_eq!(names(&graph, &graph.out_edges(app), true), vec!["lib"]);
    assert_eq!(names(&graph, &graph.in_edges(lib), false), vec!["app"]);
    assert!(graph.out_edges(lib).is_empty());
    assert!(graph.in_edges(app).is_empty());
}

#[test]
fn test_edge_to_unknown_vertex_is_rejected() {
    let mut graph = graph_with(&["app"]);
    let err = graph.create_edge("app", "ghost", 0).unwrap_err();
    assert_eq!(
        err,
        GraphError::UnknownVertex {
            name: "ghost".to_string()
        }
    );
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_duplicate_edge_is_rejected() {
    let mut graph = graph_with(&["app", "lib"]);
    graph.create_edge("app", "lib", 1).unwrap();
    let err = graph.create_edge("app", "lib", 2).unwrap_err();
    assert!(matches!(err, GraphError::DuplicateEdge { .. }));
    assert_eq!(graph.edge("lib", "app"), Some(&1));

    // The opposite direction is a different edge
    graph.create_edge("lib", "app", 3).unwrap();
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_incidence_lists_follow_insertion_order() {
    let mut graph = graph_with(&["a", "b", "c", "d"]);
    graph.create_edge("a", "d", 0).unwrap();
    graph.create_edge("a", "b", 0).unwrap();
    graph.create_edge("a", "c", 0).unwrap();
    graph.create_edge("c", "b", 0).unwrap();

    let a = graph.vertex_id("a").unwrap();
    let b = graph.vertex_id("b").unwrap();
    assert_eq!(names(&graph, &graph.out_edges(a), true), vec!["d", "b", "c"]);
    assert_eq!(names(&graph, &graph.in_edges(b), false), vec!["a", "c"]);
}

#[test]
fn test_self_loop_is_both_in_and_out() {
    let mut graph = graph_with(&["a"]);
    graph.create_edge("a", "a", 0).unwrap();
    let a = graph.vertex_id("a").unwrap();
    assert_eq!(graph.out_edges(a).len(), 1);
    assert_eq!(graph.in_edges(a).len(), 1);
}

#[test]
fn test_edge_weight_can_be_updated() {
    let mut graph = graph_with(&["a", "b"]);
    let id = graph.create_edge("a", "b", 1).unwrap();
    *graph.edge_by_id_mut(id).unwrap() = 5;
    assert_eq!(graph.edge("b", "a"), Some(&5));
}

#[test]
fn test_update_edge_replaces_weight_in_place() {
    let mut graph = graph_with(&["a", "b", "c"]);
    let a = graph.vertex_id("a").unwrap();
    let b = graph.vertex_id("b").unwrap();
    let c = graph.vertex_id("c").unwrap();

    let first = graph.update_edge(a, b, 1).unwrap();
    graph.update_edge(a, c, 2).unwrap();
    let again = graph.update_edge(a, b, 3).unwrap();

    assert_eq!(first, again);
    assert_eq!(graph[first], 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(names(&graph, &graph.out_edges(a), true), vec!["b", "c"]);
}

#[test]
fn test_update_edge_rejects_stale_vertex() {
    let mut graph = graph_with(&["a", "b"]);
    let a = graph.vertex_id("a").unwrap();
    let b = graph.vertex_id("b").unwrap();
    graph.remove_vertex("b");

    let err = graph.update_edge(a, b, 1).unwrap_err();
    assert_eq!(
        err,
        GraphError::UnknownVertex {
            name: format!("#{}", b.index())
        }
    );
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_get_or_insert_with_is_an_upsert() {
    let mut graph = graph_with(&["a"]);
    let existing = graph.vertex_id("a").unwrap();

    let id = graph.get_or_insert_with("a", || panic!("must not build an existing vertex"));
    assert_eq!(id, existing);

    let id = graph.get_or_insert_with("b", || Node("b".to_string()));
    assert_eq!(graph[id].name(), "b");
    assert_eq!(graph.vertex_count(), 2);
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn test_remove_edge() {
    let mut graph = graph_with(&["a", "b"]);
    graph.create_edge("a", "b", 9).unwrap();
    assert_eq!(graph.remove_edge("b", "a"), Some(9));
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.remove_edge("b", "a"), None);
}

#[test]
fn test_remove_vertex_drops_incident_edges() {
    let mut graph = graph_with(&["a", "b", "c"]);
    graph.create_edge("a", "b", 0).unwrap();
    graph.create_edge("b", "c", 0).unwrap();

    let removed = graph.remove_vertex("b").unwrap();
    assert_eq!(removed.name(), "b");
    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edge_count(), 0);
    assert!(!graph.contains("b"));

    let order: Vec<&str> = graph.vertices().map(|v| v.name()).collect();
    assert_eq!(order, vec!["a", "c"]);

    // The name is free again
    graph.add_vertex(Node("b".to_string())).unwrap();
    assert!(graph.contains("b"));
}

#[test]
fn test_ids_survive_removal() {
    let mut graph = graph_with(&["a", "b", "c"]);
    let c = graph.vertex_id("c").unwrap();
    graph.remove_vertex("a");
    assert_eq!(graph.name_of(c), Some("c"));
}
