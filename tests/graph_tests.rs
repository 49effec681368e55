//! Tests for the graph model and the minimum spanning tree.

use christofides_tsp::graph::{Graph, Node, NodeRef};
use christofides_tsp::{DistanceCache, PlainEdgeCreator, TspError};
use proptest::prelude::*;
use std::sync::Arc;

type Point = NodeRef<usize, (f64, f64)>;

fn euclidean(a: &Node<usize, (f64, f64)>, b: &Node<usize, (f64, f64)>) -> f64 {
    let (x1, y1): (f64, f64) = *a.value();
    let (x2, y2): (f64, f64) = *b.value();
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

fn points(coords: &[(f64, f64)]) -> Vec<Point> {
    coords
        .iter()
        .enumerate()
        .map(|(i, &xy)| Node::shared(i, xy))
        .collect()
}

/// Creates a complete graph over the given coordinates.
fn create_complete_graph(coords: &[(f64, f64)]) -> Graph<usize, (f64, f64)> {
    let cache = DistanceCache::complete(points(coords), euclidean);
    Graph::complete(&cache, Arc::new(PlainEdgeCreator)).unwrap()
}

#[test]
fn test_debug_lists_adjacency_in_insertion_order() {
    let a = Node::shared("a", 1);
    let b = Node::shared("b", 2);
    let c = Node::shared("c", 3);
    let mut graph = Graph::new();
    graph.add_edge(&a, &b, 1.0);
    graph.add_edge(&a, &c, 2.0);

    let text = format!("{:?}", graph);

    assert!(text.contains("Nodes: 3"));
    assert!(text.contains("Edges: 2"));
    assert!(text.contains("\"a\" -> [\"b\", \"c\"]"));
    assert!(text.find("\"a\" ->") < text.find("\"b\" ->"));
}

#[test]
fn test_add_edge_adds_unknown_nodes() {
    let a = Node::shared("a", 1);
    let b = Node::shared("b", 2);
    let mut graph = Graph::new();

    graph.add_edge(&a, &b, 3.0);

    assert_eq!(graph.size(), 2);
    assert_eq!(graph.degree(&"a"), 1);
    assert_eq!(graph.degree(&"b"), 1);
    // Each endpoint sees the edge pointing away from itself
    assert_eq!(graph.neighbours(&"b").unwrap()[0].second().key(), &"a");
    assert_eq!(graph.weight(), 3.0);
}

#[test]
fn test_parallel_edges_share_one_multiplicity_entry() {
    let a = Node::shared("a", ());
    let b = Node::shared("b", ());
    let mut graph = Graph::new();

    graph.add_edge(&a, &b, 1.0);
    graph.add_edge(&b, &a, 1.0);

    assert_eq!(graph.edges().len(), 1);
    assert_eq!(graph.edge_multiplicity(&"a", &"b"), 2);
    assert_eq!(graph.edge_multiplicity(&"b", &"a"), 2);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.degree(&"a"), 2);
}

#[test]
fn test_delete_edge_removes_one_copy() {
    let a = Node::shared("a", ());
    let b = Node::shared("b", ());
    let mut graph = Graph::new();
    graph.add_edge(&a, &b, 1.0);
    graph.add_edge(&a, &b, 1.0);

    assert!(graph.delete_edge(&"b", &"a"));
    assert_eq!(graph.edge_multiplicity(&"a", &"b"), 1);
    assert_eq!(graph.degree(&"a"), 1);

    assert!(graph.delete_edge(&"a", &"b"));
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.degree(&"b"), 0);

    assert!(!graph.delete_edge(&"a", &"b"));
}

#[test]
fn test_add_node_overwrites_and_clears_adjacency() {
    let a = Node::shared("a", 1);
    let b = Node::shared("b", 2);
    let mut graph = Graph::new();
    graph.add_edge(&a, &b, 1.0);

    graph.add_node(Node::shared("a", 10));

    assert_eq!(graph.size(), 2);
    assert_eq!(graph.node(&"a").unwrap().value(), &10);
    assert_eq!(graph.degree(&"a"), 0);
    // Insertion order is kept on overwrite
    assert_eq!(graph.first_node().unwrap().key(), &"a");
}

#[test]
fn test_complete_graph_has_every_pair() {
    let graph = create_complete_graph(&[(0.0, 0.0), (3.0, 0.0), (0.0, 4.0), (3.0, 4.0)]);

    assert_eq!(graph.size(), 4);
    assert_eq!(graph.edge_count(), 6);
    for node in graph.nodes() {
        assert_eq!(graph.degree(node.key()), 3);
    }
    // Two sides of 3, two of 4, two diagonals of 5
    assert!((graph.weight() - 24.0).abs() < 1e-9);
}

#[test]
fn test_complete_graph_fails_on_missing_distance() {
    let mut cache = DistanceCache::new(points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]));
    cache.insert(&0, &1, 1.0).unwrap();
    cache.insert(&1, &2, 1.0).unwrap();

    let result = Graph::complete(&cache, Arc::new(PlainEdgeCreator));
    assert!(matches!(result, Err(TspError::MissingDistance { .. })));
}

#[test]
fn test_with_same_nodes_shares_node_objects() {
    let graph = create_complete_graph(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let copy = graph.with_same_nodes();

    assert_eq!(copy.size(), 3);
    assert_eq!(copy.edge_count(), 0);
    for node in graph.nodes() {
        assert!(Arc::ptr_eq(node, copy.node(node.key()).unwrap()));
    }
}

#[test]
fn test_structural_equality() {
    let coords = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
    let first = create_complete_graph(&coords);
    let second = create_complete_graph(&coords);
    assert_eq!(first, second);

    let mut third = second.clone();
    third.delete_edge(&0, &1);
    assert_ne!(first, third);
}

#[test]
fn test_mst_on_line_uses_neighbouring_points() {
    let graph = create_complete_graph(&[(0.0, 0.0), (5.0, 0.0), (1.0, 0.0), (3.0, 0.0)]);
    let mst = graph.mst_by_prims().unwrap();

    assert_eq!(mst.edge_count(), 3);
    assert!(mst.is_spanning_tree());
    assert!((mst.weight() - 5.0).abs() < 1e-9);
    assert_eq!(mst.edge_multiplicity(&0, &2), 1);
    assert_eq!(mst.edge_multiplicity(&2, &3), 1);
    assert_eq!(mst.edge_multiplicity(&3, &1), 1);
    // The source graph is untouched
    assert_eq!(graph.edge_count(), 6);
}

#[test]
fn test_mst_of_disconnected_graph_fails() {
    let nodes: Vec<_> = (0..4).map(|i| Node::shared(i, ())).collect();
    let mut graph = Graph::new();
    graph.add_edge(&nodes[0], &nodes[1], 1.0);
    graph.add_edge(&nodes[2], &nodes[3], 1.0);

    assert!(!graph.is_connected());
    assert!(matches!(
        graph.mst_by_prims(),
        Err(TspError::Disconnected {
            reached: 2,
            total: 4
        })
    ));
}

#[test]
fn test_single_node_mst_is_empty() {
    let mut graph: Graph<u8, ()> = Graph::new();
    graph.add_node(Node::shared(0, ()));

    let mst = graph.mst_by_prims().unwrap();
    assert_eq!(mst.size(), 1);
    assert_eq!(mst.edge_count(), 0);
    assert!(mst.is_spanning_tree());
}

fn coordinates(max_len: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0..1000.0f64, 0.0..1000.0f64), 2..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_mst_is_spanning_tree(coords in coordinates(40)) {
        let graph = create_complete_graph(&coords);
        let mst = graph.mst_by_prims().unwrap();

        prop_assert_eq!(mst.size(), coords.len());
        prop_assert_eq!(mst.edge_count(), coords.len() - 1);
        prop_assert!(mst.is_connected());
        prop_assert!(mst.is_spanning_tree());
    }

    #[test]
    fn prop_odd_degree_count_is_even(coords in coordinates(40)) {
        let mst = create_complete_graph(&coords).mst_by_prims().unwrap();
        prop_assert_eq!(mst.odd_degree_nodes().len() % 2, 0);
    }

    #[test]
    fn prop_mst_is_no_heavier_than_a_path(coords in coordinates(30)) {
        let graph = create_complete_graph(&coords);
        let mst = graph.mst_by_prims().unwrap();

        // The input order is itself a spanning tree
        let path: f64 = points(&coords)
            .windows(2)
            .map(|pair| euclidean(&pair[0], &pair[1]))
            .sum();
        prop_assert!(mst.weight() <= path + 1e-6);
    }
}
