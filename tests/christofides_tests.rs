//! Tests for matching, Eulerian circuit extraction and the Christofides tour.

use christofides_tsp::christofides::euler::{
    dfs_order, eulerian_circuit, multigraph_from_mst_and_edges, shortcut, shortcut_from,
    tour_graph_from_order,
};
use christofides_tsp::christofides::matching::{greedy_matching, improve_matching, matching_weight};
use christofides_tsp::christofides::Christofides;
use christofides_tsp::graph::{Edge, Graph, Node, NodeRef};
use christofides_tsp::{DistanceCache, PlainEdgeCreator, TspError};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::sync::Arc;

type Point = NodeRef<usize, (f64, f64)>;
type Cache = DistanceCache<usize, (f64, f64)>;

fn euclidean(a: &Node<usize, (f64, f64)>, b: &Node<usize, (f64, f64)>) -> f64 {
    let (x1, y1): (f64, f64) = *a.value();
    let (x2, y2): (f64, f64) = *b.value();
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// Creates the distance cache and complete graph for the given coordinates.
fn create_instance(coords: &[(f64, f64)]) -> (Cache, Graph<usize, (f64, f64)>) {
    let nodes: Vec<Point> = coords
        .iter()
        .enumerate()
        .map(|(i, &xy)| Node::shared(i, xy))
        .collect();
    let cache = DistanceCache::complete(nodes, euclidean);
    let graph = Graph::complete(&cache, Arc::new(PlainEdgeCreator)).unwrap();
    (cache, graph)
}

/// Eight points on two rows, a small instance with several odd MST vertices.
fn two_rows() -> Vec<(f64, f64)> {
    vec![
        (0.0, 0.0),
        (2.0, 0.0),
        (4.0, 0.0),
        (6.0, 0.0),
        (0.0, 3.0),
        (2.0, 3.5),
        (4.0, 3.0),
        (6.0, 3.5),
    ]
}

#[test]
fn test_greedy_matching_pairs_nearest_successor() {
    // Points on a line at 0, 1, 10, 12
    let (cache, _) = create_instance(&[(0.0, 0.0), (1.0, 0.0), (10.0, 0.0), (12.0, 0.0)]);
    let odd: Vec<Point> = cache.nodes().to_vec();

    let matching = greedy_matching(&odd, &cache, &PlainEdgeCreator).unwrap();

    assert_eq!(matching.len(), 2);
    assert_eq!(matching[0].key_pair(), (0, 1));
    assert_eq!(matching[1].key_pair(), (2, 3));
    assert!((matching_weight(&matching) - 3.0).abs() < 1e-9);
}

#[test]
fn test_greedy_matching_rejects_odd_input() {
    let (cache, _) = create_instance(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    let odd: Vec<Point> = cache.nodes().to_vec();

    let result = greedy_matching(&odd, &cache, &PlainEdgeCreator);
    assert!(matches!(result, Err(TspError::OddMatchingInput(3))));
}

#[test]
fn test_improve_matching_repairs_crossing_pairs() {
    // Line at 0, 1, -1.5 and 2.5: greedy pairs 0-1 first, leaving the two
    // outer points to be joined across the whole line
    let (cache, _) = create_instance(&[(0.0, 0.0), (1.0, 0.0), (-1.5, 0.0), (2.5, 0.0)]);
    let odd: Vec<Point> = cache.nodes().to_vec();
    let mut matching = greedy_matching(&odd, &cache, &PlainEdgeCreator).unwrap();
    let before = matching_weight(&matching);
    assert!((before - 5.0).abs() < 1e-9);

    let gains = improve_matching(&mut matching, &cache, &PlainEdgeCreator, 2).unwrap();

    // Pairing 0 with -1.5 and 1 with 2.5 costs 1.5 + 1.5
    let after = matching_weight(&matching);
    assert!((after - 3.0).abs() < 1e-9);
    assert_eq!(gains.len(), 2);
    assert!((gains[0] - 2.0).abs() < 1e-9);
    assert_eq!(gains[1], 0.0);
}

#[test]
fn test_improve_matching_tie_prefers_cross_pairing() {
    // Unit square matched along both diagonals; both side pairings cost 2
    let (cache, _) = create_instance(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
    let nodes = cache.nodes();
    let diagonal = 2.0_f64.sqrt();
    let mut matching = vec![
        Edge::new(Arc::clone(&nodes[0]), Arc::clone(&nodes[1]), diagonal),
        Edge::new(Arc::clone(&nodes[2]), Arc::clone(&nodes[3]), diagonal),
    ];

    let gains = improve_matching(&mut matching, &cache, &PlainEdgeCreator, 1).unwrap();

    assert!((gains[0] - (2.0 * diagonal - 2.0)).abs() < 1e-9);
    assert_eq!(matching[0].key_pair(), (0, 3));
    assert_eq!(matching[1].key_pair(), (1, 2));
}

#[test]
fn test_improve_matching_runs_every_sweep() {
    let (cache, _) = create_instance(&two_rows());
    let odd: Vec<Point> = cache.nodes().to_vec();
    let mut matching = greedy_matching(&odd, &cache, &PlainEdgeCreator).unwrap();

    let gains = improve_matching(&mut matching, &cache, &PlainEdgeCreator, 5).unwrap();
    assert_eq!(gains.len(), 5);

    let gains = improve_matching(&mut matching, &cache, &PlainEdgeCreator, 0).unwrap();
    assert!(gains.is_empty());
}

#[test]
fn test_multigraph_has_even_degrees() {
    let (cache, graph) = create_instance(&two_rows());
    let mst = graph.mst_by_prims().unwrap();
    let odd = mst.odd_degree_nodes();
    assert!(!odd.is_empty());

    let matching = greedy_matching(&odd, &cache, &PlainEdgeCreator).unwrap();
    let multigraph = multigraph_from_mst_and_edges(&mst, &matching);

    for node in multigraph.nodes() {
        assert_eq!(multigraph.degree(node.key()) % 2, 0, "node {}", node.key());
    }
    assert_eq!(multigraph.edge_count(), mst.edge_count() + matching.len());
}

#[test]
fn test_eulerian_circuit_walks_parallel_edges() {
    // Triangle 0-1-2 plus a doubled edge 2-3
    let nodes: Vec<_> = (0..4).map(|i| Node::shared(i, ())).collect();
    let mut graph = Graph::new();
    graph.add_edge(&nodes[0], &nodes[1], 1.0);
    graph.add_edge(&nodes[1], &nodes[2], 1.0);
    graph.add_edge(&nodes[2], &nodes[0], 1.0);
    graph.add_edge(&nodes[2], &nodes[3], 1.0);
    graph.add_edge(&nodes[2], &nodes[3], 1.0);

    let circuit = eulerian_circuit(&graph, &0).unwrap();
    let keys: Vec<i32> = circuit.iter().map(|node| *node.key()).collect();

    // Every edge once, start repeated at the end
    assert_eq!(keys.len(), graph.edge_count() + 1);
    assert_eq!(keys.first(), Some(&0));
    assert_eq!(keys.last(), Some(&0));
    assert_eq!(keys.iter().filter(|&&k| k == 3).count(), 1);

    // Consecutive entries are adjacent and use up every edge
    let mut remaining = graph.clone();
    for pair in keys.windows(2) {
        assert!(remaining.delete_edge(&pair[0], &pair[1]));
    }
    assert_eq!(remaining.edge_count(), 0);
    // Source graph untouched
    assert_eq!(graph.edge_count(), 5);
}

#[test]
fn test_eulerian_circuit_unknown_start() {
    let graph: Graph<u8, ()> = Graph::new();
    assert!(matches!(
        eulerian_circuit(&graph, &7),
        Err(TspError::UnknownNode(_))
    ));
}

#[test]
fn test_dfs_order_follows_adjacency_order() {
    let nodes: Vec<_> = (0..5).map(|i| Node::shared(i, ())).collect();
    let mut graph = Graph::new();
    // Tree: 0 -> {1, 2}, 1 -> {3}, 2 -> {4}
    graph.add_edge(&nodes[0], &nodes[1], 1.0);
    graph.add_edge(&nodes[0], &nodes[2], 1.0);
    graph.add_edge(&nodes[1], &nodes[3], 1.0);
    graph.add_edge(&nodes[2], &nodes[4], 1.0);

    let order: Vec<i32> = dfs_order(&graph, &0)
        .unwrap()
        .iter()
        .map(|node| *node.key())
        .collect();
    assert_eq!(order, vec![0, 1, 3, 2, 4]);
}

#[test]
fn test_shortcut_keeps_first_occurrences() {
    let nodes: Vec<_> = (0..4).map(|i| Node::shared(i, ())).collect();
    let walk = vec![
        nodes[0].clone(),
        nodes[1].clone(),
        nodes[2].clone(),
        nodes[1].clone(),
        nodes[3].clone(),
        nodes[0].clone(),
    ];

    let keys = |order: Vec<NodeRef<i32, ()>>| order.iter().map(|n| *n.key()).collect::<Vec<_>>();
    assert_eq!(keys(shortcut(&walk)), vec![0, 1, 2, 3]);
    // Starting inside the walk wraps around to its beginning
    assert_eq!(keys(shortcut_from(&walk, 3)), vec![1, 3, 0, 2]);
}

#[test]
fn test_tour_graph_is_a_single_cycle() {
    let (cache, _) = create_instance(&two_rows());
    let order: Vec<Point> = cache.nodes().to_vec();

    let tour = tour_graph_from_order(&order, &cache, Arc::new(PlainEdgeCreator)).unwrap();

    assert_eq!(tour.size(), order.len());
    assert_eq!(tour.edge_count(), order.len());
    for node in tour.nodes() {
        assert_eq!(tour.degree(node.key()), 2);
    }
    let walked: Vec<usize> = dfs_order(&tour, &0)
        .unwrap()
        .iter()
        .map(|node| *node.key())
        .collect();
    assert_eq!(walked, (0..order.len()).collect::<Vec<_>>());
}

#[test]
fn test_construction_produces_permutation() {
    let (cache, graph) = create_instance(&two_rows());
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let construction = Christofides::new(&graph, &cache)
        .construct(false, &mut rng)
        .unwrap();

    assert!(construction.tour.is_permutation_of(cache.len()));
    assert_eq!(construction.tour.order[0], 0);
    assert_eq!(construction.tour_graph.edge_count(), cache.len());
    assert!(construction.odd_nodes % 2 == 0);
    // Removing one tour edge leaves a spanning tree; shortcutting never
    // lengthens the circuit on metric instances
    let circuit_weight = construction.mst_weight + construction.matching_weight;
    assert!(construction.tour.weight >= construction.mst_weight);
    assert!(construction.tour.weight <= circuit_weight + 1e-9);
}

#[test]
fn test_randomized_start_still_visits_every_node() {
    let (cache, graph) = create_instance(&two_rows());
    let christofides = Christofides::new(&graph, &cache).with_matching_improvement_iterations(3);

    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let construction = christofides.construct(true, &mut rng).unwrap();
        assert!(construction.tour.is_permutation_of(cache.len()));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_matching_pairs_every_odd_node(
        coords in prop::collection::vec((0.0..500.0f64, 0.0..500.0f64), 3..40)
    ) {
        let (cache, graph) = create_instance(&coords);
        let mst = graph.mst_by_prims().unwrap();
        let odd = mst.odd_degree_nodes();

        let mut matching = greedy_matching(&odd, &cache, &PlainEdgeCreator).unwrap();
        let before = matching_weight(&matching);
        improve_matching(&mut matching, &cache, &PlainEdgeCreator, 2).unwrap();
        let after = matching_weight(&matching);

        let mut covered = HashSet::new();
        for edge in &matching {
            prop_assert!(covered.insert(*edge.first().key()));
            prop_assert!(covered.insert(*edge.second().key()));
        }
        let odd_keys: HashSet<usize> = odd.iter().map(|node| *node.key()).collect();
        prop_assert_eq!(covered, odd_keys);
        prop_assert!(after <= before + 1e-9);
    }

    #[test]
    fn prop_christofides_tour_is_permutation(
        coords in prop::collection::vec((0.0..500.0f64, 0.0..500.0f64), 3..40),
        seed in any::<u64>(),
        randomized in any::<bool>()
    ) {
        let (cache, graph) = create_instance(&coords);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let construction = Christofides::new(&graph, &cache)
            .construct(randomized, &mut rng)
            .unwrap();

        prop_assert!(construction.tour.is_permutation_of(coords.len()));
        let recomputed = christofides_tsp::Tour::compute_weight(&construction.tour.order, &cache);
        prop_assert!((recomputed - construction.tour.weight).abs() < 1e-6);
        prop_assert!((construction.tour_graph.weight() - construction.tour.weight).abs() < 1e-6);
    }
}
