//! Eulerian circuit extraction and shortcutting into a Hamiltonian cycle.

use crate::distance::DistanceCache;
use crate::error::{Result, TspError};
use crate::graph::{Edge, EdgeCreator, Graph, NodeKey, NodeRef};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;

/// Copy of the spanning tree with every matching edge added on top.
///
/// When `matching` pairs exactly the odd-degree vertices of `mst`, every vertex
/// of the result has even degree. Parallel edges are kept as multiplicities.
pub fn multigraph_from_mst_and_edges<K: NodeKey, V>(
    mst: &Graph<K, V>,
    matching: &[Edge<K, V>],
) -> Graph<K, V> {
    let mut multigraph = mst.clone();
    for edge in matching {
        multigraph.add_edge(edge.first(), edge.second(), edge.weight());
    }
    multigraph
}

/// Closed walk from `start` that uses every edge of its component once.
///
/// Iterative Hierholzer over a working copy whose edges are deleted as they are
/// walked, so parallel edges are each traversed. The first and last entries are
/// both `start`. On a graph with odd-degree vertices the walk is not closed.
pub fn eulerian_circuit<K: NodeKey, V>(
    graph: &Graph<K, V>,
    start: &K,
) -> Result<Vec<NodeRef<K, V>>> {
    let first = graph
        .node(start)
        .ok_or_else(|| TspError::UnknownNode(format!("{:?}", start)))?;

    let mut working = graph.clone();
    let mut stack = vec![Arc::clone(first)];
    let mut circuit = Vec::with_capacity(graph.edge_count() + 1);

    while let Some(top) = stack.last().cloned() {
        let next = working
            .neighbours(top.key())
            .and_then(|edges| edges.first())
            .map(|edge| Arc::clone(edge.second()));

        match next {
            Some(next) => {
                working.delete_edge(top.key(), next.key());
                stack.push(next);
            }
            None => {
                circuit.push(top);
                stack.pop();
            }
        }
    }

    circuit.reverse();
    log::debug!("eulerian circuit visits {} nodes", circuit.len());
    Ok(circuit)
}

/// Depth-first preorder from `start`, following adjacency lists in order.
///
/// Each reachable node appears once. Used to read the visiting order off a
/// simple cycle or tree.
pub fn dfs_order<K: NodeKey, V>(graph: &Graph<K, V>, start: &K) -> Result<Vec<NodeRef<K, V>>> {
    let first = graph
        .node(start)
        .ok_or_else(|| TspError::UnknownNode(format!("{:?}", start)))?;

    let mut visited: HashSet<K> = HashSet::with_capacity(graph.size());
    let mut order = Vec::with_capacity(graph.size());
    let mut stack = vec![Arc::clone(first)];

    while let Some(node) = stack.pop() {
        if !visited.insert(node.key().clone()) {
            continue;
        }

        if let Some(edges) = graph.neighbours(node.key()) {
            // Reversed so the first neighbour is popped first
            for edge in edges.iter().rev() {
                if !visited.contains(edge.second().key()) {
                    stack.push(Arc::clone(edge.second()));
                }
            }
        }
        order.push(node);
    }

    Ok(order)
}

/// Drop repeated nodes from a walk, keeping each node's first occurrence.
pub fn shortcut<K: NodeKey, V>(walk: &[NodeRef<K, V>]) -> Vec<NodeRef<K, V>> {
    shortcut_from(walk, 0)
}

/// Like [`shortcut`], but starts reading the walk at `start` and wraps around.
pub fn shortcut_from<K: NodeKey, V>(walk: &[NodeRef<K, V>], start: usize) -> Vec<NodeRef<K, V>> {
    let len = walk.len();
    let mut placed: HashSet<&K> = HashSet::with_capacity(len);
    let mut order = Vec::with_capacity(len);

    for step in 0..len {
        let node = &walk[(start + step) % len];
        if placed.insert(node.key()) {
            order.push(Arc::clone(node));
        }
    }
    order
}

/// Shortcut a walk starting at a uniformly random position of it.
pub fn shortcut_random_start<K, V, R>(walk: &[NodeRef<K, V>], rng: &mut R) -> Vec<NodeRef<K, V>>
where
    K: NodeKey,
    R: Rng + ?Sized,
{
    if walk.is_empty() {
        return Vec::new();
    }
    let start = rng.gen_range(0..walk.len());
    shortcut_from(walk, start)
}

/// Build the cycle graph visiting `order` and closing back to its first node.
///
/// Edge weights come from the distance cache. Each node ends up with degree two
/// when the order holds at least three distinct nodes.
pub fn tour_graph_from_order<K: NodeKey, V>(
    order: &[NodeRef<K, V>],
    cache: &DistanceCache<K, V>,
    creator: Arc<dyn EdgeCreator<K, V>>,
) -> Result<Graph<K, V>> {
    let mut tour = Graph::with_creator(creator);
    let (Some(first), Some(last)) = (order.first(), order.last()) else {
        return Ok(tour);
    };

    for node in order {
        tour.add_node(Arc::clone(node));
    }
    for pair in order.windows(2) {
        let weight = cache.get(pair[0].key(), pair[1].key())?;
        tour.add_edge(&pair[0], &pair[1], weight);
    }
    if order.len() > 1 {
        let weight = cache.get(last.key(), first.key())?;
        tour.add_edge(last, first, weight);
    }

    Ok(tour)
}
