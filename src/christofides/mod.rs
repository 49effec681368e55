//! Christofides tour construction.
//!
//! Minimum spanning tree, approximate matching of its odd-degree vertices,
//! Eulerian circuit over the combined multigraph, then shortcutting repeated
//! vertices into a Hamiltonian cycle.

pub mod euler;
pub mod matching;

use crate::distance::DistanceCache;
use crate::error::{Result, TspError};
use crate::graph::{Graph, NodeKey};
use crate::tour::Tour;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

use self::euler::{
    dfs_order, eulerian_circuit, multigraph_from_mst_and_edges, shortcut, shortcut_random_start,
    tour_graph_from_order,
};
use self::matching::{greedy_matching, improve_matching, matching_weight};

/// Intermediate and final results of one construction.
#[derive(Clone)]
pub struct Construction<K, V> {
    pub mst_weight: f64,
    /// Number of odd-degree vertices in the spanning tree
    pub odd_nodes: usize,
    /// Matching weight after the improvement sweeps
    pub matching_weight: f64,
    /// Length of the Eulerian circuit, start vertex counted twice
    pub circuit_len: usize,
    pub tour: Tour,
    /// The tour as a cycle graph over the input nodes
    pub tour_graph: Graph<K, V>,
}

impl<K: NodeKey, V> fmt::Debug for Construction<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Construction")
            .field("mst_weight", &self.mst_weight)
            .field("odd_nodes", &self.odd_nodes)
            .field("matching_weight", &self.matching_weight)
            .field("circuit_len", &self.circuit_len)
            .field("tour", &self.tour)
            .field("tour_graph", &self.tour_graph)
            .finish()
    }
}

/// Builds a starting tour for a complete graph.
pub struct Christofides<'a, K, V> {
    graph: &'a Graph<K, V>,
    cache: &'a DistanceCache<K, V>,
    matching_improvement_iterations: usize,
}

impl<'a, K: NodeKey, V> Christofides<'a, K, V> {
    /// Create a new constructor over a complete graph and its distance cache.
    pub fn new(graph: &'a Graph<K, V>, cache: &'a DistanceCache<K, V>) -> Self {
        Christofides {
            graph,
            cache,
            matching_improvement_iterations: 2,
        }
    }

    /// Set the number of pairwise-exchange sweeps run on the matching.
    pub fn with_matching_improvement_iterations(mut self, iterations: usize) -> Self {
        self.matching_improvement_iterations = iterations;
        self
    }

    /// Run the full construction.
    ///
    /// With `randomized_start` the circuit is shortcut from a random position
    /// instead of from the first input node.
    pub fn construct<R: Rng + ?Sized>(
        &self,
        randomized_start: bool,
        rng: &mut R,
    ) -> Result<Construction<K, V>> {
        let start = self
            .graph
            .first_node()
            .ok_or(TspError::TooFewNodes {
                required: 1,
                actual: 0,
            })?
            .key()
            .clone();
        let creator = Arc::clone(self.graph.creator());

        let mst = self.graph.mst_by_prims()?;
        let mst_weight = mst.weight();

        let odd = mst.odd_degree_nodes();
        let mut matching = greedy_matching(&odd, self.cache, creator.as_ref())?;
        improve_matching(
            &mut matching,
            self.cache,
            creator.as_ref(),
            self.matching_improvement_iterations,
        )?;
        let matching_weight = matching_weight(&matching);

        let multigraph = multigraph_from_mst_and_edges(&mst, &matching);
        let circuit = eulerian_circuit(&multigraph, &start)?;

        let order = if randomized_start {
            shortcut_random_start(&circuit, rng)
        } else {
            shortcut(&circuit)
        };

        let tour_graph = tour_graph_from_order(&order, self.cache, creator)?;
        // Read the visiting order back off the cycle graph
        let visit = match order.first() {
            Some(first) => dfs_order(&tour_graph, first.key())?,
            None => Vec::new(),
        };
        let tour = Tour::from_nodes(&visit, self.cache)?;

        log::info!(
            "christofides: mst {:.4}, matching {:.4} over {} odd nodes, tour {:.4}",
            mst_weight,
            matching_weight,
            odd.len(),
            tour.weight
        );

        Ok(Construction {
            mst_weight,
            odd_nodes: odd.len(),
            matching_weight,
            circuit_len: circuit.len(),
            tour,
            tour_graph,
        })
    }
}
