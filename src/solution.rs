//! Solution representation for the TSP.

use crate::graph::{Graph, NodeKey, NodeRef};
use crate::tour::Tour;
use crate::utils::RunStatistics;
use std::fmt;

/// Final tour produced by a solver run.
#[derive(Clone)]
pub struct Solution<K, V> {
    /// Visiting order as distance-cache slots, with its weight
    pub tour: Tour,
    /// Visiting order as node handles
    pub nodes: Vec<NodeRef<K, V>>,
    /// The tour as a cycle graph over the input nodes
    pub tour_graph: Graph<K, V>,
    pub statistics: RunStatistics,
}

impl<K: NodeKey, V> Solution<K, V> {
    /// Total weight of the closed tour.
    pub fn weight(&self) -> f64 {
        self.tour.weight
    }

    /// Keys in visiting order.
    pub fn keys(&self) -> Vec<K> {
        self.nodes.iter().map(|node| node.key().clone()).collect()
    }

    /// Whether every node of `graph` is visited exactly once.
    pub fn visits_all_of(&self, graph: &Graph<K, V>) -> bool {
        self.nodes.len() == graph.size()
            && self.tour.is_permutation_of(graph.size())
            && self.nodes.iter().all(|node| graph.node(node.key()).is_some())
    }
}

impl<K: NodeKey, V> fmt::Debug for Solution<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solution")
            .field("tour", &self.tour)
            .field("keys", &self.keys())
            .field("tour_graph", &self.tour_graph)
            .field("statistics", &self.statistics)
            .finish()
    }
}

impl<K: fmt::Debug, V> fmt::Display for Solution<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "TSP Solution:")?;
        writeln!(f, "  Total Weight: {:.4}", self.tour.weight)?;
        writeln!(f, "  Nodes: {}", self.nodes.len())?;
        write!(f, "  Tour:")?;
        for node in &self.nodes {
            write!(f, " {:?} ->", node.key())?;
        }
        match self.nodes.first() {
            Some(first) => writeln!(f, " {:?}", first.key()),
            None => writeln!(f, " (empty)"),
        }
    }
}
