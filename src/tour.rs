//! Tour representation used by local search.

use crate::distance::DistanceCache;
use crate::error::{Result, TspError};
use crate::graph::{NodeKey, NodeRef};
use serde::{Deserialize, Serialize};

/// A cyclic visiting order over distance-cache slots together with its total
/// weight. The last slot connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    /// Slots of the [`DistanceCache`] in visiting order
    pub order: Vec<usize>,
    /// Total cycle weight, closing edge included
    pub weight: f64,
}

impl Tour {
    /// Create a tour from a slot order, computing its weight.
    pub fn from_order<K, V>(order: Vec<usize>, cache: &DistanceCache<K, V>) -> Self {
        let weight = Self::compute_weight(&order, cache);
        Tour { order, weight }
    }

    /// Create a tour from node handles. Every node must be registered with the
    /// cache.
    pub fn from_nodes<K: NodeKey, V>(
        nodes: &[NodeRef<K, V>],
        cache: &DistanceCache<K, V>,
    ) -> Result<Self> {
        let order = nodes
            .iter()
            .map(|node| {
                cache
                    .slot(node.key())
                    .ok_or_else(|| TspError::UnknownNode(format!("{:?}", node.key())))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_order(order, cache))
    }

    /// Weight of the closed cycle through `order`.
    pub fn compute_weight<K, V>(order: &[usize], cache: &DistanceCache<K, V>) -> f64 {
        if order.len() < 2 {
            return 0.0;
        }
        let path: f64 = order
            .windows(2)
            .map(|pair| cache.between(pair[0], pair[1]))
            .sum();
        path + cache.between(order[order.len() - 1], order[0])
    }

    /// Recompute the weight from scratch and store it. Returns the new weight.
    pub fn recompute_weight<K, V>(&mut self, cache: &DistanceCache<K, V>) -> f64 {
        self.weight = Self::compute_weight(&self.order, cache);
        self.weight
    }

    /// Whether the order visits each of `0..n` exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.order.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &slot in &self.order {
            if slot >= n || seen[slot] {
                return false;
            }
            seen[slot] = true;
        }
        true
    }

    /// Node handles in visiting order.
    pub fn nodes<K, V>(&self, cache: &DistanceCache<K, V>) -> Vec<NodeRef<K, V>> {
        cache.nodes_for(&self.order)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
