//! Precomputed pairwise distances.
//!
//! Built once for the complete graph and only read afterwards, so local search
//! workers on different threads share it without locking. Nodes are assigned
//! dense slots in registration order; tours are sequences of those slots.

use crate::error::{Result, TspError};
use crate::graph::{Node, NodeKey, NodeRef};
use std::collections::HashMap;
use std::sync::Arc;

/// Row-major matrix of distances between every registered node pair.
///
/// Unset entries hold `NaN` and are reported as
/// [`TspError::MissingDistance`] by the checked accessors.
#[derive(Debug, Clone)]
pub struct DistanceCache<K, V> {
    nodes: Vec<NodeRef<K, V>>,
    slots: HashMap<K, usize>,
    matrix: Vec<f64>,
}

impl<K: NodeKey, V> DistanceCache<K, V> {
    /// Register the given nodes with no distances set yet. Duplicate keys keep
    /// the first node.
    pub fn new<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = NodeRef<K, V>>,
    {
        let mut registered = Vec::new();
        let mut slots = HashMap::new();
        for node in nodes {
            if slots.contains_key(node.key()) {
                continue;
            }
            slots.insert(node.key().clone(), registered.len());
            registered.push(node);
        }

        let n = registered.len();
        let mut matrix = vec![f64::NAN; n * n];
        for i in 0..n {
            matrix[i * n + i] = 0.0;
        }

        DistanceCache {
            nodes: registered,
            slots,
            matrix,
        }
    }

    /// Register the nodes and fill every pair with `distance`.
    ///
    /// `distance` is assumed symmetric and is evaluated once per unordered pair.
    pub fn complete<I, F>(nodes: I, distance: F) -> Self
    where
        I: IntoIterator<Item = NodeRef<K, V>>,
        F: Fn(&Node<K, V>, &Node<K, V>) -> f64,
    {
        let mut cache = DistanceCache::new(nodes);
        let n = cache.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let d = distance(&cache.nodes[i], &cache.nodes[j]);
                cache.matrix[i * n + j] = d;
                cache.matrix[j * n + i] = d;
            }
        }
        log::debug!("distance cache filled for {} nodes", n);
        cache
    }

    /// Set the distance between two registered nodes in both directions.
    pub fn insert(&mut self, first: &K, second: &K, distance: f64) -> Result<()> {
        let i = self.require_slot(first)?;
        let j = self.require_slot(second)?;
        let n = self.len();
        self.matrix[i * n + j] = distance;
        self.matrix[j * n + i] = distance;
        Ok(())
    }

    /// Distance between two nodes by key.
    pub fn get(&self, first: &K, second: &K) -> Result<f64> {
        let i = self.require_slot(first)?;
        let j = self.require_slot(second)?;
        let d = self.between(i, j);
        if d.is_nan() {
            return Err(TspError::missing_distance(
                format!("{:?}", first),
                format!("{:?}", second),
            ));
        }
        Ok(d)
    }

    /// Fail with [`TspError::MissingDistance`] on the first unset pair.
    pub fn ensure_complete(&self) -> Result<()> {
        let n = self.len();
        for i in 0..n {
            for j in 0..n {
                if self.matrix[i * n + j].is_nan() {
                    return Err(TspError::missing_distance(
                        format!("{:?}", self.nodes[i].key()),
                        format!("{:?}", self.nodes[j].key()),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn slot(&self, key: &K) -> Option<usize> {
        self.slots.get(key).copied()
    }

    fn require_slot(&self, key: &K) -> Result<usize> {
        self.slot(key)
            .ok_or_else(|| TspError::UnknownNode(format!("{:?}", key)))
    }
}

impl<K, V> DistanceCache<K, V> {
    /// Distance between two slots. Unchecked: `NaN` for an unset pair.
    #[inline]
    pub fn between(&self, i: usize, j: usize) -> f64 {
        self.matrix[i * self.nodes.len() + j]
    }

    pub fn node(&self, slot: usize) -> &NodeRef<K, V> {
        &self.nodes[slot]
    }

    /// Registered nodes in slot order.
    pub fn nodes(&self) -> &[NodeRef<K, V>] {
        &self.nodes
    }

    /// Shared handles for a sequence of slots.
    pub fn nodes_for(&self, slots: &[usize]) -> Vec<NodeRef<K, V>> {
        slots.iter().map(|&slot| Arc::clone(&self.nodes[slot])).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
