//! Minimum spanning tree by Prim's algorithm.

use super::index_min_pq::IndexMinPq;
use super::{Graph, NodeKey, NodeRef};
use crate::error::{Result, TspError};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Cheapest known way to reach a vertex that is not in the tree yet.
#[derive(Debug, Clone, Copy)]
struct Reach {
    weight: f64,
    /// Dense index of the tree vertex offering `weight`
    via: usize,
}

impl PartialEq for Reach {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}

impl PartialOrd for Reach {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.weight.partial_cmp(&other.weight)
    }
}

impl<K: NodeKey, V> Graph<K, V> {
    /// Build the minimum spanning tree of this graph.
    ///
    /// Vertices get dense indices in insertion order and the first vertex seeds
    /// the tree. An indexed min priority queue holds, per frontier vertex, the
    /// lightest edge connecting it to the tree; relaxations decrease that key in
    /// place. Ties keep the first edge seen.
    ///
    /// The result is a new graph over the same node objects. A graph that is
    /// not connected yields [`TspError::Disconnected`].
    pub fn mst_by_prims(&self) -> Result<Graph<K, V>> {
        let mut mst = self.with_same_nodes();
        let total = self.size();
        if total == 0 {
            return Ok(mst);
        }

        let by_index: Vec<&NodeRef<K, V>> = self.nodes().collect();
        let index: HashMap<&K, usize> = by_index
            .iter()
            .copied()
            .enumerate()
            .map(|(i, node)| (node.key(), i))
            .collect();

        let mut visited = vec![false; total];
        let mut reached = 1;
        let mut queue: IndexMinPq<Reach> = IndexMinPq::new(total);
        let mut tree_edges: Vec<(usize, usize, f64)> = Vec::with_capacity(total - 1);

        visited[0] = true;
        self.relax_from(0, &by_index, &index, &visited, &mut queue);

        while reached < total {
            let Some((current, reach)) = queue.pop_min() else {
                return Err(TspError::Disconnected { reached, total });
            };
            if visited[current] {
                continue;
            }

            tree_edges.push((reach.via, current, reach.weight));
            visited[current] = true;
            reached += 1;
            self.relax_from(current, &by_index, &index, &visited, &mut queue);
        }

        for (from, to, weight) in tree_edges {
            mst.add_edge(by_index[from], by_index[to], weight);
        }

        log::debug!(
            "mst built: {} nodes, {} edges, weight {:.4}",
            mst.size(),
            mst.edge_count(),
            mst.weight()
        );
        Ok(mst)
    }

    fn relax_from(
        &self,
        current: usize,
        by_index: &[&NodeRef<K, V>],
        index: &HashMap<&K, usize>,
        visited: &[bool],
        queue: &mut IndexMinPq<Reach>,
    ) {
        let Some(edges) = self.neighbours(by_index[current].key()) else {
            return;
        };

        for edge in edges {
            let Some(&neighbour) = index.get(edge.second().key()) else {
                continue;
            };
            if visited[neighbour] {
                continue;
            }

            let reach = Reach {
                weight: edge.weight(),
                via: current,
            };
            if queue.contains(neighbour) {
                queue.decrease_key(neighbour, reach);
            } else {
                queue.insert(neighbour, reach);
            }
        }
    }
}
