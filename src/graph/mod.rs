//! Undirected weighted multigraph backed by adjacency lists.

pub mod index_min_pq;
pub mod mst;
pub mod node;

pub use self::node::{Edge, EdgeCreator, Node, NodeKey, NodeRef, PlainEdgeCreator};

use crate::distance::DistanceCache;
use crate::error::{Result, TspError};
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An undirected, edge-weighted multigraph.
///
/// Every undirected edge appears once in each endpoint's adjacency list, and
/// the edge map counts how many parallel copies of each (direction-normalised)
/// edge exist.
pub struct Graph<K, V> {
    /// All vertices by key
    nodes: HashMap<K, NodeRef<K, V>>,
    /// Keys in insertion order, so "the first node" is well defined
    order: Vec<K>,
    /// Outgoing edges per vertex
    neighbours: HashMap<K, Vec<Edge<K, V>>>,
    /// Multiplicity of each undirected edge, keyed by the orientation seen first
    edges: HashMap<(K, K), usize>,
    creator: Arc<dyn EdgeCreator<K, V>>,
}

impl<K: NodeKey, V> Graph<K, V> {
    /// Create an empty graph that builds its edges with [`PlainEdgeCreator`].
    pub fn new() -> Self
    where
        V: 'static,
    {
        Graph::with_creator(Arc::new(PlainEdgeCreator))
    }

    /// Create an empty graph that builds its edges with the given creator.
    pub fn with_creator(creator: Arc<dyn EdgeCreator<K, V>>) -> Self {
        Graph {
            nodes: HashMap::new(),
            order: Vec::new(),
            neighbours: HashMap::new(),
            edges: HashMap::new(),
            creator,
        }
    }

    /// Build the complete graph over every node of the distance cache.
    pub fn complete(
        cache: &DistanceCache<K, V>,
        creator: Arc<dyn EdgeCreator<K, V>>,
    ) -> Result<Self> {
        let mut graph = Graph::with_creator(creator);
        for node in cache.nodes() {
            graph.add_node(Arc::clone(node));
        }

        let n = cache.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = cache.between(i, j);
                if weight.is_nan() {
                    return Err(TspError::missing_distance(
                        format!("{:?}", cache.node(i).key()),
                        format!("{:?}", cache.node(j).key()),
                    ));
                }
                graph.add_edge(cache.node(i), cache.node(j), weight);
            }
        }

        log::debug!(
            "complete graph built: {} nodes, {} edges",
            graph.size(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// A fresh graph holding the same node objects and no edges.
    pub fn with_same_nodes(&self) -> Self {
        let mut graph = Graph::with_creator(Arc::clone(&self.creator));
        for node in self.nodes() {
            graph.add_node(Arc::clone(node));
        }
        graph
    }

    /// Insert a node with an empty adjacency list. Re-adding a key replaces the
    /// node and clears its adjacency list.
    pub fn add_node(&mut self, node: NodeRef<K, V>) {
        let key = node.key().clone();
        if self.nodes.insert(key.clone(), node).is_none() {
            self.order.push(key.clone());
        }
        self.neighbours.insert(key, Vec::new());
    }

    /// Add an undirected edge, implicitly adding unknown endpoints.
    pub fn add_edge(&mut self, first: &NodeRef<K, V>, second: &NodeRef<K, V>, weight: f64) {
        let forward = (first.key().clone(), second.key().clone());
        let backward = (second.key().clone(), first.key().clone());

        if let Some(count) = self.edges.get_mut(&forward) {
            *count += 1;
        } else if let Some(count) = self.edges.get_mut(&backward) {
            *count += 1;
        } else {
            self.edges.insert(forward, 1);
        }

        self.add_neighbour(first, second, weight);
    }

    fn add_neighbour(&mut self, first: &NodeRef<K, V>, second: &NodeRef<K, V>, weight: f64) {
        if !self.nodes.contains_key(first.key()) {
            self.add_node(Arc::clone(first));
        }
        if !self.nodes.contains_key(second.key()) {
            self.add_node(Arc::clone(second));
        }

        let edge = self.creator.create_edge(first, second, weight);
        let reverse = self.creator.create_edge(second, first, weight);

        if let Some(list) = self.neighbours.get_mut(first.key()) {
            list.push(edge);
        }
        if let Some(list) = self.neighbours.get_mut(second.key()) {
            list.push(reverse);
        }
    }

    /// Remove one copy of the undirected edge between `first` and `second`.
    ///
    /// Returns `false` if no such edge exists.
    pub fn delete_edge(&mut self, first: &K, second: &K) -> bool {
        let forward = (first.clone(), second.clone());
        let backward = (second.clone(), first.clone());
        let stored = if self.edges.contains_key(&forward) {
            forward
        } else if self.edges.contains_key(&backward) {
            backward
        } else {
            return false;
        };

        match self.edges.get_mut(&stored) {
            Some(count) if *count > 1 => *count -= 1,
            _ => {
                self.edges.remove(&stored);
            }
        }

        Self::remove_directed(&mut self.neighbours, first, second);
        Self::remove_directed(&mut self.neighbours, second, first);
        true
    }

    fn remove_directed(neighbours: &mut HashMap<K, Vec<Edge<K, V>>>, from: &K, to: &K) {
        if let Some(list) = neighbours.get_mut(from) {
            if let Some(pos) = list.iter().position(|edge| edge.second().key() == to) {
                list.remove(pos);
            }
        }
    }

    /// Number of distinct vertices.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by key.
    pub fn node(&self, key: &K) -> Option<&NodeRef<K, V>> {
        self.nodes.get(key)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRef<K, V>> + '_ {
        self.order.iter().filter_map(move |key| self.nodes.get(key))
    }

    /// The first node inserted, used as the arbitrary starting vertex.
    pub fn first_node(&self) -> Option<&NodeRef<K, V>> {
        self.order.first().and_then(|key| self.nodes.get(key))
    }

    /// Outgoing edges of a node, or `None` for an unknown key.
    pub fn neighbours(&self, key: &K) -> Option<&[Edge<K, V>]> {
        self.neighbours.get(key).map(Vec::as_slice)
    }

    pub fn degree(&self, key: &K) -> usize {
        self.neighbours.get(key).map_or(0, Vec::len)
    }

    /// Edge multiplicity map.
    pub fn edges(&self) -> &HashMap<(K, K), usize> {
        &self.edges
    }

    /// Number of parallel copies of the undirected edge between two keys.
    pub fn edge_multiplicity(&self, first: &K, second: &K) -> usize {
        self.edges
            .get(&(first.clone(), second.clone()))
            .or_else(|| self.edges.get(&(second.clone(), first.clone())))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of undirected edges, counting parallel copies.
    pub fn edge_count(&self) -> usize {
        self.edges.values().sum()
    }

    pub fn creator(&self) -> &Arc<dyn EdgeCreator<K, V>> {
        &self.creator
    }

    /// Sum of all edge weights (each undirected edge counted once).
    pub fn weight(&self) -> f64 {
        let doubled: f64 = self
            .neighbours
            .values()
            .flat_map(|list| list.iter().map(Edge::weight))
            .sum();
        doubled / 2.0
    }

    /// Nodes whose degree is odd, in insertion order.
    pub fn odd_degree_nodes(&self) -> Vec<NodeRef<K, V>> {
        self.nodes()
            .filter(|node| self.degree(node.key()) % 2 != 0)
            .cloned()
            .collect()
    }

    fn dense_indices(&self) -> HashMap<&K, usize> {
        self.order.iter().enumerate().map(|(i, key)| (key, i)).collect()
    }

    /// Whether every vertex is reachable from every other.
    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        let index = self.dense_indices();
        let mut components = UnionFind::<usize>::new(index.len());
        for (first, second) in self.edges.keys() {
            components.union(index[first], index[second]);
        }
        let root = components.find(0);
        (1..index.len()).all(|i| components.find(i) == root)
    }

    /// Whether the graph is a spanning tree: |V| - 1 simple edges, no cycle,
    /// every vertex connected.
    pub fn is_spanning_tree(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        if self.edge_count() != self.size() - 1 {
            return false;
        }
        let index = self.dense_indices();
        let mut components = UnionFind::<usize>::new(index.len());
        for (first, second) in self.edges.keys() {
            // union returns false when both ends already share a component
            if !components.union(index[first], index[second]) {
                return false;
            }
        }
        self.is_connected()
    }
}

impl<K: NodeKey, V: 'static> Default for Graph<K, V> {
    fn default() -> Self {
        Graph::new()
    }
}

impl<K: Clone, V> Clone for Graph<K, V> {
    fn clone(&self) -> Self {
        Graph {
            nodes: self.nodes.clone(),
            order: self.order.clone(),
            neighbours: self.neighbours.clone(),
            edges: self.edges.clone(),
            creator: Arc::clone(&self.creator),
        }
    }
}

/// Structural equality: same node set, same adjacency lists, same edge counts.
impl<K: NodeKey, V: PartialEq> PartialEq for Graph<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
            && self.neighbours == other.neighbours
            && self.edges == other.edges
    }
}

impl<K: NodeKey, V> fmt::Debug for Graph<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph:")?;
        writeln!(f, "  Nodes: {}", self.nodes.len())?;
        writeln!(f, "  Edges: {}", self.edges.values().sum::<usize>())?;
        for key in &self.order {
            let targets: Vec<&K> = self
                .neighbours
                .get(key)
                .map(|list| list.iter().map(|edge| edge.second().key()).collect())
                .unwrap_or_default();
            writeln!(f, "  {:?} -> {:?}", key, targets)?;
        }
        Ok(())
    }
}
