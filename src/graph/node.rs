//! Vertices, directional edges and the edge factory used by [`Graph`](super::Graph).

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Identity of a vertex. Two nodes with equal keys are the same vertex.
pub trait NodeKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T: Clone + Eq + Hash + Debug + Send + Sync + 'static> NodeKey for T {}

/// Shared handle to a node. Derived graphs, tours and the distance cache all
/// point at the same node objects.
pub type NodeRef<K, V> = Arc<Node<K, V>>;

/// A vertex: an identity key plus an arbitrary payload. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node<K, V> {
    key: K,
    value: V,
}

impl<K, V> Node<K, V> {
    /// Create a new node.
    pub fn new(key: K, value: V) -> Self {
        Node { key, value }
    }

    /// Create a new node already wrapped in a shared handle.
    pub fn shared(key: K, value: V) -> NodeRef<K, V> {
        Arc::new(Node::new(key, value))
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

/// A directional weighted edge. An undirected edge is stored as two of these
/// carrying the same weight, one in each endpoint's adjacency list.
#[derive(Debug)]
pub struct Edge<K, V> {
    first: NodeRef<K, V>,
    second: NodeRef<K, V>,
    weight: f64,
}

impl<K, V> Edge<K, V> {
    pub fn new(first: NodeRef<K, V>, second: NodeRef<K, V>, weight: f64) -> Self {
        Edge {
            first,
            second,
            weight,
        }
    }

    pub fn first(&self) -> &NodeRef<K, V> {
        &self.first
    }

    pub fn second(&self) -> &NodeRef<K, V> {
        &self.second
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The same edge walked the other way.
    pub fn reverse(&self) -> Self {
        Edge {
            first: Arc::clone(&self.second),
            second: Arc::clone(&self.first),
            weight: self.weight,
        }
    }
}

impl<K: Clone, V> Edge<K, V> {
    /// Ordered pair of endpoint keys.
    pub fn key_pair(&self) -> (K, K) {
        (self.first.key.clone(), self.second.key.clone())
    }
}

impl<K, V> Clone for Edge<K, V> {
    fn clone(&self) -> Self {
        Edge {
            first: Arc::clone(&self.first),
            second: Arc::clone(&self.second),
            weight: self.weight,
        }
    }
}

impl<K: PartialEq, V> PartialEq for Edge<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.first.key == other.first.key
            && self.second.key == other.second.key
            && self.weight == other.weight
    }
}

/// Factory for edges. Graphs never build edges directly; they ask the creator
/// they were constructed with, so callers can decide how edges are produced.
pub trait EdgeCreator<K, V>: Send + Sync {
    fn create_edge(&self, first: &NodeRef<K, V>, second: &NodeRef<K, V>, weight: f64)
        -> Edge<K, V>;
}

/// Creator that builds a plain [`Edge`] from its arguments.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainEdgeCreator;

impl<K, V> EdgeCreator<K, V> for PlainEdgeCreator {
    fn create_edge(
        &self,
        first: &NodeRef<K, V>,
        second: &NodeRef<K, V>,
        weight: f64,
    ) -> Edge<K, V> {
        Edge::new(Arc::clone(first), Arc::clone(second), weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_swaps_endpoints_and_keeps_weight() {
        let a = Node::shared("a", 1);
        let b = Node::shared("b", 2);
        let edge = PlainEdgeCreator.create_edge(&a, &b, 4.5);
        let reversed = edge.reverse();

        assert_eq!(reversed.first().key(), &"b");
        assert_eq!(reversed.second().key(), &"a");
        assert_eq!(reversed.weight(), 4.5);
        assert_eq!(reversed.reverse(), edge);
    }

    #[test]
    fn test_edge_equality_is_directional() {
        let a = Node::shared("a", ());
        let b = Node::shared("b", ());
        let edge = Edge::new(a.clone(), b.clone(), 1.0);

        assert_ne!(edge, edge.reverse());
        assert_eq!(edge.key_pair(), ("a", "b"));
    }
}
