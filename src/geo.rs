//! Geographic node keys and great-circle distance.

use crate::graph::{Node, NodeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Identity of a geographic point: its coordinates plus an external id.
///
/// Coordinates are compared bitwise so the key can be hashed; `-0.0` and `0.0`
/// are therefore different keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatLongId {
    pub latitude: f64,
    pub longitude: f64,
    pub id: String,
}

impl LatLongId {
    /// Create a new key.
    pub fn new(latitude: f64, longitude: f64, id: impl Into<String>) -> Self {
        LatLongId {
            latitude,
            longitude,
            id: id.into(),
        }
    }

    /// Great-circle distance to another key, in kilometres.
    pub fn distance_km(&self, other: &LatLongId) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    fn same_location(&self, other: &LatLongId) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl PartialEq for LatLongId {
    fn eq(&self, other: &Self) -> bool {
        self.same_location(other) && self.id == other.id
    }
}

impl Eq for LatLongId {}

impl Hash for LatLongId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
        self.id.hash(state);
    }
}

/// Node over a geographic key whose payload is the external id.
pub type GeoNode = Node<LatLongId, String>;

/// Build a shared geographic node.
pub fn geo_node(
    latitude: f64,
    longitude: f64,
    id: impl Into<String>,
) -> NodeRef<LatLongId, String> {
    let key = LatLongId::new(latitude, longitude, id);
    let value = key.id.clone();
    Node::shared(key, value)
}

/// Haversine distance between two coordinates given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Distance function for [`DistanceCache::complete`](crate::distance::DistanceCache::complete)
/// over geographic nodes.
pub fn node_distance_km(first: &GeoNode, second: &GeoNode) -> f64 {
    first.key().distance_km(second.key())
}

/// Drop every node whose coordinates repeat an earlier node's, keeping the
/// first. Points at identical coordinates would otherwise produce zero-length
/// edges between distinct vertices.
pub fn distinct_locations<I>(nodes: I) -> Vec<NodeRef<LatLongId, String>>
where
    I: IntoIterator<Item = NodeRef<LatLongId, String>>,
{
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter(|node| {
            let key = node.key();
            seen.insert((key.latitude.to_bits(), key.longitude.to_bits()))
        })
        .collect()
}
