//! Nodes of the transport graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::connection::Adjacency;
use super::territory::MunicipalityId;

/// Identifier of a node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub i32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in the transport network: a city, a junction, an airport, an
/// island, or any other place a shipment can pass through.
///
/// The planar position exists for the map-import pipeline, which derives
/// default connection durations from distances; the search itself never
/// reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,

    /// Often the city name; need not be unique. Name lookups resolve to
    /// the first match in map order.
    pub name: String,

    pub x: f32,
    pub y: f32,

    pub is_airport: bool,

    /// Municipality this node lies in; determines territorial access.
    pub location: MunicipalityId,

    /// Outgoing directed adjacency entries, in map order.
    pub neighbors: Vec<Adjacency>,
}
