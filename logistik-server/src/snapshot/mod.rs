//! Immutable graph snapshots and the providers that supply them.
//!
//! A query runs against a private, fully hydrated snapshot of the map:
//! every node carries its outgoing adjacency entries, and the territory
//! tables resolve ownership and access for any node. The search never
//! mutates a snapshot, so concurrent queries share them freely behind
//! `Arc`.

mod cache;
mod feed;

pub use cache::{CachedSnapshotProvider, SnapshotCacheConfig};
pub use feed::{
    ConnectionFeed, CountryFeed, FileSnapshotProvider, MapFeed, MunicipalityFeed, NodeFeed,
};

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::Duration;

use crate::domain::{
    Adjacency, AdjacencyId, ConnectionId, Country, CountryId, Municipality, MunicipalityId, Node,
    NodeId,
};

/// Error producing or validating a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading the map feed failed
    #[error("failed to read map feed: {0}")]
    Io(#[from] std::io::Error),

    /// The map feed is not valid JSON for the feed schema
    #[error("failed to parse map feed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A connection references a node the feed does not define
    #[error("connection {connection} references unknown node {node}")]
    UnknownNode {
        connection: ConnectionId,
        node: NodeId,
    },

    /// A node references a municipality the feed does not define
    #[error("node {node} references unknown municipality {municipality}")]
    UnknownMunicipality {
        node: NodeId,
        municipality: MunicipalityId,
    },

    /// A municipality references a country the feed does not define
    #[error("municipality {municipality} references unknown country {country}")]
    UnknownCountry {
        municipality: MunicipalityId,
        country: CountryId,
    },

    /// A connection carries a negative duration
    #[error("connection {connection} has a negative duration")]
    NegativeDuration { connection: ConnectionId },
}

/// An immutable, fully hydrated view of the transport graph.
///
/// Nodes keep their feed order, which makes name lookups (first match
/// wins) and therefore whole searches reproducible.
#[derive(Debug)]
pub struct MapSnapshot {
    nodes: Vec<Node>,
    by_id: HashMap<NodeId, usize>,
    municipalities: HashMap<MunicipalityId, Municipality>,
    countries: HashMap<CountryId, Country>,
}

impl MapSnapshot {
    /// Materializes a snapshot from a map feed.
    ///
    /// Each undirected connection is expanded into its two directed
    /// adjacency entries, one attached to each endpoint. All references
    /// are validated; durations must be non-negative (a `null` duration
    /// is kept and marks the connection non-traversable).
    pub fn from_feed(feed: MapFeed) -> Result<Self, SnapshotError> {
        let mut countries = HashMap::new();
        for c in feed.countries {
            countries.insert(
                c.id,
                Country {
                    id: c.id,
                    name: c.name,
                    access: c.access,
                },
            );
        }

        let mut municipalities = HashMap::new();
        for m in feed.municipalities {
            for country in [m.owner, m.controller] {
                if !countries.contains_key(&country) {
                    return Err(SnapshotError::UnknownCountry {
                        municipality: m.id,
                        country,
                    });
                }
            }
            municipalities.insert(
                m.id,
                Municipality {
                    id: m.id,
                    name: m.name,
                    owner: m.owner,
                    controller: m.controller,
                },
            );
        }

        let mut nodes = Vec::with_capacity(feed.nodes.len());
        let mut by_id = HashMap::new();
        for n in feed.nodes {
            if !municipalities.contains_key(&n.municipality) {
                return Err(SnapshotError::UnknownMunicipality {
                    node: n.id,
                    municipality: n.municipality,
                });
            }
            by_id.insert(n.id, nodes.len());
            nodes.push(Node {
                id: n.id,
                name: n.name,
                x: n.x,
                y: n.y,
                is_airport: n.is_airport,
                location: n.municipality,
                neighbors: Vec::new(),
            });
        }

        let mut next_adjacency = 1;
        for c in feed.connections {
            let duration = match c.duration_minutes {
                Some(mins) if mins < 0 => {
                    return Err(SnapshotError::NegativeDuration { connection: c.id });
                }
                Some(mins) => Some(Duration::minutes(mins)),
                None => None,
            };

            for (start, end) in [(c.a, c.b), (c.b, c.a)] {
                let Some(&idx) = by_id.get(&start) else {
                    return Err(SnapshotError::UnknownNode {
                        connection: c.id,
                        node: start,
                    });
                };
                if !by_id.contains_key(&end) {
                    return Err(SnapshotError::UnknownNode {
                        connection: c.id,
                        node: end,
                    });
                }
                nodes[idx].neighbors.push(Adjacency {
                    id: AdjacencyId(next_adjacency),
                    connection: c.id,
                    name: c.name.clone(),
                    mode: c.mode,
                    duration,
                    start,
                    end,
                });
                next_adjacency += 1;
            }
        }

        Ok(MapSnapshot {
            nodes,
            by_id,
            municipalities,
            countries,
        })
    }

    /// All nodes, in feed order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.by_id.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// The first node with this exact name, in feed order.
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn municipality(&self, id: MunicipalityId) -> Option<&Municipality> {
        self.municipalities.get(&id)
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(&id)
    }

    /// Whether the node may be used as a route waypoint.
    ///
    /// Gated on the access flag of the country in de-facto control of the
    /// node's municipality; the de-jure owner has no say in transit.
    pub fn node_accessible(&self, node: &Node) -> bool {
        self.municipalities
            .get(&node.location)
            .and_then(|m| self.countries.get(&m.controller))
            .is_some_and(|c| c.access)
    }
}

/// Supplies graph snapshots to the pathfinder.
///
/// The fetch is the only suspension point of a query; once a snapshot is
/// in hand the search runs synchronously to completion. This seam lets
/// tests drive the engine with in-memory maps.
pub trait SnapshotProvider: Send + Sync {
    /// Loads a snapshot reflecting the persisted map at call time.
    fn load_graph(
        &self,
    ) -> impl Future<Output = Result<Arc<MapSnapshot>, SnapshotError>> + Send;
}
