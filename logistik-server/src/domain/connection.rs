//! Directed adjacency entries instantiating undirected connections.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::mode::Mode;
use super::node::NodeId;

/// Identifier of an undirected connection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ConnectionId(pub i32);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a directed adjacency entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AdjacencyId(pub i32);

impl fmt::Display for AdjacencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One traversal direction of an undirected connection, attached to the
/// adjacency list of its start node.
///
/// Every connection between X and Y yields exactly two entries, X→Y and
/// Y→X; `MapSnapshot::from_feed` upholds this.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjacency {
    pub id: AdjacencyId,

    /// The connection this entry instantiates.
    pub connection: ConnectionId,

    /// Connections may or may not have a name, and names need not be
    /// unique (a named bridge vs. a numbered motorway).
    pub name: Option<String>,

    pub mode: Mode,

    /// Expected travel time. `None` means the connection has no defined
    /// duration and is not traversable.
    pub duration: Option<Duration>,

    pub start: NodeId,
    pub end: NodeId,
}
