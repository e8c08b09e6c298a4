//! JSON feed format for map snapshots.
//!
//! The feed is the interchange format between the map store and the
//! pathfinder: countries, municipalities, nodes, and undirected
//! connections. `MapSnapshot::from_feed` expands every connection into
//! its two directed adjacency entries.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{ConnectionId, CountryId, Mode, MunicipalityId, NodeId};

use super::{MapSnapshot, SnapshotError, SnapshotProvider};

/// A complete map feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapFeed {
    pub countries: Vec<CountryFeed>,
    pub municipalities: Vec<MunicipalityFeed>,
    pub nodes: Vec<NodeFeed>,
    pub connections: Vec<ConnectionFeed>,
}

/// A country in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryFeed {
    pub id: CountryId,
    pub name: String,
    pub access: bool,
}

/// A municipality in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MunicipalityFeed {
    pub id: MunicipalityId,
    pub name: String,
    pub owner: CountryId,
    pub controller: CountryId,
}

/// A node in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeFeed {
    pub id: NodeId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub is_airport: bool,
    pub municipality: MunicipalityId,
}

/// An undirected connection in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionFeed {
    pub id: ConnectionId,
    #[serde(default)]
    pub name: Option<String>,
    pub mode: Mode,
    /// Expected travel time in minutes; `null` means non-traversable.
    pub duration_minutes: Option<i64>,
    /// Endpoint order carries no meaning.
    pub a: NodeId,
    pub b: NodeId,
}

/// Loads a fresh snapshot from a feed file on every call.
#[derive(Debug, Clone)]
pub struct FileSnapshotProvider {
    path: PathBuf,
}

impl FileSnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotProvider for FileSnapshotProvider {
    async fn load_graph(&self) -> Result<Arc<MapSnapshot>, SnapshotError> {
        let raw = tokio::fs::read(&self.path).await?;
        let feed: MapFeed = serde_json::from_slice(&raw)?;
        Ok(Arc::new(MapSnapshot::from_feed(feed)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FEED_JSON: &str = r#"{
        "countries": [{"id": 1, "name": "Denmark", "access": true}],
        "municipalities": [
            {"id": 1, "name": "Odense", "owner": 1, "controller": 1}
        ],
        "nodes": [
            {"id": 1, "name": "Odense", "x": 10.5, "y": 55.4, "municipality": 1},
            {"id": 2, "name": "Beldringe", "x": 10.3, "y": 55.5, "is_airport": true, "municipality": 1}
        ],
        "connections": [
            {"id": 7, "name": "Lufthavnsvej", "mode": "road", "duration_minutes": 25, "a": 1, "b": 2},
            {"id": 8, "mode": "sea", "duration_minutes": null, "a": 1, "b": 2}
        ]
    }"#;

    #[test]
    fn parse_feed_json() {
        let feed: MapFeed = serde_json::from_str(FEED_JSON).unwrap();

        assert_eq!(feed.countries.len(), 1);
        assert_eq!(feed.nodes.len(), 2);
        assert!(!feed.nodes[0].is_airport);
        assert!(feed.nodes[1].is_airport);
        assert_eq!(feed.connections[0].mode, Mode::Road);
        assert_eq!(feed.connections[0].name.as_deref(), Some("Lufthavnsvej"));
        assert_eq!(feed.connections[1].duration_minutes, None);
        assert_eq!(feed.connections[1].name, None);
    }

    #[tokio::test]
    async fn file_provider_loads_and_hydrates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FEED_JSON.as_bytes()).unwrap();

        let provider = FileSnapshotProvider::new(file.path());
        let snapshot = provider.load_graph().await.unwrap();

        assert_eq!(snapshot.nodes().len(), 2);
        let odense = snapshot.node_by_name("Odense").unwrap();
        assert_eq!(odense.neighbors.len(), 2);
    }

    #[tokio::test]
    async fn file_provider_surfaces_io_errors() {
        let provider = FileSnapshotProvider::new("/nonexistent/map.json");
        assert!(matches!(
            provider.load_graph().await,
            Err(SnapshotError::Io(_))
        ));
    }

    #[tokio::test]
    async fn file_provider_surfaces_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let provider = FileSnapshotProvider::new(file.path());
        assert!(matches!(
            provider.load_graph().await,
            Err(SnapshotError::Parse(_))
        ));
    }
}
