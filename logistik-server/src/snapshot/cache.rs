//! Snapshot caching between queries.
//!
//! Loading and hydrating the full map on every query is correct but
//! wasteful when the map changes rarely. `CachedSnapshotProvider` wraps
//! any provider with a TTL-bounded cache: within the TTL all queries
//! observe the same snapshot; after expiry (or an explicit invalidation,
//! e.g. after a map edit) the next query refetches.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use super::{MapSnapshot, SnapshotError, SnapshotProvider};

/// Configuration for the snapshot cache.
#[derive(Debug, Clone)]
pub struct SnapshotCacheConfig {
    /// How long a fetched snapshot stays valid.
    pub ttl: Duration,
}

impl Default for SnapshotCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
        }
    }
}

/// A snapshot provider that memoizes its inner provider.
pub struct CachedSnapshotProvider<P> {
    inner: P,
    cache: MokaCache<(), Arc<MapSnapshot>>,
}

impl<P: SnapshotProvider> CachedSnapshotProvider<P> {
    pub fn new(inner: P, config: &SnapshotCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(1)
            .build();

        Self { inner, cache }
    }

    /// Drops the cached snapshot so the next query refetches.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}

impl<P: SnapshotProvider> SnapshotProvider for CachedSnapshotProvider<P> {
    async fn load_graph(&self) -> Result<Arc<MapSnapshot>, SnapshotError> {
        if let Some(snapshot) = self.cache.get(&()).await {
            return Ok(snapshot);
        }

        let snapshot = self.inner.load_graph().await?;
        self.cache.insert((), snapshot.clone()).await;
        Ok(snapshot)
    }
}
