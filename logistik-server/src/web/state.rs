//! Application state for the web layer.

use std::sync::Arc;

use crate::snapshot::{CachedSnapshotProvider, FileSnapshotProvider};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached access to the map snapshot feed.
    pub map: Arc<CachedSnapshotProvider<FileSnapshotProvider>>,
}

impl AppState {
    pub fn new(map: CachedSnapshotProvider<FileSnapshotProvider>) -> Self {
        Self { map: Arc::new(map) }
    }
}
