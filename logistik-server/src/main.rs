use std::net::SocketAddr;

use logistik_server::snapshot::{
    CachedSnapshotProvider, FileSnapshotProvider, SnapshotCacheConfig, SnapshotProvider,
};
use logistik_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let map_file = std::env::var("MAP_FILE").unwrap_or_else(|_| "map.json".to_string());

    let provider = FileSnapshotProvider::new(&map_file);
    let map = CachedSnapshotProvider::new(provider, &SnapshotCacheConfig::default());

    // Fail fast if the feed is missing or malformed
    println!("Loading map from {map_file}...");
    let snapshot = map.load_graph().await.expect("Failed to load map feed");
    println!("Loaded {} nodes", snapshot.nodes().len());

    let state = AppState::new(map);
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Logistics route planner listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health    - Health check");
    println!("  GET  /nodes     - List map nodes");
    println!("  GET  /pathfind  - Plan a route (start, stop, start_time, allow_*)");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
