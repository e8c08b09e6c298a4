//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};

use crate::pathfinder::{ModeFilter, PathRequest, Pathfinder, SearchError, SearchOutcome};
use crate::snapshot::SnapshotProvider;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/nodes", get(list_nodes))
        .route("/pathfind", get(pathfind))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every node of the current map snapshot.
async fn list_nodes(State(state): State<AppState>) -> Result<Json<Vec<NodeDto>>, AppError> {
    let snapshot = state.map.load_graph().await.map_err(|e| AppError::Internal {
        message: e.to_string(),
    })?;

    let nodes = snapshot.nodes().iter().map(NodeDto::from_node).collect();
    Ok(Json(nodes))
}

/// Plan a route between two named nodes.
async fn pathfind(
    State(state): State<AppState>,
    Query(req): Query<PathfindQuery>,
) -> Result<Json<TicketDto>, AppError> {
    let departure = match &req.start_time {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| AppError::BadRequest {
                message: format!("invalid start_time: {e}"),
            })?,
        None => Utc::now(),
    };

    let request = PathRequest {
        origin: req.start,
        destination: req.stop,
        departure,
        modes: ModeFilter {
            rail: req.allow_rail,
            road: req.allow_road,
            air: req.allow_fly,
            sea: req.allow_sea,
        },
    };

    let pathfinder = Pathfinder::new(&*state.map);
    match pathfinder.find_path(&request).await? {
        SearchOutcome::Route(ticket) => Ok(Json(TicketDto::from_ticket(&ticket))),
        SearchOutcome::NoRoute => Err(AppError::BadRequest {
            message: "no route satisfies the constraints".to_string(),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::NodeNotFound(name) => AppError::NotFound {
                message: format!("node {name:?} not found"),
            },
            other => AppError::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        // Log errors to stderr for debugging
        eprintln!("[{status}] {message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
