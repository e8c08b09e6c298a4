//! Web layer for the logistics route planner.
//!
//! Provides JSON endpoints for listing map nodes and planning routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
