//! Time-dependent shortest-path search over the transport graph.
//!
//! Answers "best route from A to B leaving at T": a Dijkstra variant
//! whose edge weights are travel durations applied to an absolute clock,
//! with per-query transport-mode filters and a territorial-access gate,
//! plus the itinerary reconstruction that turns a search result into an
//! ordered ticket.

mod itinerary;
mod search;

pub use search::{CancelFlag, ModeFilter, PathRequest, Pathfinder, SearchError, SearchOutcome};
