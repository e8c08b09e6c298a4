//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Mode, Node, NodeId, Ticket, TicketStatus, TransitStep};

fn default_true() -> bool {
    true
}

/// Query parameters for `GET /pathfind`.
#[derive(Debug, Deserialize)]
pub struct PathfindQuery {
    /// Origin node name.
    pub start: String,

    /// Destination node name.
    pub stop: String,

    /// RFC 3339 departure instant; defaults to the server's current time.
    pub start_time: Option<String>,

    #[serde(default = "default_true")]
    pub allow_fly: bool,

    #[serde(default = "default_true")]
    pub allow_sea: bool,

    #[serde(default = "default_true")]
    pub allow_rail: bool,

    #[serde(default = "default_true")]
    pub allow_road: bool,
}

/// A planned route in responses.
#[derive(Debug, Serialize)]
pub struct TicketDto {
    pub id: u64,
    pub status: TicketStatus,
    pub destination_id: NodeId,
    pub destination_name: String,

    /// Index of the step currently in progress; 0 for a fresh route.
    pub current_step: usize,

    pub steps: Vec<TransitStepDto>,
}

/// One step of a planned route.
#[derive(Debug, Serialize)]
pub struct TransitStepDto {
    /// Index of the step within its ticket.
    pub id: usize,

    pub from_id: NodeId,
    pub from_name: String,
    pub to_id: NodeId,
    pub to_name: String,

    pub mode: Mode,
    pub connection_name: Option<String>,

    /// RFC 3339 departure instant.
    pub departure: String,
}

impl TicketDto {
    pub fn from_ticket(ticket: &Ticket) -> Self {
        let steps = ticket
            .steps()
            .iter()
            .enumerate()
            .map(|(i, s)| TransitStepDto::from_step(i, s))
            .collect();

        Self {
            id: ticket.id(),
            status: ticket.status(),
            destination_id: ticket.destination_id(),
            destination_name: ticket.destination_name().to_string(),
            current_step: ticket.current_step(),
            steps,
        }
    }
}

impl TransitStepDto {
    pub fn from_step(index: usize, step: &TransitStep) -> Self {
        Self {
            id: index,
            from_id: step.from_id,
            from_name: step.from_name.clone(),
            to_id: step.to_id,
            to_name: step.to_name.clone(),
            mode: step.mode,
            connection_name: step.connection_name.clone(),
            departure: step.departure.to_rfc3339(),
        }
    }
}

/// A node of the map in responses.
#[derive(Debug, Serialize)]
pub struct NodeDto {
    pub id: NodeId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub is_airport: bool,
    pub municipality_id: i32,
}

impl NodeDto {
    pub fn from_node(node: &Node) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            x: node.x,
            y: node.y,
            is_airport: node.is_airport,
            municipality_id: node.location.0,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
