//! Route records and their transit steps.
//!
//! A `Ticket` is the materialized result of a successful search: an
//! ordered sequence of transit steps with a current-step pointer. Apart
//! from status and pointer advancement, a ticket never changes after
//! creation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::connection::ConnectionId;
use super::mode::Mode;
use super::node::NodeId;

static NEXT_TICKET_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// The shipment is underway; the current step is the one in progress.
    Ongoing,
    /// The shipment arrived; the current step is the last in the chain.
    Delivered,
    /// The shipment was lost; the current step is where it was last seen.
    Lost,
}

/// One traversed edge of a planned route.
///
/// Steps carry resolved endpoint and connection data so a ticket stands
/// on its own once the snapshot it was computed from is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitStep {
    pub from_id: NodeId,
    pub from_name: String,
    pub to_id: NodeId,
    pub to_name: String,

    pub mode: Mode,
    pub connection: ConnectionId,
    pub connection_name: Option<String>,

    /// Expected departure from the start node of this step, or the actual
    /// logged departure once travel has begun.
    pub departure: DateTime<Utc>,
}

/// Error constructing a ticket.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketError {
    /// A ticket must contain at least one step.
    #[error("a ticket must contain at least one step")]
    EmptyRoute,

    /// Consecutive steps do not share a node.
    #[error("steps do not connect: arrival at node {0} is followed by departure from node {1}")]
    DisconnectedSteps(NodeId, NodeId),

    /// The last step does not end at the ticket's destination.
    #[error("last step ends at node {0}, not at the ticket destination")]
    WrongDestination(NodeId),
}

/// The materialized result of a successful search.
///
/// # Invariants
///
/// - At least one step
/// - Consecutive steps connect (each step departs where the previous
///   one arrived)
/// - The last step ends at the destination
/// - `current_step` always indexes a valid step
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    id: u64,
    status: TicketStatus,
    destination_id: NodeId,
    destination_name: String,
    current_step: usize,
    steps: Vec<TransitStep>,
}

impl Ticket {
    /// Constructs an ongoing ticket over a forward-ordered step sequence.
    ///
    /// The ticket id is process-unique and monotonic.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the sequence is empty, does not connect, or does
    /// not end at `destination_id`.
    pub fn new(
        destination_id: NodeId,
        destination_name: String,
        steps: Vec<TransitStep>,
    ) -> Result<Self, TicketError> {
        let Some(last) = steps.last() else {
            return Err(TicketError::EmptyRoute);
        };

        if last.to_id != destination_id {
            return Err(TicketError::WrongDestination(last.to_id));
        }

        for window in steps.windows(2) {
            if window[0].to_id != window[1].from_id {
                return Err(TicketError::DisconnectedSteps(
                    window[0].to_id,
                    window[1].from_id,
                ));
            }
        }

        Ok(Ticket {
            id: NEXT_TICKET_ID.fetch_add(1, Ordering::Relaxed),
            status: TicketStatus::Ongoing,
            destination_id,
            destination_name,
            current_step: 0,
            steps,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn destination_id(&self) -> NodeId {
        self.destination_id
    }

    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    /// Index of the current step; 0 for a freshly computed route.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// The step currently in progress (or last relevant, see `TicketStatus`).
    pub fn current(&self) -> &TransitStep {
        // Safe: current_step is bounded by construction and advancement
        &self.steps[self.current_step]
    }

    /// All steps in travel order.
    pub fn steps(&self) -> &[TransitStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Total expected duration, from first departure to final arrival.
    ///
    /// Derived from step departures plus nothing else: the final arrival
    /// is not stored, so this is the span between the first and last
    /// departures. Returns zero for single-step tickets.
    pub fn departure_span(&self) -> chrono::Duration {
        // Safe: validated non-empty at construction
        self.steps.last().unwrap().departure - self.steps.first().unwrap().departure
    }

    /// Moves the current-step pointer to the next step.
    ///
    /// Advancing past the last step marks the ticket `Delivered`, leaving
    /// the pointer on the final step. Has no effect unless the ticket is
    /// ongoing.
    pub fn advance(&mut self) {
        if self.status != TicketStatus::Ongoing {
            return;
        }
        if self.current_step + 1 < self.steps.len() {
            self.current_step += 1;
        } else {
            self.status = TicketStatus::Delivered;
        }
    }

    /// Records the shipment as lost at the current step.
    pub fn mark_lost(&mut self) {
        if self.status == TicketStatus::Ongoing {
            self.status = TicketStatus::Lost;
        }
    }
}
