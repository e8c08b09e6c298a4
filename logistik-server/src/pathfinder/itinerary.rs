//! Itinerary reconstruction.
//!
//! Turns the predecessor chain produced by the search into a
//! forward-ordered ticket.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{Adjacency, Node, NodeId, Ticket, TransitStep};
use crate::snapshot::MapSnapshot;

/// Rebuilds the discovered path into a ticket.
///
/// Walks the predecessor chain backward from `destination`, emitting one
/// step per edge with its departure set to the best-known arrival at the
/// edge's start node, then reverses the steps into travel order. The
/// resulting ticket is `Ongoing` with its current step at the head.
///
/// # Panics
///
/// Panics if the chain does not reach `origin` or lacks an arrival
/// instant the search must have recorded. Either is a programming defect
/// in the engine, not a user-facing condition.
pub(super) fn build_ticket(
    snapshot: &MapSnapshot,
    origin: &Node,
    destination: &Node,
    parents: &HashMap<NodeId, &Adjacency>,
    arrivals: &HashMap<NodeId, DateTime<Utc>>,
) -> Ticket {
    let mut steps = Vec::new();

    let mut cursor = parents.get(&destination.id);
    while let Some(adjacency) = cursor {
        let departure = *arrivals
            .get(&adjacency.start)
            .unwrap_or_else(|| panic!("no arrival instant recorded for node {}", adjacency.start));
        let from = snapshot
            .node(adjacency.start)
            .unwrap_or_else(|| panic!("predecessor chain references unknown node {}", adjacency.start));
        let to = snapshot
            .node(adjacency.end)
            .unwrap_or_else(|| panic!("predecessor chain references unknown node {}", adjacency.end));

        steps.push(TransitStep {
            from_id: from.id,
            from_name: from.name.clone(),
            to_id: to.id,
            to_name: to.name.clone(),
            mode: adjacency.mode,
            connection: adjacency.connection,
            connection_name: adjacency.name.clone(),
            departure,
        });

        cursor = parents.get(&adjacency.start);
    }

    assert_eq!(
        steps.last().map(|s| s.from_id),
        Some(origin.id),
        "predecessor chain does not reach the origin"
    );

    steps.reverse();

    Ticket::new(destination.id, destination.name.clone(), steps)
        .unwrap_or_else(|e| panic!("search produced an inconsistent chain: {e}"))
}
