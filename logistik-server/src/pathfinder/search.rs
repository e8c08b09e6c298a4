//! Time-dependent Dijkstra search.
//!
//! Edge weights are travel durations applied to an absolute clock: the
//! cost of a path is the arrival instant at its end. Edges are filtered
//! per query by transport mode and by the territorial-access flag of both
//! endpoints. All durations are non-negative, so Dijkstra's monotonic
//! invariant holds and the first extraction of the destination is optimal.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::domain::{Adjacency, Mode, NodeId, Ticket};
use crate::snapshot::{MapSnapshot, SnapshotError, SnapshotProvider};

use super::itinerary::build_ticket;

/// Error from path search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Origin or destination name has no matching node; an input error,
    /// distinct from the no-route outcome.
    #[error("node {0:?} not found")]
    NodeNotFound(String),

    /// The graph snapshot could not be loaded.
    #[error("failed to load graph snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    /// The search was cancelled before completing.
    #[error("search cancelled")]
    Cancelled,
}

/// Per-query transport mode switches, one independent flag per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFilter {
    pub rail: bool,
    pub road: bool,
    pub air: bool,
    pub sea: bool,
}

impl ModeFilter {
    /// Every mode enabled.
    pub fn all() -> Self {
        Self {
            rail: true,
            road: true,
            air: true,
            sea: true,
        }
    }

    /// Every mode disabled.
    pub fn none() -> Self {
        Self {
            rail: false,
            road: false,
            air: false,
            sea: false,
        }
    }

    pub fn allows(&self, mode: Mode) -> bool {
        match mode {
            Mode::Rail => self.rail,
            Mode::Road => self.road,
            Mode::Air => self.air,
            Mode::Sea => self.sea,
        }
    }
}

impl Default for ModeFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// A route query: where from, where to, when, and by which modes.
///
/// Origin and destination are node names; each must resolve to a node in
/// the snapshot (first match in map order if names are duplicated).
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub origin: String,
    pub destination: String,

    /// Instant the shipment leaves the origin.
    pub departure: DateTime<Utc>,

    pub modes: ModeFilter,
}

impl PathRequest {
    /// Creates a request with every transport mode enabled.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure: DateTime<Utc>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure,
            modes: ModeFilter::all(),
        }
    }
}

/// Cloneable cancellation signal, checked at every frontier extraction.
///
/// Pathological maps can make a single search arbitrarily expensive;
/// a caller holding a clone of this flag can abort from another task.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a structurally valid query.
///
/// "No route" is a normal negative outcome, not an error: the caller
/// must be able to tell it apart from malformed input.
#[derive(Debug)]
pub enum SearchOutcome {
    /// A route whose total duration is minimal among all paths admissible
    /// under the query's mode filter and the map's access flags.
    Route(Ticket),

    /// No admissible path connects origin and destination. Also returned
    /// when origin and destination are the same node: a ticket must
    /// contain at least one step, so there is nothing to materialize.
    NoRoute,
}

impl SearchOutcome {
    pub fn into_route(self) -> Option<Ticket> {
        match self {
            SearchOutcome::Route(ticket) => Some(ticket),
            SearchOutcome::NoRoute => None,
        }
    }
}

/// Route planner over snapshots supplied by `P`.
pub struct Pathfinder<'a, P: SnapshotProvider> {
    provider: &'a P,
    cancel: CancelFlag,
}

impl<'a, P: SnapshotProvider> Pathfinder<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            cancel: CancelFlag::new(),
        }
    }

    /// Like [`Pathfinder::new`], wired to an external cancellation flag.
    pub fn with_cancel(provider: &'a P, cancel: CancelFlag) -> Self {
        Self { provider, cancel }
    }

    /// Finds the earliest-arrival route for `request`.
    ///
    /// Fetches a fresh snapshot from the provider (the only suspension
    /// point), then runs the search to completion.
    pub async fn find_path(&self, request: &PathRequest) -> Result<SearchOutcome, SearchError> {
        let snapshot = self.provider.load_graph().await?;
        self.search(&snapshot, request)
    }

    /// Synchronous search over an already-fetched snapshot.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if either endpoint name fails to resolve;
    /// `Cancelled` if the cancellation flag was raised. An admissible but
    /// unconnected query is `Ok(NoRoute)`, not an error.
    pub fn search(
        &self,
        snapshot: &MapSnapshot,
        request: &PathRequest,
    ) -> Result<SearchOutcome, SearchError> {
        let origin = snapshot
            .node_by_name(&request.origin)
            .ok_or_else(|| SearchError::NodeNotFound(request.origin.clone()))?;
        let destination = snapshot
            .node_by_name(&request.destination)
            .ok_or_else(|| SearchError::NodeNotFound(request.destination.clone()))?;

        // Staying in place is reported as NoRoute: a ticket must contain
        // at least one step ending at its destination.
        if origin.id == destination.id {
            return Ok(SearchOutcome::NoRoute);
        }

        debug!(
            origin = %origin.name,
            destination = %destination.name,
            departure = %request.departure,
            "starting search"
        );

        // Best-known arrival instant and predecessor edge per node.
        let mut best: HashMap<NodeId, DateTime<Utc>> = HashMap::new();
        let mut parents: HashMap<NodeId, &Adjacency> = HashMap::new();
        let mut settled: HashSet<NodeId> = HashSet::new();

        // Lazy-deletion frontier: every improvement pushes a fresh entry
        // and stale entries are skipped on pop by comparing against
        // `best`. Ties on arrival break on ascending node id, which makes
        // results reproducible.
        let mut frontier: BinaryHeap<Reverse<(DateTime<Utc>, NodeId)>> = BinaryHeap::new();

        best.insert(origin.id, request.departure);
        frontier.push(Reverse((request.departure, origin.id)));

        while let Some(Reverse((arrival, node_id))) = frontier.pop() {
            if self.cancel.is_cancelled() {
                return Err(SearchError::Cancelled);
            }
            if settled.contains(&node_id) || best.get(&node_id) != Some(&arrival) {
                continue;
            }

            if node_id == destination.id {
                // First extraction of the destination is its earliest
                // arrival under the filters.
                let ticket = build_ticket(snapshot, origin, destination, &parents, &best);
                debug!(steps = ticket.step_count(), arrival = %arrival, "route found");
                return Ok(SearchOutcome::Route(ticket));
            }

            settled.insert(node_id);

            let node = snapshot
                .node(node_id)
                .unwrap_or_else(|| panic!("frontier references unknown node {node_id}"));

            // Nodes in access-denied territory cannot be waypoints, so
            // none of their edges are admissible in either direction.
            if !snapshot.node_accessible(node) {
                continue;
            }

            for adjacency in &node.neighbors {
                if settled.contains(&adjacency.end) {
                    continue;
                }
                if !request.modes.allows(adjacency.mode) {
                    continue;
                }
                // Untimed connections are not traversable
                let Some(duration) = adjacency.duration else {
                    continue;
                };
                let end = snapshot
                    .node(adjacency.end)
                    .unwrap_or_else(|| panic!("adjacency references unknown node {}", adjacency.end));
                if !snapshot.node_accessible(end) {
                    continue;
                }

                let candidate = arrival + duration;
                if best.get(&adjacency.end).is_none_or(|t| candidate < *t) {
                    trace!(
                        from = %node.name,
                        to = %end.name,
                        mode = %adjacency.mode,
                        arrival = %candidate,
                        "relaxed edge"
                    );
                    best.insert(adjacency.end, candidate);
                    parents.insert(adjacency.end, adjacency);
                    frontier.push(Reverse((candidate, adjacency.end)));
                }
            }
        }

        debug!("frontier exhausted, no admissible route");
        Ok(SearchOutcome::NoRoute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, CountryId, MunicipalityId};
    use crate::snapshot::{ConnectionFeed, CountryFeed, MapFeed, MunicipalityFeed, NodeFeed};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap()
    }

    fn country(id: i32, access: bool) -> CountryFeed {
        CountryFeed {
            id: CountryId(id),
            name: format!("Country {id}"),
            access,
        }
    }

    fn municipality(id: i32, owner: i32, controller: i32) -> MunicipalityFeed {
        MunicipalityFeed {
            id: MunicipalityId(id),
            name: format!("Municipality {id}"),
            owner: CountryId(owner),
            controller: CountryId(controller),
        }
    }

    fn node(id: i32, name: &str, municipality: i32) -> NodeFeed {
        NodeFeed {
            id: NodeId(id),
            name: name.to_string(),
            x: 0.0,
            y: 0.0,
            is_airport: false,
            municipality: MunicipalityId(municipality),
        }
    }

    fn connection(id: i32, mode: Mode, minutes: Option<i64>, a: i32, b: i32) -> ConnectionFeed {
        ConnectionFeed {
            id: ConnectionId(id),
            name: None,
            mode,
            duration_minutes: minutes,
            a: NodeId(a),
            b: NodeId(b),
        }
    }

    /// A(1) -rail 2h- B(2) -rail 3h- C(3), plus a direct A -road 6h- C.
    /// Everything in one accessible territory.
    fn abc_feed() -> MapFeed {
        MapFeed {
            countries: vec![country(1, true)],
            municipalities: vec![municipality(1, 1, 1)],
            nodes: vec![node(1, "A", 1), node(2, "B", 1), node(3, "C", 1)],
            connections: vec![
                connection(10, Mode::Rail, Some(120), 1, 2),
                connection(11, Mode::Rail, Some(180), 2, 3),
                connection(12, Mode::Road, Some(360), 1, 3),
            ],
        }
    }

    use super::tests_support::StaticProvider;

    fn run(feed: MapFeed, request: &PathRequest) -> Result<SearchOutcome, SearchError> {
        let snapshot = Arc::new(MapSnapshot::from_feed(feed).unwrap());
        let provider = StaticProvider(snapshot.clone());
        Pathfinder::new(&provider).search(&snapshot, request)
    }

    #[test]
    fn prefers_faster_two_leg_route_over_direct() {
        let request = PathRequest::new("A", "C", t0());
        let ticket = run(abc_feed(), &request).unwrap().into_route().unwrap();

        assert_eq!(ticket.step_count(), 2);
        assert_eq!(ticket.destination_name(), "C");

        let steps = ticket.steps();
        assert_eq!(steps[0].from_name, "A");
        assert_eq!(steps[0].to_name, "B");
        assert_eq!(steps[0].mode, Mode::Rail);
        assert_eq!(steps[0].departure, t0());
        assert_eq!(steps[1].from_name, "B");
        assert_eq!(steps[1].to_name, "C");
        assert_eq!(steps[1].departure, t0() + Duration::hours(2));
    }

    #[test]
    fn disabling_rail_falls_back_to_the_road() {
        let mut request = PathRequest::new("A", "C", t0());
        request.modes.rail = false;

        let ticket = run(abc_feed(), &request).unwrap().into_route().unwrap();

        assert_eq!(ticket.step_count(), 1);
        assert_eq!(ticket.steps()[0].mode, Mode::Road);
        assert_eq!(ticket.steps()[0].departure, t0());
    }

    #[test]
    fn no_route_when_every_usable_mode_is_disabled() {
        let mut request = PathRequest::new("A", "C", t0());
        request.modes.rail = false;
        request.modes.road = false;

        assert!(matches!(
            run(abc_feed(), &request),
            Ok(SearchOutcome::NoRoute)
        ));
    }

    #[test]
    fn unknown_endpoint_is_node_not_found() {
        let request = PathRequest::new("Atlantis", "C", t0());
        match run(abc_feed(), &request) {
            Err(SearchError::NodeNotFound(name)) => assert_eq!(name, "Atlantis"),
            other => panic!("expected NodeNotFound, got {other:?}"),
        }

        let request = PathRequest::new("A", "Atlantis", t0());
        assert!(matches!(
            run(abc_feed(), &request),
            Err(SearchError::NodeNotFound(_))
        ));
    }

    #[test]
    fn origin_equals_destination_is_no_route() {
        let request = PathRequest::new("A", "A", t0());
        assert!(matches!(
            run(abc_feed(), &request),
            Ok(SearchOutcome::NoRoute)
        ));
    }

    #[test]
    fn disconnected_node_is_no_route() {
        let mut feed = abc_feed();
        feed.nodes.push(node(4, "D", 1));

        let request = PathRequest::new("A", "D", t0());
        assert!(matches!(run(feed, &request), Ok(SearchOutcome::NoRoute)));
    }

    #[test]
    fn untimed_connection_is_not_traversable() {
        let mut feed = abc_feed();
        // The fast rail leg loses its duration; only the road remains.
        feed.connections[0].duration_minutes = None;

        let request = PathRequest::new("A", "C", t0());
        let ticket = run(feed, &request).unwrap().into_route().unwrap();

        assert_eq!(ticket.step_count(), 1);
        assert_eq!(ticket.steps()[0].mode, Mode::Road);
    }

    #[test]
    fn access_denied_territory_forces_a_detour() {
        let mut feed = abc_feed();
        // B sits in territory controlled by an access-denied country.
        feed.countries.push(country(2, false));
        feed.municipalities.push(municipality(2, 2, 2));
        feed.nodes[1].municipality = MunicipalityId(2);

        let request = PathRequest::new("A", "C", t0());
        let ticket = run(feed, &request).unwrap().into_route().unwrap();

        // The 5h rail route through B is barred; the 6h road wins.
        assert_eq!(ticket.step_count(), 1);
        assert_eq!(ticket.steps()[0].mode, Mode::Road);
    }

    #[test]
    fn access_denied_destination_is_no_route() {
        let mut feed = abc_feed();
        feed.countries.push(country(2, false));
        feed.municipalities.push(municipality(2, 2, 2));
        feed.nodes[2].municipality = MunicipalityId(2);

        let request = PathRequest::new("A", "C", t0());
        assert!(matches!(run(feed, &request), Ok(SearchOutcome::NoRoute)));
    }

    #[test]
    fn access_gates_on_the_controller_not_the_owner() {
        // B's municipality is owned by an access-denied country but
        // controlled by an accessible one: transit is allowed.
        let mut feed = abc_feed();
        feed.countries.push(country(2, false));
        feed.municipalities.push(municipality(2, 2, 1));
        feed.nodes[1].municipality = MunicipalityId(2);

        let request = PathRequest::new("A", "C", t0());
        let ticket = run(feed, &request).unwrap().into_route().unwrap();
        assert_eq!(ticket.step_count(), 2);

        // The converse: owned by an accessible country, controlled by an
        // access-denied occupier: transit is barred.
        let mut feed = abc_feed();
        feed.countries.push(country(2, false));
        feed.municipalities.push(municipality(2, 1, 2));
        feed.nodes[1].municipality = MunicipalityId(2);

        let request = PathRequest::new("A", "C", t0());
        let ticket = run(feed, &request).unwrap().into_route().unwrap();
        assert_eq!(ticket.step_count(), 1);
        assert_eq!(ticket.steps()[0].mode, Mode::Road);
    }

    #[test]
    fn equal_arrivals_break_ties_on_ascending_node_id() {
        // Two equal-duration paths A->B->D and A->C->D; the one through
        // the lower node id must win, reproducibly.
        let feed = MapFeed {
            countries: vec![country(1, true)],
            municipalities: vec![municipality(1, 1, 1)],
            nodes: vec![
                node(1, "A", 1),
                node(2, "B", 1),
                node(3, "C", 1),
                node(4, "D", 1),
            ],
            connections: vec![
                connection(10, Mode::Rail, Some(60), 1, 2),
                connection(11, Mode::Rail, Some(60), 1, 3),
                connection(12, Mode::Rail, Some(60), 2, 4),
                connection(13, Mode::Rail, Some(60), 3, 4),
            ],
        };

        let request = PathRequest::new("A", "D", t0());
        let ticket = run(feed, &request).unwrap().into_route().unwrap();

        assert_eq!(ticket.step_count(), 2);
        assert_eq!(ticket.steps()[0].to_id, NodeId(2));
    }

    #[test]
    fn duplicate_names_resolve_to_the_first_node_in_feed_order() {
        let mut feed = abc_feed();
        // A second node also named "A", connected to nothing.
        feed.nodes.push(node(5, "A", 1));

        let request = PathRequest::new("A", "C", t0());
        let ticket = run(feed, &request).unwrap().into_route().unwrap();
        assert_eq!(ticket.steps()[0].from_id, NodeId(1));
    }

    #[test]
    fn cancelled_search_reports_cancellation() {
        let snapshot = Arc::new(MapSnapshot::from_feed(abc_feed()).unwrap());
        let provider = StaticProvider(snapshot.clone());
        let cancel = CancelFlag::new();
        let pathfinder = Pathfinder::with_cancel(&provider, cancel.clone());

        cancel.cancel();

        let request = PathRequest::new("A", "C", t0());
        assert!(matches!(
            pathfinder.search(&snapshot, &request),
            Err(SearchError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn find_path_fetches_a_snapshot_and_searches() {
        let snapshot = Arc::new(MapSnapshot::from_feed(abc_feed()).unwrap());
        let provider = StaticProvider(snapshot);
        let pathfinder = Pathfinder::new(&provider);

        let request = PathRequest::new("A", "C", t0());
        let ticket = pathfinder
            .find_path(&request)
            .await
            .unwrap()
            .into_route()
            .unwrap();

        assert_eq!(ticket.step_count(), 2);
    }

    #[test]
    fn identical_queries_produce_identical_step_sequences() {
        let request = PathRequest::new("A", "C", t0());
        let first = run(abc_feed(), &request).unwrap().into_route().unwrap();
        let second = run(abc_feed(), &request).unwrap().into_route().unwrap();

        assert_eq!(first.steps(), second.steps());
    }
}
