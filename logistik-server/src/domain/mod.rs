//! Domain types for the logistics route planner.
//!
//! Core model of the transport network and its political geography.
//! Types that carry invariants enforce them at construction time, so code
//! that receives these types can trust their validity.

mod connection;
mod mode;
mod node;
mod territory;
mod ticket;

pub use connection::{Adjacency, AdjacencyId, ConnectionId};
pub use mode::{InvalidMode, Mode};
pub use node::{Node, NodeId};
pub use territory::{Country, CountryId, Municipality, MunicipalityId};
pub use ticket::{Ticket, TicketError, TicketStatus, TransitStep};
