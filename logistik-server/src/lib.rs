//! Logistics route planner server.
//!
//! A web application that answers: "what is the best route from A to B
//! across a multimodal transport network, given when we leave, which
//! transport modes we may use, and whose territory we may cross?"

pub mod domain;
pub mod pathfinder;
pub mod snapshot;
pub mod web;
