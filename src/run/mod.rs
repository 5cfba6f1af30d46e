//! Run engine
//!
//! One invocation moves through login, trigger, polling and aggregation,
//! each in its own module, sequenced by [`Orchestrator`].

pub mod aggregate;
pub mod auth;
mod orchestrator;
pub mod poller;
pub mod trigger;
pub mod types;

pub use orchestrator::{Orchestrator, Outcome};
