//! cj-run - remote test-run orchestrator for CI
//!
//! Logs in with a service account, triggers a test case or a whole
//! collection on the backend, polls until the run settles or the wait
//! budget runs out, and reduces the result to a pass/fail verdict.

pub mod backend;
pub mod commands;
pub mod common;
pub mod output;
pub mod run;

// Re-export commonly used types for tests
pub use commands::ActionInputs;
pub use common::{Error, Result};
pub use run::{Orchestrator, Outcome};
