//! E2E test harness for shopcheck.
//!
//! Scenarios run the real harness against an in-memory backend served on
//! a local port. Some builders and assertion variants exist for scenarios
//! not yet written.

#![allow(dead_code)]

pub mod recorder;
pub mod server;

// Re-export commonly used types
pub use assertions::{Assertion, RunOutcome, VerdictMatch};
pub use fake_api::BackendOptions;
pub use scenario::Scenario;
pub use server::FakeServer;
