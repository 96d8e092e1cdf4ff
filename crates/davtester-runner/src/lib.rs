//! Test hierarchy execution for the DAV conformance harness.
//!
//! A [`manager::Manager`] runs [`model::TestFile`]s, which hold
//! [`model::TestSuite`]s of [`model::TestNode`]s. Verdicts flow back up as
//! [`davtester_core::types::ResultCounters`] and are reported to observers.

pub mod context;
pub mod error;
pub mod loader;
pub mod manager;
pub mod model;
pub mod observer;
pub mod server_info;
pub mod transport;
