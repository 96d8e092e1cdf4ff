//! Shared vocabulary for the DAV conformance harness.
//!
//! Result kinds and counters, keyed attribute maps, feature sets and the run
//! configuration live here so that the comparator and runner crates agree on
//! them without depending on each other.

pub mod attributes;
pub mod config;
pub mod constants;
pub mod error;
pub mod feature;
pub mod types;
