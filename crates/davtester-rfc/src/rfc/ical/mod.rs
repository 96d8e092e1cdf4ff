//! iCalendar (RFC 5545) content model for comparison.
//!
//! Values are kept as raw text. Comparison only needs names, parameters and
//! exact value text, so no value typing is performed.

pub mod build;
pub mod core;
pub mod parse;
