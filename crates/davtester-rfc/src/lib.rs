//! Structured-data collaborators for response verification.
//!
//! - [`rfc::ical`]: iCalendar content-line model, parser and canonical line output
//! - [`rfc::xml`]: namespace-resolving XML element tree and canonical writer

pub mod error;
pub mod rfc;
