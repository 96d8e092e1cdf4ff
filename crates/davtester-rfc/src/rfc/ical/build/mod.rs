//! iCalendar canonical output.
//!
//! Comparison works on unfolded text lines in a canonical order so that two
//! semantically equal objects always render identically.

mod serializer;

pub use serializer::{component_lines, property_line, to_lines};
