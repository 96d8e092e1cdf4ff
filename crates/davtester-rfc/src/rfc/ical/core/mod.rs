//! Calendar content model used for comparison.
//!
//! Unknown properties, parameters and X-components are kept as-is.

mod component;
mod parameter;
mod property;

pub use component::{Component, ICalendar, VCALENDAR, VTIMEZONE};
pub use parameter::Parameter;
pub use property::{ContentLine, Property};
