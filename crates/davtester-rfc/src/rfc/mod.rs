pub mod ical;
pub mod xml;
