use thiserror::Error;

use crate::rfc::{ical, xml};

/// RFC parsing errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("iCalendar parse error: {0}")]
    ICalendar(#[from] ical::parse::ParseError),

    #[error("XML parse error: {0}")]
    Xml(#[from] xml::XmlError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
