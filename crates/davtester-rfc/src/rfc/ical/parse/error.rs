//! iCalendar parse failures. Every variant except `Empty` names the 1-based
//! physical line where the problem was found.

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no content lines")]
    Empty,

    #[error("line {line}: invalid property name at column {column}")]
    BadName { line: usize, column: usize },

    #[error("line {line}: no ':' before the value")]
    NoValue { line: usize },

    #[error("line {line}: malformed parameter at column {column}")]
    BadParameter { line: usize, column: usize },

    #[error("line {line}: unterminated quoted parameter value")]
    OpenQuote { line: usize },

    #[error("line {line}: expected BEGIN:VCALENDAR, found {found}")]
    NotCalendar { line: usize, found: String },

    #[error("line {line}: BEGIN:{name} is never closed")]
    Unterminated { line: usize, name: String },

    #[error("line {line}: END:{found} does not close {expected}")]
    Mismatched {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: {name} after END:VCALENDAR")]
    Trailing { line: usize, name: String },
}

impl ParseError {
    /// Line the error points at, `None` for empty input.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::BadName { line, .. }
            | Self::NoValue { line }
            | Self::BadParameter { line, .. }
            | Self::OpenQuote { line }
            | Self::NotCalendar { line, .. }
            | Self::Unterminated { line, .. }
            | Self::Mismatched { line, .. }
            | Self::Trailing { line, .. } => Some(*line),
        }
    }
}
