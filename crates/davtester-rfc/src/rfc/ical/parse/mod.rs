//! iCalendar parsing (RFC 5545).
//!
//! - Lexer: content-line splitting, unfolding and tokenization
//! - Parser: component tree construction

mod error;
mod lexer;
mod parser;

pub use error::{ParseError, ParseResult};
pub use lexer::{parse_content_line, split_lines};
pub use parser::parse;
