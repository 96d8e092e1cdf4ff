//! XML parse error types.

use thiserror::Error;

pub type XmlResult<T> = Result<T, XmlError>;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("undeclared namespace prefix: {0}")]
    UnknownPrefix(String),

    #[error("unbalanced end tag: {0}")]
    Unbalanced(String),

    #[error("document has no root element")]
    Empty,

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl From<quick_xml::Error> for XmlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for XmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<quick_xml::encoding::EncodingError> for XmlError {
    fn from(err: quick_xml::encoding::EncodingError) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for XmlError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<std::str::Utf8Error> for XmlError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Encoding(err.to_string())
    }
}
