//! XML element tree with resolved namespaces.
//!
//! Element and attribute names are stored in Clark notation
//! (`{DAV:}href`), so prefixes chosen by a server never affect comparison.

mod element;
mod error;
mod reader;
mod writer;

pub use element::{Element, Node};
pub use error::{XmlError, XmlResult};
pub use reader::parse_document;
pub use writer::to_canonical_string;
