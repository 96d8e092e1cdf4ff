//! Readers for the server-info and test-definition XML files.

mod server_info;
mod test_file;

use std::path::Path;

use davtester_rfc::rfc::xml::{self, Element};

use crate::error::{RunnerError, RunnerResult};

pub use server_info::{load_server_info, parse_server_info};
pub use test_file::{load_test_file, parse_test_file};

/// Reads and parses an XML file, checking the root element's local name.
fn read_root(path: &Path, expected_root: &str) -> RunnerResult<Element> {
    let text = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root = xml::parse_document(&text).map_err(|e| RunnerError::invalid_config(path, e))?;
    if root.local_name() != expected_root {
        return Err(RunnerError::invalid_config(
            path,
            format!("expected <{expected_root}> root, found <{}>", root.local_name()),
        ));
    }
    Ok(root)
}

/// Reads a yes/no attribute.
fn flag(element: &Element, name: &str, default: bool) -> bool {
    match element.attr(name).map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("true") => true,
        Some(v) if v.eq_ignore_ascii_case("no") || v.eq_ignore_ascii_case("false") => false,
        _ => default,
    }
}

/// Text of every `feature` child.
fn features(element: &Element) -> Vec<String> {
    element
        .children_named("feature")
        .map(Element::text)
        .filter(|f| !f.is_empty())
        .collect()
}
