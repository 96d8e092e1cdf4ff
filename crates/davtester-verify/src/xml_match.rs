//! `xmlDataMatch`: structural XML equivalence against a fixture file.

use davtester_core::attributes::KeyedAttributes;
use davtester_rfc::rfc::xml::{self, Element, Node, XmlResult};

use crate::diff::unified_diff;
use crate::error::VerifyOutcome;
use crate::filter::FilterSet;
use crate::verifier::{
    FileDataMatch, ResponseView, Verifier, VerifyContext, VerifyResult, run_file_data_match,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDataMatch;

impl FileDataMatch for XmlDataMatch {
    const DEFAULT_STATUS: &'static [u16] = &[200, 207];

    fn default_filters(&self, ctx: &VerifyContext<'_>) -> Vec<String> {
        ctx.xml_filters.to_vec()
    }

    fn compare(&self, response: &ResponseView<'_>, expected: &str, filters: &FilterSet) -> VerifyResult {
        let actual = match normalize(response.body, filters) {
            Ok(text) => text,
            Err(e) => return VerifyResult::failed(format!("        HTTP response is not valid XML: {e}")),
        };
        let expected = match normalize(expected, filters) {
            Ok(text) => text,
            Err(e) => return VerifyResult::failed(format!("        Data file is not valid XML: {e}")),
        };

        if actual == expected {
            return VerifyResult::ok();
        }

        let mut result = VerifyResult::failed("        Response data does not exactly match file data");
        let actual_lines: Vec<String> = actual.lines().map(str::to_string).collect();
        let expected_lines: Vec<String> = expected.lines().map(str::to_string).collect();
        for line in unified_diff(&actual_lines, &expected_lines, "Response", "Expected") {
            result.append(line);
        }
        result.append("        Response:");
        result.append(actual);
        result.append("        Expected:");
        result.append(expected);
        result
    }
}

impl Verifier for XmlDataMatch {
    fn verify(
        &self,
        ctx: &VerifyContext<'_>,
        response: &ResponseView<'_>,
        args: &KeyedAttributes,
    ) -> VerifyOutcome<VerifyResult> {
        run_file_data_match(self, ctx, response, args)
    }
}

/// Parses `body`, applies `filters` to every element below the root and
/// renders the canonical form.
///
/// ## Errors
/// Returns an error if `body` is not well-formed XML.
pub fn normalize(body: &str, filters: &FilterSet) -> XmlResult<String> {
    let mut root = xml::parse_document(body)?;
    if !filters.is_empty() {
        filter_children(&mut root, filters);
    }
    Ok(xml::to_canonical_string(&root))
}

fn filter_children(element: &mut Element, filters: &FilterSet) {
    element.children = std::mem::take(&mut element.children)
        .into_iter()
        .filter_map(|node| match node {
            Node::Element(child) => filters.apply(child).map(|mut kept| {
                filter_children(&mut kept, filters);
                Node::Element(kept)
            }),
            text @ Node::Text(_) => Some(text),
        })
        .collect();
}
