use std::path::Path;

use davtester_core::attributes::KeyedAttributes;
use davtester_core::feature::FeatureGate;
use davtester_rfc::rfc::xml::Element;

use super::{features, flag, read_root};
use crate::error::RunnerResult;
use crate::model::{BodySpec, RequestSpec, TestFile, TestNode, TestSuite, VerifySpec};

/// ## Summary
/// Loads a `caldavtest` file. The file's display name is `name`.
///
/// ## Errors
/// Returns an error if the file cannot be read, is not XML or its root is
/// not `caldavtest`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_test_file(path: &Path, name: &str) -> RunnerResult<TestFile> {
    let root = read_root(path, "caldavtest")?;
    Ok(parse_test_file(&root, name))
}

/// Builds a [`TestFile`] from a parsed `caldavtest` element.
///
/// Unknown elements are skipped. `start` and `end` request blocks are not
/// run and only logged.
#[must_use]
pub fn parse_test_file(root: &Element, name: &str) -> TestFile {
    let mut file = TestFile {
        name: name.to_string(),
        ignore_all: flag(root, "ignore-all", false),
        ..TestFile::default()
    };

    for child in root.child_elements() {
        match child.local_name() {
            "description" => file.description = Some(child.text()),
            "require-feature" => file.gate.required.extend(features(child)),
            "exclude-feature" => file.gate.excluded.extend(features(child)),
            "test-suite" => file.suites.push(parse_suite(child)),
            other @ ("start" | "end") => {
                tracing::debug!(element = other, "Setup/teardown requests are not run");
            }
            other => tracing::debug!(element = other, "Unknown element skipped"),
        }
    }

    tracing::debug!(
        suites = file.suites.len(),
        tests = file.node_count(),
        "Test file parsed"
    );
    file
}

fn parse_gate(gate: &mut FeatureGate, child: &Element) -> bool {
    match child.local_name() {
        "require-feature" => gate.required.extend(features(child)),
        "exclude-feature" => gate.excluded.extend(features(child)),
        _ => return false,
    }
    true
}

fn parse_suite(element: &Element) -> TestSuite {
    let mut suite = TestSuite {
        name: element.attr("name").unwrap_or_default().to_string(),
        ignore: flag(element, "ignore", false),
        only: flag(element, "only", false),
        change_uid: flag(element, "change-uid", false),
        http_trace: flag(element, "http-trace", false),
        ..TestSuite::default()
    };

    for child in element.child_elements() {
        if parse_gate(&mut suite.gate, child) {
            continue;
        }
        if child.local_name() == "test" {
            suite.nodes.push(parse_node(child));
        }
    }
    suite
}

fn parse_node(element: &Element) -> TestNode {
    let mut node = TestNode {
        name: element.attr("name").unwrap_or_default().to_string(),
        ignore: flag(element, "ignore", false),
        only: flag(element, "only", false),
        http_trace: flag(element, "http-trace", false),
        ..TestNode::default()
    };

    for child in element.child_elements() {
        if parse_gate(&mut node.gate, child) {
            continue;
        }
        match child.local_name() {
            "description" => node.description = Some(child.text()),
            "request" => node.requests.push(parse_request(child)),
            _ => {}
        }
    }
    node
}

fn parse_request(element: &Element) -> RequestSpec {
    let mut request = RequestSpec {
        user: element.attr("user").map(str::to_string),
        pswd: element.attr("pswd").map(str::to_string),
        auth: flag(element, "auth", true),
        if_match: flag(element, "if-match", false),
        ..RequestSpec::default()
    };

    for child in element.child_elements() {
        match child.local_name() {
            "method" => request.method = child.text(),
            "ruri" => request.ruri = child.text(),
            "header" => {
                if let (Some(name), Some(value)) = (child.child_text("name"), child.child_text("value")) {
                    request.headers.push((name, value));
                }
            }
            "data" => {
                request.data = Some(BodySpec {
                    content_type: child
                        .child_text("content-type")
                        .unwrap_or_else(|| "text/plain".to_string()),
                    filepath: child.child_text("filepath").unwrap_or_default(),
                });
            }
            "verify" => request.verifies.push(parse_verify(child)),
            _ => {}
        }
    }
    request
}

fn parse_verify(element: &Element) -> VerifySpec {
    let mut args = KeyedAttributes::new();
    for arg in element.children_named("arg") {
        let Some(name) = arg.child_text("name") else {
            continue;
        };
        let values: Vec<String> = arg.children_named("value").map(Element::text).collect();
        if values.is_empty() {
            args.insert_all(name, Vec::new());
        } else {
            for value in values {
                args.append(name.clone(), value);
            }
        }
    }

    VerifySpec {
        callback: element.child_text("callback").unwrap_or_default(),
        args,
    }
}
