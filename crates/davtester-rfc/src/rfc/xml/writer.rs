//! Canonical XML rendering.

use quick_xml::escape::escape;

use super::element::{Element, Node};

/// Renders an element tree in a canonical, line-oriented form.
///
/// Attributes come out sorted by name, text is trimmed and whitespace-only
/// text is dropped. Each element starts on its own line so that a line diff
/// of two renderings points at the element that differs.
#[must_use]
pub fn to_canonical_string(root: &Element) -> String {
    let mut lines = Vec::new();
    write_element(root, 0, &mut lines);
    lines.join("\n")
}

fn write_element(element: &Element, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);

    let mut open = format!("<{}", element.name);
    for (name, value) in &element.attributes {
        open.push_str(&format!(" {name}=\"{}\"", escape(value.as_str())));
    }

    let significant: Vec<&Node> = element
        .children
        .iter()
        .filter(|n| match n {
            Node::Element(_) => true,
            Node::Text(t) => !t.trim().is_empty(),
        })
        .collect();

    match significant.as_slice() {
        [] => lines.push(format!("{indent}{open}/>")),
        [Node::Text(text)] => lines.push(format!(
            "{indent}{open}>{}</{}>",
            escape(text.trim()),
            element.name
        )),
        children => {
            lines.push(format!("{indent}{open}>"));
            for child in children {
                match child {
                    Node::Element(e) => write_element(e, depth + 1, lines),
                    Node::Text(t) => lines.push(format!("{indent}  {}", escape(t.trim()))),
                }
            }
            lines.push(format!("{indent}</{}>", element.name));
        }
    }
}
