//! XML document reading with `quick-xml`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::element::{Element, Node};
use super::error::{XmlError, XmlResult};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parses a document into its root element.
///
/// Comments, processing instructions and the XML declaration are dropped.
/// Entity and character references are resolved. Text is kept verbatim;
/// whitespace handling is left to the writer.
///
/// ## Errors
/// Returns an error for malformed XML, undeclared prefixes, or a document
/// with no root element.
#[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
pub fn parse_document(xml: &str) -> XmlResult<Element> {
    let mut reader = Reader::from_reader(xml.as_bytes());

    let mut buf = Vec::new();
    let mut scopes: Vec<Vec<(String, String)>> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let (element, frame) = open_element(e, &scopes)?;
                scopes.push(frame);
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let (element, frame) = open_element(e, &scopes)?;
                scopes.push(frame);
                scopes.pop();
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(ref e) => {
                scopes.pop();
                let element = stack.pop().ok_or_else(|| {
                    XmlError::Unbalanced(String::from_utf8_lossy(e.name().as_ref()).into_owned())
                })?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(ref e) => {
                let text = reader.decoder().decode(e.as_ref())?;
                push_text(&mut stack, &text);
            }
            Event::CData(ref e) => {
                let text = reader.decoder().decode(e)?;
                push_text(&mut stack, &text);
            }
            Event::GeneralRef(ref e) => {
                let name = reader.decoder().decode(e)?;
                let resolved = resolve_reference(&name)?;
                push_text(&mut stack, &resolved);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Malformed(format!("unclosed element {}", open.name)));
    }

    root.ok_or(XmlError::Empty)
}

fn open_element(
    e: &BytesStart<'_>,
    scopes: &[Vec<(String, String)>],
) -> XmlResult<(Element, Vec<(String, String)>)> {
    let mut frame = Vec::new();
    let mut raw_attrs = Vec::new();

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_owned();
        let raw_value = std::str::from_utf8(&attr.value)?;
        let value = quick_xml::escape::unescape(raw_value)?.into_owned();

        if let Some(prefix) = key.strip_prefix("xmlns:") {
            frame.push((prefix.to_string(), value));
        } else if key == "xmlns" {
            frame.push((String::new(), value));
        } else {
            raw_attrs.push((key, value));
        }
    }

    let lookup = |prefix: &str| -> Option<String> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE.to_string());
        }
        frame
            .iter()
            .rev()
            .chain(scopes.iter().rev().flat_map(|s| s.iter().rev()))
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| ns.clone())
    };

    let raw_name = std::str::from_utf8(e.name().as_ref())?.to_owned();
    let name = match raw_name.split_once(':') {
        Some((prefix, local)) => {
            let ns = lookup(prefix).ok_or_else(|| XmlError::UnknownPrefix(prefix.to_string()))?;
            clark(&ns, local)
        }
        None => clark(&lookup("").unwrap_or_default(), &raw_name),
    };

    let mut element = Element::new(name);
    for (key, value) in raw_attrs {
        let key = match key.split_once(':') {
            Some((prefix, local)) => {
                let ns = lookup(prefix).ok_or_else(|| XmlError::UnknownPrefix(prefix.to_string()))?;
                clark(&ns, local)
            }
            None => key,
        };
        element.attributes.insert(key, value);
    }

    Ok((element, frame))
}

fn clark(namespace: &str, local: &str) -> String {
    if namespace.is_empty() {
        local.to_string()
    } else {
        format!("{{{namespace}}}{local}")
    }
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> XmlResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        Ok(())
    } else if root.is_some() {
        Err(XmlError::Malformed(format!(
            "more than one root element: {}",
            element.name
        )))
    } else {
        *root = Some(element);
        Ok(())
    }
}

/// Text outside the root element is ignored.
fn push_text(stack: &mut [Element], text: &str) {
    let Some(current) = stack.last_mut() else {
        return;
    };
    if let Some(Node::Text(existing)) = current.children.last_mut() {
        existing.push_str(text);
    } else {
        current.children.push(Node::Text(text.to_string()));
    }
}

fn resolve_reference(name: &str) -> XmlResult<String> {
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()
            } else {
                None
            };
            code.and_then(char::from_u32)
                .ok_or_else(|| XmlError::Malformed(format!("unknown entity reference &{name};")))?
        }
    };
    Ok(resolved.to_string())
}
