use std::collections::BTreeMap;

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element.
///
/// Attributes are kept in a sorted map; their document order carries no
/// meaning. Namespace declarations are consumed during parsing and are not
/// kept as attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Clark-notation name, `{namespace}local` or just `local`.
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Local part of the name, without namespace.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once('}')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Child elements whose local name is `local`.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |e| e.local_name() == local)
    }

    /// First child element whose local name is `local`.
    #[must_use]
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.local_name() == local)
    }

    /// Concatenated text of direct text children, trimmed.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            if let Node::Text(t) = node {
                text.push_str(t);
            }
        }
        text.trim().to_string()
    }

    /// Trimmed text of the first child element named `local`.
    #[must_use]
    pub fn child_text(&self, local: &str) -> Option<String> {
        self.child(local).map(Element::text)
    }
}
