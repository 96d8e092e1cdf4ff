//! Properties and raw content lines (RFC 5545 §3.1).

use super::Parameter;

/// One unfolded line split into name, parameters and raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub name: String,
    pub params: Vec<Parameter>,
    pub raw_value: String,
}

/// A property inside a component.
///
/// The value is the exact text after unfolding. Nothing is unescaped or
/// typed, so a comparison sees what the server sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Upper-cased name.
    pub name: String,
    pub params: Vec<Parameter>,
    pub value: String,
}

impl Property {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Replaces every parameter named like `param` with `param`.
    pub fn replace_param(&mut self, param: Parameter) {
        self.remove_param(&param.name);
        self.params.push(param);
    }

    /// Returns whether a parameter called `name` was present.
    pub fn remove_param(&mut self, name: &str) -> bool {
        let before = self.params.len();
        self.params.retain(|p| !p.name.eq_ignore_ascii_case(name));
        before != self.params.len()
    }
}

impl From<ContentLine> for Property {
    fn from(line: ContentLine) -> Self {
        Self {
            name: line.name,
            params: line.params,
            value: line.raw_value,
        }
    }
}
