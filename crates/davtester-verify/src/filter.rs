//! Filter directives applied to response and fixture data before comparison.
//!
//! ```text
//! NAME          drop the field
//! !NAME         cancel the identical directive declared elsewhere
//! NAME:PARAM    drop sub-attribute PARAM of field NAME
//! NAME=VALUE    drop the field when its value is exactly VALUE
//! ```
//!
//! Names may be in Clark notation (`{DAV:}getetag`); a `:` or `=` inside
//! the braces is part of the name.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use davtester_rfc::rfc::ical::core::Property;
use davtester_rfc::rfc::xml::Element;

use crate::error::{VerifyError, VerifyOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterDirective {
    DropField(String),
    DropFieldParam { field: String, param: String },
    DropFieldIf { field: String, value: String },
    /// Holds the text of the directive it cancels.
    Negate(String),
}

impl FilterDirective {
    /// Parses one directive.
    ///
    /// ## Errors
    /// Returns [`VerifyError::InvalidFilter`] for an empty directive or one
    /// with an empty field or parameter name.
    pub fn parse(text: &str) -> VerifyOutcome<Self> {
        let text = text.trim();
        let invalid = || VerifyError::InvalidFilter(text.to_string());

        if let Some(target) = text.strip_prefix('!') {
            let target = Self::parse(target).map_err(|_| invalid())?;
            if matches!(target, Self::Negate(_)) {
                return Err(invalid());
            }
            return Ok(Self::Negate(target.to_string()));
        }

        // Skip a leading `{namespace}` so its characters are not mistaken for operators.
        let search_from = if text.starts_with('{') {
            text.find('}').ok_or_else(invalid)? + 1
        } else {
            0
        };

        let split = text[search_from..]
            .find([':', '='])
            .map(|i| i + search_from);

        let directive = match split {
            None => Self::DropField(text.to_string()),
            Some(i) => {
                let (field, rest) = text.split_at(i);
                let operand = &rest[1..];
                if rest.starts_with(':') {
                    if operand.is_empty() {
                        return Err(invalid());
                    }
                    Self::DropFieldParam {
                        field: field.to_string(),
                        param: operand.to_string(),
                    }
                } else {
                    Self::DropFieldIf {
                        field: field.to_string(),
                        value: operand.to_string(),
                    }
                }
            }
        };

        if directive.field().is_empty() {
            return Err(invalid());
        }
        Ok(directive)
    }

    /// Field name the directive targets. For a negation this is the
    /// cancelled directive's text.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::DropField(field)
            | Self::DropFieldParam { field, .. }
            | Self::DropFieldIf { field, .. }
            | Self::Negate(field) => field,
        }
    }
}

impl fmt::Display for FilterDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DropField(field) => f.write_str(field),
            Self::DropFieldParam { field, param } => write!(f, "{field}:{param}"),
            Self::DropFieldIf { field, value } => write!(f, "{field}={value}"),
            Self::Negate(target) => write!(f, "!{target}"),
        }
    }
}

impl FromStr for FilterDirective {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A field that filter directives can act on.
pub trait Filterable {
    fn field_name(&self) -> &str;

    fn field_value(&self) -> String;

    /// Removes a named sub-attribute, returning whether it was present.
    fn remove_sub_attribute(&mut self, name: &str) -> bool;
}

impl Filterable for Property {
    fn field_name(&self) -> &str {
        &self.name
    }

    fn field_value(&self) -> String {
        self.value.clone()
    }

    fn remove_sub_attribute(&mut self, name: &str) -> bool {
        self.remove_param(name)
    }
}

impl Filterable for Element {
    fn field_name(&self) -> &str {
        &self.name
    }

    fn field_value(&self) -> String {
        self.text()
    }

    fn remove_sub_attribute(&mut self, name: &str) -> bool {
        self.attributes.remove(name).is_some()
    }
}

/// The active drop directives for one comparison.
///
/// Negations are resolved when the set is built and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    directives: Vec<FilterDirective>,
}

impl FilterSet {
    /// Builds the active set from environment defaults followed by
    /// node-specific directives.
    ///
    /// Every `!X` is collected before any drop is kept, so a negation
    /// cancels `X` wherever it was declared. Duplicates collapse to one.
    ///
    /// ## Errors
    /// Returns an error if any directive fails to parse.
    pub fn resolve<I, S>(directives: I) -> VerifyOutcome<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = directives
            .into_iter()
            .filter(|d| !d.as_ref().trim().is_empty())
            .map(|d| FilterDirective::parse(d.as_ref()))
            .collect::<VerifyOutcome<Vec<_>>>()?;

        let cancelled: HashSet<&str> = parsed
            .iter()
            .filter_map(|d| match d {
                FilterDirective::Negate(target) => Some(target.as_str()),
                _ => None,
            })
            .collect();

        let mut seen = HashSet::new();
        let directives = parsed
            .iter()
            .filter(|d| !matches!(d, FilterDirective::Negate(_)))
            .filter(|d| !cancelled.contains(d.to_string().as_str()))
            .filter(|d| seen.insert((*d).clone()))
            .cloned()
            .collect();

        Ok(Self { directives })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterDirective> {
        self.directives.iter()
    }

    /// Applies every matching directive in declaration order.
    ///
    /// Returns `None` when the field is dropped, otherwise the field with
    /// any matching sub-attributes removed. A drop ends processing.
    #[must_use]
    pub fn apply<F: Filterable>(&self, mut field: F) -> Option<F> {
        for directive in &self.directives {
            match directive {
                FilterDirective::DropField(name) if name == field.field_name() => return None,
                FilterDirective::DropFieldIf { field: name, value }
                    if name == field.field_name() && *value == field.field_value() =>
                {
                    return None;
                }
                FilterDirective::DropFieldParam { field: name, param }
                    if name == field.field_name() =>
                {
                    field.remove_sub_attribute(param);
                }
                _ => {}
            }
        }
        Some(field)
    }
}
