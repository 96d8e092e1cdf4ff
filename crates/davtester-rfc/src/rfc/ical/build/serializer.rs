//! Canonical line serializer.

use crate::rfc::ical::core::{Component, ICalendar, Parameter, Property};

/// Renders a calendar as canonical, unfolded content lines.
///
/// Properties are ordered by their rendered text and parameters by name.
/// Sibling components are ordered by name, UID and RECURRENCE-ID so that
/// servers returning overrides in a different order still compare equal.
#[must_use]
pub fn to_lines(ical: &ICalendar) -> Vec<String> {
    component_lines(&ical.root)
}

/// Renders one component and its descendants.
#[must_use]
pub fn component_lines(component: &Component) -> Vec<String> {
    let mut lines = vec![format!("BEGIN:{}", component.name)];

    let mut props: Vec<String> = component.properties.iter().map(property_line).collect();
    props.sort();
    lines.extend(props);

    let mut children: Vec<(ChildKey<'_>, Vec<String>)> = component
        .children
        .iter()
        .map(|child| (ChildKey::of(child), component_lines(child)))
        .collect();
    children.sort();
    for (_, child_lines) in children {
        lines.extend(child_lines);
    }

    lines.push(format!("END:{}", component.name));
    lines
}

/// Renders a single property as `NAME;PARAM=VALUE:value`.
#[must_use]
pub fn property_line(prop: &Property) -> String {
    let mut params: Vec<&Parameter> = prop.params.iter().collect();
    params.sort_by(|a, b| a.name.cmp(&b.name));

    let mut line = prop.name.clone();
    for param in params {
        line.push(';');
        line.push_str(&param.to_string());
    }
    line.push(':');
    line.push_str(&prop.value);
    line
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct ChildKey<'a> {
    name: &'a str,
    uid: &'a str,
    recurrence_id: &'a str,
}

impl<'a> ChildKey<'a> {
    fn of(component: &'a Component) -> Self {
        Self {
            name: &component.name,
            uid: component.uid().unwrap_or_default(),
            recurrence_id: component
                .property("RECURRENCE-ID")
                .map_or("", |p| p.value.as_str()),
        }
    }
}
