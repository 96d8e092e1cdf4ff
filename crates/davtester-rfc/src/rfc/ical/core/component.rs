//! Components (RFC 5545 §3.4-3.6) kept by name.
//!
//! Comparison never needs to know what a VEVENT means, only where it sits,
//! so components are identified by their upper-cased BEGIN name.

use super::Property;

pub const VCALENDAR: &str = "VCALENDAR";
pub const VTIMEZONE: &str = "VTIMEZONE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Upper-cased BEGIN/END name.
    pub name: String,
    pub properties: Vec<Property>,
    pub children: Vec<Component>,
}

impl Component {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// First property called `name`, ignoring case.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.property("UID").map(|p| p.value.as_str())
    }

    /// Visits this component and every descendant, parents first.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Self)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}

/// A parsed document: always a single VCALENDAR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ICalendar {
    pub root: Component,
}

impl ICalendar {
    /// Drops the top-level VTIMEZONE components and returns how many there
    /// were.
    pub fn remove_timezones(&mut self) -> usize {
        let before = self.root.children.len();
        self.root.children.retain(|c| c.name != VTIMEZONE);
        before - self.root.children.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_upper_cased() {
        assert_eq!(Component::named("x-wr-thing").name, "X-WR-THING");
    }

    #[test]
    fn remove_timezones_keeps_other_children() {
        let mut ical = ICalendar {
            root: Component::named(VCALENDAR)
                .with_child(Component::named(VTIMEZONE))
                .with_child(Component::named("VEVENT").with_property(Property::new("UID", "event1"))),
        };

        assert_eq!(ical.remove_timezones(), 1);
        assert_eq!(ical.remove_timezones(), 0);
        assert_eq!(ical.root.children[0].uid(), Some("event1"));
    }

    #[test]
    fn walk_mut_reaches_nested_components() {
        let mut root = Component::named(VCALENDAR)
            .with_child(Component::named("VEVENT").with_child(Component::named("VALARM")));

        let mut seen = Vec::new();
        root.walk_mut(&mut |c| seen.push(c.name.clone()));
        assert_eq!(seen, ["VCALENDAR", "VEVENT", "VALARM"]);
    }
}
