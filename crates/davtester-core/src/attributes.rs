//! Ordered string key to multi-value map.
//!
//! Used for substitution variables, verifier arguments and observer payloads.
//! Keys are case-sensitive. Insertion order is kept for display only.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyedAttributes {
    entries: Vec<(String, Vec<String>)>,
}

impl KeyedAttributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map holding a single key with a single value.
    #[must_use]
    pub fn with(key: impl Into<String>, value: impl ToString) -> Self {
        let mut attrs = Self::new();
        attrs.insert(key, value);
        attrs
    }

    /// Sets `key` to a single value, replacing any previous values.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.insert_all(key, vec![value.to_string()]);
    }

    /// Sets `key` to `values`, replacing any previous values.
    pub fn insert_all(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            *existing = values;
        } else {
            self.entries.push((key, values));
        }
    }

    /// Adds a value to `key`, keeping the values already present.
    pub fn append(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.push(value);
        } else {
            self.entries.push((key, vec![value]));
        }
    }

    /// Appends every entry of `other`, replacing keys already present.
    pub fn extend(&mut self, other: &Self) {
        for (key, values) in &other.entries {
            self.insert_all(key.clone(), values.clone());
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Returns all values for `key`, or an empty slice.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or(&[], |(_, v)| v.as_slice())
    }

    /// Returns the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Interprets the first value of `key` as a yes/no flag.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "yes" | "true" | "1" | "on"
            )
        })
    }

    /// Parses every value of `key` as an integer, skipping values that do not parse.
    ///
    /// Returns `defaults` when `key` is absent.
    #[must_use]
    pub fn get_ints(&self, key: &str, defaults: &[u16]) -> Vec<u16> {
        if !self.contains_key(key) {
            return defaults.to_vec();
        }

        self.get_all(key)
            .iter()
            .filter_map(|v| v.trim().parse().ok())
            .collect()
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces every key occurring in `text` with its first value.
    ///
    /// Longer keys are substituted first so that `$host2:` is not clobbered
    /// by `$host:`.
    #[must_use]
    pub fn substitute(&self, text: &str) -> String {
        if !text.contains('$') {
            return text.to_string();
        }

        let mut keys: Vec<&(String, Vec<String>)> = self.entries.iter().collect();
        keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut result = text.to_string();
        for (key, values) in keys {
            if let Some(value) = values.first()
                && result.contains(key.as_str())
            {
                result = result.replace(key.as_str(), value);
            }
        }
        result
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for KeyedAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.append(k, v);
        }
        attrs
    }
}
