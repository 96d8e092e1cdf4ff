//! Property parameters (RFC 5545 §3.2).

use std::fmt;

/// `NAME=value[,value...]`, as in `TZID=America/New_York`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Upper-cased name.
    pub name: String,
    /// Decoded values; MEMBER and DELEGATED-TO commonly carry several.
    pub values: Vec<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_values(name, vec![value.into()])
    }

    #[must_use]
    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Renders values re-encoded per RFC 6868, quoting any value that holds a
/// separator.
impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(|v| encode_value(v)).collect();
        write!(f, "{}={}", self.name, values.join(","))
    }
}

fn encode_value(raw: &str) -> String {
    let encoded = raw.replace('^', "^^").replace('\n', "^n").replace('"', "^'");
    if encoded.contains([':', ';', ',']) {
        format!("\"{encoded}\"")
    } else {
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_force_quotes() {
        assert_eq!(Parameter::new("cn", "Doe, Jane").to_string(), "CN=\"Doe, Jane\"");
        assert_eq!(Parameter::new("PARTSTAT", "ACCEPTED").to_string(), "PARTSTAT=ACCEPTED");
    }

    #[test]
    fn values_are_comma_joined() {
        let param = Parameter::with_values(
            "MEMBER",
            vec!["mailto:a@example.com".into(), "mailto:b@example.com".into()],
        );
        assert_eq!(
            param.to_string(),
            "MEMBER=\"mailto:a@example.com\",\"mailto:b@example.com\""
        );
    }

    #[test]
    fn carets_and_quotes_are_encoded() {
        assert_eq!(Parameter::new("CN", "Say \"hi\"^\nbye").to_string(), "CN=Say ^'hi^'^^^nbye");
    }
}
