//! Description of the server under test.

use std::path::Path;

use davtester_core::attributes::KeyedAttributes;
use davtester_core::constants::UID_SUBSTITUTION_COUNT;
use davtester_core::feature::FeatureSet;
use davtester_verify::verifier::VerifyContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub host: String,
    pub nonssl_port: u16,
    pub ssl_port: u16,
    pub ssl: bool,
    pub features: FeatureSet,
    pub substitutions: KeyedAttributes,
    /// Calendar filters applied to every `calendarDataMatch`.
    pub calendar_filters: Vec<String>,
    /// XML filters applied to every `xmlDataMatch`.
    pub xml_filters: Vec<String>,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            nonssl_port: 80,
            ssl_port: 443,
            ssl: false,
            features: FeatureSet::new(),
            substitutions: KeyedAttributes::new(),
            calendar_filters: Vec::new(),
            xml_filters: Vec::new(),
        }
    }
}

impl ServerInfo {
    #[must_use]
    pub const fn port(&self) -> u16 {
        if self.ssl { self.ssl_port } else { self.nonssl_port }
    }

    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        if self.ssl { "https" } else { "http" }
    }

    /// `scheme://host`, with the port only when it is not the scheme default.
    #[must_use]
    pub fn base_url(&self) -> String {
        with_port(self.scheme(), &self.host, self.port())
    }

    /// Adds `$host:` and `$hostssl:` ahead of any configured substitution
    /// that refers to them.
    pub fn add_host_substitutions(&mut self) {
        let mut derived = KeyedAttributes::new();
        derived.insert("$host:", self.base_url());
        derived.insert("$hostssl:", with_port("https", &self.host, self.ssl_port));
        derived.extend(&self.substitutions);
        self.substitutions = derived;
    }

    /// Replaces `$uid1:` to `$uid9:` with fresh random UIDs.
    pub fn new_uids(&mut self) {
        for i in 1..=UID_SUBSTITUTION_COUNT {
            self.substitutions
                .insert(format!("$uid{i}:"), uuid::Uuid::new_v4().to_string());
        }
        tracing::debug!("Rotated UID substitutions");
    }

    #[must_use]
    pub fn substitute(&self, text: &str) -> String {
        self.substitutions.substitute(text)
    }

    /// Resolves `uri` against the server base URL unless it is absolute.
    #[must_use]
    pub fn url_for(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else if uri.starts_with('/') {
            format!("{}{uri}", self.base_url())
        } else {
            format!("{}/{uri}", self.base_url())
        }
    }

    #[must_use]
    pub fn verify_context<'a>(&'a self, data_dir: &'a Path) -> VerifyContext<'a> {
        VerifyContext {
            features: &self.features,
            substitutions: &self.substitutions,
            calendar_filters: &self.calendar_filters,
            xml_filters: &self.xml_filters,
            data_dir,
        }
    }
}

fn with_port(scheme: &str, host: &str, port: u16) -> String {
    let default = if scheme == "https" { 443 } else { 80 };
    if port == default {
        format!("{scheme}://{host}")
    } else {
        format!("{scheme}://{host}:{port}")
    }
}
