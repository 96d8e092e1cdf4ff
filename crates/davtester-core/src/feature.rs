//! Server capability gating.

use std::collections::BTreeSet;

/// Capabilities advertised by the server under test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    features: BTreeSet<String>,
}

impl FeatureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: impl Into<String>) {
        self.features.insert(feature.into());
    }

    /// Feature names are compared exactly as configured.
    #[must_use]
    pub fn supports(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Required and excluded features declared by a file, suite or node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureGate {
    pub required: Vec<String>,
    pub excluded: Vec<String>,
}

/// Outcome of checking a [`FeatureGate`] against a [`FeatureSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Missing(Vec<String>),
    Excluded(Vec<String>),
}

impl FeatureGate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty()
    }

    /// Missing features are reported before excluded ones.
    ///
    /// The check is evaluated on every call; nothing is cached between runs.
    #[must_use]
    pub fn check(&self, available: &FeatureSet) -> GateDecision {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|f| !available.supports(f))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return GateDecision::Missing(missing);
        }

        let excluded: Vec<String> = self
            .excluded
            .iter()
            .filter(|f| available.supports(f))
            .cloned()
            .collect();
        if !excluded.is_empty() {
            return GateDecision::Excluded(excluded);
        }

        GateDecision::Pass
    }
}

impl GateDecision {
    /// Diagnostic text for a gated-out item, `None` when it passes.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Pass => None,
            Self::Missing(features) => Some(format!("    Missing features: {}", features.join(", "))),
            Self::Excluded(features) => {
                Some(format!("    Excluded features: {}", features.join(", ")))
            }
        }
    }
}
