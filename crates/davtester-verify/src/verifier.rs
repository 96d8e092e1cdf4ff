//! Verifier contract and the shared file-comparison pipeline.

use std::path::Path;

use davtester_core::attributes::KeyedAttributes;
use davtester_core::feature::FeatureSet;

use crate::error::{VerifyError, VerifyOutcome};
use crate::filter::FilterSet;

/// Verdict of one verification.
///
/// Passing means no diagnostic lines. Appending any line fails it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    ok: bool,
    text: Vec<String>,
}

impl Default for VerifyResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl VerifyResult {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            ok: true,
            text: Vec::new(),
        }
    }

    #[must_use]
    pub fn failed(line: impl Into<String>) -> Self {
        let mut result = Self::ok();
        result.append(line);
        result
    }

    /// Adds a diagnostic line and marks the result as failed.
    pub fn append(&mut self, line: impl Into<String>) {
        self.ok = false;
        self.text.push(line.into());
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.ok
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.text
    }

    /// Diagnostic lines joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.text.join("\n")
    }
}

/// The parts of an HTTP response a verifier may inspect.
#[derive(Debug, Clone, Copy)]
pub struct ResponseView<'a> {
    pub uri: &'a str,
    pub status: u16,
    pub headers: &'a [(String, String)],
    pub body: &'a str,
}

impl ResponseView<'_> {
    /// First header value with a case-insensitive name match.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Read-only environment shared by every verification in a run.
#[derive(Debug, Clone, Copy)]
pub struct VerifyContext<'a> {
    pub features: &'a FeatureSet,
    pub substitutions: &'a KeyedAttributes,
    /// Environment default calendar filters.
    pub calendar_filters: &'a [String],
    /// Environment default XML filters.
    pub xml_filters: &'a [String],
    /// Base directory fixture paths are resolved against.
    pub data_dir: &'a Path,
}

/// A named response check invoked from a test's `verify` element.
pub trait Verifier: Send + Sync {
    /// Judges a response.
    ///
    /// Mismatches are reported in the returned [`VerifyResult`].
    ///
    /// ## Errors
    /// Returns an error only when the verification cannot be carried out,
    /// e.g. a missing argument or an unparsable filter directive.
    fn verify(
        &self,
        ctx: &VerifyContext<'_>,
        response: &ResponseView<'_>,
        args: &KeyedAttributes,
    ) -> VerifyOutcome<VerifyResult>;
}

/// Comparators that match a response body against a fixture file.
pub trait FileDataMatch {
    /// Accepted statuses when no `status` argument is given.
    const DEFAULT_STATUS: &'static [u16];

    /// Accepted statuses; a `status` argument replaces the defaults.
    fn expected_status(&self, args: &KeyedAttributes) -> Vec<u16> {
        args.get_ints("status", Self::DEFAULT_STATUS)
    }

    /// Filters merged in ahead of the node's own `filter` arguments.
    fn default_filters(&self, ctx: &VerifyContext<'_>) -> Vec<String>;

    /// Compares the response body with fixture text that has already had
    /// substitutions applied.
    fn compare(&self, response: &ResponseView<'_>, expected: &str, filters: &FilterSet) -> VerifyResult;
}

/// ## Summary
/// Runs a [`FileDataMatch`] comparator: status check, fixture load and
/// substitution, filter resolution, then comparison.
///
/// A status outside the accepted set fails immediately and the body is
/// never compared. An unreadable fixture is a failed verdict.
///
/// ## Errors
/// Returns an error if the `filepath` argument is missing or a filter
/// directive does not parse.
#[tracing::instrument(skip_all, fields(uri = response.uri, status = response.status))]
pub fn run_file_data_match<M: FileDataMatch>(
    matcher: &M,
    ctx: &VerifyContext<'_>,
    response: &ResponseView<'_>,
    args: &KeyedAttributes,
) -> VerifyOutcome<VerifyResult> {
    let accepted = matcher.expected_status(args);
    if !accepted.contains(&response.status) {
        tracing::debug!(?accepted, "Status outside accepted set");
        return Ok(VerifyResult::failed(format!(
            "        HTTP Status Code Wrong: {}",
            response.status
        )));
    }

    let filepath = args
        .get("filepath")
        .ok_or(VerifyError::MissingArgument("filepath"))?;
    let path = ctx.data_dir.join(ctx.substitutions.substitute(filepath));

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read fixture");
            return Ok(VerifyResult::failed(format!(
                "        Could not read data file {}: {e}",
                path.display()
            )));
        }
    };
    let expected = ctx.substitutions.substitute(&raw);

    let mut directives = matcher.default_filters(ctx);
    directives.extend(args.get_all("filter").iter().cloned());
    let filters = FilterSet::resolve(&directives)?;
    tracing::trace!(filters = filters.iter().count(), "Resolved filters");

    Ok(matcher.compare(response, &expected, &filters))
}
