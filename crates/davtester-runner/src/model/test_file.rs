//! One test-definition file: file-level gates and its suites.

use davtester_core::feature::FeatureGate;
use davtester_core::types::{ResultCounters, ResultKind};

use super::suite::TestSuite;
use crate::context::RunContext;
use crate::observer::Notification;
use crate::transport::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestFile {
    /// Display name, normally the path the file was loaded from.
    pub name: String,
    pub description: Option<String>,
    /// Skipped entirely when the run is configured with `all`.
    pub ignore_all: bool,
    pub gate: FeatureGate,
    pub suites: Vec<TestSuite>,
}

impl TestFile {
    /// Whether any suite is marked `only`; unmarked siblings are then ignored.
    #[must_use]
    pub fn has_only_suites(&self) -> bool {
        self.suites.iter().any(|s| s.only)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.suites.iter().map(|s| s.nodes.len()).sum()
    }

    /// ## Summary
    /// Runs every suite in order and returns the folded counters.
    ///
    /// A file gated out by its features records all of its nodes as
    /// ignored.
    #[tracing::instrument(skip_all, fields(file = %self.name))]
    pub async fn run<T: Transport>(&self, ctx: &mut RunContext<'_, T>) -> ResultCounters {
        if let Some(details) = self.gate.check(&ctx.server.features).details() {
            tracing::debug!(%details, "Test file skipped");
            ctx.notifier.notify(&Notification::TestFile {
                name: self.name.clone(),
                details,
                result: Some(ResultKind::Ignored),
            });
            return ResultCounters::ignored(self.node_count());
        }

        ctx.notifier.notify(&Notification::TestFile {
            name: self.name.clone(),
            details: self.description.clone().unwrap_or_default(),
            result: None,
        });

        let only_active = self.has_only_suites();
        let mut counters = ResultCounters::default();
        for suite in &self.suites {
            counters += suite.run(ctx, &self.name, only_active).await;
        }
        counters
    }
}
