//! An ordered group of tests sharing gating and an entity-tag map.

use davtester_core::feature::{FeatureGate, GateDecision};
use davtester_core::types::{ResultCounters, ResultKind};

use super::node::{DELIBERATELY_IGNORED, TestNode};
use super::request::EtagMap;
use crate::context::RunContext;
use crate::observer::Notification;
use crate::transport::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSuite {
    pub name: String,
    pub ignore: bool,
    pub only: bool,
    pub change_uid: bool,
    pub http_trace: bool,
    pub gate: FeatureGate,
    pub nodes: Vec<TestNode>,
}

impl TestSuite {
    /// Whether any node in this suite is marked `only`.
    #[must_use]
    pub fn has_only_nodes(&self) -> bool {
        self.nodes.iter().any(|n| n.only)
    }

    /// Reason the whole suite is skipped, if it is.
    fn skip_reason<T: Transport>(&self, ctx: &RunContext<'_, T>, file_only_active: bool) -> Option<String> {
        if self.ignore || (file_only_active && !self.only) {
            return Some(DELIBERATELY_IGNORED.to_string());
        }
        match self.gate.check(&ctx.server.features) {
            GateDecision::Pass => None,
            decision => decision.details(),
        }
    }

    /// ## Summary
    /// Runs the suite's nodes in order and returns their folded counters.
    ///
    /// A skipped suite records every node as ignored without evaluating any
    /// of them. The entity-tag map lives only for this call.
    ///
    /// ## Side Effects
    /// Notifies `testSuite`, one `testResult` per evaluated node and a
    /// closing `trace`. Rotates UID substitutions when `change_uid` is set.
    #[tracing::instrument(skip_all, fields(suite = %self.name))]
    pub async fn run<T: Transport>(
        &self,
        ctx: &mut RunContext<'_, T>,
        file: &str,
        file_only_active: bool,
    ) -> ResultCounters {
        let mut counters = ResultCounters::default();

        if let Some(details) = self.skip_reason(ctx, file_only_active) {
            tracing::debug!(%details, "Suite skipped");
            ctx.notifier.notify(&Notification::TestSuite {
                file: file.to_string(),
                name: self.name.clone(),
                details,
                result: Some(ResultKind::Ignored),
            });
            counters = ResultCounters::ignored(self.nodes.len());
        } else {
            ctx.notifier.notify(&Notification::TestSuite {
                file: file.to_string(),
                name: self.name.clone(),
                details: String::new(),
                result: None,
            });

            if self.change_uid {
                ctx.server.new_uids();
            }

            let mut etags = EtagMap::new();
            let only_active = self.has_only_nodes();
            for node in &self.nodes {
                let outcome = node.run(ctx, &mut etags, only_active, self.http_trace).await;
                counters.record(outcome.result);
                ctx.notifier.notify(&Notification::TestResult {
                    file: file.to_string(),
                    suite: self.name.clone(),
                    name: node.name.clone(),
                    details: outcome.details,
                    result: outcome.result,
                });
            }
        }

        ctx.notifier.trace(format!(
            "  Suite Results: {} PASSED, {} FAILED, {} IGNORED",
            counters.ok, counters.failed, counters.ignored
        ));
        counters
    }
}
