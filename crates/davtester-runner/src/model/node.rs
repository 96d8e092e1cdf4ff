//! A single test: gating flags plus an ordered list of requests.

use davtester_core::feature::{FeatureGate, FeatureSet, GateDecision};
use davtester_core::types::ResultKind;

use super::request::{EtagMap, RequestOutcome, RequestSpec};
use crate::context::RunContext;
use crate::transport::Transport;

pub const DELIBERATELY_IGNORED: &str = "    Deliberately ignored";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestNode {
    pub name: String,
    pub description: Option<String>,
    pub ignore: bool,
    pub only: bool,
    pub http_trace: bool,
    pub gate: FeatureGate,
    pub requests: Vec<RequestSpec>,
}

/// How a node is handled, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    Ignored,
    MissingFeature(Vec<String>),
    ExcludedFeature(Vec<String>),
    Evaluated,
}

/// A node's verdict and its diagnostic text (empty when OK).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutcome {
    pub result: ResultKind,
    pub details: String,
}

impl NodeOutcome {
    fn new(result: ResultKind, details: impl Into<String>) -> Self {
        Self {
            result,
            details: details.into(),
        }
    }
}

impl TestNode {
    /// `only_active` is true when a sibling in the same suite is marked `only`.
    #[must_use]
    pub fn state(&self, only_active: bool, features: &FeatureSet) -> NodeState {
        if self.ignore || (only_active && !self.only) {
            return NodeState::Ignored;
        }
        match self.gate.check(features) {
            GateDecision::Missing(missing) => NodeState::MissingFeature(missing),
            GateDecision::Excluded(excluded) => NodeState::ExcludedFeature(excluded),
            GateDecision::Pass => NodeState::Evaluated,
        }
    }

    /// ## Summary
    /// Gates the node and, when it is evaluated, runs its requests in order.
    ///
    /// The first request that does not pass decides the verdict; later
    /// requests are not sent.
    #[tracing::instrument(skip_all, fields(test = %self.name))]
    pub async fn run<T: Transport>(
        &self,
        ctx: &RunContext<'_, T>,
        etags: &mut EtagMap,
        only_active: bool,
        http_trace: bool,
    ) -> NodeOutcome {
        match self.state(only_active, &ctx.server.features) {
            NodeState::Ignored => return NodeOutcome::new(ResultKind::Ignored, DELIBERATELY_IGNORED),
            NodeState::MissingFeature(missing) => {
                let details = GateDecision::Missing(missing).details().unwrap_or_default();
                return NodeOutcome::new(ResultKind::Ignored, details);
            }
            NodeState::ExcludedFeature(excluded) => {
                let details = GateDecision::Excluded(excluded).details().unwrap_or_default();
                return NodeOutcome::new(ResultKind::Ignored, details);
            }
            NodeState::Evaluated => {}
        }

        let http_trace = http_trace || self.http_trace;
        for (index, request) in self.requests.iter().enumerate() {
            match request.execute(ctx, etags, http_trace).await {
                RequestOutcome::Passed => {}
                RequestOutcome::Failed(details) => {
                    tracing::debug!(request = index, "Request failed verification");
                    return NodeOutcome::new(ResultKind::Failed, details);
                }
                RequestOutcome::Error(details) => {
                    return NodeOutcome::new(ResultKind::Error, details);
                }
            }
        }

        NodeOutcome::new(ResultKind::Ok, "")
    }
}
