//! Console reporting through `tracing`.

use davtester_core::types::ResultKind;

use super::{Notification, Observer};

/// Renders notifications as `tracing` events.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn process(&mut self, notification: &Notification) -> anyhow::Result<()> {
        match notification {
            Notification::Start => tracing::info!("Starting tests"),
            Notification::Load {
                name: Some(name),
                current,
                total,
            } => tracing::info!(current, total, "Loading {name}"),
            Notification::Load { name: None, .. } => tracing::debug!("Loading complete"),
            Notification::TestProgress { count, total } => {
                tracing::info!(count, total, "Test file {count} of {total}");
            }
            Notification::Trace { message } => tracing::info!("{message}"),
            Notification::TestFile { name, details, .. } => {
                tracing::info!(file = %name, "{details}");
            }
            Notification::TestSuite {
                name,
                details,
                result,
                ..
            } => match result {
                Some(result) => tracing::info!(suite = %name, %result, "{details}"),
                None => tracing::info!(suite = %name, "Running suite"),
            },
            Notification::TestResult {
                suite,
                name,
                details,
                result,
                ..
            } => match result {
                ResultKind::Ok | ResultKind::Ignored => {
                    tracing::info!(suite = %suite, test = %name, %result, "{details}");
                }
                ResultKind::Failed | ResultKind::Error => {
                    tracing::warn!(suite = %suite, test = %name, %result, "{details}");
                }
            },
            Notification::Finish { totals } => tracing::info!(
                ok = totals.ok,
                failed = totals.failed,
                error = totals.error,
                ignored = totals.ignored,
                "Run finished"
            ),
        }
        Ok(())
    }
}
