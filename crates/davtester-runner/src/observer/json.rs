//! Results tree written as JSON when the run finishes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use davtester_core::types::{ResultCounters, ResultKind};
use serde::Serialize;

use super::{Notification, Observer};

#[derive(Debug, Serialize)]
struct TestRecord {
    name: String,
    result: ResultKind,
    details: String,
}

#[derive(Debug, Serialize)]
struct SuiteRecord {
    name: String,
    result: Option<ResultKind>,
    details: String,
    tests: Vec<TestRecord>,
}

#[derive(Debug, Serialize)]
struct FileRecord {
    name: String,
    result: Option<ResultKind>,
    details: String,
    suites: Vec<SuiteRecord>,
}

#[derive(Debug, Default, Serialize)]
struct Report {
    started: Option<DateTime<Utc>>,
    finished: Option<DateTime<Utc>>,
    totals: ResultCounters,
    files: Vec<FileRecord>,
}

/// Accumulates a file → suite → test tree and writes it on `finish`.
#[derive(Debug)]
pub struct JsonObserver {
    path: PathBuf,
    report: Report,
}

impl JsonObserver {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            report: Report::default(),
        }
    }

    fn current_suite(&mut self) -> anyhow::Result<&mut SuiteRecord> {
        self.report
            .files
            .last_mut()
            .and_then(|f| f.suites.last_mut())
            .context("test result received outside a suite")
    }
}

impl Observer for JsonObserver {
    fn name(&self) -> &'static str {
        "json"
    }

    fn process(&mut self, notification: &Notification) -> anyhow::Result<()> {
        match notification {
            Notification::Start => self.report.started = Some(Utc::now()),
            Notification::TestFile {
                name,
                details,
                result,
            } => self.report.files.push(FileRecord {
                name: name.clone(),
                result: *result,
                details: details.clone(),
                suites: Vec::new(),
            }),
            Notification::TestSuite {
                name,
                details,
                result,
                ..
            } => {
                let file = self
                    .report
                    .files
                    .last_mut()
                    .context("suite received outside a test file")?;
                file.suites.push(SuiteRecord {
                    name: name.clone(),
                    result: *result,
                    details: details.clone(),
                    tests: Vec::new(),
                });
            }
            Notification::TestResult {
                name,
                details,
                result,
                ..
            } => self.current_suite()?.tests.push(TestRecord {
                name: name.clone(),
                result: *result,
                details: details.clone(),
            }),
            Notification::Finish { totals } => {
                self.report.finished = Some(Utc::now());
                self.report.totals = *totals;
                let json = serde_json::to_string_pretty(&self.report)?;
                std::fs::write(&self.path, json)
                    .with_context(|| format!("writing {}", self.path.display()))?;
                tracing::info!(path = %self.path.display(), "Wrote JSON results");
            }
            Notification::Load { .. } | Notification::TestProgress { .. } | Notification::Trace { .. } => {}
        }
        Ok(())
    }
}
