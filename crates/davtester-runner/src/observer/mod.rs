//! Run notifications and the observers that consume them.

mod json;
mod logging;

use std::path::Path;

use davtester_core::attributes::KeyedAttributes;
use davtester_core::config::ObserverKind;
use davtester_core::types::{ResultCounters, ResultKind};

use crate::error::{RunnerError, RunnerResult};

pub use json::JsonObserver;
pub use logging::LoggingObserver;

/// A lifecycle event pushed to every observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Start,
    /// A test file was read. `name` is `None` once loading is complete.
    Load {
        name: Option<String>,
        current: usize,
        total: usize,
    },
    TestProgress {
        count: usize,
        total: usize,
    },
    Trace {
        message: String,
    },
    /// A test file is starting (`result` is `None`) or was skipped as a whole.
    TestFile {
        name: String,
        details: String,
        result: Option<ResultKind>,
    },
    /// A suite is starting (`result` is `None`) or was skipped as a whole.
    TestSuite {
        file: String,
        name: String,
        details: String,
        result: Option<ResultKind>,
    },
    TestResult {
        file: String,
        suite: String,
        name: String,
        details: String,
        result: ResultKind,
    },
    Finish {
        totals: ResultCounters,
    },
}

impl Notification {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Load { .. } => "load",
            Self::TestProgress { .. } => "testProgress",
            Self::Trace { .. } => "trace",
            Self::TestFile { .. } => "testFile",
            Self::TestSuite { .. } => "testSuite",
            Self::TestResult { .. } => "testResult",
            Self::Finish { .. } => "finish",
        }
    }

    /// The notification's fields as a keyed payload.
    #[must_use]
    pub fn payload(&self) -> KeyedAttributes {
        let mut attrs = KeyedAttributes::new();
        match self {
            Self::Start => {}
            Self::Load {
                name,
                current,
                total,
            } => {
                if let Some(name) = name {
                    attrs.insert("name", name);
                }
                attrs.insert("current", current);
                attrs.insert("total", total);
            }
            Self::TestProgress { count, total } => {
                attrs.insert("count", count);
                attrs.insert("total", total);
            }
            Self::Trace { message } => attrs.insert("message", message),
            Self::TestFile {
                name,
                details,
                result,
            } => {
                attrs.insert("name", name);
                attrs.insert("details", details);
                if let Some(result) = result {
                    attrs.insert("result", result.code());
                }
            }
            Self::TestSuite {
                file,
                name,
                details,
                result,
            } => {
                attrs.insert("file", file);
                attrs.insert("name", name);
                attrs.insert("details", details);
                if let Some(result) = result {
                    attrs.insert("result", result.code());
                }
            }
            Self::TestResult {
                file,
                suite,
                name,
                details,
                result,
            } => {
                attrs.insert("file", file);
                attrs.insert("suite", suite);
                attrs.insert("name", name);
                attrs.insert("details", details);
                attrs.insert("result", result.code());
            }
            Self::Finish { totals } => {
                attrs.insert("ok", totals.ok);
                attrs.insert("failed", totals.failed);
                attrs.insert("error", totals.error);
                attrs.insert("ignored", totals.ignored);
            }
        }
        attrs
    }
}

/// Receives run notifications.
pub trait Observer {
    fn name(&self) -> &'static str;

    /// ## Errors
    /// An error is logged by the [`Notifier`] and otherwise ignored.
    fn process(&mut self, notification: &Notification) -> anyhow::Result<()>;
}

/// Fans notifications out to the registered observers.
#[derive(Default)]
pub struct Notifier {
    observers: Vec<Box<dyn Observer>>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|o| o.name()))
            .finish()
    }
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Builds the observers named in configuration, in order.
    ///
    /// ## Errors
    /// Returns an error if the `json` observer is requested without an
    /// output path.
    pub fn from_kinds(kinds: &[ObserverKind], json_output: Option<&Path>) -> RunnerResult<Self> {
        let mut notifier = Self::new();
        for kind in kinds {
            match kind {
                ObserverKind::Logging => notifier.register(LoggingObserver::default()),
                ObserverKind::Json => {
                    let path = json_output.ok_or_else(|| {
                        RunnerError::Observer("json observer requires run.json_output".to_string())
                    })?;
                    notifier.register(JsonObserver::new(path));
                }
            }
        }
        Ok(notifier)
    }

    pub fn register(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify(&mut self, notification: &Notification) {
        for observer in &mut self.observers {
            if let Err(e) = observer.process(notification) {
                tracing::warn!(
                    observer = observer.name(),
                    notification = notification.name(),
                    error = %e,
                    "Observer failed"
                );
            }
        }
    }

    pub fn trace(&mut self, message: impl Into<String>) {
        self.notify(&Notification::Trace {
            message: message.into(),
        });
    }
}
