//! Top-level run driver.

use std::path::{Path, PathBuf};

use davtester_core::config::RunConfig;
use davtester_core::types::ResultCounters;

use crate::context::RunContext;
use crate::error::RunnerResult;
use crate::loader::{load_server_info, load_test_file};
use crate::model::TestFile;
use crate::observer::{Notification, Notifier};
use crate::server_info::ServerInfo;
use crate::transport::Transport;

/// Which hook file aborted a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Pretest,
    Posttest,
}

/// Why a run ended before every test file had executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunAbort {
    HookFailed { hook: Hook, file: String },
    StopOnFail { file: String },
}

/// Totals across every executed file, hooks included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub totals: ResultCounters,
    pub abort: Option<RunAbort>,
}

impl RunSummary {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.abort.is_none() && !self.totals.has_failures()
    }
}

pub struct Manager<T: Transport> {
    transport: T,
    server: ServerInfo,
    data_dir: PathBuf,
    tests: Vec<TestFile>,
    pretest: Option<TestFile>,
    posttest: Option<TestFile>,
    stop_on_fail: bool,
    notifier: Notifier,
}

impl<T: Transport> Manager<T> {
    #[must_use]
    pub fn new(server: ServerInfo, data_dir: impl Into<PathBuf>, transport: T, notifier: Notifier) -> Self {
        Self {
            transport,
            server,
            data_dir: data_dir.into(),
            tests: Vec::new(),
            pretest: None,
            posttest: None,
            stop_on_fail: false,
            notifier,
        }
    }

    #[must_use]
    pub fn with_tests(mut self, tests: Vec<TestFile>) -> Self {
        self.tests = tests;
        self
    }

    #[must_use]
    pub fn with_hooks(mut self, pretest: Option<TestFile>, posttest: Option<TestFile>) -> Self {
        self.pretest = pretest;
        self.posttest = posttest;
        self
    }

    #[must_use]
    pub const fn with_stop_on_fail(mut self, stop_on_fail: bool) -> Self {
        self.stop_on_fail = stop_on_fail;
        self
    }

    #[must_use]
    pub const fn server(&self) -> &ServerInfo {
        &self.server
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn tests(&self) -> &[TestFile] {
        &self.tests
    }

    /// ## Summary
    /// Reads the server info, every test file and the hook files named in
    /// `config`.
    ///
    /// With `config.all` set, files marked `ignore-all` are left out.
    ///
    /// ## Side Effects
    /// Notifies `trace` and one `load` per test file.
    ///
    /// ## Errors
    /// Inconsistent settings or any unreadable or malformed file abort
    /// loading.
    #[tracing::instrument(skip_all)]
    pub fn load(config: &RunConfig, transport: T, mut notifier: Notifier) -> RunnerResult<Self> {
        config.validate()?;
        let server_path = config.data_path(&config.server_info);
        notifier.trace(format!("Reading Server Info from \"{}\"", server_path.display()));
        let server = load_server_info(&server_path, config.ssl)?;

        let total = config.tests.len();
        let mut tests = Vec::with_capacity(total);
        for (index, path) in config.tests.iter().enumerate() {
            notifier.notify(&Notification::Load {
                name: Some(path.display().to_string()),
                current: index + 1,
                total,
            });
            let file = load_test_file(&config.data_path(path), &path.display().to_string())?;
            if config.all && file.ignore_all {
                tracing::info!(file = %file.name, "Skipping ignore-all test file");
                continue;
            }
            tests.push(file);
        }

        let load_hook = |path: &Option<PathBuf>| -> RunnerResult<Option<TestFile>> {
            path.as_deref()
                .map(|p: &Path| load_test_file(&config.data_path(p), &p.display().to_string()))
                .transpose()
        };
        let pretest = load_hook(&config.pretest)?;
        let posttest = load_hook(&config.posttest)?;

        notifier.notify(&Notification::Load {
            name: None,
            current: total + 1,
            total,
        });

        Ok(Self::new(server, config.data_dir.clone(), transport, notifier)
            .with_tests(tests)
            .with_hooks(pretest, posttest)
            .with_stop_on_fail(config.stop_on_fail))
    }

    /// ## Summary
    /// Runs every test file in order, wrapping each in the pretest and
    /// posttest hooks.
    ///
    /// A hook with any failed or errored node aborts the rest of the run.
    /// With stop-on-fail, the first test file with a failure ends the run.
    ///
    /// ## Side Effects
    /// Notifies `start`, `testProgress`, every file/suite/result event and
    /// `finish`.
    #[tracing::instrument(skip_all, fields(files = self.tests.len()))]
    pub async fn run_all(&mut self) -> RunSummary {
        let Self {
            transport,
            server,
            data_dir,
            tests,
            pretest,
            posttest,
            stop_on_fail,
            notifier,
        } = self;

        notifier.notify(&Notification::Start);

        let mut ctx = RunContext {
            transport: &*transport,
            server,
            data_dir: data_dir.as_path(),
            notifier,
        };
        let mut totals = ResultCounters::default();
        let mut abort = None;

        let count = tests.len();
        for (index, test) in tests.iter().enumerate() {
            if count > 1 {
                ctx.notifier.notify(&Notification::TestProgress {
                    count: index + 1,
                    total: count,
                });
            }

            if let Some(hook) = pretest.as_ref() {
                let result = hook.run(&mut ctx).await;
                totals += result;
                if result.has_failures() {
                    tracing::error!(file = %hook.name, "Pretest failed, aborting run");
                    abort = Some(RunAbort::HookFailed {
                        hook: Hook::Pretest,
                        file: hook.name.clone(),
                    });
                    break;
                }
            }

            let result = test.run(&mut ctx).await;
            totals += result;
            if result.has_failures() && *stop_on_fail {
                tracing::warn!(file = %test.name, "Stopping after failure");
                abort = Some(RunAbort::StopOnFail {
                    file: test.name.clone(),
                });
                break;
            }

            if let Some(hook) = posttest.as_ref() {
                let result = hook.run(&mut ctx).await;
                totals += result;
                if result.has_failures() {
                    tracing::error!(file = %hook.name, "Posttest failed, aborting run");
                    abort = Some(RunAbort::HookFailed {
                        hook: Hook::Posttest,
                        file: hook.name.clone(),
                    });
                    break;
                }
            }
        }

        ctx.notifier.notify(&Notification::Finish { totals });
        RunSummary { totals, abort }
    }
}
