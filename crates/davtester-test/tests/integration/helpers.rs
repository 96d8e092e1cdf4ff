#![allow(dead_code, clippy::expect_used)]
//! Fixture and run helpers for integration tests.
//!
//! Each [`Fixture`] owns a fresh data directory under the system temp dir,
//! holding the server info, test files and resources for one run. The
//! directory is removed when the fixture is dropped.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use davtester_test::component::config::{ObserverKind, RunConfig};
use davtester_test::component::runner::manager::{Manager, RunSummary};
use davtester_test::component::runner::observer::{Notification, Notifier, Observer};
use davtester_test::component::types::ResultKind;
use davtester_test::fake_dav::FakeDav;
use davtester_test::salvo_transport::SalvoTransport;

pub use davtester_test::component::types::ResultCounters;

pub const USER: &str = "user01";
pub const PASSWORD: &str = "pass01";

/// Server info pointing at the in-process server, with one calendar home.
pub const SERVERINFO: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<serverinfo>
  <host>127.0.0.1</host>
  <nonsslport>5800</nonsslport>
  <sslport>8443</sslport>
  <features>
    <feature>caldav</feature>
    <feature>EMAIL parameter</feature>
  </features>
  <xmldatafilter>{DAV:}getetag</xmldatafilter>
  <substitutions>
    <substitution><key>$root:</key><value>/calendars/</value></substitution>
    <repeat count="1">
      <substitution><key>$userid%d:</key><value>user%02d</value></substitution>
      <substitution><key>$pswd%d:</key><value>pass%02d</value></substitution>
      <substitution><key>$calendarpath%d:</key><value>$root:user%02d/calendar</value></substitution>
    </repeat>
  </substitutions>
</serverinfo>"#;

pub struct Fixture {
    pub dir: PathBuf,
}

impl Fixture {
    #[must_use]
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("davtester-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create fixture dir");
        let fixture = Self { dir };
        fixture.write("serverinfo.xml", SERVERINFO);
        fixture
    }

    /// Writes `content` at `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture subdir");
        }
        std::fs::write(path, content).expect("write fixture file");
        self
    }

    #[must_use]
    pub fn config(&self, tests: &[&str]) -> RunConfig {
        RunConfig {
            server_info: PathBuf::from("serverinfo.xml"),
            tests: tests.iter().map(PathBuf::from).collect(),
            data_dir: self.dir.clone(),
            pretest: None,
            posttest: None,
            stop_on_fail: false,
            all: false,
            ssl: false,
            observers: vec![ObserverKind::Logging],
            json_output: None,
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

/// Wraps `body` in a `caldavtest` document with one suite.
#[must_use]
pub fn single_suite(suite: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" standalone="no"?>
<caldavtest>
  <require-feature><feature>caldav</feature></require-feature>
  <test-suite name="{suite}">
{body}
  </test-suite>
</caldavtest>"#
    )
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Notification>>>);

impl Observer for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn process(&mut self, notification: &Notification) -> anyhow::Result<()> {
        self.0.lock().expect("recorder lock").push(notification.clone());
        Ok(())
    }
}

impl Recorder {
    #[must_use]
    pub fn all(&self) -> Vec<Notification> {
        self.0.lock().expect("recorder lock").clone()
    }

    /// `(test name, result, details)` for every reported test.
    #[must_use]
    pub fn results(&self) -> Vec<(String, ResultKind, String)> {
        self.all()
            .into_iter()
            .filter_map(|n| match n {
                Notification::TestResult {
                    name,
                    result,
                    details,
                    ..
                } => Some((name, result, details)),
                _ => None,
            })
            .collect()
    }
}

/// Loads `config` and runs it against `dav`, which demands the fixture
/// user's credentials.
pub async fn run(dav: &FakeDav, config: &RunConfig) -> (RunSummary, Recorder) {
    let recorder = Recorder::default();
    let mut notifier = Notifier::from_kinds(&config.observers, config.json_output.as_deref())
        .expect("observers should build");
    notifier.register(recorder.clone());

    let transport = SalvoTransport::new(dav.service(Some((USER, PASSWORD))));
    let mut manager = Manager::load(config, transport, notifier).expect("run should load");
    let summary = manager.run_all().await;
    (summary, recorder)
}
