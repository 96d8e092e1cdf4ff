//! Pretest/posttest hooks and stop-on-fail across several test files.

use std::path::PathBuf;

use davtester_test::component::runner::manager::{Hook, RunAbort};
use davtester_test::fake_dav::FakeDav;

use super::helpers::*;

fn request(method: &str, ruri: &str, status: &str) -> String {
    format!(
        r#"
    <test name="{method} {ruri}">
      <request user="$userid1:" pswd="$pswd1:">
        <method>{method}</method>
        <ruri>{ruri}</ruri>
        <verify><callback>statusCode</callback><arg><name>status</name><value>{status}</value></arg></verify>
      </request>
    </test>"#
    )
}

fn put(ruri: &str, status: &str) -> String {
    format!(
        r#"
    <test name="PUT {ruri}">
      <request user="$userid1:" pswd="$pswd1:">
        <method>PUT</method>
        <ruri>{ruri}</ruri>
        <header><name>If-None-Match</name><value>*</value></header>
        <data><content-type>text/plain</content-type><filepath>Resource/body.txt</filepath></data>
        <verify><callback>statusCode</callback><arg><name>status</name><value>{status}</value></arg></verify>
      </request>
    </test>"#
    )
}

fn fixture() -> Fixture {
    let fixture = Fixture::new();
    fixture
        .write("Resource/body.txt", "hello")
        .write("pretest.xml", &single_suite("setup", &request("MKCOL", "$calendarpath1:", "201")))
        .write("posttest.xml", &single_suite("teardown", &request("DELETE", "$calendarpath1:", "204")))
        .write("one.xml", &single_suite("one", &put("$calendarpath1:/a.txt", "201")))
        .write("two.xml", &single_suite("two", &put("$calendarpath1:/a.txt", "201")));
    fixture
}

#[test_log::test(tokio::test)]
async fn hooks_reset_state_between_files() {
    let fixture = fixture();
    let mut config = fixture.config(&["one.xml", "two.xml"]);
    config.pretest = Some(PathBuf::from("pretest.xml"));
    config.posttest = Some(PathBuf::from("posttest.xml"));
    let dav = FakeDav::new();

    let (summary, recorder) = run(&dav, &config).await;

    assert!(summary.succeeded(), "{:?}", recorder.results());
    assert_eq!(summary.totals.ok, 6);
    let methods: Vec<String> = dav.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, ["MKCOL", "PUT", "DELETE", "MKCOL", "PUT", "DELETE"]);
}

#[test_log::test(tokio::test)]
async fn without_teardown_the_second_file_fails() {
    let fixture = fixture();
    let dav = FakeDav::new();

    let (summary, _) = run(&dav, &fixture.config(&["one.xml", "two.xml"])).await;

    assert_eq!((summary.totals.ok, summary.totals.failed), (1, 1));
    assert_eq!(summary.abort, None);
    assert!(!summary.succeeded());
}

#[test_log::test(tokio::test)]
async fn stop_on_fail_skips_remaining_files() {
    let fixture = fixture();
    fixture.write("three.xml", &single_suite("three", &request("GET", "/anything", "404")));
    let mut config = fixture.config(&["one.xml", "two.xml", "three.xml"]);
    config.stop_on_fail = true;
    let dav = FakeDav::new();

    let (summary, _) = run(&dav, &config).await;

    assert_eq!(
        summary.abort,
        Some(RunAbort::StopOnFail {
            file: "two.xml".to_string()
        })
    );
    assert_eq!(summary.totals.total(), 2);
    assert_eq!(dav.requests().len(), 2);
}

#[test_log::test(tokio::test)]
async fn failing_pretest_aborts_before_any_test() {
    let fixture = fixture();
    fixture.write("pretest.xml", &single_suite("setup", &request("MKCOL", "$calendarpath1:", "207")));
    let mut config = fixture.config(&["one.xml", "two.xml"]);
    config.pretest = Some(PathBuf::from("pretest.xml"));
    let dav = FakeDav::new();

    let (summary, _) = run(&dav, &config).await;

    assert_eq!(
        summary.abort,
        Some(RunAbort::HookFailed {
            hook: Hook::Pretest,
            file: "pretest.xml".to_string()
        })
    );
    assert_eq!(summary.totals, ResultCounters {
        failed: 1,
        ..ResultCounters::default()
    });
    assert_eq!(dav.requests().len(), 1);
}

#[test_log::test(tokio::test)]
async fn failing_posttest_aborts_before_the_next_file() {
    let fixture = fixture();
    let mut config = fixture.config(&["one.xml", "two.xml"]);
    config.posttest = Some(PathBuf::from("posttest.xml"));
    let dav = FakeDav::new();

    let (summary, _) = run(&dav, &config).await;

    assert_eq!(
        summary.abort,
        Some(RunAbort::HookFailed {
            hook: Hook::Posttest,
            file: "posttest.xml".to_string()
        })
    );
    assert_eq!((summary.totals.ok, summary.totals.failed), (1, 1));
    let sent: Vec<(String, String)> = dav.requests().into_iter().map(|r| (r.method, r.path)).collect();
    assert_eq!(
        sent,
        [
            ("PUT".to_string(), "/calendars/user01/calendar/a.txt".to_string()),
            ("DELETE".to_string(), "/calendars/user01/calendar".to_string()),
        ]
    );
}
