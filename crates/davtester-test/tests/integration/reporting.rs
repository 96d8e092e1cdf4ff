//! Observer output and file-level selection.

use davtester_test::component::config::ObserverKind;
use davtester_test::component::runner::observer::Notification;
use davtester_test::component::types::ResultKind;
use davtester_test::fake_dav::FakeDav;

use super::helpers::*;

const PASSING: &str = r#"
    <test name="absent">
      <request user="$userid1:" pswd="$pswd1:">
        <method>GET</method>
        <ruri>/absent</ruri>
        <verify><callback>statusCode</callback><arg><name>status</name><value>404</value></arg></verify>
      </request>
    </test>
    <test name="skipped" ignore="yes">
      <request><method>GET</method><ruri>/absent</ruri></request>
    </test>"#;

#[test_log::test(tokio::test)]
async fn json_report_mirrors_the_run() {
    let fixture = Fixture::new();
    fixture.write("get.xml", &single_suite("GET", PASSING));
    let report = fixture.dir.join("report.json");
    let mut config = fixture.config(&["get.xml"]);
    config.observers = vec![ObserverKind::Logging, ObserverKind::Json];
    config.json_output = Some(report.clone());
    let dav = FakeDav::new();

    let (summary, _) = run(&dav, &config).await;

    assert_eq!((summary.totals.ok, summary.totals.ignored), (1, 1));
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).expect("report written"))
            .expect("report is JSON");
    assert_eq!(written["totals"]["ok"], 1);
    assert_eq!(written["totals"]["ignored"], 1);
    let tests = &written["files"][0]["suites"][0]["tests"];
    assert_eq!(tests[0]["name"], "absent");
    assert_eq!(tests[1]["result"], "ignored");
    assert!(written["finished"].is_string());
}

#[test_log::test(tokio::test)]
async fn notifications_follow_run_order() {
    let fixture = Fixture::new();
    fixture
        .write("a.xml", &single_suite("a", PASSING))
        .write("b.xml", &single_suite("b", PASSING));
    let dav = FakeDav::new();

    let (_, recorder) = run(&dav, &fixture.config(&["a.xml", "b.xml"])).await;

    let names: Vec<&str> = recorder
        .all()
        .iter()
        .map(Notification::name)
        .filter(|n| *n != "trace")
        .collect();
    assert_eq!(
        names,
        [
            "load", "load", "load", "start", "testProgress", "testFile", "testSuite", "testResult",
            "testResult", "testProgress", "testFile", "testSuite", "testResult", "testResult",
            "finish",
        ]
    );
}

#[test_log::test(tokio::test)]
async fn all_flag_leaves_out_ignore_all_files() {
    let fixture = Fixture::new();
    let ignored = single_suite("parked", PASSING).replace("<caldavtest>", r#"<caldavtest ignore-all="yes">"#);
    fixture
        .write("parked.xml", &ignored)
        .write("active.xml", &single_suite("active", PASSING));
    let mut config = fixture.config(&["parked.xml", "active.xml"]);
    config.all = true;
    let dav = FakeDav::new();

    let (summary, _) = run(&dav, &config).await;

    assert_eq!(summary.totals.total(), 2);
    assert_eq!(dav.requests().len(), 1);
}

#[test_log::test(tokio::test)]
async fn unsupported_file_is_ignored_whole() {
    let fixture = Fixture::new();
    let gated = single_suite("sched", PASSING).replace(
        "<feature>caldav</feature>",
        "<feature>caldav</feature><feature>auto-schedule</feature>",
    );
    fixture.write("sched.xml", &gated);
    let dav = FakeDav::new();

    let (summary, recorder) = run(&dav, &fixture.config(&["sched.xml"])).await;

    assert_eq!(summary.totals, ResultCounters::ignored(2));
    assert!(dav.requests().is_empty());
    assert!(recorder.all().iter().any(|n| matches!(
        n,
        Notification::TestFile { result: Some(ResultKind::Ignored), details, .. }
            if details == "    Missing features: auto-schedule"
    )));
}
