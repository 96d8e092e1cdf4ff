//! Calendar object round trips through `calendarDataMatch`.

use davtester_test::component::types::ResultKind;
use davtester_test::fake_dav::FakeDav;

use super::helpers::*;

const EVENT: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//davtester//EN\r
BEGIN:VEVENT\r
UID:$uid1:\r
DTSTART:20260101T100000Z\r
DURATION:PT1H\r
DTSTAMP:20260101T000000Z\r
SUMMARY:Meeting\r
ATTENDEE;CN=User 01;EMAIL=user01@example.com:mailto:user01@example.com\r
END:VEVENT\r
END:VCALENDAR\r
";

const LIFECYCLE: &str = r#"
    <test name="create">
      <request user="$userid1:" pswd="$pswd1:">
        <method>PUT</method>
        <ruri>$calendarpath1:/1.ics</ruri>
        <header><name>If-None-Match</name><value>*</value></header>
        <data>
          <content-type>text/calendar; charset=utf-8</content-type>
          <filepath>Resource/event.ics</filepath>
        </data>
        <verify><callback>statusCode</callback><arg><name>status</name><value>201</value></arg></verify>
      </request>
    </test>
    <test name="read back">
      <request user="$userid1:" pswd="$pswd1:">
        <method>GET</method>
        <ruri>$calendarpath1:/1.ics</ruri>
        <verify>
          <callback>calendarDataMatch</callback>
          <arg><name>filepath</name><value>Resource/event.ics</value></arg>
        </verify>
      </request>
    </test>
    <test name="update with etag">
      <request user="$userid1:" pswd="$pswd1:" if-match="yes">
        <method>PUT</method>
        <ruri>$calendarpath1:/1.ics</ruri>
        <data>
          <content-type>text/calendar; charset=utf-8</content-type>
          <filepath>Resource/event.ics</filepath>
        </data>
        <verify><callback>statusCode</callback></verify>
      </request>
    </test>
    <test name="delete">
      <request user="$userid1:" pswd="$pswd1:">
        <method>DELETE</method>
        <ruri>$calendarpath1:/1.ics</ruri>
        <verify><callback>statusCode</callback><arg><name>status</name><value>204</value></arg></verify>
      </request>
      <request user="$userid1:" pswd="$pswd1:">
        <method>GET</method>
        <ruri>$calendarpath1:/1.ics</ruri>
        <verify><callback>statusCode</callback><arg><name>status</name><value>404</value></arg></verify>
      </request>
    </test>"#;

#[test_log::test(tokio::test)]
async fn calendar_object_lifecycle_passes() {
    let fixture = Fixture::new();
    fixture
        .write("Resource/event.ics", EVENT)
        .write("put.xml", &single_suite("lifecycle", LIFECYCLE));
    let dav = FakeDav::new();

    let (summary, recorder) = run(&dav, &fixture.config(&["put.xml"])).await;

    assert!(summary.succeeded(), "{:?}", recorder.results());
    assert_eq!(summary.totals.ok, 4);

    let update = dav
        .requests()
        .into_iter()
        .filter(|r| r.method == "PUT")
        .nth(1)
        .expect("second PUT sent");
    assert_eq!(update.path, "/calendars/user01/calendar/1.ics");
    assert!(update.authorized);
    assert!(!dav.contains("/calendars/user01/calendar/1.ics"));
}

#[test_log::test(tokio::test)]
async fn request_bodies_are_substituted() {
    let fixture = Fixture::new();
    let create = LIFECYCLE
        .split("</test>")
        .next()
        .map(|t| format!("{t}</test>"))
        .expect("first test");
    fixture
        .write("Resource/event.ics", EVENT)
        .write("put.xml", &single_suite("create", &create));
    let dav = FakeDav::new();

    let (summary, _) = run(&dav, &fixture.config(&["put.xml"])).await;

    assert!(summary.succeeded());
    let stored = dav
        .body("/calendars/user01/calendar/1.ics")
        .expect("resource stored");
    assert!(!stored.contains("$uid1:"));
    assert!(stored.contains("UID:"));
}

#[test_log::test(tokio::test)]
async fn calendar_mismatch_reports_a_diff() {
    let fixture = Fixture::new();
    let tests = r#"
    <test name="create">
      <request user="$userid1:" pswd="$pswd1:">
        <method>PUT</method>
        <ruri>$calendarpath1:/2.ics</ruri>
        <data><content-type>text/calendar</content-type><filepath>Resource/event.ics</filepath></data>
        <verify><callback>statusCode</callback></verify>
      </request>
    </test>
    <test name="compare">
      <request user="$userid1:" pswd="$pswd1:">
        <method>GET</method>
        <ruri>$calendarpath1:/2.ics</ruri>
        <verify>
          <callback>calendarDataMatch</callback>
          <arg><name>filepath</name><value>Resource/other.ics</value></arg>
        </verify>
      </request>
    </test>"#;
    fixture
        .write("Resource/event.ics", EVENT)
        .write("Resource/other.ics", &EVENT.replace("SUMMARY:Meeting", "SUMMARY:Standup"))
        .write("get.xml", &single_suite("mismatch", tests));
    let dav = FakeDav::new();

    let (summary, recorder) = run(&dav, &fixture.config(&["get.xml"])).await;

    assert_eq!((summary.totals.ok, summary.totals.failed), (1, 1));
    let (name, result, details) = &recorder.results()[1];
    assert_eq!(name, "compare");
    assert_eq!(*result, ResultKind::Failed);
    assert!(details.contains("--- Response"), "{details}");
    assert!(details.contains("-SUMMARY:Meeting"), "{details}");
    assert!(details.contains("+SUMMARY:Standup"), "{details}");
}

#[test_log::test(tokio::test)]
async fn filters_hide_server_changes() {
    let fixture = Fixture::new();
    let tests = r#"
    <test name="create">
      <request user="$userid1:" pswd="$pswd1:">
        <method>PUT</method>
        <ruri>$calendarpath1:/3.ics</ruri>
        <data><content-type>text/calendar</content-type><filepath>Resource/event.ics</filepath></data>
        <verify><callback>statusCode</callback></verify>
      </request>
    </test>
    <test name="compare ignoring summary">
      <request user="$userid1:" pswd="$pswd1:">
        <method>GET</method>
        <ruri>$calendarpath1:/3.ics</ruri>
        <verify>
          <callback>calendarDataMatch</callback>
          <arg><name>filepath</name><value>Resource/other.ics</value></arg>
          <arg><name>filter</name><value>SUMMARY</value></arg>
        </verify>
      </request>
    </test>"#;
    fixture
        .write("Resource/event.ics", EVENT)
        .write("Resource/other.ics", &EVENT.replace("SUMMARY:Meeting", "SUMMARY:Standup"))
        .write("get.xml", &single_suite("filtered", tests));
    let dav = FakeDav::new();

    let (summary, recorder) = run(&dav, &fixture.config(&["get.xml"])).await;

    assert!(summary.succeeded(), "{:?}", recorder.results());
}

#[test_log::test(tokio::test)]
async fn unauthenticated_request_is_rejected() {
    let fixture = Fixture::new();
    let tests = r#"
    <test name="anonymous">
      <request user="$userid1:" pswd="$pswd1:" auth="no">
        <method>GET</method>
        <ruri>$calendarpath1:/1.ics</ruri>
        <verify><callback>statusCode</callback><arg><name>status</name><value>401</value></arg></verify>
      </request>
    </test>"#;
    fixture.write("auth.xml", &single_suite("auth", tests));
    let dav = FakeDav::new();

    let (summary, _) = run(&dav, &fixture.config(&["auth.xml"])).await;

    assert_eq!(summary.totals.ok, 1);
    assert!(dav.requests().is_empty());
}
