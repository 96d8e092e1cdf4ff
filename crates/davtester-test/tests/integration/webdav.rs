//! Collections and `xmlDataMatch` against multistatus responses.

use davtester_test::component::types::ResultKind;
use davtester_test::fake_dav::FakeDav;

use super::helpers::*;

const SETUP: &str = r#"
    <test name="mkcol">
      <request user="$userid1:" pswd="$pswd1:">
        <method>MKCOL</method>
        <ruri>$calendarpath1:</ruri>
        <verify><callback>statusCode</callback><arg><name>status</name><value>201</value></arg></verify>
      </request>
    </test>
    <test name="put">
      <request user="$userid1:" pswd="$pswd1:">
        <method>PUT</method>
        <ruri>$calendarpath1:/1.ics</ruri>
        <data><content-type>text/calendar</content-type><filepath>Resource/event.ics</filepath></data>
        <verify><callback>statusCode</callback></verify>
      </request>
    </test>"#;

const PROPFIND: &str = r#"
    <test name="propfind">
      <request user="$userid1:" pswd="$pswd1:">
        <method>PROPFIND</method>
        <ruri>$calendarpath1:</ruri>
        <header><name>Depth</name><value>1</value></header>
        <verify>
          <callback>xmlDataMatch</callback>
          <arg><name>filepath</name><value>Resource/listing.xml</value></arg>
        </verify>
      </request>
    </test>"#;

/// Same document the server produces, in a different prefix and layout,
/// with an entity tag the default filter removes.
const LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<multistatus xmlns="DAV:">
  <response>
    <href>$calendarpath1:</href>
    <propstat>
      <prop><resourcetype><collection/></resourcetype></prop>
      <status>HTTP/1.1 200 OK</status>
    </propstat>
  </response>
  <response>
    <href>$calendarpath1:/1.ics</href>
    <propstat>
      <prop>
        <resourcetype/>
        <getetag>"anything"</getetag>
      </prop>
      <status>HTTP/1.1 200 OK</status>
    </propstat>
  </response>
</multistatus>
"#;

fn fixture(listing: &str) -> Fixture {
    let fixture = Fixture::new();
    fixture
        .write("Resource/event.ics", "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n")
        .write("Resource/listing.xml", listing)
        .write("propfind.xml", &single_suite("propfind", &format!("{SETUP}{PROPFIND}")));
    fixture
}

#[test_log::test(tokio::test)]
async fn multistatus_matches_equivalent_document() {
    let fixture = fixture(LISTING);
    let dav = FakeDav::new();

    let (summary, recorder) = run(&dav, &fixture.config(&["propfind.xml"])).await;

    assert!(summary.succeeded(), "{:?}", recorder.results());
    assert_eq!(summary.totals.ok, 3);
}

#[test_log::test(tokio::test)]
async fn multistatus_difference_is_reported() {
    let missing_member = LISTING.replace("/1.ics", "/2.ics");
    let fixture = fixture(&missing_member);
    let dav = FakeDav::new();

    let (summary, recorder) = run(&dav, &fixture.config(&["propfind.xml"])).await;

    assert_eq!(summary.totals.failed, 1);
    let (_, result, details) = recorder.results().pop().expect("propfind result");
    assert_eq!(result, ResultKind::Failed);
    assert!(details.starts_with("        Response data does not exactly match file data"));
    assert!(details.contains("/calendars/user01/calendar/2.ics"), "{details}");
}

#[test_log::test(tokio::test)]
async fn wrong_status_skips_body_comparison() {
    let fixture = Fixture::new();
    let tests = r#"
    <test name="missing collection">
      <request user="$userid1:" pswd="$pswd1:">
        <method>PROPFIND</method>
        <ruri>/nowhere</ruri>
        <verify>
          <callback>xmlDataMatch</callback>
          <arg><name>filepath</name><value>Resource/absent.xml</value></arg>
        </verify>
      </request>
    </test>"#;
    fixture.write("missing.xml", &single_suite("missing", tests));
    let dav = FakeDav::new();

    let (summary, recorder) = run(&dav, &fixture.config(&["missing.xml"])).await;

    assert_eq!(summary.totals.failed, 1);
    assert_eq!(recorder.results()[0].2, "        HTTP Status Code Wrong: 404");
}
