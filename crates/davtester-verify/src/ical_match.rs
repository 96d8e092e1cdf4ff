//! `calendarDataMatch`: iCalendar equivalence against a fixture file.

use davtester_core::attributes::KeyedAttributes;
use davtester_core::constants::{DTSTAMP_SENTINEL, FEATURE_EMAIL_PARAMETER};
use davtester_rfc::rfc::ical::build::to_lines;
use davtester_rfc::rfc::ical::core::{Component, ICalendar, Parameter, Property};
use davtester_rfc::rfc::ical::parse::{ParseResult, parse};

use crate::diff::unified_diff;
use crate::error::VerifyOutcome;
use crate::filter::FilterSet;
use crate::verifier::{
    FileDataMatch, ResponseView, Verifier, VerifyContext, VerifyResult, run_file_data_match,
};

/// Properties whose server-generated timestamp parameter is normalized.
const ATTENDEE_PROPERTIES: [&str; 2] = ["ATTENDEE", "X-CALENDARSERVER-ATTENDEE-COMMENT"];
const DTSTAMP_PARAMETER: &str = "X-CALENDARSERVER-DTSTAMP";

#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarDataMatch;

impl FileDataMatch for CalendarDataMatch {
    const DEFAULT_STATUS: &'static [u16] = &[200, 201, 207];

    fn default_filters(&self, ctx: &VerifyContext<'_>) -> Vec<String> {
        let mut filters = Vec::new();
        if !ctx.features.supports(FEATURE_EMAIL_PARAMETER) {
            filters.push("ATTENDEE:EMAIL".to_string());
            filters.push("ORGANIZER:EMAIL".to_string());
        }
        filters.extend(ctx.calendar_filters.iter().cloned());
        filters
    }

    fn compare(&self, response: &ResponseView<'_>, expected: &str, filters: &FilterSet) -> VerifyResult {
        let actual = match normalized_lines(response.body, filters) {
            Ok(lines) => lines,
            Err(e) => {
                return VerifyResult::failed(format!(
                    "        Response data is not calendar data: {e}"
                ));
            }
        };
        let expected = match normalized_lines(expected, filters) {
            Ok(lines) => lines,
            Err(e) => {
                return VerifyResult::failed(format!("        Data file is not calendar data: {e}"));
            }
        };

        let diff = unified_diff(&actual, &expected, "Response", "Expected");
        if diff.is_empty() {
            return VerifyResult::ok();
        }

        let mut result = VerifyResult::failed("        Response data does not exactly match file data");
        for line in diff {
            result.append(line);
        }
        result
    }
}

impl Verifier for CalendarDataMatch {
    fn verify(
        &self,
        ctx: &VerifyContext<'_>,
        response: &ResponseView<'_>,
        args: &KeyedAttributes,
    ) -> VerifyOutcome<VerifyResult> {
        if let Some(flag) = args.get("doTimezones") {
            tracing::debug!(flag, "doTimezones is informational; time zones are always removed");
        }
        run_file_data_match(self, ctx, response, args)
    }
}

/// Parses and normalizes a calendar, returning its canonical lines.
///
/// Attendee timestamps are pinned to a sentinel, `filters` are applied at
/// every level and VTIMEZONE components are removed.
///
/// ## Errors
/// Returns an error if `body` is not a single VCALENDAR object.
pub fn normalized_lines(body: &str, filters: &FilterSet) -> ParseResult<Vec<String>> {
    let mut calendar = parse(body)?;
    normalize(&mut calendar, filters);
    Ok(to_lines(&calendar))
}

fn normalize(calendar: &mut ICalendar, filters: &FilterSet) {
    calendar.root.walk_mut(&mut |component: &mut Component| {
        component.properties = std::mem::take(&mut component.properties)
            .into_iter()
            .map(pin_attendee_timestamp)
            .filter_map(|prop| filters.apply(prop))
            .collect();
    });
    calendar.remove_timezones();
}

fn pin_attendee_timestamp(mut prop: Property) -> Property {
    if ATTENDEE_PROPERTIES.contains(&prop.name.as_str()) && prop.param(DTSTAMP_PARAMETER).is_some() {
        prop.replace_param(Parameter::new(DTSTAMP_PARAMETER, DTSTAMP_SENTINEL));
    }
    prop
}
