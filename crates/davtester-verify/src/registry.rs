//! Verifier lookup by callback name.

use crate::error::{VerifyError, VerifyOutcome};
use crate::ical_match::CalendarDataMatch;
use crate::status::StatusCode;
use crate::verifier::Verifier;
use crate::xml_match::XmlDataMatch;

/// Callback names accepted in a `verify` element.
pub const CALLBACKS: [&str; 3] = ["statusCode", "xmlDataMatch", "calendarDataMatch"];

/// Resolves a callback name to its verifier.
///
/// ## Errors
/// Returns [`VerifyError::UnknownCallback`] for an unregistered name.
pub fn lookup(callback: &str) -> VerifyOutcome<&'static dyn Verifier> {
    match callback {
        "statusCode" => Ok(&StatusCode),
        "xmlDataMatch" => Ok(&XmlDataMatch),
        "calendarDataMatch" => Ok(&CalendarDataMatch),
        other => Err(VerifyError::UnknownCallback(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_callback_resolves() {
        for name in CALLBACKS {
            assert!(lookup(name).is_ok(), "{name} should resolve");
        }
        assert!(matches!(lookup("dataString"), Err(VerifyError::UnknownCallback(n)) if n == "dataString"));
    }
}
