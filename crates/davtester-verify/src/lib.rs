//! Response verification.
//!
//! A [`verifier::Verifier`] judges one HTTP response and returns a
//! [`verifier::VerifyResult`]. File-backed comparators share the
//! status → filter → compare pipeline in [`verifier::run_file_data_match`].

pub mod diff;
pub mod error;
pub mod filter;
pub mod ical_match;
pub mod registry;
pub mod status;
pub mod verifier;
pub mod xml_match;
