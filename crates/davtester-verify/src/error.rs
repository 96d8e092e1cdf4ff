use thiserror::Error;

/// Faults raised while setting up a verification.
///
/// These are internal errors, not verdicts: a response that fails to match
/// is reported through [`crate::verifier::VerifyResult`] instead.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Unknown verifier callback: {0}")]
    UnknownCallback(String),

    #[error("Invalid filter directive: {0:?}")]
    InvalidFilter(String),

    #[error("Missing verifier argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid verifier argument {name}: {value}")]
    InvalidArgument { name: &'static str, value: String },

    #[error(transparent)]
    RfcError(#[from] davtester_rfc::error::RfcError),
}

/// Result alias for verification setup.
pub type VerifyOutcome<T> = std::result::Result<T, VerifyError>;
