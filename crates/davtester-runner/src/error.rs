use std::path::PathBuf;

use thiserror::Error;

/// Fatal runner errors. Any of these stops the run before suites execute.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Invalid Config File {path}: {reason}")]
    InvalidConfigFile { path: PathBuf, reason: String },

    #[error("Unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Observer setup failed: {0}")]
    Observer(String),

    #[error(transparent)]
    TransportError(#[from] crate::transport::TransportError),

    #[error(transparent)]
    VerifyError(#[from] davtester_verify::error::VerifyError),

    #[error(transparent)]
    RfcError(#[from] davtester_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] davtester_core::error::CoreError),
}

impl RunnerError {
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InvalidConfigFile {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type RunnerResult<T> = std::result::Result<T, RunnerError>;
