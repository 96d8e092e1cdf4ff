use thiserror::Error;

/// Errors in the shared run vocabulary.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing setting {0}")]
    MissingSetting(&'static str),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
