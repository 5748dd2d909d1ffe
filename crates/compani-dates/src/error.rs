//! Error types for compani-dates operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompaniError {
    /// Unparsable or wrong-shaped date input.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Bad duration input or malformed ISO 8601 duration literal.
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Bad interval input or inverted bounds.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// A unit name outside the vocabulary accepted by the operation.
    #[error("Invalid unit {0}")]
    InvalidUnit(String),

    /// An argument with the wrong shape (e.g. a list where a unit string is expected).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid argument : duration is zero")]
    ZeroStep,

    #[error("invalid argument : duration is negative")]
    NegativeStep,
}

impl CompaniError {
    pub(crate) fn wrong_date_arguments() -> Self {
        CompaniError::InvalidDate(WRONG_ARGUMENTS.to_string())
    }

    pub(crate) fn wrong_duration_arguments() -> Self {
        CompaniError::InvalidDuration(WRONG_ARGUMENTS.to_string())
    }

    pub(crate) fn wrong_interval_arguments() -> Self {
        CompaniError::InvalidInterval(WRONG_ARGUMENTS.to_string())
    }

    pub(crate) fn unparsable_duration(input: &str) -> Self {
        CompaniError::InvalidDuration(format!(
            "unparsable: {} can't be parsed as ISO 8601",
            input
        ))
    }
}

const WRONG_ARGUMENTS: &str = "wrong arguments";

pub type Result<T> = std::result::Result<T, CompaniError>;
