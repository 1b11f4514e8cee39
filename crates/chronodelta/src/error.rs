//! Error types for chronodelta operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeltaError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invariant broken: {0}")]
    InvariantBroken(String),
}

pub type Result<T> = std::result::Result<T, DeltaError>;
