//! Error types for cave-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaveError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Invalid report entry {index}: {reason}")]
    Parse { index: usize, reason: String },

    #[error("Invalid report: {0}")]
    InvalidReport(String),

    #[error("Cannot determine last closing time: no reliable closed report")]
    NoReliableClosure,

    #[error("Forecast error: {0}")]
    Forecast(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

impl CaveError {
    /// Whether this is the "not enough data" outcome rather than a hard failure.
    ///
    /// A cycle that ends this way is expected; callers show "cannot predict"
    /// and may simply try again after the next fetch.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, CaveError::NoReliableClosure)
    }
}

pub type Result<T> = std::result::Result<T, CaveError>;
