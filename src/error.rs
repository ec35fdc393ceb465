//! Error types for glucotrend

use thiserror::Error;

/// Errors that can occur during trends computation
#[derive(Debug, Error)]
pub enum TrendsError {
    #[error("ms_per24 out of range: {0} (expected a millisecond offset within one 24-hour day)")]
    MsPer24OutOfRange(i64),

    #[error("Invalid bin size: {0} (must be positive and divide 86400000 evenly)")]
    InvalidBinSize(i64),

    #[error("Invalid blood glucose value: {0} (must be positive and finite)")]
    InvalidBgValue(f64),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse reading: {0}")]
    ParseError(String),
}
