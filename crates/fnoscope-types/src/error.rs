//! Error types for fnoscope.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for fnoscope operations.
pub type Result<T> = std::result::Result<T, FnoError>;

/// Errors that can occur while discovering contracts and fetching bars.
///
/// Malformed master rows and bar segments are never reported here; the
/// selector and decoder skip them and carry on.
#[derive(Error, Debug)]
pub enum FnoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The collaborator did not answer within its deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Underlying not present in the registry.
    #[error("Unknown underlying: {0}")]
    UnknownUnderlying(String),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// The instrument master came back without any rows.
    #[error("Instrument master is empty")]
    EmptyMaster,
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },
}
