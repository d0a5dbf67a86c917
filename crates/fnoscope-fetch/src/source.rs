//! The fetch collaborators the selector and decoder are fed from.

use std::time::Duration;

use async_trait::async_trait;
use fnoscope_types::{DateRange, FnoError, Interval, Segment};
use thiserror::Error;

/// Errors a [`MarketDataSource`] can report.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// The request did not complete within its deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The source could not produce data for another reason.
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

impl From<FetchError> for FnoError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Timeout(after) => Self::Timeout(after),
            other => Self::Http(other.to_string()),
        }
    }
}

/// Parameters of one historical bar request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarRequest {
    /// Numeric instrument identifier.
    pub instrument_id: u64,
    /// Exchange segment the instrument trades on.
    pub segment: Segment,
    /// Inclusive date range.
    pub range: DateRange,
    /// Bar interval.
    pub interval: Interval,
}

impl BarRequest {
    /// Creates a new bar request.
    #[must_use]
    pub const fn new(
        instrument_id: u64,
        segment: Segment,
        range: DateRange,
        interval: Interval,
    ) -> Self {
        Self {
            instrument_id,
            segment,
            range,
            interval,
        }
    }
}

/// Raw-text access to the market-data API.
///
/// Implementations return response bodies untouched; all field extraction is
/// done by the selector and the bar decoder.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches the full instrument master.
    async fn fetch_instrument_master(&self) -> Result<String, FetchError>;

    /// Fetches the encoded bar series for one instrument.
    async fn fetch_bars(&self, request: &BarRequest) -> Result<String, FetchError>;
}
