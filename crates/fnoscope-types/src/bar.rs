//! Bar data representation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One fixed-interval price summary as delivered by the historical data API.
///
/// Prices are kept as [`Decimal`] so repeated arithmetic over a series does
/// not drift the way binary floating point would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarRecord {
    /// Bar open time in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Opening price.
    pub open: Decimal,
    /// Highest price during the interval.
    pub high: Decimal,
    /// Lowest price during the interval.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: u64,
    /// Open interest at the close of the interval. Zero for equities.
    pub open_interest: u64,
}

impl BarRecord {
    /// Number of positional fields in one encoded bar.
    pub const FIELD_COUNT: usize = 7;

    /// Creates a new bar.
    #[must_use]
    pub const fn new(
        timestamp: i64,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
        open_interest: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            open_interest,
        }
    }

    /// Returns the bar open time as a UTC date-time.
    ///
    /// Returns `None` if the timestamp is outside chrono's representable range.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    /// Returns true if this is a bullish (green) bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if this is a bearish (red) bar.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Returns the typical price ((high + low + close) / 3).
    #[must_use]
    pub fn typical_price(&self) -> Decimal {
        (self.high + self.low + self.close) / Decimal::from(3)
    }
}
