//! Date range and epoch-second request bounds.

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::DateRangeError;

/// IST offset from UTC in seconds (+05:30).
const MARKET_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Returns the exchange's local offset (IST).
///
/// Expiries in the instrument master and session boundaries are expressed in
/// this offset.
#[must_use]
pub fn market_offset() -> FixedOffset {
    FixedOffset::east_opt(MARKET_OFFSET_SECS).expect("IST offset is less than a day")
}

/// A range of dates for historical bar retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns the first second of the start date in market time, as epoch seconds.
    #[must_use]
    pub fn start_timestamp(&self) -> i64 {
        local_epoch(self.start, NaiveTime::MIN)
    }

    /// Returns the last second of the end date in market time, as epoch seconds.
    #[must_use]
    pub fn end_timestamp(&self) -> i64 {
        let last = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        local_epoch(self.end, last)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Converts a market-local date and time to epoch seconds.
fn local_epoch(date: NaiveDate, time: NaiveTime) -> i64 {
    let naive = date.and_time(time);
    market_offset()
        .from_local_datetime(&naive)
        .single()
        .map_or_else(|| naive.and_utc().timestamp(), |dt| dt.timestamp())
}
