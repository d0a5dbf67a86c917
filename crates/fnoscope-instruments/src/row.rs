//! Positional parsing of instrument-master rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use fnoscope_types::InstrumentRecord;
use thiserror::Error;

/// Minimum number of pipe-delimited fields for a row to be considered.
pub const MIN_FIELDS: usize = 10;

/// Field positions in a master row.
mod field {
    pub(super) const INSTRUMENT_ID: usize = 1;
    pub(super) const TYPE_CODE: usize = 2;
    pub(super) const TRADING_SYMBOL: usize = 3;
    pub(super) const DESCRIPTION: usize = 4;
    pub(super) const SERIES: usize = 5;
    pub(super) const UNDERLYING: usize = 15;
    pub(super) const EXPIRY: usize = 16;
}

/// Date-time layouts seen in the expiry column, tried in order.
const EXPIRY_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%d-%b-%Y %H:%M:%S",
];

/// Date-only layouts seen in the expiry column.
const EXPIRY_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%d %b %Y", "%d%b%Y"];

/// Reasons a master row is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// Truncated or otherwise short row.
    #[error("row has {0} fields, expected at least {MIN_FIELDS}")]
    TooFewFields(usize),

    /// Instrument id column is not an integer.
    #[error("invalid instrument id '{0}'")]
    InvalidId(String),

    /// Expiry column is absent or blank.
    #[error("missing expiry")]
    MissingExpiry,

    /// Expiry column could not be parsed as a date-time.
    #[error("invalid expiry '{0}'")]
    InvalidExpiry(String),
}

/// A master row split into its fields, borrowed from the blob.
///
/// Columns past the end of a short-but-acceptable row read as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterRow<'a> {
    /// Raw instrument id column.
    pub instrument_id: &'a str,
    /// Instrument-type code column.
    pub type_code: &'a str,
    /// Trading symbol column.
    pub trading_symbol: &'a str,
    /// Description column.
    pub description: &'a str,
    /// Series code column.
    pub series: &'a str,
    /// Underlying column, possibly blank.
    pub underlying: &'a str,
    /// Raw expiry column.
    pub expiry: &'a str,
}

impl<'a> MasterRow<'a> {
    /// Splits a row at the pipe delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::TooFewFields`] for rows with fewer than
    /// [`MIN_FIELDS`] fields.
    pub fn split(line: &'a str) -> Result<Self, RowError> {
        let fields: Vec<&'a str> = line.split('|').collect();
        if fields.len() < MIN_FIELDS {
            return Err(RowError::TooFewFields(fields.len()));
        }

        let at = |index: usize| fields.get(index).copied().map_or("", str::trim);
        Ok(Self {
            instrument_id: at(field::INSTRUMENT_ID),
            type_code: at(field::TYPE_CODE),
            trading_symbol: at(field::TRADING_SYMBOL),
            description: at(field::DESCRIPTION),
            series: at(field::SERIES),
            underlying: at(field::UNDERLYING),
            expiry: at(field::EXPIRY),
        })
    }

    /// Returns the underlying column, or the trading symbol when it is blank.
    #[must_use]
    pub const fn matching_key(&self) -> &'a str {
        if self.underlying.is_empty() {
            self.trading_symbol
        } else {
            self.underlying
        }
    }

    /// Parses the numeric id and expiry into an [`InstrumentRecord`].
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not an integer or the expiry is blank or
    /// unparseable.
    pub fn to_record(&self) -> Result<InstrumentRecord, RowError> {
        let instrument_id = self
            .instrument_id
            .parse::<u64>()
            .map_err(|_| RowError::InvalidId(self.instrument_id.to_string()))?;

        if self.expiry.is_empty() {
            return Err(RowError::MissingExpiry);
        }
        let expiry = parse_expiry(self.expiry)
            .ok_or_else(|| RowError::InvalidExpiry(self.expiry.to_string()))?;

        Ok(InstrumentRecord {
            instrument_id,
            type_code: self.type_code.to_string(),
            trading_symbol: self.trading_symbol.to_string(),
            description: self.description.to_string(),
            series: self.series.to_string(),
            underlying: self.underlying.to_string(),
            expiry,
        })
    }
}

/// Parses an expiry column into a local date-time.
///
/// Accepts the ISO-like `2026-02-24T14:30:00` layout (with optional fractional
/// seconds or a space separator), RFC 3339 with an offset, and a few date-only
/// layouts, which resolve to midnight. Offsets are dropped: the wall-clock
/// value is kept as exchange-local time.
#[must_use]
pub fn parse_expiry(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Some(parsed) = EXPIRY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(parsed);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }

    EXPIRY_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}
