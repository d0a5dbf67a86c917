//! Decoding of the delimited bar-series encoding.
//!
//! The historical data API answers with bars packed into one string:
//!
//! ```text
//! <ts>|<open>|<high>|<low>|<close>|<volume>|<oi>|,<ts>|<open>|...
//! ```
//!
//! Bars are separated by commas and fields by pipes; each bar usually ends
//! with a pipe, leaving an empty eighth field.

use std::str::FromStr;

use fnoscope_types::BarRecord;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::trace;

/// Errors that can occur while decoding a single bar segment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The segment has fewer than seven fields.
    #[error("bar has {0} fields (expected at least {expected})", expected = BarRecord::FIELD_COUNT)]
    TooFewFields(usize),

    /// A field is not a valid number.
    #[error("invalid value '{value}' in field {index}")]
    InvalidField {
        /// Position of the field within the segment.
        index: usize,
        /// The offending text.
        value: String,
    },
}

/// Decodes a bar-series string into bars, preserving input order.
///
/// Empty input yields no bars. A malformed segment is dropped on its own and
/// decoding continues with the next one. Bars are neither sorted nor
/// deduplicated.
///
/// # Example
///
/// ```
/// use fnoscope_fetch::decode_bars;
///
/// let raw = "1738569300|100.5|101.0|100.0|100.75|500|1200|,bad|entry,";
/// let bars = decode_bars(raw);
/// assert_eq!(bars.len(), 1);
/// assert_eq!(bars[0].volume, 500);
/// ```
#[must_use]
pub fn decode_bars(raw: &str) -> Vec<BarRecord> {
    segments(raw)
        .filter_map(|segment| match decode_bar(segment) {
            Ok(bar) => Some(bar),
            Err(e) => {
                trace!("Dropping bar segment '{}': {}", segment, e);
                None
            }
        })
        .collect()
}

/// Decodes one `ts|open|high|low|close|volume|oi` segment.
///
/// Fields past the seventh are ignored. Prices must be plain decimals
/// (`[+-]digits[.digits]`); exponents and digit separators are refused.
/// Volume and open interest are unsigned, so a negative count fails.
///
/// # Errors
///
/// Returns an error if the segment is short or any field fails to parse.
pub fn decode_bar(segment: &str) -> Result<BarRecord, ParseError> {
    let fields: Vec<&str> = segment.split('|').map(str::trim).collect();
    if fields.len() < BarRecord::FIELD_COUNT {
        return Err(ParseError::TooFewFields(fields.len()));
    }

    Ok(BarRecord::new(
        field::<i64>(&fields, 0)?,
        price(&fields, 1)?,
        price(&fields, 2)?,
        price(&fields, 3)?,
        price(&fields, 4)?,
        field::<u64>(&fields, 5)?,
        field::<u64>(&fields, 6)?,
    ))
}

/// Returns the number of non-empty candidate segments in a bar-series string.
///
/// Comparing this with the decoded length tells how many segments were dropped.
#[must_use]
pub fn bar_segment_count(raw: &str) -> usize {
    segments(raw).count()
}

/// Encodes bars back into the wire format, one trailing pipe per bar.
#[must_use]
pub fn encode_bars(bars: &[BarRecord]) -> String {
    bars.iter()
        .map(|bar| {
            format!(
                "{}|{}|{}|{}|{}|{}|{}|",
                bar.timestamp,
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume,
                bar.open_interest
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits on commas, skipping blank segments.
fn segments(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[inline]
fn field<T: FromStr>(fields: &[&str], index: usize) -> Result<T, ParseError> {
    let value = fields[index];
    value.parse::<T>().map_err(|_| invalid(index, value))
}

#[inline]
fn price(fields: &[&str], index: usize) -> Result<Decimal, ParseError> {
    let value = fields[index];
    if !is_plain_decimal(value) {
        return Err(invalid(index, value));
    }
    field(fields, index)
}

fn is_plain_decimal(s: &str) -> bool {
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    match unsigned.split_once('.') {
        Some((whole, fraction)) => digits(whole) && digits(fraction),
        None => digits(unsigned),
    }
}

fn invalid(index: usize, value: &str) -> ParseError {
    ParseError::InvalidField {
        index,
        value: value.to_string(),
    }
}
