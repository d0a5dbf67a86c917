//! Market-data API endpoint construction.

use crate::BarRequest;

/// Default API root, used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Builds the URL of the instrument master download.
///
/// URL format: `{base}/instruments/master`
///
/// # Example
///
/// ```
/// use fnoscope_fetch::url::master_url;
///
/// assert_eq!(
///     master_url("https://broker.test/api/"),
///     "https://broker.test/api/instruments/master"
/// );
/// ```
#[must_use]
pub fn master_url(base: &str) -> String {
    format!("{}/instruments/master", base.trim_end_matches('/'))
}

/// Builds the URL of a historical bar request.
///
/// URL format: `{base}/charts/{SEGMENT}/{ID}?from={EPOCH}&to={EPOCH}&interval={SECONDS}`
///
/// The range bounds are the first and last second of the requested dates in
/// exchange time.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use fnoscope_fetch::{BarRequest, url::bars_url};
/// use fnoscope_types::{DateRange, Interval, Segment};
///
/// let day = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
/// let request = BarRequest::new(9001, Segment::NseFno, DateRange::single_day(day), Interval::Minute1);
/// assert_eq!(
///     bars_url("https://broker.test/api", &request),
///     "https://broker.test/api/charts/NSE_FO/9001?from=1738521000&to=1738607399&interval=60"
/// );
/// ```
#[must_use]
pub fn bars_url(base: &str, request: &BarRequest) -> String {
    format!(
        "{}/charts/{}/{}?from={}&to={}&interval={}",
        base.trim_end_matches('/'),
        request.segment,
        request.instrument_id,
        request.range.start_timestamp(),
        request.range.end_timestamp(),
        request.interval.seconds()
    )
}
