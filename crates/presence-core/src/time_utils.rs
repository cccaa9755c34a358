//! Time-of-day arithmetic and the date/time formats of the attendance source.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::error::{PresenceError, Result};

/// Date format used by the attendance source.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format used by the attendance source.
pub const TIME_FORMAT: &str = "%H:%M:%S";

// ── Interval math ─────────────────────────────────────────────────────────────

/// Seconds elapsed since midnight for a time of day.
pub fn seconds_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 3600 + i64::from(time.minute()) * 60 + i64::from(time.second())
}

/// Signed number of seconds between two times of day.
///
/// Negative when `end` precedes `start`; the value is never clamped.
pub fn interval(start: NaiveTime, end: NaiveTime) -> i64 {
    seconds_since_midnight(end) - seconds_since_midnight(start)
}

/// Arithmetic mean of `items`, or `0.0` when there are none.
pub fn mean<I>(items: I) -> f64
where
    I: IntoIterator,
    I::Item: Into<f64>,
{
    let (sum, count) = items
        .into_iter()
        .fold((0.0_f64, 0usize), |(sum, count), item| (sum + item.into(), count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mean of a slice of signed second counts.
pub fn mean_seconds(items: &[i64]) -> f64 {
    // i64 has no lossless `Into<f64>`.
    mean(items.iter().map(|&s| s as f64))
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| PresenceError::InvalidField {
        field: "date",
        value: value.to_string(),
    })
}

/// Parse an `HH:MM:SS` time of day; `field` names the column in errors.
pub fn parse_time(value: &str, field: &'static str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| PresenceError::InvalidField {
        field,
        value: value.to_string(),
    })
}
