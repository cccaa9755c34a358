//! Weekday and month aggregation over one user's presence.
//!
//! Weekday buckets are indexed Monday = 0 through Sunday = 6, month buckets
//! January = 0 through December = 11. Empty buckets yield zero.

use std::collections::BTreeMap;

use chrono::Datelike;
use presence_core::models::{MeanPresence, UserPresence};
use presence_core::time_utils::{interval, mean_seconds, seconds_since_midnight};

/// Number of weekday buckets.
pub const WEEKDAYS: usize = 7;

/// Number of month buckets.
pub const MONTHS: usize = 12;

// ── PresenceAggregator ────────────────────────────────────────────────────────

/// Stateless helper that groups presence intervals by calendar buckets.
pub struct PresenceAggregator;

impl PresenceAggregator {
    /// Presence intervals (seconds) of every date, grouped by weekday.
    ///
    /// Within a bucket, intervals appear in the order of `items`.
    pub fn group_by_weekday(items: &UserPresence) -> [Vec<i64>; WEEKDAYS] {
        let mut result: [Vec<i64>; WEEKDAYS] = Default::default();
        for (date, times) in items {
            result[weekday_index(date)].push(interval(times.start, times.end));
        }
        result
    }

    /// Mean presence interval (seconds) for each month of the year.
    pub fn mean_by_month(items: &UserPresence) -> [f64; MONTHS] {
        let mut buckets: [Vec<i64>; MONTHS] = Default::default();
        for (date, times) in items {
            buckets[date.month0() as usize].push(interval(times.start, times.end));
        }
        buckets.map(|intervals| mean_seconds(&intervals))
    }

    /// Mean presence interval (seconds) for each weekday.
    pub fn mean_by_weekday(items: &UserPresence) -> [f64; WEEKDAYS] {
        Self::group_by_weekday(items).map(|intervals| mean_seconds(&intervals))
    }

    /// Mean arrival and departure, in seconds since midnight, per weekday.
    ///
    /// Every weekday key `0..=6` is present; days without data map to `0/0`.
    pub fn mean_time_of_presence(items: &UserPresence) -> BTreeMap<u32, MeanPresence> {
        let mut starts: [Vec<i64>; WEEKDAYS] = Default::default();
        let mut ends: [Vec<i64>; WEEKDAYS] = Default::default();

        for (date, times) in items {
            let day = weekday_index(date);
            starts[day].push(seconds_since_midnight(times.start));
            ends[day].push(seconds_since_midnight(times.end));
        }

        starts
            .iter()
            .zip(ends.iter())
            .zip(0u32..)
            .map(|((start, end), day)| {
                (
                    day,
                    MeanPresence {
                        start: mean_seconds(start),
                        end: mean_seconds(end),
                    },
                )
            })
            .collect()
    }
}

fn weekday_index(date: &chrono::NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

// ── Tests ─────────────────────────────────────────────────────────────────────
