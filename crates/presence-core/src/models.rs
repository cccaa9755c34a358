use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Numeric identifier shared by the attendance and directory sources.
pub type UserId = i64;

/// Start and end of one user's presence on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceTimes {
    /// Time of day the user arrived.
    pub start: NaiveTime,
    /// Time of day the user left.
    pub end: NaiveTime,
}

impl PresenceTimes {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

/// One parsed attendance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub times: PresenceTimes,
}

/// One user's presence keyed by date, in source order.
///
/// Re-inserting a date replaces its value but keeps the position of the
/// first insertion.
pub type UserPresence = IndexMap<NaiveDate, PresenceTimes>;

/// Presence of every user found in the attendance source.
pub type AttendanceByUser = BTreeMap<UserId, UserPresence>;

/// A user as described by the directory document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Fully qualified avatar URL.
    pub avatar: String,
}

/// Every user found in the directory document.
pub type Directory = BTreeMap<UserId, DirectoryEntry>;

/// Mean arrival and departure for one weekday, in seconds since midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanPresence {
    pub start: f64,
    pub end: f64,
}

/// Short weekday labels, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Pair each weekday bucket with its label.
pub fn labelled_weekdays<T>(buckets: [T; 7]) -> Vec<(&'static str, T)> {
    WEEKDAY_NAMES.into_iter().zip(buckets).collect()
}
