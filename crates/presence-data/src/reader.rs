//! Attendance CSV loading.
//!
//! Reads `user_id,YYYY-MM-DD,HH:MM:SS,HH:MM:SS` records into an
//! [`AttendanceByUser`] map. Loading is best-effort: rows that are not four
//! fields wide are ignored and rows that fail to parse are logged and
//! dropped, while the file itself must be readable.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use presence_core::error::{PresenceError, Result};
use presence_core::models::{AttendanceByUser, AttendanceRecord, PresenceTimes, UserId};
use presence_core::time_utils::{parse_date, parse_time};
use tracing::debug;

/// Number of fields in a well-formed attendance record.
const RECORD_WIDTH: usize = 4;

// ── RowOutcome ────────────────────────────────────────────────────────────────

/// What the loader made of a single CSV record.
#[derive(Debug)]
pub enum RowOutcome {
    /// A complete record ready to be stored.
    Parsed(AttendanceRecord),
    /// Not an attendance row at all (header, footer, blank).
    Ignored { width: usize },
    /// Four fields wide but one of them did not parse.
    Malformed(PresenceError),
}

/// Row counters reported at the end of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub read: u64,
    pub ignored: u64,
    pub malformed: u64,
    pub stored: u64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the attendance CSV at `path`.
///
/// Fails only when the file cannot be opened or read; row-level problems are
/// logged at debug level and the row is skipped.
pub fn load_attendance(path: &Path) -> Result<AttendanceByUser> {
    let file = File::open(path).map_err(|source| PresenceError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let (data, stats) = read_attendance(file)?;
    debug!(
        "File {}: {} read, {} ignored, {} malformed, {} stored, {} users",
        path.display(),
        stats.read,
        stats.ignored,
        stats.malformed,
        stats.stored,
        data.len(),
    );
    Ok(data)
}

/// Read attendance records from any byte source.
///
/// Later rows for the same `(user, date)` replace earlier ones.
pub fn read_attendance<R: Read>(source: R) -> Result<(AttendanceByUser, LoadStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut data = AttendanceByUser::new();
    let mut stats = LoadStats::default();

    for (index, record) in reader.records().enumerate() {
        stats.read += 1;

        let record = match record {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Problem with line {}: {}", index, e);
                stats.malformed += 1;
                continue;
            }
        };

        match parse_record(&record) {
            RowOutcome::Parsed(row) => {
                data.entry(row.user_id)
                    .or_default()
                    .insert(row.date, row.times);
                stats.stored += 1;
            }
            RowOutcome::Ignored { .. } => stats.ignored += 1,
            RowOutcome::Malformed(e) => {
                debug!("Problem with line {}: {}", index, e);
                stats.malformed += 1;
            }
        }
    }

    Ok((data, stats))
}

/// Classify and parse one CSV record.
pub fn parse_record(record: &StringRecord) -> RowOutcome {
    if record.len() != RECORD_WIDTH {
        return RowOutcome::Ignored {
            width: record.len(),
        };
    }

    match parse_fields(&record[0], &record[1], &record[2], &record[3]) {
        Ok(row) => RowOutcome::Parsed(row),
        Err(e) => RowOutcome::Malformed(e),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn parse_fields(user_id: &str, date: &str, start: &str, end: &str) -> Result<AttendanceRecord> {
    let user_id: UserId = user_id
        .parse()
        .map_err(|_| PresenceError::InvalidField {
            field: "user id",
            value: user_id.to_string(),
        })?;

    Ok(AttendanceRecord {
        user_id,
        date: parse_date(date)?,
        times: PresenceTimes::new(parse_time(start, "start")?, parse_time(end, "end")?),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
