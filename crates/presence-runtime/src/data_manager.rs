//! Cached access to the attendance and directory sources.
//!
//! [`DataManager`] is built once at startup and shared by every request
//! handler. Each source sits behind its own [`TimedCache`] slot, so the two
//! reload independently and never contend for the same lock.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use presence_core::error::{PresenceError, Result};
use presence_core::models::{AttendanceByUser, Directory, DirectoryEntry, UserId, UserPresence};
use presence_core::settings::{DataSources, DEFAULT_CACHE_TTL_SECS};
use presence_data::directory::load_directory;
use presence_data::reader::load_attendance;
use tracing::warn;

use crate::cache::TimedCache;
use crate::clock::{Clock, SystemClock};

// ── LoaderId ──────────────────────────────────────────────────────────────────

/// Identity of a cached loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoaderId {
    Attendance,
    Directory,
}

impl LoaderId {
    pub const ALL: [LoaderId; 2] = [LoaderId::Attendance, LoaderId::Directory];

    pub fn as_str(self) -> &'static str {
        match self {
            LoaderId::Attendance => "attendance",
            LoaderId::Directory => "directory",
        }
    }
}

impl fmt::Display for LoaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Time-cached access to both data sources.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use presence_core::settings::DataSources;
/// use presence_runtime::data_manager::DataManager;
///
/// let mgr = DataManager::new(
///     DataSources {
///         attendance_csv: "runtime/data/sample_data.csv".into(),
///         directory_xml: "runtime/data/users.xml".into(),
///     },
///     Duration::from_secs(600),
/// );
/// let presence = mgr.user_presence(10)?;
/// println!("{} days on record", presence.len());
/// # Ok::<(), presence_core::PresenceError>(())
/// ```
pub struct DataManager {
    sources: DataSources,
    attendance: TimedCache<AttendanceByUser>,
    directory: TimedCache<Directory>,
}

impl DataManager {
    /// Create a manager using the process clock.
    pub fn new(sources: DataSources, ttl: Duration) -> Self {
        Self::with_clock(sources, ttl, Arc::new(SystemClock))
    }

    /// Create a manager with the default 600 second window.
    pub fn with_default_ttl(sources: DataSources) -> Self {
        Self::new(sources, Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    /// Create a manager driven by an explicit clock.
    pub fn with_clock(sources: DataSources, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sources,
            attendance: TimedCache::new(LoaderId::Attendance.as_str(), ttl, Arc::clone(&clock)),
            directory: TimedCache::new(LoaderId::Directory.as_str(), ttl, clock),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    /// Attendance of every user, loaded at most once per window.
    pub fn get_attendance(&self) -> Result<Arc<AttendanceByUser>> {
        self.attendance
            .get_or_try_load(|| load_attendance(&self.sources.attendance_csv))
            .map_err(|e| {
                warn!(loader = %LoaderId::Attendance, error = %e, "load failed");
                e
            })
    }

    /// The user directory, loaded at most once per window.
    pub fn get_directory(&self) -> Result<Arc<Directory>> {
        self.directory
            .get_or_try_load(|| load_directory(&self.sources.directory_xml))
            .map_err(|e| {
                warn!(loader = %LoaderId::Directory, error = %e, "load failed");
                e
            })
    }

    /// One user's date → presence map.
    ///
    /// Fails with [`PresenceError::UserNotFound`] when the attendance source
    /// has no valid row for `user_id`.
    pub fn user_presence(&self, user_id: UserId) -> Result<UserPresence> {
        self.get_attendance()?
            .get(&user_id)
            .cloned()
            .ok_or(PresenceError::UserNotFound(user_id))
    }

    /// Directory entries sorted by display name.
    pub fn users(&self) -> Result<Vec<DirectoryEntry>> {
        let mut users: Vec<DirectoryEntry> = self.get_directory()?.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.user_id.cmp(&b.user_id)));
        Ok(users)
    }

    /// Discard the cached value of `loader`.
    pub fn invalidate(&self, loader: LoaderId) {
        match loader {
            LoaderId::Attendance => self.attendance.invalidate(),
            LoaderId::Directory => self.directory.invalidate(),
        }
    }

    /// Age of the cached value of `loader`, or `None` if nothing is cached.
    pub fn cache_age(&self, loader: LoaderId) -> Option<Duration> {
        match loader {
            LoaderId::Attendance => self.attendance.age(),
            LoaderId::Directory => self.directory.age(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
