use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::error::{PresenceError, Result};
use crate::models::UserId;

/// Default validity window of a cached load, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Attendance statistics computed from presence records and the user directory
#[derive(Parser, Debug, Clone)]
#[command(
    name = "presence-analyzer",
    about = "Attendance statistics computed from presence records and the user directory",
    version
)]
pub struct Settings {
    /// Attendance CSV (user_id,date,start,end)
    #[arg(long, env = "PRESENCE_DATA_CSV", default_value = "runtime/data/sample_data.csv")]
    pub data_csv: PathBuf,

    /// User directory XML
    #[arg(long, env = "PRESENCE_DATA_XML", default_value = "runtime/data/users.xml")]
    pub data_xml: PathBuf,

    /// Seconds a loaded source stays cached
    #[arg(long, env = "PRESENCE_CACHE_TTL", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Logging level
    #[arg(
        long,
        env = "PRESENCE_LOG_LEVEL",
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"]
    )]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Query to run against the loaded data.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List directory users sorted by name
    Users,
    /// Raw date → {start, end} map of one user
    Raw { user_id: UserId },
    /// Presence intervals grouped by weekday
    Weekday { user_id: UserId },
    /// Mean presence interval per weekday
    MeanWeekday { user_id: UserId },
    /// Mean presence interval per month
    Months { user_id: UserId },
    /// Mean arrival and departure per weekday
    StartEnd { user_id: UserId },
}

// ── DataSources ────────────────────────────────────────────────────────────────

/// Locations of the two source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub attendance_csv: PathBuf,
    pub directory_xml: PathBuf,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Reject settings the loaders cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.data_csv.as_os_str().is_empty() {
            return Err(PresenceError::Config("attendance CSV path is empty".to_string()));
        }
        if self.data_xml.as_os_str().is_empty() {
            return Err(PresenceError::Config("directory XML path is empty".to_string()));
        }
        Ok(())
    }

    pub fn data_sources(&self) -> DataSources {
        DataSources {
            attendance_csv: self.data_csv.clone(),
            directory_xml: self.data_xml.clone(),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
