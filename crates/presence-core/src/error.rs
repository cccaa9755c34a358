use std::path::PathBuf;
use thiserror::Error;

use crate::models::UserId;

/// All errors produced by the presence analyzer.
#[derive(Error, Debug)]
pub enum PresenceError {
    /// A source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader hit an unrecoverable error.
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The directory document is not well-formed XML.
    #[error("Failed to parse XML: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The directory document is missing a required element or attribute.
    #[error("Invalid directory structure: {0}")]
    XmlStructure(String),

    /// A user id in the directory is not an integer.
    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    /// A single attendance field could not be parsed.
    #[error("Invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// No attendance data exists for the requested user.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A result could not be serialized to JSON.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the presence crates.
pub type Result<T> = std::result::Result<T, PresenceError>;
