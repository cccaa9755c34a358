//! Shared vocabulary of the presence analyzer: error type, data model,
//! interval math and settings.

pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{PresenceError, Result};
