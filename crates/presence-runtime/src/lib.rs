//! Runtime layer for the presence analyzer.
//!
//! Owns the time-expiring cache around the two data sources and exposes the
//! [`data_manager::DataManager`] service handed to request handlers.

pub mod cache;
pub mod clock;
pub mod data_manager;

pub use presence_core as core;
pub use presence_data as data;
