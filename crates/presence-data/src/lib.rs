//! Data ingestion layer for the presence analyzer.
//!
//! Loads the attendance CSV and the user directory XML into the shared data
//! model and computes the weekday / month statistics served to front ends.

pub mod aggregator;
pub mod directory;
pub mod reader;

pub use presence_core as core;
