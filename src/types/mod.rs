//! Data types for the temperature monitor
//!
//! This module contains the wire-level data structures shared between
//! the server endpoints and the client.

mod reading;

pub use reading::{CurrentTemperature, HistoryResponse, TemperatureReading};

/// Result type for server and client operations
pub type MonitorResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
