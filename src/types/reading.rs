//! Temperature reading types

use serde::{Deserialize, Serialize};

/// A single recorded temperature reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureReading {
    #[serde(rename = "readingId")]
    pub reading_id: String,
    pub temperature: String,
    pub timestamp: String,
}

/// Response for `GET /api/temperature`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentTemperature {
    /// Decimal string with one fractional digit, e.g. `"36.5"`
    pub temperature: String,
    /// ISO-8601 timestamp of when the reading was taken
    pub timestamp: String,
}

/// Response for `GET /api/temperature/history`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub readings: Vec<TemperatureReading>,
}
