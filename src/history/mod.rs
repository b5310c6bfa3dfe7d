//! Bounded in-memory log of broadcast readings
//!
//! Backs the history endpoint. Readings are kept in a fixed-capacity
//! ring buffer only; nothing is written to durable storage.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::types::TemperatureReading;
use crate::utils::time::now_iso8601;

/// Default number of readings kept in memory
const DEFAULT_CAPACITY: usize = 100;

/// Fixed-capacity log of recent temperature readings
pub struct ReadingLog {
    readings: RwLock<VecDeque<TemperatureReading>>,
    capacity: usize,
    sequence: AtomicU64,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            readings: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
            sequence: AtomicU64::new(0),
        }
    }

    /// Record a broadcast value, evicting the oldest reading when full
    pub fn record(&self, temperature: &str) -> TemperatureReading {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let reading = TemperatureReading {
            reading_id: format!("reading_{}", seq),
            temperature: temperature.to_string(),
            timestamp: now_iso8601(),
        };

        let mut readings = self.readings.write();
        if readings.len() == self.capacity {
            readings.pop_front();
        }
        readings.push_back(reading.clone());
        reading
    }

    /// Most recent readings, newest first
    pub fn latest(&self, limit: usize) -> Vec<TemperatureReading> {
        self.readings
            .read()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.readings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.read().is_empty()
    }
}

impl Default for ReadingLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_returns_newest_first() {
        let log = ReadingLog::new();
        log.record("34.4");
        log.record("34.8");
        log.record("35.2");

        let latest = log.latest(2);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].temperature, "35.2");
        assert_eq!(latest[1].temperature, "34.8");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let log = ReadingLog::with_capacity(3);
        for value in ["34.4", "34.8", "35.2", "35.6"] {
            log.record(value);
        }

        assert_eq!(log.len(), 3);
        let latest = log.latest(10);
        assert_eq!(latest[2].temperature, "34.8");
    }

    #[test]
    fn test_reading_ids_increment() {
        let log = ReadingLog::new();
        let first = log.record("34.4");
        let second = log.record("34.8");

        assert_eq!(first.reading_id, "reading_0");
        assert_eq!(second.reading_id, "reading_1");
    }
}
