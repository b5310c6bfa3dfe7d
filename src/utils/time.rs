//! Time and timestamp utilities

use chrono::{SecondsFormat, Utc};

/// Get current Unix timestamp in seconds
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Get the current time as an ISO-8601 string with millisecond precision,
/// e.g. `"2024-01-01T12:00:00.000Z"`
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso8601_format() {
        let ts = now_iso8601();
        // "2024-01-01T12:00:00.000Z" - fixed width, Z suffix
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
    }

    #[test]
    fn test_current_timestamp_positive() {
        assert!(current_timestamp() > 0);
    }
}
