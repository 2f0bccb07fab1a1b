//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time as an RFC 3339 string with millisecond precision
///
/// Used for the `timestamp` field of every response envelope.
pub fn now_rfc3339() -> String {
    now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_rfc3339_parses_back() {
        let text = now_rfc3339();
        assert!(text.ends_with('Z'));
        let parsed = DateTime::parse_from_rfc3339(&text);
        assert!(parsed.is_ok(), "not RFC 3339: {}", text);
    }
}
