//! TEXT timestamps as the web application stores them in SQLite.
//!
//! The application writes `2025-12-21 09:37:29.1234567` (UTC, no offset,
//! seven fraction digits, i.e. 100 ns ticks). Rows written by other tools may
//! carry RFC 3339 instead, so parsing accepts both.

use chrono::{DateTime, NaiveDateTime, ParseError, Timelike, Utc};

/// Date and time part of the storage format; the fraction is appended by
/// [`format_timestamp`].
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepts any number of fraction digits, including none.
const PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const NANOS_PER_TICK: u32 = 100;

/// Drop precision finer than the 100 ns the storage format can hold.
pub fn truncate_to_ticks(ts: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = ts.timestamp_subsec_nanos();
    ts.with_nanosecond(nanos - nanos % NANOS_PER_TICK)
        .unwrap_or(ts)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    // Leap seconds report nanos past 1e9; clamp so the fraction stays 7 digits.
    let ticks = ts.timestamp_subsec_nanos().min(999_999_999) / NANOS_PER_TICK;
    format!("{}.{:07}", ts.format(STORAGE_FORMAT), ticks)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ParseError> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, PARSE_FORMAT).map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_nanos(nanos: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 21, 9, 37, 29)
            .unwrap()
            .with_nanosecond(nanos)
            .unwrap()
    }

    #[test]
    fn test_parse_application_format() {
        let ts = parse_timestamp("2025-12-21 09:37:29.1234567").unwrap();
        assert_eq!(ts.timestamp(), 1766309849);
        assert_eq!(ts.timestamp_subsec_nanos(), 123_456_700);
    }

    #[test]
    fn test_parse_without_fraction() {
        let ts = parse_timestamp("2025-12-21 09:37:29").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 12, 21, 9, 37, 29).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2025-12-21T11:37:29+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 12, 21, 9, 37, 29).unwrap());
    }

    #[test]
    fn test_format_writes_seven_fraction_digits() {
        assert_eq!(format_timestamp(&at_nanos(123_456_789)), "2025-12-21 09:37:29.1234567");
        assert_eq!(format_timestamp(&at_nanos(0)), "2025-12-21 09:37:29.0000000");
        assert_eq!(format_timestamp(&at_nanos(5_000)), "2025-12-21 09:37:29.0000050");
    }

    #[test]
    fn test_format_is_parseable() {
        let now = truncate_to_ticks(Utc::now());
        let stored = format_timestamp(&now);

        assert!(!stored.contains('T'));
        let fraction = stored.rsplit('.').next().unwrap();
        assert_eq!(fraction.len(), 7);
        assert_eq!(parse_timestamp(&stored).unwrap(), now);
    }

    #[test]
    fn test_truncate_to_ticks() {
        assert_eq!(truncate_to_ticks(at_nanos(123_456_789)), at_nanos(123_456_700));
        assert_eq!(truncate_to_ticks(at_nanos(100)), at_nanos(100));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
