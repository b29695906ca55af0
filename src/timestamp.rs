// ABOUTME: Parsing and formatting for the three timestamp literal forms

use crate::error::LkitError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Parses a timestamp literal's inner text (the part between the single
/// quotes) into microseconds. Three forms are accepted, tried in order:
///
/// - `YYYY-MM-DD HH:MM:SS[.ffffff]` -> epoch microseconds
/// - `YYYY-MM-DD` -> epoch microseconds at midnight
/// - `HH:MM:SS[.ffffff]` -> microseconds since midnight, unreferenced to any
///   date
///
/// "Local time" in the source system is interpreted here as UTC: treating
/// wall-clock literals as UTC instants is the only way to keep parsing
/// deterministic across hosts and time zones, which matters because this
/// crate has no access to a host's tzdb configuration.
pub fn parse(text: &str) -> Result<u64, LkitError> {
    if let Some(dt) = parse_date_time(text) {
        return Ok(datetime_to_epoch_micros(dt));
    }
    if let Some(date) = parse_date_only(text) {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time");
        return Ok(datetime_to_epoch_micros(midnight));
    }
    if let Some(time) = parse_time_only(text) {
        return Ok(time_to_micros_since_midnight(time));
    }
    Err(LkitError::Syntax(format!(
        "malformed timestamp literal: '{text}'"
    )))
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

fn parse_date_only(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn parse_time_only(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
}

fn datetime_to_epoch_micros(dt: NaiveDateTime) -> u64 {
    let utc = dt.and_utc();
    let secs = utc.timestamp();
    let subsec_micros = utc.timestamp_subsec_micros() as i64;
    (secs * 1_000_000 + subsec_micros) as u64
}

fn time_to_micros_since_midnight(time: NaiveTime) -> u64 {
    let secs = time.num_seconds_from_midnight() as u64;
    let micros = (time.nanosecond() % 1_000_000_000) / 1_000;
    secs * 1_000_000 + micros as u64
}

/// Renders a raw microsecond count as a UTC `YYYY-MM-DD HH:MM:SS.ffffff`
/// string, the inverse of [`parse`]'s first form. Used for diagnostics only;
/// LKit never calls this internally.
pub fn format_epoch_micros(micros: u64) -> String {
    let secs = (micros / 1_000_000) as i64;
    let rem_micros = (micros % 1_000_000) as u32;
    match chrono::DateTime::from_timestamp(secs, rem_micros * 1_000) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        None => micros.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_time_only_as_seconds_from_midnight() {
        assert_eq!(parse("11:45:16.123456").unwrap(), 42_316_123_456);
    }

    #[test]
    fn parses_time_only_without_fraction() {
        assert_eq!(parse("11:45:16").unwrap(), 42_316_000_000);
    }

    #[test]
    fn parses_date_only_as_midnight_utc() {
        // 2012-03-21 00:00:00 UTC.
        assert_eq!(parse("2012-03-21").unwrap(), 1_332_288_000_000_000);
    }

    #[test]
    fn parses_full_datetime_as_utc_instant() {
        // 2012-03-21 11:45:16 UTC.
        assert_eq!(parse("2012-03-21 11:45:16").unwrap(), 1_332_330_316_000_000);
    }

    #[test]
    fn rejects_malformed_literal() {
        assert!(parse("not-a-timestamp").is_err());
        assert!(parse("2012-13-40").is_err());
    }

    #[test]
    fn format_round_trips_full_datetime() {
        let micros = parse("2012-03-21 11:45:16.500000").unwrap();
        assert_eq!(format_epoch_micros(micros), "2012-03-21 11:45:16.500000");
    }
}
