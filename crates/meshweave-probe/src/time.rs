//! The audit-time text form: `YYYY-MM-DD HH:MM:SS.mmm`, UTC.

use chrono::{Duration, TimeZone, Utc};
use meshweave_model::ValueTextError;
use regex::Regex;
use std::sync::OnceLock;

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2}) (\d{1,2}):(\d{1,2}):(\d{1,2})\.(\d{1,3})$")
            .unwrap()
    })
}

/// Parse an audit time to milliseconds since the Unix epoch.
///
/// Field ranges follow the external format: years from 1900, seconds up to
/// 62 (leap seconds), milliseconds below 1000.
pub fn parse_audit_time(text: &str) -> Result<i64, ValueTextError> {
    let err = || ValueTextError {
        kind: "audit time",
        text: text.to_string(),
    };
    let captures = time_pattern().captures(text.trim()).ok_or_else(err)?;
    let field = |index: usize| -> i64 {
        // The pattern guarantees digits.
        captures[index].parse().unwrap_or(0)
    };
    let (year, month, day) = (field(1), field(2), field(3));
    let (hour, minute, second, milli) = (field(4), field(5), field(6), field(7));

    if !(1900..=9999).contains(&year)
        || !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || !(0..=23).contains(&hour)
        || !(0..=59).contains(&minute)
        || !(0..=62).contains(&second)
        || !(0..=999).contains(&milli)
    {
        return Err(err());
    }

    // Fold the leap-second range past chrono's 0..=59.
    let (clamped, carry) = if second > 59 { (59, second - 59) } else { (second, 0) };
    let base = Utc
        .with_ymd_and_hms(
            year as i32,
            month as u32,
            day as u32,
            hour as u32,
            minute as u32,
            clamped as u32,
        )
        .single()
        .ok_or_else(err)?;
    Ok((base + Duration::seconds(carry)).timestamp_millis() + milli)
}

/// Inverse of [`parse_audit_time`].
pub fn format_audit_time(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(instant) => instant.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        // Out-of-range epoch values cannot come from parse_audit_time;
        // render the epoch rather than panic.
        None => "1970-01-01 00:00:00.000".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_the_canonical_form() {
        let millis = parse_audit_time("2024-03-01 12:30:45.250").expect("parse");
        assert_eq!(format_audit_time(millis), "2024-03-01 12:30:45.250");
    }

    #[test]
    fn accepts_leap_seconds() {
        let normal = parse_audit_time("2016-12-31 23:59:59.000").expect("parse");
        let leap = parse_audit_time("2016-12-31 23:59:60.000").expect("parse");
        assert_eq!(leap - normal, 1000);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(parse_audit_time("1899-01-01 00:00:00.000").is_err());
        assert!(parse_audit_time("2024-13-01 00:00:00.000").is_err());
        assert!(parse_audit_time("2024-01-01 24:00:00.000").is_err());
        assert!(parse_audit_time("2024-01-01 00:00:63.000").is_err());
        assert!(parse_audit_time("2024-01-01T00:00:00.000").is_err());
    }
}
