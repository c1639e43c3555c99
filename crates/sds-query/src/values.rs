//! Lenient scalar parsing for property text.
//!
//! Every helper takes the caller's default for missing or malformed input;
//! none of them fail.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

#[must_use]
pub fn parse_f64(text: &str, default: f64) -> f64 {
    text.trim().parse::<f64>().unwrap_or(default)
}

#[must_use]
pub fn parse_i64(text: &str, default: i64) -> i64 {
    text.trim().parse::<i64>().unwrap_or(default)
}

/// Accepts `true`/`false` in any case plus the XML Schema forms `1`/`0`.
#[must_use]
pub fn parse_bool(text: &str, default: bool) -> bool {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        true
    } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        false
    } else {
        default
    }
}

/// Parses an `Edm.DateTime` value.
///
/// Accepts RFC 3339 (with offset), an offset-less `YYYY-MM-DDTHH:MM:SS[.f]`
/// taken as UTC, or a bare date at midnight UTC.
#[must_use]
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
