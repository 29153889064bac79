//! Normalization of dealer-supplied identifiers and timestamps.
//!
//! The matchers compare normalized values only, so the same functions are
//! used both when storing new records and when looking up existing ones.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Trim a value and drop it entirely if nothing is left.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Registration plates are stored without any whitespace, uppercased.
///
/// Returns `None` when the input is blank.
pub fn normalize_registration(raw: &str) -> Option<String> {
    let reg: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    (!reg.is_empty()).then_some(reg)
}

/// VINs are trimmed and uppercased.
pub fn normalize_vin(raw: &str) -> Option<String> {
    non_blank(Some(raw)).map(|v| v.to_uppercase())
}

/// Emails are trimmed and lower-cased.
pub fn normalize_email(raw: &str) -> Option<String> {
    non_blank(Some(raw)).map(|v| v.to_lowercase())
}

/// Mobile numbers have all whitespace removed.
pub fn normalize_mobile(raw: &str) -> Option<String> {
    let mobile: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    (!mobile.is_empty()).then_some(mobile)
}

/// Parse a `YYYY-MM-DD` import date.
pub fn parse_import_date(raw: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("'{raw}' is not a YYYY-MM-DD date")))
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Parse a combined date-time as sent by the diary feed.
///
/// Accepts RFC 3339 (with offset), naive `T`/space separated forms, and a
/// bare date (midnight). Naive values are taken as UTC.
pub fn parse_datetime(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Build the promise time from a booking's separate date and time fields.
///
/// When the date already carries a time component the `time` field is
/// ignored. A missing time means midnight.
pub fn parse_promise_time(date: Option<&str>, time: Option<&str>) -> Option<Timestamp> {
    let date = date.map(str::trim).filter(|d| !d.is_empty())?;
    let time = time.map(str::trim).filter(|t| !t.is_empty());

    let day = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => day,
        Err(_) => return parse_datetime(date),
    };
    let Some(time) = time else {
        return day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    };
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())
        .map(|t| day.and_time(t).and_utc())
}
