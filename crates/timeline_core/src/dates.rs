//! Shared date and axis-geometry helpers.
//!
//! # Responsibility
//! - Map dates onto the 0–100 axis of a timeline.
//! - Parse loosely formatted date strings coming from the UI.
//! - Truncate dates to calendar unit boundaries.
//!
//! # Invariants
//! - Axis positions are always finite and within `[0, 100]`.
//! - Parsing never panics; unknown formats yield `None`.

use crate::model::bounds::TimelineBounds;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Clamps a percentage into `[0, 100]`, mapping NaN to 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Returns the clamped axis position of `date` within `bounds`.
pub fn axis_position_percent(date: NaiveDateTime, bounds: &TimelineBounds) -> f64 {
    let offset_ms = date.signed_duration_since(bounds.start()).num_milliseconds();
    clamp_percent(offset_ms as f64 / bounds.span_ms() as f64 * 100.0)
}

/// Axis position for an optional date; missing dates sit at the axis origin.
pub fn axis_position_or_origin(date: Option<NaiveDateTime>, bounds: &TimelineBounds) -> f64 {
    date.map_or(0.0, |date| axis_position_percent(date, bounds))
}

/// Parses a UI date string.
///
/// Accepted shapes: `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.fff]]` (also with a
/// space separator) and RFC 3339 with offset, which is converted to UTC.
pub fn parse_timeline_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(start_of_day(date));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|parsed| parsed.naive_utc())
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Monday of the ISO week containing `date`.
///
/// `None` when that Monday precedes the earliest representable date.
pub fn start_of_iso_week(date: NaiveDate) -> Option<NaiveDate> {
    let days_from_monday = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(days_from_monday))
}

pub fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

/// Jan 1 of the first year of the `unit_years`-long bucket holding `year`.
///
/// `unit_years = 1` is the year itself, 10 a decade, 100 a century. Negative
/// years floor towards the past.
pub fn start_of_year_bucket(year: i32, unit_years: i32) -> Option<NaiveDate> {
    let bucket_year = year.div_euclid(unit_years) * unit_years;
    NaiveDate::from_ymd_opt(bucket_year, 1, 1)
}

/// Number of whole months between the months holding `from` and `to`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let from_index = i64::from(from.year()) * 12 + i64::from(from.month0());
    let to_index = i64::from(to.year()) * 12 + i64::from(to.month0());
    to_index - from_index
}
