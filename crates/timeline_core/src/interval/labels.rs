//! Tick label formatting.

use crate::model::timeline::IntervalType;
use chrono::{Datelike, NaiveDateTime};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const WEEK_MS: i64 = 7 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

/// Formats a tick label for `kind`.
///
/// `span_ms` is only read for `IntervalType::Even`, whose format adapts to the
/// total timeline span.
pub fn format_tick_label(date: NaiveDateTime, kind: IntervalType, span_ms: i64) -> String {
    match kind {
        IntervalType::Even => format_even_label(date, span_ms),
        IntervalType::Daily => date.format("%-d %b").to_string(),
        IntervalType::Weekly => {
            let week = date.date().iso_week();
            format!("Week {}, {}", week.week(), week.year())
        }
        IntervalType::Monthly => date.format("%b %Y").to_string(),
        IntervalType::Yearly => date.year().to_string(),
        IntervalType::Decade => format!("{}s", date.year()),
        IntervalType::Century => format_century_label(date.year()),
    }
}

/// Buckets are `[100k, 100k + 100)` in astronomical years, so year 0 opens the
/// 1st century and years -100..=-1 are the 1st century BCE.
fn format_century_label(year: i32) -> String {
    let bucket = year.div_euclid(100);
    if bucket >= 0 {
        format!("{} century", ordinal(bucket + 1))
    } else {
        format!("{} century BCE", ordinal(-bucket))
    }
}

fn format_even_label(date: NaiveDateTime, span_ms: i64) -> String {
    let format = if span_ms < DAY_MS {
        "%H:%M"
    } else if span_ms < WEEK_MS {
        "%a %-d"
    } else if span_ms < YEAR_MS {
        // Spans under a month and under a year both label day + month.
        "%-d %b"
    } else {
        "%b %Y"
    };
    date.format(format).to_string()
}

/// English ordinal, e.g. `1st`, `12th`, `21st`.
pub fn ordinal(value: i32) -> String {
    let magnitude = value.unsigned_abs();
    let suffix = match (magnitude % 10, magnitude % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{value}{suffix}")
}
