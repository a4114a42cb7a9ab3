//! Interval tick generation.
//!
//! # Responsibility
//! - Produce evenly spaced or calendar-aligned ticks along a timeline.
//! - Decide which interval types produce a readable number of ticks.
//!
//! # Invariants
//! - Every tick position is within `[0, 100]`.
//! - `even` yields exactly the effective count (`2..=20`).
//! - A calendar tick falling on `end`'s calendar day sits at exactly 100.
//! - Generation never fails; missing or invalid bounds yield no ticks.

mod labels;

pub use labels::{format_tick_label, ordinal};

use crate::config::IntervalConfig;
use crate::dates::{
    axis_position_percent, first_of_month, months_between, start_of_day, start_of_iso_week,
    start_of_year_bucket,
};
use crate::model::bounds::TimelineBounds;
use crate::model::timeline::IntervalType;
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};

/// One generated axis marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalTick {
    pub date: NaiveDateTime,
    pub position_percent: f64,
    pub label: String,
}

/// Tick count of one interval type and whether the UI should offer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalAvailability {
    pub kind: IntervalType,
    pub tick_count: u64,
    pub available: bool,
}

/// Interval generator bound to one configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalGenerator {
    config: IntervalConfig,
}

impl IntervalGenerator {
    pub fn new(config: IntervalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    /// Generates ticks for `kind`.
    ///
    /// `even_count` is only read for `IntervalType::Even`; `None` picks the
    /// configured default and out-of-range values are clamped.
    pub fn generate(
        &self,
        bounds: &TimelineBounds,
        kind: IntervalType,
        even_count: Option<u32>,
    ) -> Vec<IntervalTick> {
        let ticks = match kind {
            IntervalType::Even => {
                generate_even(bounds, self.config.effective_even_count(even_count))
            }
            calendar => generate_calendar(bounds, calendar),
        };
        debug!(
            "event=intervals_generate module=interval status=ok kind={} ticks={}",
            kind,
            ticks.len()
        );
        ticks
    }

    /// Like [`IntervalGenerator::generate`] for possibly missing bounds.
    pub fn generate_from_parts(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        kind: IntervalType,
        even_count: Option<u32>,
    ) -> Vec<IntervalTick> {
        match TimelineBounds::from_parts(start, end) {
            Some(bounds) => self.generate(&bounds, kind, even_count),
            None => {
                debug!(
                    "event=intervals_generate module=interval status=skipped reason=invalid_bounds kind={}",
                    kind
                );
                Vec::new()
            }
        }
    }

    /// Number of ticks `kind` would produce, computed without generating them.
    ///
    /// `even_count` resolves like in [`IntervalGenerator::generate`].
    pub fn tick_count(
        &self,
        bounds: &TimelineBounds,
        kind: IntervalType,
        even_count: Option<u32>,
    ) -> u64 {
        match kind {
            IntervalType::Even => u64::from(self.config.effective_even_count(even_count)),
            calendar => count_calendar_ticks(bounds, calendar),
        }
    }

    /// Reports every interval type with its tick count and availability.
    ///
    /// `even` is always available; calendar types need a tick count within
    /// `min_calendar_ticks..=max_calendar_ticks`.
    pub fn availability(
        &self,
        bounds: &TimelineBounds,
        even_count: Option<u32>,
    ) -> Vec<IntervalAvailability> {
        IntervalType::ALL
            .into_iter()
            .map(|kind| {
                let tick_count = self.tick_count(bounds, kind, even_count);
                let available = !kind.is_calendar()
                    || (self.config.min_calendar_ticks..=self.config.max_calendar_ticks)
                        .contains(&tick_count);
                IntervalAvailability {
                    kind,
                    tick_count,
                    available,
                }
            })
            .collect()
    }

    /// Interval types the UI should offer for `bounds`, in display order.
    pub fn available_types(&self, bounds: &TimelineBounds) -> Vec<IntervalType> {
        self.availability(bounds, None)
            .into_iter()
            .filter(|entry| entry.available)
            .map(|entry| entry.kind)
            .collect()
    }

    pub fn is_available(&self, bounds: &TimelineBounds, kind: IntervalType) -> bool {
        self.availability(bounds, None)
            .iter()
            .any(|entry| entry.kind == kind && entry.available)
    }
}

/// Generates ticks with the default configuration.
pub fn generate_intervals(
    bounds: &TimelineBounds,
    kind: IntervalType,
    even_count: Option<u32>,
) -> Vec<IntervalTick> {
    IntervalGenerator::default().generate(bounds, kind, even_count)
}

/// Calendar tick count for `kind`; `0` for `IntervalType::Even`.
///
/// Also `0` when the first boundary falls outside the representable calendar,
/// matching what generation yields.
pub fn count_calendar_ticks(bounds: &TimelineBounds, kind: IntervalType) -> u64 {
    let start = bounds.start().date();
    let end = bounds.end().date();
    let Some(first) = first_boundary(kind, start) else {
        return 0;
    };
    let span = match kind {
        IntervalType::Even => return 0,
        IntervalType::Daily => end.signed_duration_since(start).num_days(),
        IntervalType::Weekly => match start_of_iso_week(end) {
            Some(last) => last.signed_duration_since(first).num_days() / 7,
            None => return 0,
        },
        IntervalType::Monthly => months_between(start, end),
        IntervalType::Yearly => i64::from(end.year()) - i64::from(start.year()),
        IntervalType::Decade => year_buckets_between(start, end, 10),
        IntervalType::Century => year_buckets_between(start, end, 100),
    };
    u64::try_from(span + 1).unwrap_or(0)
}

fn year_buckets_between(start: NaiveDate, end: NaiveDate, unit_years: i32) -> i64 {
    i64::from(end.year().div_euclid(unit_years)) - i64::from(start.year().div_euclid(unit_years))
}

fn generate_even(bounds: &TimelineBounds, count: u32) -> Vec<IntervalTick> {
    let span_ms = bounds.span_ms();
    let steps = i128::from(count.saturating_sub(1).max(1));

    (0..count)
        .map(|index| {
            let offset_ms = i128::from(span_ms) * i128::from(index) / steps;
            let date = if index + 1 == count {
                bounds.end()
            } else {
                bounds.start() + chrono::Duration::milliseconds(offset_ms as i64)
            };
            IntervalTick {
                date,
                position_percent: axis_position_percent(date, bounds),
                label: format_tick_label(date, IntervalType::Even, span_ms),
            }
        })
        .collect()
}

fn generate_calendar(bounds: &TimelineBounds, kind: IntervalType) -> Vec<IntervalTick> {
    let span_ms = bounds.span_ms();
    let end_day = bounds.end().date();
    let mut ticks = Vec::new();
    let mut boundary = first_boundary(kind, bounds.start().date());

    while let Some(day) = boundary {
        let date = start_of_day(day);
        if date > bounds.end() {
            break;
        }
        let position_percent = if day == end_day {
            100.0
        } else {
            axis_position_percent(date, bounds)
        };
        ticks.push(IntervalTick {
            date,
            position_percent,
            label: format_tick_label(date, kind, span_ms),
        });
        boundary = next_boundary(kind, day);
    }
    ticks
}

/// Boundary of the `kind` bucket containing `day`.
fn first_boundary(kind: IntervalType, day: NaiveDate) -> Option<NaiveDate> {
    match kind {
        IntervalType::Even | IntervalType::Daily => Some(day),
        IntervalType::Weekly => start_of_iso_week(day),
        IntervalType::Monthly => first_of_month(day),
        IntervalType::Yearly => start_of_year_bucket(day.year(), 1),
        IntervalType::Decade => start_of_year_bucket(day.year(), 10),
        IntervalType::Century => start_of_year_bucket(day.year(), 100),
    }
}

/// `None` once the calendar runs out of representable dates.
fn next_boundary(kind: IntervalType, boundary: NaiveDate) -> Option<NaiveDate> {
    match kind {
        IntervalType::Even | IntervalType::Daily => boundary.checked_add_days(Days::new(1)),
        IntervalType::Weekly => boundary.checked_add_days(Days::new(7)),
        IntervalType::Monthly => boundary.checked_add_months(Months::new(1)),
        IntervalType::Yearly => NaiveDate::from_ymd_opt(boundary.year().checked_add(1)?, 1, 1),
        IntervalType::Decade => NaiveDate::from_ymd_opt(boundary.year().checked_add(10)?, 1, 1),
        IntervalType::Century => NaiveDate::from_ymd_opt(boundary.year().checked_add(100)?, 1, 1),
    }
}
