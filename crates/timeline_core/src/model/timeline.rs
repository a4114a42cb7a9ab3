//! Timeline domain record.
//!
//! # Responsibility
//! - Define the canonical timeline shape persisted by core.
//! - Hold the one interval-settings record consumers read from.
//!
//! # Invariants
//! - `title` is never blank.
//! - `interval.even_count` stays within `2..=MAX_EVEN_COUNT`.

use crate::model::bounds::TimelineBounds;
use crate::model::ModelValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a timeline.
pub type TimelineId = Uuid;

/// Default number of evenly spaced ticks.
pub const DEFAULT_EVEN_COUNT: u32 = 5;
/// Smallest meaningful even tick count (start and end).
pub const MIN_EVEN_COUNT: u32 = 2;
/// Hard cap on evenly spaced ticks.
pub const MAX_EVEN_COUNT: u32 = 20;

/// Direction the time axis is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Time runs left to right; lanes stack above and below.
    #[default]
    Horizontal,
    /// Time runs top to bottom; lanes stack left and right.
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl FromStr for Orientation {
    type Err = ModelValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(ModelValidationError::UnknownOrientation(other.to_string())),
        }
    }
}

/// Strategy used to place interval ticks on the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalType {
    /// Fixed number of ticks linearly spaced in time.
    #[default]
    Even,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Decade,
    Century,
}

impl IntervalType {
    /// All types in UI display order.
    pub const ALL: [IntervalType; 7] = [
        Self::Even,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::Decade,
        Self::Century,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Even => "even",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Decade => "decade",
            Self::Century => "century",
        }
    }

    /// Whether ticks follow calendar boundaries rather than even spacing.
    pub fn is_calendar(self) -> bool {
        !matches!(self, Self::Even)
    }
}

impl Display for IntervalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalType {
    type Err = ModelValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or(ModelValidationError::UnknownIntervalType(normalized))
    }
}

/// Canonical interval settings of one timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalSettings {
    pub kind: IntervalType,
    /// Only read when `kind == IntervalType::Even`.
    #[serde(default = "default_even_count")]
    pub even_count: u32,
}

fn default_even_count() -> u32 {
    DEFAULT_EVEN_COUNT
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            kind: IntervalType::Even,
            even_count: DEFAULT_EVEN_COUNT,
        }
    }
}

impl IntervalSettings {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if !(MIN_EVEN_COUNT..=MAX_EVEN_COUNT).contains(&self.even_count) {
            return Err(ModelValidationError::EvenCountOutOfRange(self.even_count));
        }
        Ok(())
    }
}

/// Canonical timeline record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub uuid: TimelineId,
    pub title: String,
    pub bounds: TimelineBounds,
    pub orientation: Orientation,
    pub interval: IntervalSettings,
    pub is_deleted: bool,
}

impl Timeline {
    /// Creates a horizontal timeline with default interval settings.
    pub fn new(title: impl Into<String>, bounds: TimelineBounds) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            bounds,
            orientation: Orientation::default(),
            interval: IntervalSettings::default(),
            is_deleted: false,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.uuid.is_nil() {
            return Err(ModelValidationError::NilUuid);
        }
        if self.title.trim().is_empty() {
            return Err(ModelValidationError::EmptyTitle);
        }
        self.interval.validate()
    }
}
