//! Timeline date span.
//!
//! # Responsibility
//! - Hold the `[start, end]` span every axis position is computed against.
//!
//! # Invariants
//! - `start < end` for every constructed value, including deserialized ones.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation error for timeline bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsError {
    /// `end` is equal to or earlier than `start`.
    NotIncreasing {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl Display for BoundsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotIncreasing { start, end } => {
                write!(f, "timeline end ({end}) must be after start ({start})")
            }
        }
    }
}

impl Error for BoundsError {}

/// Immutable, validated date span of one timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimelineBounds")]
pub struct TimelineBounds {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawTimelineBounds {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawTimelineBounds> for TimelineBounds {
    type Error = BoundsError;

    fn try_from(value: RawTimelineBounds) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl TimelineBounds {
    /// Creates bounds, rejecting empty or reversed spans.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, BoundsError> {
        if start >= end {
            return Err(BoundsError::NotIncreasing { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds bounds from possibly missing parts.
    ///
    /// Returns `None` for missing or reversed input instead of an error, so
    /// callers that must degrade gracefully can branch on presence only.
    pub fn from_parts(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Option<Self> {
        Self::new(start?, end?).ok()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Span length in milliseconds. Always positive.
    pub fn span_ms(&self) -> i64 {
        self.end
            .signed_duration_since(self.start)
            .num_milliseconds()
            .max(1)
    }
}
