//! Timeline domain model.
//!
//! # Responsibility
//! - Define the canonical records used by layout, intervals and storage.
//! - Own record-level validation shared by every write path.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - Deletion is a soft-delete tombstone, never a hard delete.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod bounds;
pub mod event;
pub mod timeline;

/// Record-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    NilUuid,
    EmptyTitle,
    InvalidColor(String),
    NonFiniteOffset,
    EvenCountOutOfRange(u32),
    UnknownIntervalType(String),
    UnknownOrientation(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "uuid must not be nil"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::InvalidColor(value) => {
                write!(f, "color `{value}` must be #rgb or #rrggbb")
            }
            Self::NonFiniteOffset => write!(f, "event offset must be finite"),
            Self::EvenCountOutOfRange(value) => write!(
                f,
                "even interval count {value} must be within {}..={}",
                timeline::MIN_EVEN_COUNT,
                timeline::MAX_EVEN_COUNT
            ),
            Self::UnknownIntervalType(value) => write!(
                f,
                "unknown interval type `{value}`; expected even|daily|weekly|monthly|yearly|decade|century"
            ),
            Self::UnknownOrientation(value) => write!(
                f,
                "unknown orientation `{value}`; expected horizontal|vertical"
            ),
        }
    }
}

impl Error for ModelValidationError {}
