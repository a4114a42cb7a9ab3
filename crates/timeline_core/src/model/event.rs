//! Timeline event domain record.
//!
//! # Responsibility
//! - Define the canonical event shape rendered on a timeline.
//! - Track who owns the event position: the user (drag) or auto layout.
//!
//! # Invariants
//! - An event with `offset.is_some() && !auto_layouted` is manually
//!   positioned and must never be moved by auto layout.
//! - `auto_offset` is only set while `auto_layouted` is true.
//! - `color` is `#rgb` or `#rrggbb`.

use crate::model::timeline::{Orientation, TimelineId};
use crate::model::ModelValidationError;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a timeline event.
pub type EventId = Uuid;

/// Color used when the author does not pick one.
pub const DEFAULT_EVENT_COLOR: &str = "#4a90d9";

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Marker size chosen by the author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl EventSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Screen-space offset of the event marker from its anchor on the axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EventOffset {
    pub x: f64,
    pub y: f64,
}

/// Offset produced by auto layout, expressed relative to the axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AutoOffset {
    /// Pixels away from the axis; negative is above/left.
    pub perpendicular: f64,
    /// Pixels along the axis. Auto layout always leaves this at 0.
    pub axis: f64,
}

impl AutoOffset {
    /// Maps the axis-relative offset onto screen x/y for `orientation`.
    pub fn to_screen(self, orientation: Orientation) -> EventOffset {
        match orientation {
            Orientation::Horizontal => EventOffset {
                x: self.axis,
                y: self.perpendicular,
            },
            Orientation::Vertical => EventOffset {
                x: self.perpendicular,
                y: self.axis,
            },
        }
    }
}

/// Canonical timeline event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub uuid: EventId,
    pub timeline_uuid: TimelineId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub color: String,
    #[serde(default)]
    pub size: EventSize,
    /// `None` when the date was missing or could not be parsed.
    pub date: Option<NaiveDateTime>,
    /// Persisted marker offset, whether dragged or auto laid out.
    #[serde(default)]
    pub offset: Option<EventOffset>,
    #[serde(default)]
    pub auto_layouted: bool,
    #[serde(default)]
    pub auto_offset: Option<AutoOffset>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl TimelineEvent {
    /// Creates an unpositioned event with default presentation.
    pub fn new(
        timeline_uuid: TimelineId,
        title: impl Into<String>,
        date: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            timeline_uuid,
            title: title.into(),
            description: String::new(),
            image_url: None,
            color: DEFAULT_EVENT_COLOR.to_string(),
            size: EventSize::default(),
            date,
            offset: None,
            auto_layouted: false,
            auto_offset: None,
            is_deleted: false,
        }
    }

    /// Whether the author pinned this event by dragging it.
    pub fn is_manually_positioned(&self) -> bool {
        self.offset.is_some() && !self.auto_layouted
    }

    /// Whether auto layout may (re)place this event.
    pub fn is_layout_eligible(&self) -> bool {
        !self.is_manually_positioned()
    }

    /// Pins the event at a user-chosen offset.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.offset = Some(EventOffset { x, y });
        self.auto_layouted = false;
        self.auto_offset = None;
    }

    /// Releases a pinned position so the next layout pass places the event.
    pub fn clear_position(&mut self) {
        self.offset = None;
        self.auto_layouted = false;
        self.auto_offset = None;
    }

    /// Stores an offset chosen by auto layout.
    pub fn apply_auto_offset(&mut self, auto_offset: AutoOffset, orientation: Orientation) {
        self.offset = Some(auto_offset.to_screen(orientation));
        self.auto_layouted = true;
        self.auto_offset = Some(auto_offset);
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.uuid.is_nil() || self.timeline_uuid.is_nil() {
            return Err(ModelValidationError::NilUuid);
        }
        if self.title.trim().is_empty() {
            return Err(ModelValidationError::EmptyTitle);
        }
        if !HEX_COLOR_RE.is_match(&self.color) {
            return Err(ModelValidationError::InvalidColor(self.color.clone()));
        }
        if let Some(offset) = self.offset {
            if !offset.x.is_finite() || !offset.y.is_finite() {
                return Err(ModelValidationError::NonFiniteOffset);
            }
        }
        Ok(())
    }
}
