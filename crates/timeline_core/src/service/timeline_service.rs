//! Timeline use-case service.
//!
//! # Responsibility
//! - Orchestrate timeline/event storage with layout and interval generation.
//! - Persist the offsets auto layout produces so a reload renders the same.
//!
//! # Invariants
//! - Every mutation that can change lane occupancy re-runs layout for the
//!   whole timeline.
//! - `relayout` only writes events whose position actually changed.
//! - Manually positioned events are never rewritten by `relayout`.

use crate::config::CoreConfig;
use crate::interval::{IntervalAvailability, IntervalGenerator, IntervalTick};
use crate::layout::LayoutEngine;
use crate::model::bounds::{BoundsError, TimelineBounds};
use crate::model::event::{EventId, EventSize, TimelineEvent};
use crate::model::timeline::{IntervalSettings, Orientation, Timeline, TimelineId};
use crate::model::ModelValidationError;
use crate::repo::event_repo::EventRepository;
use crate::repo::timeline_repo::TimelineRepository;
use crate::repo::RepoError;
use chrono::NaiveDateTime;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for timeline use cases.
#[derive(Debug)]
pub enum TimelineServiceError {
    TimelineNotFound(TimelineId),
    EventNotFound(EventId),
    Bounds(BoundsError),
    Validation(ModelValidationError),
    Repo(RepoError),
}

impl Display for TimelineServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimelineNotFound(id) => write!(f, "timeline not found: {id}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::Bounds(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TimelineServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bounds(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TimelineServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<BoundsError> for TimelineServiceError {
    fn from(value: BoundsError) -> Self {
        Self::Bounds(value)
    }
}

impl From<ModelValidationError> for TimelineServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type TimelineServiceResult<T> = Result<T, TimelineServiceError>;

/// Input for creating a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTimelineRequest {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub orientation: Orientation,
    pub interval: IntervalSettings,
}

/// Input for adding an event to a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEventRequest {
    pub timeline_id: TimelineId,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    /// `None` keeps the default color.
    pub color: Option<String>,
    pub size: EventSize,
    pub date: Option<NaiveDateTime>,
}

/// Outcome of one layout-and-persist pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayoutSummary {
    /// Events auto layout placed.
    pub placed: usize,
    /// Events skipped because the author pinned them.
    pub pinned: usize,
    /// Events whose stored position changed.
    pub persisted: usize,
}

/// Use-case facade over timeline and event repositories.
pub struct TimelineService<T: TimelineRepository, E: EventRepository> {
    timelines: T,
    events: E,
    layout: LayoutEngine,
    intervals: IntervalGenerator,
}

impl<T: TimelineRepository, E: EventRepository> TimelineService<T, E> {
    /// Creates a service with default layout and interval settings.
    pub fn new(timelines: T, events: E) -> Self {
        Self::with_config(timelines, events, &CoreConfig::default())
    }

    pub fn with_config(timelines: T, events: E, config: &CoreConfig) -> Self {
        Self {
            timelines,
            events,
            layout: LayoutEngine::new(config.layout),
            intervals: IntervalGenerator::new(config.intervals),
        }
    }

    pub fn create_timeline(
        &self,
        request: CreateTimelineRequest,
    ) -> TimelineServiceResult<Timeline> {
        let bounds = TimelineBounds::new(request.start, request.end)?;
        let mut timeline = Timeline::new(request.title.trim(), bounds);
        timeline.orientation = request.orientation;
        timeline.interval = request.interval;

        let id = self.timelines.create_timeline(&timeline)?;
        info!(
            "event=timeline_create module=service status=ok timeline_id={id} orientation={} interval={}",
            timeline.orientation.as_str(),
            timeline.interval.kind
        );
        Ok(timeline)
    }

    pub fn get_timeline(&self, id: TimelineId) -> TimelineServiceResult<Timeline> {
        self.timelines
            .get_timeline(id, false)?
            .ok_or(TimelineServiceError::TimelineNotFound(id))
    }

    pub fn list_timelines(&self) -> TimelineServiceResult<Vec<Timeline>> {
        Ok(self.timelines.list_timelines(false)?)
    }

    pub fn list_events(&self, timeline_id: TimelineId) -> TimelineServiceResult<Vec<TimelineEvent>> {
        self.get_timeline(timeline_id)?;
        Ok(self.events.list_events(timeline_id)?)
    }

    /// Replaces the timeline's interval settings.
    pub fn update_interval_settings(
        &self,
        id: TimelineId,
        settings: IntervalSettings,
    ) -> TimelineServiceResult<Timeline> {
        settings.validate()?;
        let mut timeline = self.get_timeline(id)?;
        timeline.interval = settings;
        self.timelines.update_timeline(&timeline)?;
        Ok(timeline)
    }

    /// Changes the bounds; auto-placed events are laid out again.
    pub fn update_bounds(
        &self,
        id: TimelineId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> TimelineServiceResult<Timeline> {
        let mut timeline = self.get_timeline(id)?;
        timeline.bounds = TimelineBounds::new(start, end)?;
        self.timelines.update_timeline(&timeline)?;
        self.relayout(id)?;
        Ok(timeline)
    }

    /// Switches axis direction; auto-placed events are laid out again.
    pub fn set_orientation(
        &self,
        id: TimelineId,
        orientation: Orientation,
    ) -> TimelineServiceResult<Timeline> {
        let mut timeline = self.get_timeline(id)?;
        timeline.orientation = orientation;
        self.timelines.update_timeline(&timeline)?;
        self.relayout(id)?;
        Ok(timeline)
    }

    pub fn delete_timeline(&self, id: TimelineId) -> TimelineServiceResult<()> {
        self.timelines.soft_delete_timeline(id).map_err(|err| match err {
            RepoError::NotFound(_) => TimelineServiceError::TimelineNotFound(id),
            other => other.into(),
        })
    }

    /// Adds an event and lays the timeline out again.
    ///
    /// Returns the stored event including its auto-layout offset.
    pub fn add_event(&self, request: NewEventRequest) -> TimelineServiceResult<TimelineEvent> {
        self.get_timeline(request.timeline_id)?;

        let mut event = TimelineEvent::new(request.timeline_id, request.title.trim(), request.date);
        event.description = request.description;
        event.image_url = request.image_url;
        if let Some(color) = request.color {
            event.color = color;
        }
        event.size = request.size;

        let id = self.events.create_event(&event)?;
        self.relayout(request.timeline_id)?;
        self.get_event(id)
    }

    pub fn get_event(&self, id: EventId) -> TimelineServiceResult<TimelineEvent> {
        self.events
            .get_event(id, false)?
            .ok_or(TimelineServiceError::EventNotFound(id))
    }

    /// Saves content edits (title, description, image, color, size, date).
    ///
    /// Position fields of `event` are ignored; the stored ones are kept.
    pub fn update_event_content(
        &self,
        event: &TimelineEvent,
    ) -> TimelineServiceResult<TimelineEvent> {
        let stored = self.get_event(event.uuid)?;
        let updated = TimelineEvent {
            offset: stored.offset,
            auto_layouted: stored.auto_layouted,
            auto_offset: stored.auto_offset,
            timeline_uuid: stored.timeline_uuid,
            is_deleted: stored.is_deleted,
            ..event.clone()
        };
        self.events.update_event(&updated)?;
        if updated.date != stored.date {
            self.relayout(stored.timeline_uuid)?;
        }
        self.get_event(event.uuid)
    }

    /// Pins an event where the author dropped it.
    ///
    /// The remaining auto-placed events are laid out again without it.
    pub fn move_event(&self, id: EventId, x: f64, y: f64) -> TimelineServiceResult<TimelineEvent> {
        let mut event = self.get_event(id)?;
        event.move_to(x, y);
        self.events.update_event(&event)?;
        info!("event=event_move module=service status=ok event_id={id}");
        self.relayout(event.timeline_uuid)?;
        self.get_event(id)
    }

    /// Unpins an event and lets auto layout place it again.
    pub fn reset_event_position(&self, id: EventId) -> TimelineServiceResult<TimelineEvent> {
        let mut event = self.get_event(id)?;
        event.clear_position();
        self.events.update_event(&event)?;
        self.relayout(event.timeline_uuid)?;
        self.get_event(id)
    }

    pub fn delete_event(&self, id: EventId) -> TimelineServiceResult<()> {
        let event = self.get_event(id)?;
        self.events.soft_delete_event(id)?;
        self.relayout(event.timeline_uuid)?;
        Ok(())
    }

    /// Lays out every event of the timeline and stores changed positions.
    pub fn relayout(&self, timeline_id: TimelineId) -> TimelineServiceResult<RelayoutSummary> {
        let timeline = self.get_timeline(timeline_id)?;
        let events = self.events.list_events(timeline_id)?;
        let laid_out = self
            .layout
            .layout(&events, timeline.orientation, &timeline.bounds);

        let pinned = events
            .iter()
            .filter(|event| event.is_manually_positioned())
            .count();
        let changed = events
            .iter()
            .zip(laid_out)
            .filter(|(before, after)| before != &after)
            .map(|(_, after)| after)
            .collect::<Vec<_>>();
        let persisted = self.events.save_offsets(&changed)?;

        let summary = RelayoutSummary {
            placed: events.len() - pinned,
            pinned,
            persisted,
        };
        info!(
            "event=timeline_relayout module=service status=ok timeline_id={timeline_id} placed={} pinned={} persisted={}",
            summary.placed, summary.pinned, summary.persisted
        );
        Ok(summary)
    }

    /// Ticks for the timeline's current interval settings.
    pub fn interval_ticks(&self, timeline_id: TimelineId) -> TimelineServiceResult<Vec<IntervalTick>> {
        let timeline = self.get_timeline(timeline_id)?;
        Ok(self.intervals.generate(
            &timeline.bounds,
            timeline.interval.kind,
            Some(timeline.interval.even_count),
        ))
    }

    /// Interval types with tick counts and whether the UI should offer them.
    pub fn available_intervals(
        &self,
        timeline_id: TimelineId,
    ) -> TimelineServiceResult<Vec<IntervalAvailability>> {
        let timeline = self.get_timeline(timeline_id)?;
        Ok(self
            .intervals
            .availability(&timeline.bounds, Some(timeline.interval.even_count)))
    }
}
