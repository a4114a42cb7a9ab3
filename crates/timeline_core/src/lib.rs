//! Core domain logic for the timeline authoring app.
//!
//! Owns event lane layout, interval tick generation, the timeline/event
//! records and their storage.

pub mod config;
pub mod dates;
#[cfg(feature = "native")]
pub mod db;
pub mod interval;
pub mod layout;
#[cfg(feature = "native")]
pub mod logging;
pub mod model;
#[cfg(feature = "native")]
pub mod repo;
#[cfg(feature = "native")]
pub mod service;

pub use config::{
    default_log_level, ConfigError, CoreConfig, IntervalConfig, LayoutConfig, LoggingConfig,
};
pub use dates::{axis_position_percent, parse_timeline_date};
pub use interval::{
    count_calendar_ticks, generate_intervals, IntervalAvailability, IntervalGenerator,
    IntervalTick,
};
pub use layout::{layout_events, LaneSide, LanePlacement, LayoutEngine};
#[cfg(feature = "native")]
pub use logging::{init_logging, logging_status};
pub use model::bounds::{BoundsError, TimelineBounds};
pub use model::event::{AutoOffset, EventId, EventOffset, EventSize, TimelineEvent};
pub use model::timeline::{IntervalSettings, IntervalType, Orientation, Timeline, TimelineId};
pub use model::ModelValidationError;
#[cfg(feature = "native")]
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
#[cfg(feature = "native")]
pub use repo::timeline_repo::{SqliteTimelineRepository, TimelineRepository};
#[cfg(feature = "native")]
pub use repo::{RepoError, RepoResult};
#[cfg(feature = "native")]
pub use service::timeline_service::{
    CreateTimelineRequest, NewEventRequest, RelayoutSummary, TimelineService,
    TimelineServiceError, TimelineServiceResult,
};

/// Minimal health-check API for bridge smoke tests.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
