//! Automatic event layout.
//!
//! # Responsibility
//! - Assign every auto-layout eligible event a lane beside the axis so that
//!   markers close in time do not overlap.
//! - Convert lanes into perpendicular pixel offsets.
//!
//! # Invariants
//! - Manually positioned events are returned untouched.
//! - Placement order is date ascending, ties broken by input order; output
//!   keeps input order.
//! - Layout never fails; full lanes degrade into overlap.
//! - The result depends only on dates, pins and config, so running layout on
//!   its own output yields the same offsets.

mod lanes;

pub use lanes::{LanePlacement, LaneSide};

use crate::config::LayoutConfig;
use crate::dates::axis_position_or_origin;
use crate::model::bounds::TimelineBounds;
use crate::model::event::{AutoOffset, TimelineEvent};
use crate::model::timeline::Orientation;
use lanes::LaneTracks;
use log::debug;

/// Lane layout engine bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    canvas_extent_px: Option<f64>,
}

struct Candidate {
    index: usize,
    date: Option<chrono::NaiveDateTime>,
    position: f64,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            canvas_extent_px: None,
        }
    }

    /// Uses the actual rendered axis length instead of the assumed canvas.
    ///
    /// Non-positive or non-finite extents are ignored.
    pub fn with_canvas_extent(mut self, extent_px: f64) -> Self {
        if extent_px.is_finite() && extent_px > 0.0 {
            self.canvas_extent_px = Some(extent_px);
        }
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Same-lane separation threshold in axis percent for `orientation`.
    pub fn min_distance_percent(&self, orientation: Orientation) -> f64 {
        let extent = self
            .canvas_extent_px
            .unwrap_or(self.config.profile(orientation).assumed_extent_px);
        self.config.min_distance_percent(extent)
    }

    /// Chooses a lane for every eligible event.
    ///
    /// The result is index-aligned with `events`; pinned events map to `None`.
    pub fn plan_lanes(
        &self,
        events: &[TimelineEvent],
        orientation: Orientation,
        bounds: &TimelineBounds,
    ) -> Vec<Option<LanePlacement>> {
        let mut placements = vec![None; events.len()];

        let mut candidates = events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.is_layout_eligible())
            .map(|(index, event)| Candidate {
                index,
                date: event.date,
                position: axis_position_or_origin(event.date, bounds),
            })
            .collect::<Vec<_>>();
        // Stable: equal dates keep input order.
        candidates.sort_by_key(|candidate| candidate.date);

        if candidates.len() < self.config.lane_scan_threshold {
            for (rank, candidate) in candidates.iter().enumerate() {
                placements[candidate.index] = Some(LanePlacement {
                    side: LaneSide::for_rank(rank),
                    lane: rank / 2,
                    overlapping: false,
                });
            }
            return placements;
        }

        let profile = self.config.profile(orientation);
        let mut tracks = LaneTracks::new(profile.max_lanes, self.min_distance_percent(orientation));
        let mut overlapping = 0_usize;
        for (rank, candidate) in candidates.iter().enumerate() {
            let placement = tracks.place(candidate.position, LaneSide::for_rank(rank));
            if placement.overlapping {
                overlapping += 1;
            }
            placements[candidate.index] = Some(placement);
        }

        if overlapping > 0 {
            debug!(
                "event=layout_lanes_exhausted module=layout status=degraded orientation={} eligible={} overlapping={}",
                orientation.as_str(),
                candidates.len(),
                overlapping
            );
        }
        placements
    }

    /// Returns a copy of `events` with auto offsets applied to eligible events.
    pub fn layout(
        &self,
        events: &[TimelineEvent],
        orientation: Orientation,
        bounds: &TimelineBounds,
    ) -> Vec<TimelineEvent> {
        let placements = self.plan_lanes(events, orientation, bounds);
        let profile = self.config.profile(orientation);

        let laid_out = events
            .iter()
            .zip(placements)
            .map(|(event, placement)| {
                let mut event = event.clone();
                if let Some(placement) = placement {
                    let auto_offset = AutoOffset {
                        perpendicular: placement.perpendicular_offset(profile),
                        axis: 0.0,
                    };
                    event.apply_auto_offset(auto_offset, orientation);
                }
                event
            })
            .collect::<Vec<_>>();

        debug!(
            "event=layout_events module=layout status=ok orientation={} events={}",
            orientation.as_str(),
            events.len()
        );
        laid_out
    }
}

/// Lays out `events` with the default configuration.
pub fn layout_events(
    events: &[TimelineEvent],
    orientation: Orientation,
    bounds: &TimelineBounds,
) -> Vec<TimelineEvent> {
    LayoutEngine::default().layout(events, orientation, bounds)
}
