//! Per-pass lane occupancy.
//!
//! # Invariants
//! - Recorded positions are append-only for the lifetime of one pass.
//! - Two non-overlapping placements in the same lane are at least
//!   `min_distance` percent apart.

use crate::config::OrientationProfile;
use serde::{Deserialize, Serialize};

/// Side of the axis a lane lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneSide {
    /// Above a horizontal axis, left of a vertical one.
    Leading,
    /// Below a horizontal axis, right of a vertical one.
    Trailing,
}

impl LaneSide {
    /// Side preferred by the event at sorted `rank`; even ranks lead.
    pub fn for_rank(rank: usize) -> Self {
        if rank % 2 == 0 {
            Self::Leading
        } else {
            Self::Trailing
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Leading => Self::Trailing,
            Self::Trailing => Self::Leading,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Self::Leading => -1.0,
            Self::Trailing => 1.0,
        }
    }
}

/// Lane chosen for one event in one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanePlacement {
    pub side: LaneSide,
    pub lane: usize,
    /// Set when every lane was taken and the event was stacked on lane 0.
    pub overlapping: bool,
}

impl LanePlacement {
    /// Pixel distance from the axis; negative on the leading side.
    pub fn perpendicular_offset(&self, profile: &OrientationProfile) -> f64 {
        let lane_rank = (self.lane + 1) as f64;
        profile.base_offset_px + self.side.sign() * lane_rank * profile.lane_spacing_px
    }
}

/// Occupied axis positions, one list per lane on each side.
#[derive(Debug)]
pub(crate) struct LaneTracks {
    leading: Vec<Vec<f64>>,
    trailing: Vec<Vec<f64>>,
    min_distance: f64,
}

impl LaneTracks {
    pub(crate) fn new(max_lanes: usize, min_distance: f64) -> Self {
        Self {
            leading: vec![Vec::new(); max_lanes],
            trailing: vec![Vec::new(); max_lanes],
            min_distance,
        }
    }

    fn track(&self, side: LaneSide) -> &[Vec<f64>] {
        match side {
            LaneSide::Leading => &self.leading,
            LaneSide::Trailing => &self.trailing,
        }
    }

    fn track_mut(&mut self, side: LaneSide) -> &mut [Vec<f64>] {
        match side {
            LaneSide::Leading => &mut self.leading,
            LaneSide::Trailing => &mut self.trailing,
        }
    }

    pub(crate) fn is_lane_free(&self, side: LaneSide, lane: usize, position: f64) -> bool {
        self.track(side).get(lane).is_some_and(|occupied| {
            occupied
                .iter()
                .all(|taken| (taken - position).abs() >= self.min_distance)
        })
    }

    /// Places `position` in the first free lane, preferred side first.
    ///
    /// Falls back to lane 0 on the preferred side when both sides are full.
    pub(crate) fn place(&mut self, position: f64, preferred: LaneSide) -> LanePlacement {
        let lane_count = self.leading.len();
        for side in [preferred, preferred.opposite()] {
            for lane in 0..lane_count {
                if self.is_lane_free(side, lane, position) {
                    self.record(side, lane, position);
                    return LanePlacement {
                        side,
                        lane,
                        overlapping: false,
                    };
                }
            }
        }

        self.record(preferred, 0, position);
        LanePlacement {
            side: preferred,
            lane: 0,
            overlapping: true,
        }
    }

    fn record(&mut self, side: LaneSide, lane: usize, position: f64) {
        if let Some(occupied) = self.track_mut(side).get_mut(lane) {
            occupied.push(position);
        }
    }
}
