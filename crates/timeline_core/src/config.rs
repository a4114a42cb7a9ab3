//! Tunable knobs for layout, interval generation and logging.
//!
//! # Responsibility
//! - Provide defaults matching the behavior the UI was designed around.
//! - Load partial overrides from JSON, filling gaps with defaults.
//!
//! # Invariants
//! - A config that passed `validate()` never makes layout or interval
//!   generation divide by zero or loop without progress.

use crate::model::timeline::{Orientation, DEFAULT_EVEN_COUNT, MAX_EVEN_COUNT, MIN_EVEN_COUNT};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum on-screen separation between markers sharing a lane.
pub const DEFAULT_MIN_DISTANCE_PX: f64 = 150.0;
/// Perpendicular distance between consecutive lanes.
pub const DEFAULT_LANE_SPACING_PX: f64 = 60.0;
/// Below this many eligible events layout alternates sides without scanning lanes.
pub const DEFAULT_LANE_SCAN_THRESHOLD: usize = 3;
/// Fewest calendar ticks for a unit to be offered.
pub const DEFAULT_MIN_CALENDAR_TICKS: u64 = 2;
/// Most calendar ticks before labels become unreadable.
pub const DEFAULT_MAX_CALENDAR_TICKS: u64 = 30;

/// Configuration load/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Lane geometry for one axis orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationProfile {
    /// Lanes available on each side of the axis.
    pub max_lanes: usize,
    /// Canvas length along the axis assumed when converting pixels to percent.
    pub assumed_extent_px: f64,
    pub lane_spacing_px: f64,
    pub base_offset_px: f64,
}

impl OrientationProfile {
    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.max_lanes == 0 {
            return Err(ConfigError::Invalid(format!("{name}.max_lanes must be > 0")));
        }
        if !(self.assumed_extent_px.is_finite() && self.assumed_extent_px > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "{name}.assumed_extent_px must be a positive number"
            )));
        }
        if !(self.lane_spacing_px.is_finite() && self.lane_spacing_px > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "{name}.lane_spacing_px must be a positive number"
            )));
        }
        if !self.base_offset_px.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "{name}.base_offset_px must be finite"
            )));
        }
        Ok(())
    }
}

/// Event layout engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub horizontal: OrientationProfile,
    pub vertical: OrientationProfile,
    pub min_distance_px: f64,
    pub lane_scan_threshold: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal: OrientationProfile {
                max_lanes: 5,
                assumed_extent_px: 800.0,
                lane_spacing_px: DEFAULT_LANE_SPACING_PX,
                base_offset_px: 0.0,
            },
            vertical: OrientationProfile {
                max_lanes: 4,
                assumed_extent_px: 600.0,
                lane_spacing_px: DEFAULT_LANE_SPACING_PX,
                base_offset_px: 0.0,
            },
            min_distance_px: DEFAULT_MIN_DISTANCE_PX,
            lane_scan_threshold: DEFAULT_LANE_SCAN_THRESHOLD,
        }
    }
}

impl LayoutConfig {
    pub fn profile(&self, orientation: Orientation) -> &OrientationProfile {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    /// Minimum same-lane separation in axis percent for a canvas `extent_px` long.
    pub fn min_distance_percent(&self, extent_px: f64) -> f64 {
        self.min_distance_px / extent_px * 100.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.horizontal.validate("layout.horizontal")?;
        self.vertical.validate("layout.vertical")?;
        if !(self.min_distance_px.is_finite() && self.min_distance_px >= 0.0) {
            return Err(ConfigError::Invalid(
                "layout.min_distance_px must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Interval generator and availability policy settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalConfig {
    pub default_even_count: u32,
    pub max_even_count: u32,
    pub min_calendar_ticks: u64,
    pub max_calendar_ticks: u64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            default_even_count: DEFAULT_EVEN_COUNT,
            max_even_count: MAX_EVEN_COUNT,
            min_calendar_ticks: DEFAULT_MIN_CALENDAR_TICKS,
            max_calendar_ticks: DEFAULT_MAX_CALENDAR_TICKS,
        }
    }
}

impl IntervalConfig {
    /// Resolves a requested even count into `MIN_EVEN_COUNT..=max_even_count`.
    pub fn effective_even_count(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_even_count)
            .clamp(MIN_EVEN_COUNT, self.max_even_count.max(MIN_EVEN_COUNT))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_EVEN_COUNT..=MAX_EVEN_COUNT).contains(&self.max_even_count) {
            return Err(ConfigError::Invalid(format!(
                "intervals.max_even_count must be within {MIN_EVEN_COUNT}..={MAX_EVEN_COUNT}"
            )));
        }
        if !(MIN_EVEN_COUNT..=self.max_even_count).contains(&self.default_even_count) {
            return Err(ConfigError::Invalid(format!(
                "intervals.default_even_count must be within {MIN_EVEN_COUNT}..={}",
                self.max_even_count
            )));
        }
        if self.min_calendar_ticks > self.max_calendar_ticks {
            return Err(ConfigError::Invalid(
                "intervals.min_calendar_ticks must not exceed max_calendar_ticks".to_string(),
            ));
        }
        Ok(())
    }
}

/// Log sink settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: String::new(),
        }
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Top-level core configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub layout: LayoutConfig,
    pub intervals: IntervalConfig,
    pub logging: LoggingConfig,
}

impl CoreConfig {
    /// Parses a (possibly partial) JSON config and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.intervals.validate()
    }
}
