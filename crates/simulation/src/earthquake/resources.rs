use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_START_YEAR;
use crate::grid::TilePoint;
use crate::sim_rng::ByteSource;

use super::constants::{severity_profile, FRONT_COUNT, MONTH_BASE, MONTH_MASK};

/// Configured intensity tier. Stored as an integer level in scenario files;
/// levels outside 0..=3 read as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum EarthquakeSeverity {
    #[default]
    None,
    Small,
    Medium,
    Large,
}

impl EarthquakeSeverity {
    pub fn from_raw(level: i32) -> Self {
        match level {
            1 => EarthquakeSeverity::Small,
            2 => EarthquakeSeverity::Medium,
            3 => EarthquakeSeverity::Large,
            _ => EarthquakeSeverity::None,
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            EarthquakeSeverity::None => 0,
            EarthquakeSeverity::Small => 1,
            EarthquakeSeverity::Medium => 2,
            EarthquakeSeverity::Large => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EarthquakeSeverity::None => "none",
            EarthquakeSeverity::Small => "small",
            EarthquakeSeverity::Medium => "medium",
            EarthquakeSeverity::Large => "large",
        }
    }
}

impl From<i32> for EarthquakeSeverity {
    fn from(level: i32) -> Self {
        Self::from_raw(level)
    }
}

impl From<EarthquakeSeverity> for i32 {
    fn from(severity: EarthquakeSeverity) -> Self {
        severity.raw()
    }
}

/// Lifecycle stage. Codes outside 0..=2 can only come from a save file and are
/// kept verbatim so the block round-trips; such a state never advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventPhase {
    #[default]
    NotStarted,
    InProgress,
    Finished,
    Unrecognized(i32),
}

impl EventPhase {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => EventPhase::NotStarted,
            1 => EventPhase::InProgress,
            2 => EventPhase::Finished,
            other => EventPhase::Unrecognized(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            EventPhase::NotStarted => 0,
            EventPhase::InProgress => 1,
            EventPhase::Finished => 2,
            EventPhase::Unrecognized(code) => code,
        }
    }
}

/// Scenario input for the earthquake. Read-only while the scenario runs.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarthquakeSettings {
    pub severity: EarthquakeSeverity,
    pub origin: TilePoint,
    pub start_year: i32,
    /// Years after `start_year` in which the quake strikes.
    pub offset_year: i32,
}

impl Default for EarthquakeSettings {
    fn default() -> Self {
        Self {
            severity: EarthquakeSeverity::None,
            origin: TilePoint::UNSET,
            start_year: DEFAULT_START_YEAR,
            offset_year: 0,
        }
    }
}

impl EarthquakeSettings {
    /// A scenario without a severity or without an origin never has a quake.
    pub fn is_enabled(&self) -> bool {
        self.severity != EarthquakeSeverity::None && !self.origin.is_unset()
    }

    pub fn trigger_year(&self) -> i32 {
        self.start_year + self.offset_year
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EarthquakeState {
    pub trigger_year: i32,
    /// Zero-based month, same convention as `GameClock::month`.
    pub trigger_month: i32,
    pub phase: EventPhase,
    /// Completed expansion steps.
    pub elapsed_duration: i32,
    pub target_duration: i32,
    /// Ticks since the last expansion step.
    pub delay_counter: i32,
    pub delay_threshold: i32,
    /// Leading edge of each front.
    pub fronts: [TilePoint; FRONT_COUNT],
}

impl EarthquakeState {
    /// Schedules the quake described by `settings`.
    ///
    /// Draws the month first, then one duration byte for SMALL, MEDIUM and
    /// LARGE. NONE draws the month only. Other systems share the stream, so
    /// this order must not change.
    pub fn initialize(settings: &EarthquakeSettings, rng: &mut impl ByteSource) -> Self {
        let trigger_month = MONTH_BASE + i32::from(rng.random_byte() & MONTH_MASK);
        let (target_duration, delay_threshold) = match severity_profile(settings.severity) {
            Some(profile) => (
                profile.base_duration + i32::from(rng.random_byte() & profile.duration_mask),
                profile.delay,
            ),
            None => (0, 0),
        };

        Self {
            trigger_year: settings.trigger_year(),
            trigger_month,
            phase: EventPhase::NotStarted,
            elapsed_duration: 0,
            target_duration,
            delay_counter: 0,
            delay_threshold,
            fronts: [settings.origin; FRONT_COUNT],
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == EventPhase::InProgress
    }

    pub fn is_finished(&self) -> bool {
        self.phase == EventPhase::Finished
    }
}
