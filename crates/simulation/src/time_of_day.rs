use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{DAYS_PER_MONTH, DAYS_PER_YEAR, DEFAULT_START_YEAR, MONTHS_PER_YEAR};

/// Calendar position at month granularity. `month` is zero-based (0..12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameDate {
    pub year: i32,
    pub month: i32,
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct GameClock {
    pub start_year: i32,
    /// Days elapsed since the scenario started, counting from 1.
    pub day: u32,
    pub hour: f32,
    pub speed: f32,
    pub paused: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::starting_in(DEFAULT_START_YEAR)
    }
}

impl GameClock {
    /// Minutes per sim tick at 1x speed
    const MINUTES_PER_TICK: f32 = 1.0;

    pub fn starting_in(start_year: i32) -> Self {
        Self {
            start_year,
            day: 1,
            hour: 0.0,
            speed: 1.0,
            paused: false,
        }
    }

    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.hour += Self::MINUTES_PER_TICK / 60.0;
        if self.hour >= 24.0 {
            self.hour -= 24.0;
            self.day += 1;
        }
    }

    fn days_elapsed(&self) -> u32 {
        self.day.saturating_sub(1)
    }

    pub fn year(&self) -> i32 {
        self.start_year + (self.days_elapsed() / DAYS_PER_YEAR) as i32
    }

    pub fn month(&self) -> i32 {
        ((self.days_elapsed() / DAYS_PER_MONTH) % MONTHS_PER_YEAR) as i32
    }

    pub fn date(&self) -> GameDate {
        GameDate {
            year: self.year(),
            month: self.month(),
        }
    }

    /// Jumps to the first day of `month` in `year`. Dates before the start
    /// year clamp to the first day of the scenario.
    pub fn set_date(&mut self, year: i32, month: i32) {
        let months = i64::from(year - self.start_year) * i64::from(MONTHS_PER_YEAR)
            + i64::from(month.clamp(0, MONTHS_PER_YEAR as i32 - 1));
        let days = u32::try_from(months.max(0) * i64::from(DAYS_PER_MONTH)).unwrap_or(u32::MAX - 1);
        self.day = days + 1;
        self.hour = 0.0;
    }

    pub fn formatted(&self) -> String {
        let h = self.hour as u32;
        let m = ((self.hour - h as f32) * 60.0) as u32;
        let day_of_month = self.days_elapsed() % DAYS_PER_MONTH + 1;
        format!(
            "Year {} Month {} Day {} {:02}:{:02}",
            self.year(),
            self.month() + 1,
            day_of_month,
            h,
            m
        )
    }
}

pub fn tick_game_clock(mut clock: ResMut<GameClock>) {
    clock.tick();
}

/// Scales the FixedUpdate timestep based on GameClock speed.
/// Base rate is 10 Hz (100 ms). At 2x speed it becomes 50 ms, at 4x -> 25 ms, etc.
pub fn sync_fixed_timestep(clock: Res<GameClock>, mut time: ResMut<Time<Fixed>>) {
    let base_hz = std::time::Duration::from_millis(100);
    let effective = if clock.paused || clock.speed <= 0.0 {
        base_hz
    } else {
        base_hz.div_f32(clock.speed.clamp(0.25, 16.0))
    };
    time.set_timestep(effective);
}

pub struct TimeOfDayPlugin;

impl Plugin for TimeOfDayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameClock>()
            .add_systems(
                FixedUpdate,
                tick_game_clock.in_set(crate::SimulationSet::PreSim),
            )
            .add_systems(Update, sync_fixed_timestep);
    }
}
