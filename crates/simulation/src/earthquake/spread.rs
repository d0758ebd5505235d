use crate::grid::TilePoint;
use crate::sim_rng::ByteSource;
use crate::time_of_day::GameDate;

use super::constants::direction_for;
use super::resources::{EarthquakeSettings, EarthquakeState, EventPhase};

/// The map as seen by the quake.
pub trait EarthquakeMap {
    /// Map width and height in tiles.
    fn dimensions(&self) -> (i32, i32);

    /// Whether the quake may spread onto the tile.
    fn can_advance_to(&self, x: i32, y: i32) -> bool;

    /// Applies the destruction effects to the tile.
    fn devastate(&mut self, x: i32, y: i32);
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Disabled, not yet due, or already over.
    Idle,
    /// The quake began and struck its origin.
    Started { origin: TilePoint },
    /// In progress but between expansion steps.
    Throttled,
    /// A front moved onto `tile` and devastated it.
    Advanced { front: usize, tile: TilePoint },
    /// A front tried to move onto `tile` and was stopped by terrain.
    Blocked { front: usize, tile: TilePoint },
}

/// Clamps one coordinate into `[0, extent - 1]`.
#[inline]
fn clamp_axis(value: i32, extent: i32) -> i32 {
    value.clamp(0, (extent - 1).max(0))
}

impl EarthquakeState {
    /// Advances the quake by one simulation tick.
    ///
    /// Once the throttle fires, the expansion step runs even on the tick that
    /// finishes the quake.
    pub fn process_tick(
        &mut self,
        settings: &EarthquakeSettings,
        date: GameDate,
        rng: &mut impl ByteSource,
        map: &mut impl EarthquakeMap,
    ) -> TickOutcome {
        if !settings.is_enabled() {
            return TickOutcome::Idle;
        }

        match self.phase {
            EventPhase::NotStarted => {
                if date.year != self.trigger_year || date.month != self.trigger_month {
                    return TickOutcome::Idle;
                }
                self.phase = EventPhase::InProgress;
                self.elapsed_duration = 0;
                self.delay_counter = 0;
                let origin = self.fronts[0];
                map.devastate(origin.x, origin.y);
                TickOutcome::Started { origin }
            }
            EventPhase::InProgress => {
                self.delay_counter = self.delay_counter.saturating_add(1);
                if self.delay_counter < self.delay_threshold {
                    return TickOutcome::Throttled;
                }
                self.delay_counter = 0;
                self.elapsed_duration = self.elapsed_duration.saturating_add(1);
                if self.elapsed_duration >= self.target_duration {
                    self.phase = EventPhase::Finished;
                }
                self.expand(rng, map)
            }
            EventPhase::Finished | EventPhase::Unrecognized(_) => TickOutcome::Idle,
        }
    }

    /// Moves one randomly chosen front a single tile. No retry when blocked.
    fn expand(&mut self, rng: &mut impl ByteSource, map: &mut impl EarthquakeMap) -> TickOutcome {
        let (front, dx, dy) = direction_for(rng.random_byte());
        let (width, height) = map.dimensions();
        let current = self.fronts[front];
        let tile = TilePoint::new(
            clamp_axis(current.x.saturating_add(dx), width),
            clamp_axis(current.y.saturating_add(dy), height),
        );

        if !map.can_advance_to(tile.x, tile.y) {
            return TickOutcome::Blocked { front, tile };
        }
        self.fronts[front] = tile;
        map.devastate(tile.x, tile.y);
        TickOutcome::Advanced { front, tile }
    }
}
