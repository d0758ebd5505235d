//! Query and simulation-tick methods for `TestCity`.

use bevy::prelude::*;

use crate::buildings::Building;
use crate::earthquake::EarthquakeState;
use crate::grid::{Cell, WorldGrid};
use crate::time_of_day::GameClock;

use super::TestCity;

impl TestCity {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks by directly executing the `FixedUpdate`
    /// schedule. This bypasses Bevy's time system entirely, so tick counts are
    /// exact regardless of wall-clock time.
    ///
    /// Event buffers are only swapped by the main schedule, so every event
    /// sent while ticking stays visible to [`TestCity::events`].
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    /// Tick until `done` holds or `max_ticks` have run. Returns the ticks run.
    pub fn tick_until(&mut self, max_ticks: u32, mut done: impl FnMut(&Self) -> bool) -> u32 {
        for ran in 0..max_ticks {
            if done(self) {
                return ran;
            }
            self.tick(1);
        }
        max_ticks
    }

    // -----------------------------------------------------------------------
    // Queries (note: Bevy's World::query() requires &mut World)
    // -----------------------------------------------------------------------

    /// Access the ECS world mutably (needed for queries in Bevy).
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Get a reference to the world grid.
    pub fn grid(&self) -> &WorldGrid {
        self.app.world().resource::<WorldGrid>()
    }

    /// Get a reference to a specific cell.
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        self.grid().get(x, y)
    }

    /// Get the game clock.
    pub fn clock(&self) -> &GameClock {
        self.app.world().resource::<GameClock>()
    }

    /// Get the earthquake state.
    pub fn earthquake(&self) -> &EarthquakeState {
        self.app.world().resource::<EarthquakeState>()
    }

    /// Get a reference to any resource.
    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    /// Count all building entities.
    pub fn building_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world
            .query_filtered::<Entity, With<Building>>()
            .iter(world)
            .count()
    }

    /// Every `E` sent since the city was created, oldest first.
    pub fn events<E: Event + Clone>(&self) -> Vec<E> {
        let events = self.app.world().resource::<Events<E>>();
        let mut cursor = events.get_cursor();
        cursor.read(events).cloned().collect()
    }
}
