//! Builder methods for map, building, and scenario setup in integration tests.

use bevy::prelude::*;

use crate::buildings::{link_buildings, place_building, Building};
use crate::earthquake::{initialize_in_world, EarthquakeSettings, EarthquakeSeverity, EarthquakeState};
use crate::grid::{Terrain, TilePoint, WorldGrid, ZoneType};
use crate::scenario::{load_scenario, ScenarioConfig};
use crate::sim_rng::SimRng;
use crate::time_of_day::GameClock;

use super::TestCity;

impl TestCity {
    // -----------------------------------------------------------------------
    // Map
    // -----------------------------------------------------------------------

    /// Replace the map with an empty `width` x `height` grid.
    pub fn with_map(mut self, width: usize, height: usize) -> Self {
        self.app
            .world_mut()
            .insert_resource(WorldGrid::new(width, height));
        self
    }

    /// Add a terrain flag to the cell at (x, y).
    pub fn with_terrain(mut self, x: usize, y: usize, terrain: Terrain) -> Self {
        self.app
            .world_mut()
            .resource_mut::<WorldGrid>()
            .get_mut(x, y)
            .terrain
            .insert(terrain);
        self
    }

    // -----------------------------------------------------------------------
    // Buildings
    // -----------------------------------------------------------------------

    /// Place a square building with its top-left corner at (x, y).
    pub fn with_building(mut self, x: usize, y: usize, size: usize, zone: ZoneType) -> Self {
        place_building(self.app.world_mut(), Building::new(zone, x, y, size))
            .expect("building footprint should be free");
        self
    }

    /// Place single-tile buildings at `tiles` and chain them in order.
    pub fn with_linked_buildings(mut self, tiles: &[(usize, usize)]) -> Self {
        let world = self.app.world_mut();
        let parts: Vec<Entity> = tiles
            .iter()
            .map(|&(x, y)| {
                place_building(world, Building::new(ZoneType::None, x, y, 1))
                    .expect("linked part footprint should be free")
            })
            .collect();
        link_buildings(world, &parts);
        self
    }

    // -----------------------------------------------------------------------
    // Scenario
    // -----------------------------------------------------------------------

    /// Load a full scenario (map, buildings, seed, calendar, earthquake).
    pub fn with_scenario(mut self, config: &ScenarioConfig) -> Self {
        load_scenario(self.app.world_mut(), config).expect("scenario should load");
        self
    }

    /// Reseed the shared RNG. Call before `with_earthquake` to affect its draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.app
            .world_mut()
            .insert_resource(SimRng::from_seed_u64(seed));
        self
    }

    /// Configure and schedule an earthquake. The calendar restarts at
    /// `start_year`.
    pub fn with_earthquake(
        mut self,
        severity: EarthquakeSeverity,
        origin: (i32, i32),
        start_year: i32,
        offset_year: i32,
    ) -> Self {
        let world = self.app.world_mut();
        world.insert_resource(EarthquakeSettings {
            severity,
            origin: TilePoint::new(origin.0, origin.1),
            start_year,
            offset_year,
        });
        world.insert_resource(GameClock::starting_in(start_year));
        initialize_in_world(world);
        self
    }

    /// Override the scheduled earthquake's pacing. Keeps tests short.
    pub fn with_earthquake_pacing(mut self, delay_threshold: i32, target_duration: i32) -> Self {
        let mut state = self.app.world_mut().resource_mut::<EarthquakeState>();
        state.delay_threshold = delay_threshold;
        state.target_duration = target_duration;
        self
    }

    /// Jump the calendar to the first day of `month` in `year`.
    pub fn at_date(mut self, year: i32, month: i32) -> Self {
        self.app
            .world_mut()
            .resource_mut::<GameClock>()
            .set_date(year, month);
        self
    }

    /// Jump the calendar to the scheduled earthquake's trigger month.
    pub fn at_earthquake_date(self) -> Self {
        let state = *self.earthquake();
        self.at_date(state.trigger_year, state.trigger_month)
    }
}
