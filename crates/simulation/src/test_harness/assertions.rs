//! Assertion helpers for `TestCity` integration tests.

use crate::earthquake::{EarthquakeSettings, EventPhase};
use crate::grid::Terrain;

use super::TestCity;

impl TestCity {
    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert the earthquake is in the given phase.
    pub fn assert_earthquake_phase(&self, phase: EventPhase) {
        let actual = self.earthquake().phase;
        assert_eq!(
            actual, phase,
            "Expected earthquake phase {phase:?}, found {actual:?}"
        );
    }

    /// Assert that every front lies on the map.
    pub fn assert_fronts_on_map(&self) {
        let grid = self.grid();
        for front in self.earthquake().fronts {
            assert!(
                grid.tile_in_bounds(front).is_some(),
                "Front ({}, {}) is off the {}x{} map",
                front.x,
                front.y,
                grid.width,
                grid.height
            );
        }
    }

    /// Assert that the cell at (x, y) has no terrain flags.
    pub fn assert_cleared(&self, x: usize, y: usize) {
        let terrain = self.cell(x, y).terrain;
        assert_eq!(
            terrain,
            Terrain::EMPTY,
            "Expected cleared terrain at ({x}, {y}), found {terrain:?}"
        );
    }

    /// Assert that the cell at (x, y) still carries `terrain`.
    pub fn assert_has_terrain(&self, x: usize, y: usize, terrain: Terrain) {
        let actual = self.cell(x, y).terrain;
        assert!(
            actual.contains(terrain),
            "Expected {terrain:?} at ({x}, {y}), found {actual:?}"
        );
    }

    /// Assert a specific resource exists in the world.
    pub fn assert_resource_exists<T: bevy::prelude::Resource>(&self) {
        assert!(
            self.world().get_resource::<T>().is_some(),
            "Expected resource {} to exist",
            std::any::type_name::<T>()
        );
    }

    /// Assert the earthquake configuration is active.
    pub fn assert_earthquake_enabled(&self) {
        assert!(
            self.resource::<EarthquakeSettings>().is_enabled(),
            "Expected an enabled earthquake"
        );
    }
}
