//! # TestCity: headless integration test harness
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for running integration tests without a window or renderer.

mod assertions;
mod queries;
mod setup;

use bevy::prelude::*;

use crate::grid::WorldGrid;
use crate::SimulationPlugin;

/// Map side used by [`TestCity::new`]. Small enough that full-map refresh
/// requests stay cheap.
pub const TEST_MAP_SIDE: usize = 32;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use builder methods to set up city state, then call `tick()` to advance the
/// simulation and query/assert on the resulting ECS state.
pub struct TestCity {
    app: App,
}

impl TestCity {
    /// Create a new **empty** city on a `TEST_MAP_SIDE` square map with no
    /// earthquake configured.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);

        app.insert_resource(WorldGrid::new(TEST_MAP_SIDE, TEST_MAP_SIDE));

        // Run one update so Startup systems execute.
        app.update();

        Self { app }
    }
}

impl Default for TestCity {
    fn default() -> Self {
        Self::new()
    }
}
