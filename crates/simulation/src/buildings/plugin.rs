use bevy::prelude::*;

use super::collapse::remove_collapsed_buildings;

pub struct BuildingsPlugin;

impl Plugin for BuildingsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            remove_collapsed_buildings.in_set(crate::SimulationSet::PostSim),
        );
    }
}
