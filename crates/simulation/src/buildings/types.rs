use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grid::ZoneType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildingState {
    #[default]
    Active,
    /// Destroyed by fire or a collapse cascade; removed at the end of the tick.
    Collapsed,
    /// Removed by a scenario event rather than by the player.
    DeletedByGame,
}

/// A square building anchored at its top-left tile.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub zone_type: ZoneType,
    pub grid_x: usize,
    pub grid_y: usize,
    pub size: usize,
    pub state: BuildingState,
}

/// Neighbouring parts of a multi-part structure (walls, aqueduct spans,
/// storage yard spaces). Collapsing one part cascades along the chain.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildingLinks {
    pub prev: Option<Entity>,
    pub next: Option<Entity>,
}

impl Building {
    pub fn new(zone_type: ZoneType, grid_x: usize, grid_y: usize, size: usize) -> Self {
        Self {
            zone_type,
            grid_x,
            grid_y,
            size: size.max(1),
            state: BuildingState::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == BuildingState::Active
    }

    /// Tiles covered by the building that lie on a `width` x `height` map,
    /// row by row.
    pub fn footprint_within(
        &self,
        width: usize,
        height: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        let x_end = self.grid_x.saturating_add(self.size).min(width);
        let y_end = self.grid_y.saturating_add(self.size).min(height);
        (self.grid_y..y_end).flat_map(move |y| (self.grid_x..x_end).map(move |x| (x, y)))
    }
}
