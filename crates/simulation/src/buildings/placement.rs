use bevy::prelude::*;

use crate::grid::{Terrain, WorldGrid};

use super::types::{Building, BuildingLinks};

/// Spawns `building` and stamps its footprint onto the grid. Tiles outside the
/// map are skipped. Returns `None` when any in-bounds tile is already occupied.
pub fn place_building(world: &mut World, building: Building) -> Option<Entity> {
    let tiles: Vec<(usize, usize)> = {
        let grid = world.get_resource::<WorldGrid>()?;
        let tiles: Vec<(usize, usize)> = building
            .footprint_within(grid.width, grid.height)
            .collect();
        if tiles.iter().any(|&(x, y)| grid.building_at(x, y).is_some()) {
            warn!(
                "Cannot place building at ({}, {}): footprint occupied",
                building.grid_x, building.grid_y
            );
            return None;
        }
        tiles
    };

    let zone = building.zone_type;
    let entity = world.spawn(building).id();

    let mut grid = world.resource_mut::<WorldGrid>();
    for (x, y) in tiles {
        let cell = grid.get_mut(x, y);
        cell.building_id = Some(entity);
        cell.zone = zone;
        cell.terrain.insert(Terrain::BUILDING);
    }
    Some(entity)
}

/// Chains `parts` in order so that each one links to its neighbours.
pub fn link_buildings(world: &mut World, parts: &[Entity]) {
    for (i, &part) in parts.iter().enumerate() {
        let links = BuildingLinks {
            prev: i.checked_sub(1).map(|p| parts[p]),
            next: parts.get(i + 1).copied(),
        };
        if let Ok(mut entity) = world.get_entity_mut(part) {
            entity.insert(links);
        }
    }
}
