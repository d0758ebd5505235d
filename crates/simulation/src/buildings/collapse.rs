use bevy::prelude::*;

use crate::grid::{Terrain, WorldGrid, ZoneType};

use super::types::{Building, BuildingLinks, BuildingState};

/// Mutable building access shared by every system that destroys buildings.
pub type BuildingQuery<'w, 's> =
    Query<'w, 's, (&'static mut Building, Option<&'static BuildingLinks>)>;

/// Destroys a building the way a fire does. Its footprint loses the building
/// and zone; unless `immediate`, the tiles are left as rubble.
///
/// Returns `false` when the entity is not an active building.
pub fn collapse_on_fire(
    grid: &mut WorldGrid,
    buildings: &mut BuildingQuery<'_, '_>,
    entity: Entity,
    immediate: bool,
) -> bool {
    let Ok((mut building, _)) = buildings.get_mut(entity) else {
        return false;
    };
    if !building.is_active() {
        return false;
    }
    building.state = BuildingState::Collapsed;

    for (x, y) in building.footprint_within(grid.width, grid.height) {
        let cell = grid.get_mut(x, y);
        if cell.building_id != Some(entity) {
            continue;
        }
        cell.building_id = None;
        cell.zone = ZoneType::None;
        cell.terrain.remove(Terrain::BUILDING);
        if !immediate {
            cell.terrain.insert(Terrain::RUBBLE);
        }
    }
    true
}

/// Collapses every part chained to `entity` through [`BuildingLinks`], in both
/// directions. `on_fire` leaves rubble behind the parts. Returns the number of
/// parts destroyed.
pub fn collapse_linked(
    grid: &mut WorldGrid,
    buildings: &mut BuildingQuery<'_, '_>,
    entity: Entity,
    on_fire: bool,
) -> usize {
    let Some(links) = buildings
        .get(entity)
        .ok()
        .and_then(|(_, links)| links.copied())
    else {
        return 0;
    };

    let mut chain: Vec<Entity> = Vec::new();
    for (start, forward) in [(links.prev, false), (links.next, true)] {
        let mut cursor = start;
        while let Some(part) = cursor {
            if part == entity || chain.contains(&part) {
                break;
            }
            chain.push(part);
            cursor = buildings
                .get(part)
                .ok()
                .and_then(|(_, l)| l.copied())
                .and_then(|l| if forward { l.next } else { l.prev });
        }
    }

    chain
        .into_iter()
        .filter(|&part| collapse_on_fire(grid, buildings, part, !on_fire))
        .count()
}

pub fn mark_deleted_by_game(buildings: &mut BuildingQuery<'_, '_>, entity: Entity) {
    if let Ok((mut building, _)) = buildings.get_mut(entity) {
        building.state = BuildingState::DeletedByGame;
    }
}

/// Despawns buildings that were destroyed during this tick.
pub fn remove_collapsed_buildings(mut commands: Commands, buildings: Query<(Entity, &Building)>) {
    let mut removed = 0u32;
    for (entity, building) in &buildings {
        if !building.is_active() {
            commands.entity(entity).despawn();
            removed += 1;
        }
    }
    if removed > 0 {
        debug!("Removed {} destroyed buildings", removed);
    }
}
