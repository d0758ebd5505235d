use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::buildings::{collapse_linked, collapse_on_fire, mark_deleted_by_game, BuildingQuery};
use crate::effects::DustCloudEvent;
use crate::grid::{Terrain, TilePoint, WorldGrid};
use crate::map_refresh::{RoutingClasses, RoutingRecomputeEvent, TerrainRefreshEvent};
use crate::sound_effects::{PlaySfxEvent, SfxEvent};

use super::constants::{BLOCKING_TERRAIN, DUST_CLOUD_INTENSITY};
use super::spread::EarthquakeMap;

/// Everything a quake touches when it strikes a tile.
#[derive(SystemParam)]
pub struct Devastation<'w, 's> {
    grid: ResMut<'w, WorldGrid>,
    buildings: BuildingQuery<'w, 's>,
    sfx: EventWriter<'w, PlaySfxEvent>,
    terrain_refresh: EventWriter<'w, TerrainRefreshEvent>,
    routing: EventWriter<'w, RoutingRecomputeEvent>,
    dust: EventWriter<'w, DustCloudEvent>,
}

impl Devastation<'_, '_> {
    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// Destroys whatever stands on `(x, y)` and asks every map-derived layer
    /// to rebuild. Order: structure, terrain, decorations, routing, dust.
    pub fn devastate_tile(&mut self, x: usize, y: usize) {
        if let Some(entity) = self.grid.building_at(x, y) {
            collapse_on_fire(&mut self.grid, &mut self.buildings, entity, false);
            let cascaded = collapse_linked(&mut self.grid, &mut self.buildings, entity, true);
            self.sfx.send(PlaySfxEvent::new(SfxEvent::Explosion));
            mark_deleted_by_game(&mut self.buildings, entity);
            debug!(
                "Earthquake destroyed building {:?} at ({}, {}), {} linked parts",
                entity, x, y, cascaded
            );
        }

        self.grid.get_mut(x, y).terrain = Terrain::EMPTY;

        let full_map = self.grid.full_rect();
        self.terrain_refresh
            .send(TerrainRefreshEvent::EarthquakeTile { x, y });
        self.terrain_refresh.send(TerrainRefreshEvent::AllGardens);
        self.terrain_refresh.send(TerrainRefreshEvent::AllRoads);
        self.terrain_refresh
            .send(TerrainRefreshEvent::Plazas(full_map));

        self.routing.send(RoutingRecomputeEvent {
            classes: RoutingClasses::ALL_LAND,
        });

        self.dust.send(DustCloudEvent {
            x,
            y,
            intensity: DUST_CLOUD_INTENSITY,
        });
    }
}

impl EarthquakeMap for Devastation<'_, '_> {
    fn dimensions(&self) -> (i32, i32) {
        (
            i32::try_from(self.grid.width).unwrap_or(i32::MAX),
            i32::try_from(self.grid.height).unwrap_or(i32::MAX),
        )
    }

    fn can_advance_to(&self, x: i32, y: i32) -> bool {
        let Some((gx, gy)) = self.grid.tile_in_bounds(TilePoint::new(x, y)) else {
            return false;
        };
        !self.grid.terrain(gx, gy).intersects(BLOCKING_TERRAIN)
    }

    fn devastate(&mut self, x: i32, y: i32) {
        match self.grid.tile_in_bounds(TilePoint::new(x, y)) {
            Some((gx, gy)) => self.devastate_tile(gx, gy),
            None => warn!("Earthquake tile ({}, {}) is off the map, skipped", x, y),
        }
    }
}
