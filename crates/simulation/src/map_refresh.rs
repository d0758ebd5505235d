//! Recompute requests for state derived from the terrain grid.
//!
//! Terrain edits don't regenerate decorations or routing themselves. They send
//! `TerrainRefreshEvent` / `RoutingRecomputeEvent`, which are folded into
//! `MapRefreshQueue` at the end of the tick. Decoration and routing owners
//! drain the queue with [`MapRefreshQueue::take`].

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::grid::GridRect;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainRefreshEvent {
    /// Earthquake crack decoration for one tile.
    EarthquakeTile { x: usize, y: usize },
    AllGardens,
    AllRoads,
    Plazas(GridRect),
}

/// Movement classes whose routing tables must be rebuilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoutingClasses {
    pub citizen: bool,
    pub non_citizen: bool,
    pub walls: bool,
}

impl RoutingClasses {
    pub const ALL_LAND: RoutingClasses = RoutingClasses {
        citizen: true,
        non_citizen: true,
        walls: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.citizen || self.non_citizen || self.walls)
    }

    pub fn merge(&mut self, other: RoutingClasses) {
        self.citizen |= other.citizen;
        self.non_citizen |= other.non_citizen;
        self.walls |= other.walls;
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingRecomputeEvent {
    pub classes: RoutingClasses,
}

/// Coalesced pending work. Repeated requests collapse into one entry.
///
/// Nothing here is cleared automatically: the decoration and routing owners
/// must drain it with [`MapRefreshQueue::take`], otherwise `earthquake_tiles`
/// keeps every tile ever struck.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct MapRefreshQueue {
    pub earthquake_tiles: BTreeSet<(usize, usize)>,
    pub gardens: bool,
    pub roads: bool,
    pub plaza_regions: Vec<GridRect>,
    pub routing: RoutingClasses,
    /// Total number of requests folded in since the queue was created.
    pub requests_received: u64,
}

impl MapRefreshQueue {
    pub fn apply_terrain(&mut self, event: TerrainRefreshEvent) {
        self.requests_received += 1;
        match event {
            TerrainRefreshEvent::EarthquakeTile { x, y } => {
                self.earthquake_tiles.insert((x, y));
            }
            TerrainRefreshEvent::AllGardens => self.gardens = true,
            TerrainRefreshEvent::AllRoads => self.roads = true,
            TerrainRefreshEvent::Plazas(rect) => {
                if !self.plaza_regions.contains(&rect) {
                    self.plaza_regions.push(rect);
                }
            }
        }
    }

    pub fn apply_routing(&mut self, event: RoutingRecomputeEvent) {
        self.requests_received += 1;
        self.routing.merge(event.classes);
    }

    pub fn is_idle(&self) -> bool {
        self.earthquake_tiles.is_empty()
            && !self.gardens
            && !self.roads
            && self.plaza_regions.is_empty()
            && self.routing.is_empty()
    }

    /// Hands the pending work to the caller and clears it. The request
    /// counter keeps running.
    pub fn take(&mut self) -> MapRefreshQueue {
        let requests_received = self.requests_received;
        let pending = std::mem::take(self);
        self.requests_received = requests_received;
        pending
    }
}

fn collect_refresh_requests(
    mut terrain: EventReader<TerrainRefreshEvent>,
    mut routing: EventReader<RoutingRecomputeEvent>,
    mut queue: ResMut<MapRefreshQueue>,
) {
    for event in terrain.read() {
        queue.apply_terrain(*event);
    }
    for event in routing.read() {
        queue.apply_routing(*event);
    }
}

pub struct MapRefreshPlugin;

impl Plugin for MapRefreshPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapRefreshQueue>()
            .add_event::<TerrainRefreshEvent>()
            .add_event::<RoutingRecomputeEvent>()
            .add_systems(
                FixedUpdate,
                collect_refresh_requests.in_set(crate::SimulationSet::PostSim),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_coalesce() {
        let mut queue = MapRefreshQueue::default();
        let rect = GridRect {
            x0: 0,
            y0: 0,
            x1: 9,
            y1: 9,
        };
        for _ in 0..3 {
            queue.apply_terrain(TerrainRefreshEvent::AllGardens);
            queue.apply_terrain(TerrainRefreshEvent::Plazas(rect));
            queue.apply_terrain(TerrainRefreshEvent::EarthquakeTile { x: 2, y: 2 });
        }
        assert!(queue.gardens);
        assert!(!queue.roads);
        assert_eq!(queue.plaza_regions, vec![rect]);
        assert_eq!(queue.earthquake_tiles, BTreeSet::from([(2, 2)]));
        assert_eq!(queue.requests_received, 9);
    }

    #[test]
    fn test_routing_merge() {
        let mut queue = MapRefreshQueue::default();
        queue.apply_routing(RoutingRecomputeEvent {
            classes: RoutingClasses {
                citizen: true,
                ..Default::default()
            },
        });
        queue.apply_routing(RoutingRecomputeEvent {
            classes: RoutingClasses {
                walls: true,
                ..Default::default()
            },
        });
        assert!(queue.routing.citizen);
        assert!(!queue.routing.non_citizen);
        assert!(queue.routing.walls);
    }

    #[test]
    fn test_take_clears_pending_keeps_counter() {
        let mut queue = MapRefreshQueue::default();
        queue.apply_terrain(TerrainRefreshEvent::AllRoads);
        queue.apply_routing(RoutingRecomputeEvent {
            classes: RoutingClasses::ALL_LAND,
        });

        queue.apply_terrain(TerrainRefreshEvent::EarthquakeTile { x: 4, y: 1 });

        let pending = queue.take();
        assert!(pending.roads);
        assert_eq!(pending.earthquake_tiles, BTreeSet::from([(4, 1)]));
        assert_eq!(pending.routing, RoutingClasses::ALL_LAND);
        assert!(queue.is_idle());
        assert!(queue.earthquake_tiles.is_empty());
        assert_eq!(queue.requests_received, 3);
    }
}
