//! Scenario files.
//!
//! A scenario is a JSON document describing the starting map (size, terrain
//! patches, buildings), the RNG seed, the calendar start and the optional
//! earthquake. [`load_scenario`] installs it into a `World`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buildings::{link_buildings, place_building, Building};
use crate::config::{DEFAULT_SEED, DEFAULT_START_YEAR, GRID_HEIGHT, GRID_WIDTH};
use crate::earthquake::{initialize_in_world, EarthquakeSettings, EarthquakeSeverity};
use crate::grid::{Terrain, TilePoint, WorldGrid, ZoneType};
use crate::sim_rng::SimRng;
use crate::time_of_day::GameClock;

/// Largest accepted map side.
pub const MAX_MAP_SIDE: usize = 1024;

#[derive(Debug)]
pub enum ScenarioError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidMap { width: usize, height: usize },
    InvalidBuilding { x: usize, y: usize, size: usize },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io(e) => write!(f, "I/O error: {e}"),
            ScenarioError::Parse(e) => write!(f, "Invalid scenario file: {e}"),
            ScenarioError::InvalidMap { width, height } => write!(
                f,
                "Invalid map size {width}x{height}: each side must be 1..={MAX_MAP_SIDE}"
            ),
            ScenarioError::InvalidBuilding { x, y, size } => write!(
                f,
                "Invalid building at ({x}, {y}): size {size} must be 1..={MAX_MAP_SIDE}"
            ),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io(e) => Some(e),
            ScenarioError::Parse(e) => Some(e),
            ScenarioError::InvalidMap { .. } | ScenarioError::InvalidBuilding { .. } => None,
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        ScenarioError::Io(e)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(e: serde_json::Error) -> Self {
        ScenarioError::Parse(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Tree,
    Rock,
    Water,
    Scrub,
    Garden,
    Road,
    Elevation,
    Wall,
    Plaza,
}

impl TerrainKind {
    pub fn flag(self) -> Terrain {
        match self {
            TerrainKind::Tree => Terrain::TREE,
            TerrainKind::Rock => Terrain::ROCK,
            TerrainKind::Water => Terrain::WATER,
            TerrainKind::Scrub => Terrain::SCRUB,
            TerrainKind::Garden => Terrain::GARDEN,
            TerrainKind::Road => Terrain::ROAD,
            TerrainKind::Elevation => Terrain::ELEVATION,
            TerrainKind::Wall => Terrain::WALL,
            TerrainKind::Plaza => Terrain::PLAZA,
        }
    }
}

/// A rectangle of tiles sharing one terrain flag. Clipped to the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainPatch {
    pub x: usize,
    pub y: usize,
    #[serde(default = "one")]
    pub width: usize,
    #[serde(default = "one")]
    pub height: usize,
    pub kind: TerrainKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSpec {
    pub x: usize,
    pub y: usize,
    #[serde(default = "one")]
    pub size: usize,
    #[serde(default)]
    pub zone: ZoneType,
    /// Buildings sharing a chain id are linked in file order.
    #[serde(default)]
    pub chain: Option<u32>,
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioEarthquake {
    pub severity: EarthquakeSeverity,
    pub x: i32,
    pub y: i32,
    pub offset_year: i32,
}

impl Default for ScenarioEarthquake {
    fn default() -> Self {
        Self {
            severity: EarthquakeSeverity::None,
            x: TilePoint::UNSET.x,
            y: TilePoint::UNSET.y,
            offset_year: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,
    pub map_width: usize,
    pub map_height: usize,
    pub seed: u64,
    pub start_year: i32,
    pub earthquake: ScenarioEarthquake,
    pub terrain: Vec<TerrainPatch>,
    pub buildings: Vec<BuildingSpec>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            map_width: GRID_WIDTH,
            map_height: GRID_HEIGHT,
            seed: DEFAULT_SEED,
            start_year: DEFAULT_START_YEAR,
            earthquake: ScenarioEarthquake::default(),
            terrain: Vec::new(),
            buildings: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        let side_ok = |side: usize| (1..=MAX_MAP_SIDE).contains(&side);
        if !side_ok(self.map_width) || !side_ok(self.map_height) {
            return Err(ScenarioError::InvalidMap {
                width: self.map_width,
                height: self.map_height,
            });
        }
        if let Some(spec) = self.buildings.iter().find(|b| !side_ok(b.size)) {
            return Err(ScenarioError::InvalidBuilding {
                x: spec.x,
                y: spec.y,
                size: spec.size,
            });
        }
        Ok(())
    }

    pub fn earthquake_settings(&self) -> EarthquakeSettings {
        EarthquakeSettings {
            severity: self.earthquake.severity,
            origin: TilePoint::new(self.earthquake.x, self.earthquake.y),
            start_year: self.start_year,
            offset_year: self.earthquake.offset_year,
        }
    }

    fn build_grid(&self) -> WorldGrid {
        let mut grid = WorldGrid::new(self.map_width, self.map_height);
        for patch in &self.terrain {
            let x_end = patch.x.saturating_add(patch.width).min(grid.width);
            let y_end = patch.y.saturating_add(patch.height).min(grid.height);
            for y in patch.y..y_end {
                for x in patch.x..x_end {
                    grid.get_mut(x, y).terrain.insert(patch.kind.flag());
                }
            }
        }
        grid
    }
}

/// Replaces the map, buildings, seed, calendar and earthquake settings with
/// those of `config`, then schedules the earthquake.
pub fn load_scenario(world: &mut World, config: &ScenarioConfig) -> Result<(), ScenarioError> {
    config.validate()?;

    let stale: Vec<Entity> = world
        .query_filtered::<Entity, With<Building>>()
        .iter(world)
        .collect();
    for entity in stale {
        world.despawn(entity);
    }

    world.insert_resource(config.build_grid());

    let mut chains: BTreeMap<u32, Vec<Entity>> = BTreeMap::new();
    let mut placed = 0usize;
    for spec in &config.buildings {
        if spec.x >= config.map_width || spec.y >= config.map_height {
            warn!(
                "Scenario '{}': building at ({}, {}) is off the map, skipped",
                config.name, spec.x, spec.y
            );
            continue;
        }
        let Some(entity) = place_building(world, Building::new(spec.zone, spec.x, spec.y, spec.size))
        else {
            continue;
        };
        placed += 1;
        if let Some(chain) = spec.chain {
            chains.entry(chain).or_default().push(entity);
        }
    }
    for parts in chains.values() {
        link_buildings(world, parts);
    }

    world.insert_resource(SimRng::from_seed_u64(config.seed));
    world.insert_resource(GameClock::starting_in(config.start_year));
    world.insert_resource(config.earthquake_settings());

    info!(
        "Loaded scenario '{}': {}x{} map, {} buildings, seed {}",
        config.name, config.map_width, config.map_height, placed, config.seed
    );

    initialize_in_world(world);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::BuildingLinks;
    use crate::earthquake::{EarthquakeState, EventPhase};

    const SAMPLE: &str = r#"{
        "name": "Harbour",
        "map_width": 20,
        "map_height": 12,
        "seed": 7,
        "start_year": -250,
        "earthquake": { "severity": 2, "x": 6, "y": 4, "offset_year": 1 },
        "terrain": [
            { "x": 0, "y": 0, "width": 20, "height": 2, "kind": "water" },
            { "x": 18, "y": 10, "width": 5, "height": 5, "kind": "rock" }
        ],
        "buildings": [
            { "x": 5, "y": 5, "size": 2, "zone": "Residential" },
            { "x": 10, "y": 5, "chain": 1 },
            { "x": 11, "y": 5, "chain": 1 },
            { "x": 12, "y": 5, "chain": 1 }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let config = ScenarioConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.name, "Harbour");
        assert_eq!(config.map_width, 20);
        assert_eq!(config.earthquake.severity, EarthquakeSeverity::Medium);
        assert_eq!(config.buildings.len(), 4);
        assert_eq!(config.buildings[1].size, 1);
        assert_eq!(config.buildings[1].zone, ZoneType::None);

        let settings = config.earthquake_settings();
        assert_eq!(settings.origin, TilePoint::new(6, 4));
        assert_eq!(settings.trigger_year(), -249);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = ScenarioConfig::from_json_str(r#"{"name": "Empty"}"#).unwrap();
        assert_eq!(config.map_width, GRID_WIDTH);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert!(!config.earthquake_settings().is_enabled());
    }

    #[test]
    fn test_rejects_bad_map_size() {
        let err = ScenarioConfig::from_json_str(r#"{"map_width": 0}"#).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidMap { width: 0, .. }));
        assert!(err.to_string().contains("0x"));
    }

    #[test]
    fn test_rejects_bad_building_size() {
        for size in ["0", "1025", "18446744073709551615"] {
            let json = format!(
                r#"{{"map_width": 10, "map_height": 10, "buildings": [{{"x": 1, "y": 1, "size": {size}}}]}}"#
            );
            let err = ScenarioConfig::from_json_str(&json).unwrap_err();
            assert!(
                matches!(err, ScenarioError::InvalidBuilding { x: 1, y: 1, .. }),
                "size {size}: {err}"
            );
        }
    }

    #[test]
    fn test_load_rejects_oversized_building_without_touching_world() {
        let mut config = ScenarioConfig::from_json_str(SAMPLE).unwrap();
        config.buildings[0].size = usize::MAX;

        let mut world = World::new();
        let err = load_scenario(&mut world, &config).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidBuilding { size: usize::MAX, .. }));
        assert!(world.get_resource::<WorldGrid>().is_none());
    }

    #[test]
    fn test_building_overhanging_map_edge_is_clipped() {
        let config = ScenarioConfig::from_json_str(
            r#"{"map_width": 10, "map_height": 10, "buildings": [{"x": 8, "y": 8, "size": 5}]}"#,
        )
        .unwrap();
        let mut world = World::new();
        load_scenario(&mut world, &config).unwrap();

        let grid = world.resource::<WorldGrid>();
        let occupied = grid.cells.iter().filter(|c| c.building_id.is_some()).count();
        assert_eq!(occupied, 4);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = ScenarioConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }

    #[test]
    fn test_load_installs_world() {
        let config = ScenarioConfig::from_json_str(SAMPLE).unwrap();
        let mut world = World::new();
        load_scenario(&mut world, &config).unwrap();

        let grid = world.resource::<WorldGrid>();
        assert_eq!((grid.width, grid.height), (20, 12));
        assert!(grid.terrain(3, 1).contains(Terrain::WATER));
        assert!(grid.terrain(19, 11).contains(Terrain::ROCK));
        assert!(grid.terrain(5, 5).contains(Terrain::BUILDING));
        assert!(grid.building_at(6, 6).is_some());

        let middle = grid.building_at(11, 5).unwrap();
        let links = *world.get::<BuildingLinks>(middle).unwrap();
        assert!(links.prev.is_some() && links.next.is_some());

        assert_eq!(world.resource::<GameClock>().year(), -250);
        let state = world.resource::<EarthquakeState>();
        assert_eq!(state.phase, EventPhase::NotStarted);
        assert_eq!(state.trigger_year, -249);
        assert!((100..=163).contains(&state.target_duration));
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let config = ScenarioConfig::from_json_str(SAMPLE).unwrap();
        let mut a = World::new();
        let mut b = World::new();
        load_scenario(&mut a, &config).unwrap();
        load_scenario(&mut b, &config).unwrap();
        assert_eq!(
            *a.resource::<EarthquakeState>(),
            *b.resource::<EarthquakeState>()
        );
    }

    #[test]
    fn test_reload_replaces_buildings() {
        let config = ScenarioConfig::from_json_str(SAMPLE).unwrap();
        let mut world = World::new();
        load_scenario(&mut world, &config).unwrap();
        load_scenario(&mut world, &config).unwrap();
        let count = world.query::<&Building>().iter(&world).count();
        assert_eq!(count, 4);
    }
}
