use std::ops::{BitOr, BitOrAssign};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{CELL_SIZE, GRID_HEIGHT, GRID_WIDTH};

/// Per-cell terrain classification bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Terrain(u16);

impl Terrain {
    pub const EMPTY: Terrain = Terrain(0);
    pub const TREE: Terrain = Terrain(1 << 0);
    pub const ROCK: Terrain = Terrain(1 << 1);
    pub const WATER: Terrain = Terrain(1 << 2);
    pub const BUILDING: Terrain = Terrain(1 << 3);
    pub const SCRUB: Terrain = Terrain(1 << 4);
    pub const GARDEN: Terrain = Terrain(1 << 5);
    pub const ROAD: Terrain = Terrain(1 << 6);
    pub const ELEVATION: Terrain = Terrain(1 << 7);
    pub const RUBBLE: Terrain = Terrain(1 << 8);
    pub const WALL: Terrain = Terrain(1 << 9);
    pub const PLAZA: Terrain = Terrain(1 << 10);

    #[inline]
    pub const fn union(self, other: Terrain) -> Terrain {
        Terrain(self.0 | other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every flag of `other` is set.
    #[inline]
    pub const fn contains(self, other: Terrain) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any flag of `other` is set.
    #[inline]
    pub const fn intersects(self, other: Terrain) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn insert(&mut self, other: Terrain) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Terrain) {
        self.0 &= !other.0;
    }
}

impl BitOr for Terrain {
    type Output = Terrain;

    fn bitor(self, rhs: Terrain) -> Terrain {
        self.union(rhs)
    }
}

impl BitOrAssign for Terrain {
    fn bitor_assign(&mut self, rhs: Terrain) {
        self.insert(rhs);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ZoneType {
    #[default]
    None,
    Residential,
    Commercial,
    Industrial,
}

/// Signed tile coordinate. Signed so that the unset sentinel `(-1, -1)` and
/// raw save values can be represented without conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

impl TilePoint {
    /// Marker for "no location configured".
    pub const UNSET: TilePoint = TilePoint { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_unset(self) -> bool {
        self.x == -1 || self.y == -1
    }
}

/// Inclusive rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: Terrain,
    pub zone: ZoneType,
    pub building_id: Option<Entity>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            terrain: Terrain::EMPTY,
            zone: ZoneType::None,
            building_id: None,
        }
    }
}

#[derive(Resource, Serialize, Deserialize)]
pub struct WorldGrid {
    pub cells: Vec<Cell>,
    pub width: usize,
    pub height: usize,
}

impl Default for WorldGrid {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl WorldGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![Cell::default(); width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Row-major offset of a tile, used as the location key in city messages.
    #[inline]
    pub fn grid_offset(&self, x: usize, y: usize) -> usize {
        self.index(x, y)
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Converts a signed tile into grid coordinates if it lies on the map.
    pub fn tile_in_bounds(&self, tile: TilePoint) -> Option<(usize, usize)> {
        let x = usize::try_from(tile.x).ok()?;
        let y = usize::try_from(tile.y).ok()?;
        self.in_bounds(x, y).then_some((x, y))
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let idx = self.index(x, y);
        &mut self.cells[idx]
    }

    #[inline]
    pub fn terrain(&self, x: usize, y: usize) -> Terrain {
        self.get(x, y).terrain
    }

    #[inline]
    pub fn building_at(&self, x: usize, y: usize) -> Option<Entity> {
        self.get(x, y).building_id
    }

    /// The whole map as an inclusive rectangle.
    pub fn full_rect(&self) -> GridRect {
        GridRect {
            x0: 0,
            y0: 0,
            x1: self.width.saturating_sub(1),
            y1: self.height.saturating_sub(1),
        }
    }

    pub fn grid_to_world(gx: usize, gy: usize) -> (f32, f32) {
        let wx = gx as f32 * CELL_SIZE + CELL_SIZE * 0.5;
        let wy = gy as f32 * CELL_SIZE + CELL_SIZE * 0.5;
        (wx, wy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_flags() {
        let mut t = Terrain::TREE | Terrain::ROCK;
        assert!(t.contains(Terrain::TREE));
        assert!(t.intersects(Terrain::ROCK | Terrain::WATER));
        assert!(!t.intersects(Terrain::WATER));
        t.remove(Terrain::ROCK);
        assert_eq!(t, Terrain::TREE);
        t.remove(Terrain::TREE);
        assert!(t.is_empty());
    }

    #[test]
    fn test_tile_in_bounds() {
        let grid = WorldGrid::new(10, 10);
        assert_eq!(grid.tile_in_bounds(TilePoint::new(3, 4)), Some((3, 4)));
        assert_eq!(grid.tile_in_bounds(TilePoint::new(9, 9)), Some((9, 9)));
        assert_eq!(grid.tile_in_bounds(TilePoint::new(10, 0)), None);
        assert_eq!(grid.tile_in_bounds(TilePoint::UNSET), None);
    }

    #[test]
    fn test_grid_offset_is_row_major() {
        let grid = WorldGrid::new(10, 8);
        assert_eq!(grid.grid_offset(0, 0), 0);
        assert_eq!(grid.grid_offset(3, 3), 33);
        assert_eq!(grid.grid_offset(9, 7), 79);
    }

    #[test]
    fn test_full_rect() {
        let grid = WorldGrid::new(10, 8);
        assert_eq!(
            grid.full_rect(),
            GridRect {
                x0: 0,
                y0: 0,
                x1: 9,
                y1: 7
            }
        );
    }

    #[test]
    fn test_unset_point() {
        assert!(TilePoint::UNSET.is_unset());
        assert!(TilePoint::new(-1, 5).is_unset());
        assert!(!TilePoint::new(0, 0).is_unset());
    }
}
