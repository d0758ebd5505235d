use crate::grid::Terrain;

use super::resources::EarthquakeSeverity;

/// Number of independently advancing fronts.
pub const FRONT_COUNT: usize = 4;

/// Words in the persisted state block.
pub const SAVE_WORD_COUNT: usize = 7 + FRONT_COUNT * 2;

/// Trigger month is `MONTH_BASE + (byte & MONTH_MASK)`, i.e. 2..=9.
pub(super) const MONTH_BASE: i32 = 2;
pub(super) const MONTH_MASK: u8 = 0x07;

/// Terrain the quake cannot cross.
pub const BLOCKING_TERRAIN: Terrain = Terrain::ELEVATION
    .union(Terrain::ROCK)
    .union(Terrain::WATER);

pub(super) const DUST_CLOUD_INTENSITY: u8 = 1;

/// Duration draw and expansion pacing for one severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SeverityProfile {
    /// Minimum number of expansion steps.
    pub base_duration: i32,
    /// Mask applied to the random byte added on top of `base_duration`.
    pub duration_mask: u8,
    /// Ticks between expansion steps.
    pub delay: i32,
}

pub(super) fn severity_profile(severity: EarthquakeSeverity) -> Option<SeverityProfile> {
    match severity {
        EarthquakeSeverity::None => None,
        EarthquakeSeverity::Small => Some(SeverityProfile {
            base_duration: 25,
            duration_mask: 0x1F,
            delay: 10,
        }),
        EarthquakeSeverity::Medium => Some(SeverityProfile {
            base_duration: 100,
            duration_mask: 0x3F,
            delay: 8,
        }),
        EarthquakeSeverity::Large => Some(SeverityProfile {
            base_duration: 250,
            duration_mask: 0xFF,
            delay: 6,
        }),
    }
}

/// `(front, dx, dy)` for each 4-bit roll. Fronts are favoured unevenly and
/// the directions are not uniform, which gives the damage an irregular shape.
pub const DIRECTIONS: [(usize, i32, i32); 16] = [
    (0, 0, -1),
    (1, 1, 0),
    (2, 0, 1),
    (3, -1, 0),
    (0, 0, -1),
    (0, -1, 0),
    (0, 1, 0),
    (1, 1, 0),
    (1, 0, -1),
    (1, 0, 1),
    (2, 0, 1),
    (2, -1, 0),
    (2, 1, 0),
    (3, -1, 0),
    (3, 0, -1),
    (3, 0, 1),
];

/// Maps a random byte to a direction using its low four bits.
#[inline]
pub fn direction_for(byte: u8) -> (usize, i32, i32) {
    DIRECTIONS[usize::from(byte & 0x0F)]
}
