pub const GRID_WIDTH: usize = 162;
pub const GRID_HEIGHT: usize = 162;
pub const CELL_SIZE: f32 = 16.0;

/// Calendar layout. A month is a fixed number of game days.
pub const DAYS_PER_MONTH: u32 = 16;
pub const MONTHS_PER_YEAR: u32 = 12;
pub const DAYS_PER_YEAR: u32 = DAYS_PER_MONTH * MONTHS_PER_YEAR;

/// Year shown at the start of a scenario when none is configured.
pub const DEFAULT_START_YEAR: i32 = -500;

/// Seed for `SimRng` when a scenario doesn't provide one.
pub const DEFAULT_SEED: u64 = 42;
