//! Scenario earthquake: a scheduled disaster that spreads tile by tile from a
//! configured origin along four independent fronts.
//!
//! The lifecycle lives in [`EarthquakeState`]. [`EarthquakeState::process_tick`]
//! is a pure state machine over an [`EarthquakeMap`] and a [`ByteSource`], so
//! it can be driven outside the ECS; [`Devastation`] is the ECS-backed map.
//!
//! [`ByteSource`]: crate::sim_rng::ByteSource

mod constants;
mod devastation;
mod resources;
mod save;
mod spread;
mod systems;

pub use constants::{direction_for, BLOCKING_TERRAIN, DIRECTIONS, FRONT_COUNT, SAVE_WORD_COUNT};
pub use devastation::Devastation;
pub use resources::{EarthquakeSettings, EarthquakeSeverity, EarthquakeState, EventPhase};
pub use spread::{EarthquakeMap, TickOutcome};
pub use systems::{initialize_in_world, process_earthquake, EarthquakePlugin};
