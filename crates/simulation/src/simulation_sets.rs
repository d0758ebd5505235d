//! Deterministic simulation ordering via `SystemSet` phases.
//!
//! Every system in `FixedUpdate` belongs to one of these sets, so ordering
//! between plugins is explicit rather than left to registration order.
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Tick counter and game clock. Sets up the date that scenario
//!   events compare against.
//! * **Simulation** – Scenario events (the earthquake) that mutate the grid
//!   and buildings and send requests downstream.
//! * **PostSim** – Consumers of those requests: sound tally, notification
//!   log, map refresh queue, dust clouds, removal of destroyed buildings.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain by `SimulationPlugin`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    PreSim,
    Simulation,
    PostSim,
}
