use bevy::prelude::*;

use crate::notifications::{NotificationEvent, NotificationKind};
use crate::sim_rng::SimRng;
use crate::time_of_day::GameClock;

use super::devastation::Devastation;
use super::resources::{EarthquakeSettings, EarthquakeState, EventPhase};
use super::spread::{EarthquakeMap, TickOutcome};

/// Re-schedules the quake from the current `EarthquakeSettings`, drawing from
/// the shared `SimRng`. Call after the scenario's settings and seed are in place.
pub fn initialize_in_world(world: &mut World) {
    let settings = world
        .get_resource::<EarthquakeSettings>()
        .copied()
        .unwrap_or_default();
    let state = {
        let mut rng = world.get_resource_or_insert_with(SimRng::default);
        EarthquakeState::initialize(&settings, &mut *rng)
    };

    if settings.is_enabled() {
        info!(
            "Earthquake scheduled: {} at ({}, {}) in {}-{:02}, {} steps every {} ticks",
            settings.severity.name(),
            settings.origin.x,
            settings.origin.y,
            state.trigger_year,
            state.trigger_month + 1,
            state.target_duration,
            state.delay_threshold
        );
    } else {
        debug!("No earthquake configured for this scenario");
    }
    world.insert_resource(state);
}

pub fn process_earthquake(
    settings: Res<EarthquakeSettings>,
    mut state: ResMut<EarthquakeState>,
    clock: Res<GameClock>,
    mut rng: ResMut<SimRng>,
    mut devastation: Devastation,
    mut notifications: EventWriter<NotificationEvent>,
) {
    let active = matches!(state.phase, EventPhase::NotStarted | EventPhase::InProgress);
    if !settings.is_enabled() || !active {
        return;
    }

    let outcome = state.process_tick(&settings, clock.date(), &mut *rng, &mut devastation);
    match outcome {
        TickOutcome::Idle | TickOutcome::Throttled => {}
        TickOutcome::Started { origin } => {
            info!(
                "Earthquake struck at ({}, {}) on {}",
                origin.x,
                origin.y,
                clock.formatted()
            );
            let text = format!("A {} earthquake has struck the city!", settings.severity.name());
            let event = match devastation.grid().tile_in_bounds(origin) {
                Some((x, y)) => NotificationEvent::disaster_at(
                    NotificationKind::Earthquake,
                    text,
                    devastation.grid(),
                    x,
                    y,
                ),
                None => NotificationEvent::disaster(NotificationKind::Earthquake, text),
            };
            notifications.send(event);
        }
        TickOutcome::Advanced { front, tile } => {
            debug!(
                "Earthquake front {} advanced to ({}, {}), step {}/{}",
                front, tile.x, tile.y, state.elapsed_duration, state.target_duration
            );
        }
        TickOutcome::Blocked { front, tile } => {
            debug!(
                "Earthquake front {} blocked at ({}, {}), step {}/{}",
                front, tile.x, tile.y, state.elapsed_duration, state.target_duration
            );
        }
    }

    if state.is_finished() {
        let (width, height) = devastation.dimensions();
        info!(
            "Earthquake finished after {} steps on a {}x{} map",
            state.elapsed_duration, width, height
        );
    }
}

pub struct EarthquakePlugin;

impl Plugin for EarthquakePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EarthquakeSettings>()
            .init_resource::<EarthquakeState>()
            .add_systems(
                FixedUpdate,
                process_earthquake.in_set(crate::SimulationSet::Simulation),
            );

        app.init_resource::<crate::SaveableRegistry>();
        app.world_mut()
            .resource_mut::<crate::SaveableRegistry>()
            .register::<EarthquakeState>();
    }
}
