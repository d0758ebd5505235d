//! Short-lived visual effects requested by the simulation.

use bevy::prelude::*;

/// How long a dust cloud stays on the map.
pub const DUST_CLOUD_LIFETIME_TICKS: u32 = 12;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DustCloudEvent {
    pub x: usize,
    pub y: usize,
    pub intensity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DustCloud {
    pub x: usize,
    pub y: usize,
    pub intensity: u8,
    pub ticks_remaining: u32,
}

/// Dust clouds currently drifting over the map. Rendering reads this directly.
#[derive(Resource, Default, Debug)]
pub struct DustClouds {
    pub clouds: Vec<DustCloud>,
    pub total_spawned: u64,
}

impl DustClouds {
    pub fn spawn(&mut self, event: DustCloudEvent) {
        self.clouds.push(DustCloud {
            x: event.x,
            y: event.y,
            intensity: event.intensity,
            ticks_remaining: DUST_CLOUD_LIFETIME_TICKS,
        });
        self.total_spawned += 1;
    }

    pub fn age(&mut self) {
        for cloud in &mut self.clouds {
            cloud.ticks_remaining = cloud.ticks_remaining.saturating_sub(1);
        }
        self.clouds.retain(|c| c.ticks_remaining > 0);
    }
}

fn update_dust_clouds(mut events: EventReader<DustCloudEvent>, mut dust: ResMut<DustClouds>) {
    dust.age();
    for event in events.read() {
        dust.spawn(*event);
    }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DustClouds>()
            .add_event::<DustCloudEvent>()
            .add_systems(
                FixedUpdate,
                update_dust_clouds.in_set(crate::SimulationSet::PostSim),
            );
    }
}
