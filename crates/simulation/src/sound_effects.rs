//! Sound effect requests.
//!
//! Gameplay systems send `PlaySfxEvent`; playback lives downstream in the
//! host. This module only owns the event and a per-effect tally of what was
//! requested, which the host reads for its mixer and tests read for assertions.

use std::collections::HashMap;

use bevy::prelude::*;

/// Sound effects the simulation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SfxEvent {
    /// Structure destroyed by a disaster.
    Explosion,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySfxEvent {
    pub sfx: SfxEvent,
}

impl PlaySfxEvent {
    pub fn new(sfx: SfxEvent) -> Self {
        Self { sfx }
    }
}

/// Running count of requested effects, keyed by effect.
#[derive(Resource, Default, Debug)]
pub struct SfxTally {
    pub counts: HashMap<SfxEvent, u32>,
}

impl SfxTally {
    pub fn count(&self, sfx: SfxEvent) -> u32 {
        self.counts.get(&sfx).copied().unwrap_or(0)
    }
}

fn tally_sfx_requests(mut events: EventReader<PlaySfxEvent>, mut tally: ResMut<SfxTally>) {
    for event in events.read() {
        *tally.counts.entry(event.sfx).or_insert(0) += 1;
    }
}

pub struct SoundEffectsPlugin;

impl Plugin for SoundEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SfxTally>()
            .add_event::<PlaySfxEvent>()
            .add_systems(
                FixedUpdate,
                tally_sfx_requests.in_set(crate::SimulationSet::PostSim),
            );
    }
}
