//! Deterministic simulation RNG resource.
//!
//! Wraps `ChaCha8Rng` for cross-platform deterministic randomness. Scenario
//! systems share one stream, so the order in which they draw from it is part
//! of the replay contract: a system that skips or adds a draw shifts every
//! value seen by the systems after it.

use std::collections::VecDeque;

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::DEFAULT_SEED;

/// A source of uniformly distributed bytes.
pub trait ByteSource {
    fn random_byte(&mut self) -> u8;
}

// ---------------------------------------------------------------------------
// Serializable snapshot of ChaCha8Rng state
// ---------------------------------------------------------------------------

#[derive(Encode, Decode)]
struct RngSnapshot {
    seed: [u8; 32],
    word_pos: u128,
    stream: u64,
}

impl RngSnapshot {
    fn from_rng(rng: &ChaCha8Rng) -> Self {
        Self {
            seed: rng.get_seed(),
            word_pos: rng.get_word_pos(),
            stream: rng.get_stream(),
        }
    }

    fn to_rng(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        rng.set_stream(self.stream);
        rng.set_word_pos(self.word_pos);
        rng
    }
}

// ---------------------------------------------------------------------------
// SimRng resource
// ---------------------------------------------------------------------------

#[derive(Resource)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SimRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl ByteSource for SimRng {
    fn random_byte(&mut self) -> u8 {
        self.0.gen::<u8>()
    }
}

/// Replays a fixed byte sequence, then repeats the last byte (or 0 when empty).
/// Used to drive scenario systems through exact draw sequences.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBytes {
    queue: VecDeque<u8>,
    last: u8,
    drawn: usize,
}

impl ScriptedBytes {
    pub fn new(bytes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            queue: bytes.into_iter().collect(),
            last: 0,
            drawn: 0,
        }
    }

    /// Number of bytes handed out so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl ByteSource for ScriptedBytes {
    fn random_byte(&mut self) -> u8 {
        self.drawn += 1;
        if let Some(b) = self.queue.pop_front() {
            self.last = b;
        }
        self.last
    }
}

// ---------------------------------------------------------------------------
// Saveable implementation
// ---------------------------------------------------------------------------

impl crate::Saveable for SimRng {
    const SAVE_KEY: &'static str = "sim_rng";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        let snapshot = RngSnapshot::from_rng(&self.0);
        Some(bitcode::encode(&snapshot))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        match bitcode::decode::<RngSnapshot>(bytes) {
            Ok(snapshot) => Self(snapshot.to_rng()),
            Err(e) => {
                warn!(
                    "SimRng: failed to decode save data, falling back to default: {}",
                    e
                );
                Self::default()
            }
        }
    }
}

pub struct SimRngPlugin;

impl Plugin for SimRngPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimRng>();

        app.init_resource::<crate::SaveableRegistry>();
        app.world_mut()
            .resource_mut::<crate::SaveableRegistry>()
            .register::<SimRng>();
    }
}
