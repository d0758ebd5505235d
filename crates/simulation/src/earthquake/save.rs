//! Fixed 15-word save block.
//!
//! Layout, one little-endian `i32` each: trigger year, trigger month, phase
//! code, elapsed duration, target duration, delay threshold, delay counter,
//! then `(x, y)` for each of the four fronts. Values are not validated on read.

use bevy::prelude::*;

use crate::grid::TilePoint;
use crate::save_buffer::{SaveBufferError, WordReader, WordWriter};

use super::constants::{FRONT_COUNT, SAVE_WORD_COUNT};
use super::resources::{EarthquakeState, EventPhase};

const HEADER_WORDS: usize = 7;

impl EarthquakeState {
    pub fn to_words(&self) -> [i32; SAVE_WORD_COUNT] {
        let mut words = [0i32; SAVE_WORD_COUNT];
        words[..HEADER_WORDS].copy_from_slice(&[
            self.trigger_year,
            self.trigger_month,
            self.phase.code(),
            self.elapsed_duration,
            self.target_duration,
            self.delay_threshold,
            self.delay_counter,
        ]);
        for (i, front) in self.fronts.iter().enumerate() {
            words[HEADER_WORDS + i * 2] = front.x;
            words[HEADER_WORDS + i * 2 + 1] = front.y;
        }
        words
    }

    pub fn from_words(words: &[i32; SAVE_WORD_COUNT]) -> Self {
        let mut fronts = [TilePoint::UNSET; FRONT_COUNT];
        for (i, front) in fronts.iter_mut().enumerate() {
            *front = TilePoint::new(words[HEADER_WORDS + i * 2], words[HEADER_WORDS + i * 2 + 1]);
        }
        Self {
            trigger_year: words[0],
            trigger_month: words[1],
            phase: EventPhase::from_code(words[2]),
            elapsed_duration: words[3],
            target_duration: words[4],
            delay_threshold: words[5],
            delay_counter: words[6],
            fronts,
        }
    }

    pub fn serialize(&self, writer: &mut WordWriter) {
        for word in self.to_words() {
            writer.write_i32(word);
        }
    }

    /// Overwrites `self` from the next block in `reader`. On error `self` and
    /// the reader are left untouched.
    pub fn deserialize(&mut self, reader: &mut WordReader<'_>) -> Result<(), SaveBufferError> {
        let words = reader.read_words::<SAVE_WORD_COUNT>()?;
        *self = Self::from_words(&words);
        Ok(())
    }
}

impl crate::Saveable for EarthquakeState {
    const SAVE_KEY: &'static str = "earthquake";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if *self == Self::default() {
            return None;
        }
        let mut writer = WordWriter::with_capacity(SAVE_WORD_COUNT);
        self.serialize(&mut writer);
        Some(writer.into_bytes())
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let mut state = Self::default();
        if let Err(e) = state.deserialize(&mut WordReader::new(bytes)) {
            warn!(
                "Saveable {}: failed to decode {} bytes, falling back to default: {}",
                Self::SAVE_KEY,
                bytes.len(),
                e
            );
        }
        state
    }
}
