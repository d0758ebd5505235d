//! Positional 32-bit word buffers for fixed-layout save blocks.
//!
//! Words are little-endian `i32`s with no framing: a block is only meaningful
//! to a reader that consumes the same number of words in the same order.

use std::fmt;

const WORD_BYTES: usize = 4;

/// Errors produced while reading a word block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveBufferError {
    /// The buffer ended before the requested number of bytes.
    UnexpectedEnd { needed: usize, remaining: usize },
}

impl fmt::Display for SaveBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveBufferError::UnexpectedEnd { needed, remaining } => write!(
                f,
                "Unexpected end of save block: needed {needed} bytes, {remaining} remaining"
            ),
        }
    }
}

impl std::error::Error for SaveBufferError {}

#[derive(Debug, Default, Clone)]
pub struct WordWriter {
    bytes: Vec<u8>,
}

impl WordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(words: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(words * WORD_BYTES),
        }
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn words_written(&self) -> usize {
        self.bytes.len() / WORD_BYTES
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[derive(Debug, Clone)]
pub struct WordReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn remaining_bytes(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn read_i32(&mut self) -> Result<i32, SaveBufferError> {
        let remaining = self.remaining_bytes();
        if remaining < WORD_BYTES {
            return Err(SaveBufferError::UnexpectedEnd {
                needed: WORD_BYTES,
                remaining,
            });
        }
        let mut word = [0u8; WORD_BYTES];
        word.copy_from_slice(&self.bytes[self.pos..self.pos + WORD_BYTES]);
        self.pos += WORD_BYTES;
        Ok(i32::from_le_bytes(word))
    }

    /// Reads exactly `N` words. Nothing is returned unless all of them are present.
    pub fn read_words<const N: usize>(&mut self) -> Result<[i32; N], SaveBufferError> {
        let remaining = self.remaining_bytes();
        if remaining < N * WORD_BYTES {
            return Err(SaveBufferError::UnexpectedEnd {
                needed: N * WORD_BYTES,
                remaining,
            });
        }
        let mut words = [0i32; N];
        for word in &mut words {
            *word = self.read_i32()?;
        }
        Ok(words)
    }
}
