// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{RawSequence, SEQUENCE_BUFFER_CAPACITY};

/// Bytes of the sequence currently being decoded. Always starts at a sequence boundary
/// and never holds more than [`SEQUENCE_BUFFER_CAPACITY`] bytes.
#[derive(Debug, Clone, Default)]
pub struct SequenceBuffer {
    bytes: RawSequence,
}

impl SequenceBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Appends `byte`. Returns `true` once the buffer is full, at which point the
    /// caller must resolve it before pushing again.
    pub fn push(&mut self, byte: u8) -> bool {
        if !self.is_full() {
            self.bytes.push(byte);
        }
        self.is_full()
    }

    #[must_use]
    pub fn is_full(&self) -> bool { self.bytes.len() >= SEQUENCE_BUFFER_CAPACITY }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] { &self.bytes }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.bytes.len() }

    /// Empties the buffer, returning what it held.
    pub fn take(&mut self) -> RawSequence { std::mem::take(&mut self.bytes) }
}
