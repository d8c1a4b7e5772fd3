// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

use crate::{KeyCode, RawSequence};

/// One resolved sequence: the bytes read and the key they became.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInput {
    pub bytes: RawSequence,
    pub code: KeyCode,
}

/// Bounded history of resolved sequences, oldest first. Keyboard macros replay it by
/// feeding [`PlaybackLog::replay_bytes`] back to the engine.
#[derive(Debug, Clone, Default)]
pub struct PlaybackLog {
    capacity: usize,
    entries: VecDeque<RecordedInput>,
}

impl PlaybackLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(1_024)),
        }
    }

    pub fn record(&mut self, bytes: RawSequence, code: KeyCode) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(RecordedInput { bytes, code });
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordedInput> { self.entries.iter() }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn clear(&mut self) { self.entries.clear(); }

    /// All recorded bytes concatenated, oldest first.
    #[must_use]
    pub fn replay_bytes(&self) -> Vec<u8> {
        self.entries
            .iter()
            .flat_map(|it| it.bytes.iter().copied())
            .collect()
    }
}
