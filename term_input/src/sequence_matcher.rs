// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words rxvt

//! User extensible table of byte sequences, consulted before the built in protocol
//! decoders. This is where terminal specific quirks that don't follow any of the
//! standard grammars are bound (and where the user can rebind anything).

use std::{collections::BTreeMap, ops::Bound};

use smallvec::SmallVec;

use crate::{EngineError, KeyCode, KeyModifiers, MiscKey};

/// The longest sequence the engine buffers before it forces a decision.
pub const SEQUENCE_BUFFER_CAPACITY: usize = 32;

pub type SequenceBytes = SmallVec<[u8; SEQUENCE_BUFFER_CAPACITY]>;

/// Result of looking up a (partial) byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceMatch {
    NoMatch,
    /// Bound, and no longer binding starts with it.
    Exact(KeyCode),
    /// Not bound, but at least one longer binding starts with it.
    Prefix,
    /// Bound, and also the start of a longer binding.
    ExactAndPrefix(KeyCode),
}

#[derive(Debug, Clone, Default)]
pub struct SequenceMatcher {
    table: BTreeMap<SequenceBytes, KeyCode>,
}

impl SequenceMatcher {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A table seeded with sequences from terminals that don't follow xterm: the linux
    /// console's function keys, and rxvt's shifted and ctrl arrows.
    #[must_use]
    pub fn with_defaults() -> Self {
        let shift = |key: MiscKey| KeyCode::misc(key).with_modifiers(KeyModifiers::SHIFT);
        let ctrl = |key: MiscKey| KeyCode::misc(key).with_modifiers(KeyModifiers::CTRL);

        let defaults: [(&[u8], KeyCode); 17] = [
            // Linux console.
            (b"\x1b[[A", KeyCode::function(1)),
            (b"\x1b[[B", KeyCode::function(2)),
            (b"\x1b[[C", KeyCode::function(3)),
            (b"\x1b[[D", KeyCode::function(4)),
            (b"\x1b[[E", KeyCode::function(5)),
            // rxvt.
            (b"\x1b[a", shift(MiscKey::Up)),
            (b"\x1b[b", shift(MiscKey::Down)),
            (b"\x1b[c", shift(MiscKey::Right)),
            (b"\x1b[d", shift(MiscKey::Left)),
            (b"\x1bOa", ctrl(MiscKey::Up)),
            (b"\x1bOb", ctrl(MiscKey::Down)),
            (b"\x1bOc", ctrl(MiscKey::Right)),
            (b"\x1bOd", ctrl(MiscKey::Left)),
            (b"\x1b[2$", shift(MiscKey::Insert)),
            (b"\x1b[3$", shift(MiscKey::Delete)),
            (b"\x1b[2^", ctrl(MiscKey::Insert)),
            (b"\x1b[3^", ctrl(MiscKey::Delete)),
        ];

        let mut it = Self::new();
        for (bytes, code) in defaults {
            it.table.insert(SequenceBytes::from_slice(bytes), code);
        }
        it
    }

    /// Binds `bytes` to `code`, returning the code it was previously bound to.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptySequence`] or [`EngineError::SequenceTooLong`].
    pub fn bind(&mut self, bytes: &[u8], code: KeyCode) -> Result<Option<KeyCode>, EngineError> {
        if bytes.is_empty() {
            return Err(EngineError::EmptySequence);
        }
        if bytes.len() > SEQUENCE_BUFFER_CAPACITY {
            return Err(EngineError::SequenceTooLong {
                len: bytes.len(),
                max: SEQUENCE_BUFFER_CAPACITY,
            });
        }
        Ok(self.table.insert(SequenceBytes::from_slice(bytes), code))
    }

    pub fn unbind(&mut self, bytes: &[u8]) -> Option<KeyCode> { self.table.remove(bytes) }

    #[must_use]
    pub fn match_sequence(&self, bytes: &[u8]) -> SequenceMatch {
        if bytes.is_empty() {
            return SequenceMatch::NoMatch;
        }

        // Keys that extend `bytes` sort immediately after it, so only the first key
        // after `bytes` needs to be checked.
        let is_prefix = self
            .table
            .range::<[u8], _>((Bound::Excluded(bytes), Bound::Unbounded))
            .next()
            .is_some_and(|(key, _)| key.starts_with(bytes));

        match (self.table.get(bytes), is_prefix) {
            (Some(code), false) => SequenceMatch::Exact(*code),
            (Some(code), true) => SequenceMatch::ExactAndPrefix(*code),
            (None, true) => SequenceMatch::Prefix,
            (None, false) => SequenceMatch::NoMatch,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.table.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.table.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], KeyCode)> {
        self.table.iter().map(|(bytes, code)| (bytes.as_slice(), *code))
    }
}
