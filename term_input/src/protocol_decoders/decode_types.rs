// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{KeyCode, ProtocolFlags};

/// Mouse position carried by a decoded mouse report, 0 based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseReport {
    pub col: u16,
    pub row: u16,
}

/// A fully decoded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub code: KeyCode,
    /// Present only for mouse button, drag and motion reports.
    pub mouse: Option<MouseReport>,
}

impl Decoded {
    #[must_use]
    pub fn key(code: KeyCode) -> Self { Self { code, mouse: None } }
}

impl From<KeyCode> for Decoded {
    fn from(code: KeyCode) -> Self { Self::key(code) }
}

/// A decoder's verdict on the bytes buffered so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The whole buffer is one complete sequence.
    Resolved(Decoded),
    /// The buffer is a valid prefix, more bytes could complete it.
    NeedMore,
    /// The buffer is not (and can't become) a sequence this decoder understands.
    NotMine,
}

impl DecodeOutcome {
    #[must_use]
    pub fn key(code: KeyCode) -> Self { Self::Resolved(Decoded::key(code)) }

    /// Adds modifiers to a resolved key, following the normal modifier rules. Mouse
    /// reports and [`KeyCode::VOID`] pass through unchanged.
    #[must_use]
    pub fn map_key(self, f: impl FnOnce(KeyCode) -> KeyCode) -> Self {
        match self {
            Self::Resolved(Decoded { code, mouse: None }) if !code.is_void() => {
                Self::key(f(code))
            }
            other => other,
        }
    }
}

/// Whether the decoders may still wait for more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// More bytes may arrive, so a valid prefix is [`DecodeOutcome::NeedMore`].
    #[default]
    Incremental,
    /// No more bytes will arrive for this sequence. A decoder must resolve (possibly to
    /// a best effort key) or answer [`DecodeOutcome::NotMine`].
    Force,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeContext {
    pub protocols: ProtocolFlags,
    pub mode: DecodeMode,
}

impl DecodeContext {
    #[must_use]
    pub fn new(protocols: ProtocolFlags, mode: DecodeMode) -> Self { Self { protocols, mode } }

    #[must_use]
    pub fn is_force(&self) -> bool { self.mode == DecodeMode::Force }

    /// What to answer for a valid but incomplete sequence.
    #[must_use]
    pub fn incomplete(&self) -> DecodeOutcome {
        match self.mode {
            DecodeMode::Incremental => DecodeOutcome::NeedMore,
            DecodeMode::Force => DecodeOutcome::NotMine,
        }
    }
}
