// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallvec::SmallVec;

use crate::{KeyCode, SEQUENCE_BUFFER_CAPACITY};

/// The bytes that made up one decoded sequence.
pub type RawSequence = SmallVec<[u8; SEQUENCE_BUFFER_CAPACITY]>;

/// What [`crate::InputEngine::next_event`] hands to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The caller's timeout expired (or it asked to poll) and nothing was pending.
    Timeout,
    /// A key, including [`KeyCode::VOID`] for consumed input that means nothing.
    KeyDown(KeyCode),
    /// A mouse button, drag or motion report.
    Mouse(MouseEvent),
    /// An undecoded byte, only produced while raw byte mode is on.
    RawByte(u8),
}

/// Which editor window a mouse position falls into. Window `0` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WindowId(pub u32);

/// Where inside a window a mouse position falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowLocation {
    #[default]
    Text,
    ModeLine,
    ScrollBar,
    Border,
    Outside,
}

/// A decoded mouse report with its position already resolved to a window. Columns and
/// rows are 0 based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    pub code: KeyCode,
    pub col: u16,
    pub row: u16,
    pub window: WindowId,
    pub location: WindowLocation,
    pub timestamp_ms: u64,
    /// The terminal bytes, `None` for synthesized events.
    pub raw: Option<RawSequence>,
}
