// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! FIFO of input that is consumed before the terminal is read again.
//!
//! It holds two kinds of entries:
//! 1. Synthetic events pushed by the editor or by timer hooks (macros, keyboard
//!    playback, child process notifications).
//! 2. Raw bytes put back by the engine after a failed match, so they are decoded again
//!    from the start.

use std::collections::VecDeque;

use crate::{EngineError, InputEvent, KeyCode, MouseEvent};

/// An event waiting in the [`PushbackQueue`]. Mouse data is only valid on a mouse
/// range code, which [`PendingEvent::new`] enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEvent {
    code: KeyCode,
    mouse: Option<MouseEvent>,
}

impl PendingEvent {
    /// # Errors
    ///
    /// [`EngineError::MouseAttachedToNonMouseCode`] if `mouse` is set and `code` is not
    /// in the mouse range.
    pub fn new(code: KeyCode, mouse: Option<MouseEvent>) -> Result<Self, EngineError> {
        if mouse.is_some() && !code.is_mouse() {
            return Err(EngineError::MouseAttachedToNonMouseCode { code });
        }
        Ok(Self { code, mouse })
    }

    #[must_use]
    pub fn key(code: KeyCode) -> Self { Self { code, mouse: None } }

    #[must_use]
    pub fn code(&self) -> KeyCode { self.code }

    #[must_use]
    pub fn mouse(&self) -> Option<&MouseEvent> { self.mouse.as_ref() }

    /// The event's code always wins over the code stored in the mouse payload.
    #[must_use]
    pub fn into_input_event(self) -> InputEvent {
        match self.mouse {
            Some(mouse) => InputEvent::Mouse(MouseEvent {
                code: self.code,
                ..mouse
            }),
            None => InputEvent::KeyDown(self.code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingEntry {
    Event(PendingEvent),
    Byte(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushbackPosition {
    /// Delivered before everything already queued.
    Front,
    /// Delivered after everything already queued.
    #[default]
    Back,
}

#[derive(Debug, Clone, Default)]
pub struct PushbackQueue {
    entries: VecDeque<PendingEntry>,
}

impl PushbackQueue {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn push_event(&mut self, event: PendingEvent, position: PushbackPosition) {
        let entry = PendingEntry::Event(event);
        match position {
            PushbackPosition::Front => self.entries.push_front(entry),
            PushbackPosition::Back => self.entries.push_back(entry),
        }
    }

    /// Convenience for the common case of a plain key at the back of the queue.
    pub fn push_key(&mut self, code: KeyCode) {
        self.push_event(PendingEvent::key(code), PushbackPosition::Back);
    }

    /// Puts `bytes` back in front of everything else, keeping their order.
    pub fn push_bytes_front(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.entries.push_front(PendingEntry::Byte(*byte));
        }
    }

    pub fn push_bytes_back(&mut self, bytes: &[u8]) {
        self.entries
            .extend(bytes.iter().map(|byte| PendingEntry::Byte(*byte)));
    }

    #[must_use]
    pub fn front(&self) -> Option<&PendingEntry> { self.entries.front() }

    pub fn pop_front(&mut self) -> Option<PendingEntry> { self.entries.pop_front() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    pub fn clear(&mut self) { self.entries.clear(); }

    pub fn iter(&self) -> impl Iterator<Item = &PendingEntry> { self.entries.iter() }
}

#[cfg(test)]
mod tests_pushback_queue {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{MiscKey, MouseAction, WindowId, WindowLocation};

    fn mouse_payload(code: KeyCode) -> MouseEvent {
        MouseEvent {
            code,
            col: 4,
            row: 2,
            window: WindowId(0),
            location: WindowLocation::Text,
            timestamp_ms: 0,
            raw: None,
        }
    }

    #[test]
    fn test_front_and_back_ordering() {
        let mut queue = PushbackQueue::new();
        queue.push_key(KeyCode::char('b'));
        queue.push_event(PendingEvent::key(KeyCode::char('a')), PushbackPosition::Front);
        queue.push_key(KeyCode::char('c'));

        let drained: Vec<_> = std::iter::from_fn(|| queue.pop_front()).collect();
        assert_eq!(
            drained,
            vec![
                PendingEntry::Event(PendingEvent::key(KeyCode::char('a'))),
                PendingEntry::Event(PendingEvent::key(KeyCode::char('b'))),
                PendingEntry::Event(PendingEvent::key(KeyCode::char('c'))),
            ]
        );
    }

    #[test]
    fn test_bytes_front_keep_their_order() {
        let mut queue = PushbackQueue::new();
        queue.push_key(KeyCode::char('z'));
        queue.push_bytes_front(b"[A");
        assert_eq!(queue.pop_front(), Some(PendingEntry::Byte(b'[')));
        assert_eq!(queue.pop_front(), Some(PendingEntry::Byte(b'A')));
        assert!(matches!(queue.pop_front(), Some(PendingEntry::Event(_))));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_mouse_payload_requires_mouse_code() {
        let code = KeyCode::misc(MiscKey::Up);
        assert_eq!(
            PendingEvent::new(code, Some(mouse_payload(code))),
            Err(EngineError::MouseAttachedToNonMouseCode { code })
        );

        let code = KeyCode::mouse(1, MouseAction::Press);
        let event = PendingEvent::new(code, Some(mouse_payload(code))).unwrap();
        assert_eq!(event.into_input_event(), InputEvent::Mouse(mouse_payload(code)));
    }
}
