// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ChildDescriptor, PushbackQueue, WindowId, WindowLocation};

/// Callbacks the engine makes while it waits for input. Hooks that get the
/// [`PushbackQueue`] may push events, which [`crate::InputEngine::next_event`] returns
/// before reading the terminal again.
///
/// All methods default to doing nothing.
pub trait EngineHooks {
    /// The idle timer fired (no input for the configured interval).
    fn on_idle(&mut self, _pushback: &mut PushbackQueue) {}

    /// The update timer fired, redraw the screen.
    fn on_update(&mut self) {}

    /// The wall clock reached a new minute.
    fn on_minute(&mut self, _pushback: &mut PushbackQueue) {}

    /// Registered child descriptors are ready to read.
    fn on_child_output(&mut self, _ready: &[ChildDescriptor], _pushback: &mut PushbackQueue) {}
}

/// Hooks that ignore every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl EngineHooks for NoopHooks {}

/// Resolves a mouse position to the window under it.
pub trait WindowLocator {
    fn locate(&self, col: u16, row: u16) -> (WindowId, WindowLocation);
}

/// Everything is in the text area of window `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleWindowLocator;

impl WindowLocator for SingleWindowLocator {
    fn locate(&self, _col: u16, _row: u16) -> (WindowId, WindowLocation) {
        (WindowId::default(), WindowLocation::Text)
    }
}
