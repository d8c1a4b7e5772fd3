// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EscapeDelay, ProtocolFlags};

/// Upper bound for the screen update timer.
pub const MAX_UPDATE_INTERVAL_MS: u64 = 3_000;
pub const DEFAULT_CHILD_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_MAX_DESCRIPTORS: usize = 16;
pub const DEFAULT_PLAYBACK_CAPACITY: usize = 256;

/// How long [`crate::InputEngine::next_event`] may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallerTimeout {
    #[default]
    Forever,
    /// Don't block at all.
    Poll,
    Millis(u64),
}

impl CallerTimeout {
    /// The classic integer encoding: `0` blocks forever, negative values poll, positive
    /// values are milliseconds.
    #[must_use]
    pub fn from_ms(ms: i64) -> Self {
        match u64::try_from(ms) {
            Ok(0) => Self::Forever,
            Ok(ms) => Self::Millis(ms),
            Err(_) => Self::Poll,
        }
    }
}

/// Everything the engine needs to know up front. All fields have defaults, see
/// [`EngineConfig::default`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub protocols: ProtocolFlags,
    pub escape_delay: EscapeDelay,
    /// `None` disables the idle timer.
    pub idle_interval_ms: Option<u64>,
    /// Clamped to [`MAX_UPDATE_INTERVAL_MS`].
    pub update_interval_ms: u64,
    pub minute_timer: bool,
    pub child_poll_interval_ms: u64,
    pub max_descriptors: usize,
    /// Number of resolved sequences kept for playback. `0` disables the log.
    pub playback_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            protocols: ProtocolFlags::default(),
            escape_delay: EscapeDelay::default(),
            idle_interval_ms: None,
            update_interval_ms: MAX_UPDATE_INTERVAL_MS,
            minute_timer: true,
            child_poll_interval_ms: DEFAULT_CHILD_POLL_INTERVAL_MS,
            max_descriptors: DEFAULT_MAX_DESCRIPTORS,
            playback_capacity: DEFAULT_PLAYBACK_CAPACITY,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn update_interval_ms(&self) -> u64 {
        self.update_interval_ms.clamp(1, MAX_UPDATE_INTERVAL_MS)
    }
}
