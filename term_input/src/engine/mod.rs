// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The event loop that ties the [`RawSource`](crate::RawSource), the
//! [`TimerSet`](crate::TimerSet), the [`PushbackQueue`](crate::PushbackQueue), the
//! [`SequenceMatcher`](crate::SequenceMatcher) and the [protocol
//! decoders](crate::protocol_decoders) together. See [`InputEngine`].

/// Set to `true` to log every resolved sequence at debug level.
pub const DEBUG_TERM_INPUT_SHOW_DECODING: bool = true;

// Attach sources.
pub mod engine_config;
pub mod hooks;
pub mod input_engine;
pub mod playback_log;
pub mod sequence_buffer;

// Re-export.
pub use engine_config::*;
pub use hooks::*;
pub use input_engine::*;
pub use playback_log::*;
pub use sequence_buffer::*;

#[cfg(test)]
mod integration_tests;
