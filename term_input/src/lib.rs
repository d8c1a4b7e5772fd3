// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words ESCDELAY mintty tty Cygwin keypad

//! # r3bl_term_input
//!
//! Terminal keyboard input decoding engine for a full screen editor. This crate turns
//! the raw byte stream coming from a tty (in raw mode) into a stream of abstract,
//! modifier qualified [`KeyCode`]s and [`MouseEvent`]s, and multiplexes that stream with
//! timers and child process descriptors so the editor can block in one place.
//!
//! ```text
//! RawSource ──bytes──▶ SequenceBuffer ──▶ SequenceMatcher (user table, priority)
//!      ▲                     │                  │ no exact / no prefix
//!      │                     │                  ▼
//!  PushbackQueue ◀─rest──────┘          ProtocolDecoders (CSI, SS3, win32, UTF-8 ..)
//!      │                                        │
//!      └──events──▶ InputEngine::next_event ◀───┘  ◀── TimerSet (idle, update, minute,
//!                                                        caller timeout, escape, child poll)
//! ```
//!
//! The main entry point is [`InputEngine`]. It owns a [`RawSource`] (the real tty is
//! [`MioRawSource`] on Unix), a [`TimerSet`] driven by a [`MonotonicClock`], a
//! [`PushbackQueue`] of synthetic events and replay bytes, and a user extensible
//! [`SequenceMatcher`] that takes priority over the built in [protocol
//! decoders](crate::protocol_decoders).
//!
//! # ESC ambiguity
//!
//! A lone `ESC` byte is either the Escape key, or the start of a control sequence. The
//! engine waits at most [`EscapeDelay`] milliseconds (default 750, overridable via the
//! `ESCDELAY` environment variable, the command line, or at runtime) for the rest of a
//! sequence. Once the delay expires the partial sequence is resolved in force mode, and
//! anything that still doesn't match is emitted one literal byte at a time.
//!
//! # Key code space
//!
//! Every key is a 32-bit [`KeyCode`] with three disjoint fields: a value, a set of
//! [`KeyModifiers`] (`SHIFT`, `CTRL`, `META`) and a [`KeyRange`] tag. The special
//! [`KeyCode::VOID`] is returned for inputs that were fully consumed but mean nothing,
//! eg: a kitty key release or a win32 key up record.

// Allow unwrap in tests; deny it elsewhere (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod engine;
pub mod errors;
pub mod escape_delay;
pub mod input_event;
pub mod key_code;
pub mod log_support;
pub mod protocol_decoders;
pub mod pushback_queue;
pub mod raw_source;
pub mod sequence_matcher;
#[cfg(unix)]
pub mod terminal_raw_mode;
pub mod timers;

// Test fixtures are only public when running tests or generating docs.
#[cfg(any(test, doc))]
pub mod test_fixtures;

// Re-export.
pub use engine::*;
pub use errors::*;
pub use escape_delay::*;
pub use input_event::*;
pub use key_code::*;
pub use log_support::*;
pub use protocol_decoders::*;
pub use pushback_queue::*;
pub use raw_source::*;
pub use sequence_matcher::*;
#[cfg(unix)]
pub use terminal_raw_mode::*;
pub use timers::*;
