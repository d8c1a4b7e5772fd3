// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words mintty Cygwin

//! Stateless decoders for every input grammar a terminal may speak. The entry point is
//! [`decode`] (in [`router`]), which looks at the first bytes of the buffer and hands it
//! to the right grammar.
//!
//! Each decoder answers one of three things about the bytes seen so far, see
//! [`DecodeOutcome`]. Decoders never consume input on their own. The engine owns the
//! buffer and decides what to do with an answer.

// Private modules (hide internal structure).
mod control;
mod csi;
mod cygwin;
mod escape;
mod mouse;
mod ss3;
mod utf8;

// Conditionally public modules for documentation and testing.
#[cfg(any(test, doc))]
pub mod csi_params;
#[cfg(not(any(test, doc)))]
mod csi_params;

// Public modules.
pub mod decode_types;
pub mod protocol_flags;
pub mod router;
pub mod win32_keys;

// Re-export.
pub use csi_params::*;
pub use decode_types::*;
pub use protocol_flags::*;
pub use router::*;
pub use win32_keys::*;
