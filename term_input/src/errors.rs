// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Errors reported by the engine's configuration and registration operations.
//!
//! Decoding itself never fails: malformed input degrades to literal keys. The only
//! fallible operations are the ones a caller drives explicitly (binding a sequence,
//! pushing back an event, registering a descriptor, changing the escape delay) plus the
//! setup of the real tty backend.

use miette::Diagnostic;

use crate::{ChildDescriptor, KeyCode};

/// Errors returned by [`crate::InputEngine`] and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum EngineError {
    /// A sequence binding was empty.
    #[error("Can't bind an empty byte sequence")]
    #[diagnostic(code(r3bl_term_input::matcher::empty_sequence))]
    EmptySequence,

    /// A sequence binding was longer than the sequence buffer.
    #[error("Sequence of {len} bytes exceeds the {max} byte sequence buffer")]
    #[diagnostic(
        code(r3bl_term_input::matcher::sequence_too_long),
        help("No terminal key sequence is this long, check the binding")
    )]
    SequenceTooLong { len: usize, max: usize },

    /// Mouse coordinates may only ride along with a mouse range key code.
    #[error("Mouse data attached to non mouse key code {code}")]
    #[diagnostic(code(r3bl_term_input::pushback::mouse_on_non_mouse_code))]
    MouseAttachedToNonMouseCode { code: KeyCode },

    #[error("Escape delay {0}ms is out of range")]
    #[diagnostic(
        code(r3bl_term_input::escape_delay::out_of_range),
        help("The escape delay must be between 0 and 9999 milliseconds")
    )]
    EscapeDelayOutOfRange(u32),

    #[error("Can't watch more than {max} child descriptors")]
    #[diagnostic(code(r3bl_term_input::descriptors::limit_reached))]
    TooManyDescriptors { max: usize },

    #[error("Descriptor {0:?} is already registered")]
    #[diagnostic(code(r3bl_term_input::descriptors::already_registered))]
    DescriptorAlreadyRegistered(ChildDescriptor),

    #[error("Descriptor {0:?} is not registered")]
    #[diagnostic(code(r3bl_term_input::descriptors::not_registered))]
    DescriptorNotRegistered(ChildDescriptor),

    /// The OS refused to (de)register a descriptor with the poller.
    #[error("Failed to update poll registration for descriptor {fd:?}: {message}")]
    #[diagnostic(
        code(r3bl_term_input::mio::registration),
        help("The descriptor may already be closed")
    )]
    DescriptorRegistration { fd: ChildDescriptor, message: String },
}

/// Failed to create the [`mio::Poll`] instance.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("Failed to create mio::Poll")]
#[diagnostic(
    code(r3bl_term_input::mio::poll_creation),
    help("This usually means the system ran out of file descriptors")
)]
pub struct PollCreationError(#[source] pub std::io::Error);

/// Failed to open a file descriptor for the controlling terminal.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("Failed to open the terminal for reading")]
#[diagnostic(
    code(r3bl_term_input::tty::open),
    help("stdin is not a tty and /dev/tty is not available")
)]
pub struct TerminalOpenError(#[source] pub std::io::Error);

/// Failed to register the terminal descriptor with mio.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("Failed to register the terminal with mio")]
#[diagnostic(
    code(r3bl_term_input::mio::tty_registration),
    help("The terminal descriptor may be invalid or already registered")
)]
pub struct TerminalRegistrationError(#[source] pub std::io::Error);
