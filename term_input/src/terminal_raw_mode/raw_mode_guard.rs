// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::Write as _;

use miette::{IntoDiagnostic as _, miette};
use rustix::termios::{self, OptionalActions, Termios};

use super::TerminalFd;
use crate::ProtocolFlags;

/// Puts the terminal in raw mode and asks it to speak `protocols` for as long as the
/// guard lives. Dropping the guard turns the protocols off and restores the saved
/// termios settings.
#[derive(Debug)]
pub struct RawModeGuard {
    fd: TerminalFd,
    original: Termios,
    protocols: ProtocolFlags,
}

impl RawModeGuard {
    /// # Errors
    ///
    /// If the terminal can't be opened, or its attributes can't be read or set.
    pub fn enable(protocols: ProtocolFlags) -> miette::Result<Self> {
        let fd = TerminalFd::open()
            .map_err(|e| miette!("failed to get terminal file descriptor: {e}"))?;

        let original = termios::tcgetattr(&fd)
            .map_err(|e| miette!("failed to retrieve terminal attributes: {e}"))?;

        // cfmakeraw: no canonical mode, no echo, no signals, VMIN=1, VTIME=0.
        let mut raw = original.clone();
        raw.make_raw();
        termios::tcsetattr(&fd, OptionalActions::Now, &raw)
            .map_err(|e| miette!("failed to set terminal attributes: {e}"))?;

        let it = Self {
            fd,
            original,
            protocols,
        };
        write_to_terminal(&protocols.enable_sequence())?;

        tracing::debug!(
            message = "raw mode enabled",
            protocols = %protocols.to_list()
        );
        Ok(it)
    }

    #[must_use]
    pub fn protocols(&self) -> ProtocolFlags { self.protocols }

    fn restore(&self) -> miette::Result<()> {
        write_to_terminal(&self.protocols.disable_sequence())?;
        termios::tcsetattr(&self.fd, OptionalActions::Now, &self.original)
            .map_err(|e| miette!("failed to restore terminal attributes: {e}"))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(report) = self.restore() {
            tracing::error!(message = "failed to restore terminal", error = ?report);
        }
    }
}

fn write_to_terminal(sequence: &str) -> miette::Result<()> {
    if sequence.is_empty() {
        return Ok(());
    }
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(sequence.as_bytes()).into_diagnostic()?;
    stdout.flush().into_diagnostic()
}
