// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs::File, io};

use rustix::{fd::{AsFd, AsRawFd, BorrowedFd, RawFd},
             termios};

/// The controlling terminal: stdin when it is a tty, otherwise `/dev/tty` (eg: when
/// input is piped into the editor).
#[derive(Debug)]
pub enum TerminalFd {
    Stdin(io::Stdin),
    DevTty(File),
}

impl TerminalFd {
    /// # Errors
    ///
    /// If stdin is not a tty and `/dev/tty` can't be opened.
    pub fn open() -> io::Result<Self> {
        let stdin = io::stdin();
        if termios::isatty(&stdin) {
            return Ok(Self::Stdin(stdin));
        }
        File::options()
            .read(true)
            .write(true)
            .open("/dev/tty")
            .map(Self::DevTty)
    }

    #[must_use]
    pub fn raw_fd(&self) -> RawFd { self.as_fd().as_raw_fd() }
}

impl AsFd for TerminalFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        match self {
            Self::Stdin(stdin) => stdin.as_fd(),
            Self::DevTty(file) => file.as_fd(),
        }
    }
}
