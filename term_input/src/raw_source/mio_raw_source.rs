// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words EINTR epoll kqueue FIONREAD

//! The real terminal backend. One [`mio::Poll`] watches the tty and every registered
//! child descriptor, so the engine can block on all of them (plus its timers) at once.
//!
//! ```text
//! ┌────────────┐  Token(0)          ┌──────────────────┐
//! │ tty fd     ├───────────────────▶│                  │   read() into
//! └────────────┘                    │   mio::Poll      ├──▶ pending bytes
//! ┌────────────┐  Token(fd + 1)     │  (epoll/kqueue)  │
//! │ child fds  ├───────────────────▶│                  ├──▶ ready children
//! └────────────┘                    └──────────────────┘
//! ```
//!
//! [`mio`] is edge triggered, so each readiness event drains the tty until the kernel
//! buffer is empty. Child descriptors are only reported, draining them is up to the
//! [`crate::EngineHooks::on_child_output`] hook that owns them.

use std::{collections::{BTreeSet, VecDeque},
          io::ErrorKind,
          time::Duration};

use mio::{Events, Interest, Poll, Token, unix::SourceFd};
use rustix::io::Errno;

use crate::{ChildDescriptor, EngineError, PollCreationError, RawSource, ReadyChildren,
            TerminalFd, TerminalOpenError, TerminalRegistrationError, WaitResult};

/// Read buffer size for tty reads.
pub const TTY_READ_BUFFER_SIZE: usize = 1_024;

/// Capacity of the [`Events`] buffer passed to [`Poll::poll`].
const EVENTS_CAPACITY: usize = 32;

/// Maps each [`Token`] to the source it was registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKindReady {
    Tty,
    Child(ChildDescriptor),
}

impl SourceKindReady {
    const TTY_TOKEN: Token = Token(0);

    fn to_token(self) -> Option<Token> {
        match self {
            Self::Tty => Some(Self::TTY_TOKEN),
            Self::Child(fd) => usize::try_from(fd.0).ok().map(|fd| Token(fd + 1)),
        }
    }

    fn from_token(token: Token) -> Self {
        match token {
            Self::TTY_TOKEN => Self::Tty,
            Token(it) => Self::Child(ChildDescriptor(
                i32::try_from(it - 1).unwrap_or(i32::MAX),
            )),
        }
    }
}

#[allow(missing_debug_implementations)]
pub struct MioRawSource {
    poll: Poll,
    events: Events,
    tty: TerminalFd,
    read_buffer: Vec<u8>,
    pending: VecDeque<u8>,
    children: BTreeSet<ChildDescriptor>,
    ready_children: ReadyChildren,
    is_eof: bool,
}

impl MioRawSource {
    /// Opens the controlling terminal and registers it with a new [`Poll`].
    ///
    /// # Errors
    ///
    /// [`PollCreationError`], [`TerminalOpenError`] or [`TerminalRegistrationError`].
    pub fn new() -> miette::Result<Self> {
        let poll = Poll::new().map_err(PollCreationError)?;
        let tty = TerminalFd::open().map_err(TerminalOpenError)?;
        poll.registry()
            .register(
                &mut SourceFd(&tty.raw_fd()),
                SourceKindReady::TTY_TOKEN,
                Interest::READABLE,
            )
            .map_err(TerminalRegistrationError)?;

        Ok(Self {
            poll,
            events: Events::with_capacity(EVENTS_CAPACITY),
            tty,
            read_buffer: vec![0; TTY_READ_BUFFER_SIZE],
            pending: VecDeque::with_capacity(TTY_READ_BUFFER_SIZE),
            children: BTreeSet::new(),
            ready_children: ReadyChildren::new(),
            is_eof: false,
        })
    }

    /// Runs one [`Poll::poll`] and dispatches the ready tokens.
    fn poll_once(&mut self, timeout: Option<Duration>) {
        match self.poll.poll(&mut self.events, timeout) {
            Ok(()) => {}
            // EINTR (eg: SIGWINCH): the caller re-evaluates its timers and waits again.
            Err(err) if err.kind() == ErrorKind::Interrupted => return,
            Err(err) => {
                tracing::warn!(message = "mio poll failed", error = ?err);
                return;
            }
        }

        let mut is_tty_ready = false;
        for event in &self.events {
            match SourceKindReady::from_token(event.token()) {
                SourceKindReady::Tty => is_tty_ready = true,
                SourceKindReady::Child(fd) => {
                    if self.children.contains(&fd) && !self.ready_children.contains(&fd) {
                        self.ready_children.push(fd);
                    }
                }
            }
        }

        if is_tty_ready {
            self.drain_tty();
        }
    }

    /// Reads until the kernel buffer is empty. A short read means it is empty, a full
    /// read is followed up only when `FIONREAD` says more is waiting, so this never
    /// blocks.
    fn drain_tty(&mut self) {
        loop {
            match rustix::io::read(&self.tty, &mut self.read_buffer[..]) {
                Ok(0) => {
                    tracing::debug!(message = "tty EOF (0 bytes)");
                    self.is_eof = true;
                    return;
                }
                Ok(count) => {
                    self.pending.extend(&self.read_buffer[..count]);
                    let is_more_waiting = count == self.read_buffer.len()
                        && rustix::io::ioctl_fionread(&self.tty).is_ok_and(|it| it > 0);
                    if !is_more_waiting {
                        return;
                    }
                }
                Err(Errno::INTR) => {}
                Err(Errno::AGAIN) => return,
                Err(err) => {
                    tracing::warn!(message = "tty read failed, treating as hangup", error = ?err);
                    self.is_eof = true;
                    return;
                }
            }
        }
    }

    fn current_state(&self) -> Option<WaitResult> {
        if !self.pending.is_empty() {
            Some(WaitResult::Readable)
        } else if self.is_eof {
            Some(WaitResult::Disconnected)
        } else if !self.ready_children.is_empty() {
            Some(WaitResult::ChildActivity)
        } else {
            None
        }
    }
}

impl RawSource for MioRawSource {
    fn read_byte_nonblocking(&mut self) -> Option<u8> {
        if self.pending.is_empty() && !self.is_eof {
            self.poll_once(Some(Duration::ZERO));
        }
        self.pending.pop_front()
    }

    fn wait(&mut self, timeout_ms: Option<u64>) -> WaitResult {
        if let Some(it) = self.current_state() {
            return it;
        }
        self.poll_once(timeout_ms.map(Duration::from_millis));
        self.current_state().unwrap_or(WaitResult::TimedOut)
    }

    fn poll_children(&mut self) -> ReadyChildren {
        if self.ready_children.is_empty() && !self.children.is_empty() {
            self.poll_once(Some(Duration::ZERO));
        }
        std::mem::take(&mut self.ready_children)
    }

    fn register_descriptor(&mut self, fd: ChildDescriptor) -> Result<(), EngineError> {
        let registration_error = |message: String| EngineError::DescriptorRegistration { fd, message };
        let token = SourceKindReady::Child(fd)
            .to_token()
            .ok_or_else(|| registration_error("negative descriptor".into()))?;
        self.poll
            .registry()
            .register(&mut SourceFd(&fd.0), token, Interest::READABLE)
            .map_err(|err| registration_error(err.to_string()))?;
        self.children.insert(fd);
        Ok(())
    }

    fn unregister_descriptor(&mut self, fd: ChildDescriptor) -> Result<(), EngineError> {
        if !self.children.remove(&fd) {
            return Err(EngineError::DescriptorNotRegistered(fd));
        }
        self.ready_children.retain(|it| *it != fd);
        self.poll
            .registry()
            .deregister(&mut SourceFd(&fd.0))
            .map_err(|err| EngineError::DescriptorRegistration {
                fd,
                message: err.to_string(),
            })
    }
}
