// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallvec::SmallVec;

use crate::EngineError;

/// A descriptor of a child process pipe (or any other fd) the engine should watch
/// alongside the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildDescriptor(pub i32);

/// Children reported ready by one poll.
pub type ReadyChildren = SmallVec<[ChildDescriptor; 4]>;

/// Why [`RawSource::wait`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    /// At least one terminal byte can be read without blocking.
    Readable,
    TimedOut,
    /// A registered child descriptor became readable.
    ChildActivity,
    /// The terminal is gone (EOF or hangup). No more bytes will arrive.
    Disconnected,
}

/// The engine's only view of the outside world: bytes from the terminal, and readiness
/// of child descriptors. The real implementation is [`crate::MioRawSource`], tests use a
/// scripted source driven by a manual clock.
pub trait RawSource {
    /// The next terminal byte if one is available right now. Never blocks.
    fn read_byte_nonblocking(&mut self) -> Option<u8>;

    /// Blocks until a terminal byte is available, a child descriptor is ready, or
    /// `timeout_ms` passes. `None` waits forever.
    fn wait(&mut self, timeout_ms: Option<u64>) -> WaitResult;

    /// Children that became ready since the last call, without blocking.
    fn poll_children(&mut self) -> ReadyChildren;

    /// # Errors
    ///
    /// If the descriptor can't be watched.
    fn register_descriptor(&mut self, fd: ChildDescriptor) -> Result<(), EngineError>;

    /// # Errors
    ///
    /// If the descriptor was not being watched.
    fn unregister_descriptor(&mut self, fd: ChildDescriptor) -> Result<(), EngineError>;
}
