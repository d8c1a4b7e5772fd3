// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::{BTreeSet, VecDeque};

use crate::{ChildDescriptor, EngineError, ManualClock, MonotonicClock, RawSource,
            ReadyChildren, WaitResult};

/// Something that happens to a [`ScriptedSource`] at a given time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptItem {
    Bytes(Vec<u8>),
    Child(ChildDescriptor),
    Disconnect,
}

/// A [`RawSource`] that replays a timeline against a [`ManualClock`]. Waiting never
/// sleeps: it jumps the shared clock forward to the next scripted item, or by the whole
/// timeout if nothing is due before it.
///
/// ```ignore
/// use r3bl_term_input::{ManualClock, test_fixtures::ScriptedSource};
///
/// let clock = ManualClock::new(0);
/// let source = ScriptedSource::new(clock.clone())
///     .bytes_at(0, b"\x1b")
///     .bytes_at(10, b"[A");
/// ```
#[derive(Debug)]
pub struct ScriptedSource {
    clock: ManualClock,
    timeline: VecDeque<(u64, ScriptItem)>,
    pending: VecDeque<u8>,
    registered: BTreeSet<ChildDescriptor>,
    ready_children: ReadyChildren,
    is_disconnected: bool,
    waits: Vec<Option<u64>>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            timeline: VecDeque::new(),
            pending: VecDeque::new(),
            registered: BTreeSet::new(),
            ready_children: ReadyChildren::new(),
            is_disconnected: false,
            waits: Vec::new(),
        }
    }

    /// Terminal bytes that become readable at `at_ms`.
    #[must_use]
    pub fn bytes_at(self, at_ms: u64, bytes: impl AsRef<[u8]>) -> Self {
        self.with_item(at_ms, ScriptItem::Bytes(bytes.as_ref().to_vec()))
    }

    /// A registered child descriptor that becomes ready at `at_ms`.
    #[must_use]
    pub fn child_ready_at(self, at_ms: u64, fd: ChildDescriptor) -> Self {
        self.with_item(at_ms, ScriptItem::Child(fd))
    }

    /// The terminal hangs up at `at_ms`.
    #[must_use]
    pub fn disconnect_at(self, at_ms: u64) -> Self {
        self.with_item(at_ms, ScriptItem::Disconnect)
    }

    /// Items at the same time keep the order they were added in.
    #[must_use]
    pub fn with_item(mut self, at_ms: u64, item: ScriptItem) -> Self {
        let index = self
            .timeline
            .iter()
            .position(|(it_at_ms, _)| *it_at_ms > at_ms)
            .unwrap_or(self.timeline.len());
        self.timeline.insert(index, (at_ms, item));
        self
    }

    /// Every timeout passed to [`RawSource::wait`], in order.
    #[must_use]
    pub fn waits(&self) -> &[Option<u64>] { &self.waits }

    #[must_use]
    pub fn registered(&self) -> &BTreeSet<ChildDescriptor> { &self.registered }

    #[must_use]
    pub fn is_exhausted(&self) -> bool { self.timeline.is_empty() && self.pending.is_empty() }

    fn deliver_due(&mut self) {
        let now_ms = self.clock.now_ms();
        while let Some((at_ms, _)) = self.timeline.front()
            && *at_ms <= now_ms
        {
            let Some((_, item)) = self.timeline.pop_front() else {
                break;
            };
            match item {
                ScriptItem::Bytes(bytes) => self.pending.extend(bytes),
                ScriptItem::Child(fd) => {
                    if self.registered.contains(&fd) && !self.ready_children.contains(&fd) {
                        self.ready_children.push(fd);
                    }
                }
                ScriptItem::Disconnect => self.is_disconnected = true,
            }
        }
    }

    fn classify(&self) -> Option<WaitResult> {
        if !self.pending.is_empty() {
            Some(WaitResult::Readable)
        } else if !self.ready_children.is_empty() {
            Some(WaitResult::ChildActivity)
        } else if self.is_disconnected {
            Some(WaitResult::Disconnected)
        } else {
            None
        }
    }
}

impl RawSource for ScriptedSource {
    fn read_byte_nonblocking(&mut self) -> Option<u8> {
        self.deliver_due();
        self.pending.pop_front()
    }

    fn wait(&mut self, timeout_ms: Option<u64>) -> WaitResult {
        self.waits.push(timeout_ms);
        self.deliver_due();
        if let Some(result) = self.classify() {
            return result;
        }

        let now_ms = self.clock.now_ms();
        let next_at_ms = self.timeline.front().map(|(at_ms, _)| *at_ms);
        match (next_at_ms, timeout_ms) {
            (Some(at_ms), None) => {
                self.clock.set(at_ms);
            }
            (Some(at_ms), Some(timeout_ms)) if at_ms <= now_ms + timeout_ms => {
                self.clock.set(at_ms);
            }
            (_, Some(timeout_ms)) => {
                self.clock.advance(timeout_ms);
                return WaitResult::TimedOut;
            }
            // Nothing left to happen, ever.
            (None, None) => return WaitResult::Disconnected,
        }

        self.deliver_due();
        self.classify().unwrap_or(WaitResult::TimedOut)
    }

    fn poll_children(&mut self) -> ReadyChildren {
        self.deliver_due();
        std::mem::take(&mut self.ready_children)
    }

    fn register_descriptor(&mut self, fd: ChildDescriptor) -> Result<(), EngineError> {
        self.registered.insert(fd);
        Ok(())
    }

    fn unregister_descriptor(&mut self, fd: ChildDescriptor) -> Result<(), EngineError> {
        if self.registered.remove(&fd) {
            self.ready_children.retain(|it| *it != fd);
            Ok(())
        } else {
            Err(EngineError::DescriptorNotRegistered(fd))
        }
    }
}
