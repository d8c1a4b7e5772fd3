// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`InputEngine::next_event`] is the one place the editor blocks. Each call runs this
//! loop until it has something to return:
//!
//! ```text
//!   ┌──▶ sample clock
//!   │      │
//!   │      ▼
//!   │    pushback queue ── event ──────────────────────────▶ return event
//!   │      │ byte                     (forces a partial sequence first)
//!   │      ▼
//!   │    terminal byte? ── yes ──▶ buffer + evaluate ──┬── resolved ──▶ return key
//!   │      │ no                                        ├── no match ──▶ return 1st byte,
//!   │      │                                           │                re-feed the rest
//!   │      │                                           └── need more ─┐ (arm escape timer)
//!   │      ▼                                                          │
//!   │    partial sequence and EOF? ───────────────────────────────────┼──▶ literal bytes
//!   │    partial sequence and (escape timer expired, poll)? ──────────┼──▶ force evaluate
//!   │    no sequence and (caller timeout expired, poll, EOF)?  ───────┼──▶ return Timeout
//!   │      │                                                          │
//!   │      ▼                                                          │
//!   │    no sequence: fire expired timers (idle, minute, update, ◀────┘
//!   │      │           child poll)
//!   │      │ nothing fired
//!   │      ▼
//!   └─── wait(escape timer if partial, else min of the active timers)
//!
//! While a sequence is partial no hook runs. Child activity seen in that window is held
//! and reported to [`EngineHooks::on_child_output`] once the sequence resolves.
//! ```
//!
//! # Evaluating a sequence
//!
//! The [`SequenceMatcher`] is consulted first, so user bindings win over the built in
//! protocols:
//!
//! | Matcher says     | Incremental          | Forced                     |
//! |:-----------------|:---------------------|:---------------------------|
//! | exact            | resolved             | resolved                   |
//! | exact and prefix | need more            | resolved                   |
//! | prefix           | need more            | ask the protocol decoders  |
//! | no match         | ask the decoders     | ask the decoders (forced)  |
//!
//! When nothing resolves, the first byte is returned as a literal key and the rest is
//! put back at the front of the [`PushbackQueue`] to be decoded again from scratch.

use std::collections::BTreeSet;

use smallvec::{SmallVec, smallvec};

use crate::{CallerTimeout, ChildDescriptor, DEBUG_TERM_INPUT_SHOW_DECODING, DecodeContext,
            DecodeMode, DecodeOutcome, Decoded, EngineConfig, EngineError, EngineHooks,
            EscapeDelaySource, InputEvent, KeyCode, MonotonicClock, MouseEvent, NoopHooks,
            PendingEntry, PendingEvent, PlaybackLog, ProtocolFlags, PushbackPosition,
            PushbackQueue, RawSource, ReadyChildren, SequenceBuffer, SequenceMatch, SequenceMatcher,
            SingleWindowLocator, TimerId, TimerSet, WaitResult, WindowLocator, decode};

/// What the matcher and decoders together make of the buffered bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Resolved(Decoded),
    NeedMore,
    NoMatch,
}

/// Timers that bound every wait, regardless of the sequence buffer.
const BACKGROUND_TIMERS: [TimerId; 4] = [
    TimerId::Idle,
    TimerId::Update,
    TimerId::Minute,
    TimerId::ChildPoll,
];

/// The keyboard input engine. See the [module docs](self) for the event loop.
///
/// `S` is where bytes come from ([`crate::MioRawSource`] for a real tty), `C` is the
/// clock that drives the timers ([`crate::SystemClock`] in production).
#[allow(missing_debug_implementations)]
pub struct InputEngine<S: RawSource, C: MonotonicClock> {
    source: S,
    clock: C,
    config: EngineConfig,
    timers: TimerSet,
    pushback: PushbackQueue,
    matcher: SequenceMatcher,
    sequence: SequenceBuffer,
    playback: PlaybackLog,
    descriptors: BTreeSet<ChildDescriptor>,
    /// Children that became ready while a sequence was partial. Their hook runs once
    /// the sequence resolves.
    deferred_children: ReadyChildren,
    hooks: Box<dyn EngineHooks>,
    locator: Box<dyn WindowLocator>,
    is_raw_byte_mode: bool,
    is_disconnected: bool,
}

impl<S: RawSource, C: MonotonicClock> InputEngine<S, C> {
    /// An engine with the default [`SequenceMatcher`] table, no hooks, and a single
    /// window.
    pub fn new(source: S, clock: C, config: EngineConfig) -> Self {
        let timers = TimerSet::new(clock.now_ms());
        let playback = PlaybackLog::new(config.playback_capacity);
        Self {
            source,
            clock,
            config,
            timers,
            pushback: PushbackQueue::new(),
            matcher: SequenceMatcher::with_defaults(),
            sequence: SequenceBuffer::new(),
            playback,
            descriptors: BTreeSet::new(),
            deferred_children: ReadyChildren::new(),
            hooks: Box::new(NoopHooks),
            locator: Box::new(SingleWindowLocator),
            is_raw_byte_mode: false,
            is_disconnected: false,
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: impl EngineHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    #[must_use]
    pub fn with_window_locator(mut self, locator: impl WindowLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    pub fn set_hooks(&mut self, hooks: Box<dyn EngineHooks>) { self.hooks = hooks; }

    pub fn set_window_locator(&mut self, locator: Box<dyn WindowLocator>) {
        self.locator = locator;
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: SequenceMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn source(&self) -> &S { &self.source }

    pub fn source_mut(&mut self) -> &mut S { &mut self.source }

    pub fn clock(&self) -> &C { &self.clock }

    pub fn timers(&self) -> &TimerSet { &self.timers }

    pub fn matcher(&self) -> &SequenceMatcher { &self.matcher }

    pub fn pushback_queue(&self) -> &PushbackQueue { &self.pushback }

    pub fn playback_log(&self) -> &PlaybackLog { &self.playback }

    pub fn playback_log_mut(&mut self) -> &mut PlaybackLog { &mut self.playback }

    pub fn protocols(&self) -> ProtocolFlags { self.config.protocols }

    pub fn set_protocols(&mut self, protocols: ProtocolFlags) { self.config.protocols = protocols; }

    pub fn is_disconnected(&self) -> bool { self.is_disconnected }

    /// While on, every byte is returned undecoded as [`InputEvent::RawByte`] (eg: for
    /// "quote next key"). A partially decoded sequence is finished first.
    pub fn set_raw_byte_mode(&mut self, is_on: bool) { self.is_raw_byte_mode = is_on; }

    pub fn escape_delay(&self) -> (u16, EscapeDelaySource) { self.config.escape_delay.current() }

    /// Changes the escape delay from now on, returning the previous value.
    ///
    /// # Errors
    ///
    /// [`EngineError::EscapeDelayOutOfRange`].
    pub fn set_escape_delay(&mut self, ms: u32) -> Result<u16, EngineError> {
        let previous = self.config.escape_delay.set_explicit(ms)?;
        tracing::debug!(message = "escape delay changed", previous, ms);
        Ok(previous)
    }

    /// # Errors
    ///
    /// See [`SequenceMatcher::bind`].
    pub fn bind_sequence(&mut self, bytes: &[u8], code: KeyCode) -> Result<Option<KeyCode>, EngineError> {
        self.matcher.bind(bytes, code)
    }

    pub fn unbind_sequence(&mut self, bytes: &[u8]) -> Option<KeyCode> { self.matcher.unbind(bytes) }

    /// Queues a synthetic event, returned by [`Self::next_event`] before any more
    /// terminal input.
    ///
    /// # Errors
    ///
    /// [`EngineError::MouseAttachedToNonMouseCode`].
    pub fn push_back(
        &mut self,
        code: KeyCode,
        mouse: Option<MouseEvent>,
        position: PushbackPosition,
    ) -> Result<(), EngineError> {
        let event = PendingEvent::new(code, mouse)?;
        self.pushback.push_event(event, position);
        Ok(())
    }

    /// Queues bytes to be decoded as if the terminal had sent them (eg: keyboard macro
    /// playback).
    pub fn push_back_bytes(&mut self, bytes: &[u8]) { self.pushback.push_bytes_back(bytes); }

    /// Whether input is waiting, without blocking or consuming it. A terminal byte that
    /// is read to find out is kept in the [`PushbackQueue`].
    pub fn peek_pending(&mut self) -> bool {
        if !self.pushback.is_empty() || !self.sequence.is_empty() {
            return true;
        }
        match self.source.read_byte_nonblocking() {
            Some(byte) => {
                self.pushback.push_bytes_back(&[byte]);
                true
            }
            None => false,
        }
    }

    /// Watches `fd` alongside the terminal. Ready descriptors are reported to
    /// [`EngineHooks::on_child_output`].
    ///
    /// # Errors
    ///
    /// [`EngineError::DescriptorAlreadyRegistered`],
    /// [`EngineError::TooManyDescriptors`], or whatever the source reports.
    pub fn register_descriptor(&mut self, fd: ChildDescriptor) -> Result<(), EngineError> {
        if self.descriptors.contains(&fd) {
            return Err(EngineError::DescriptorAlreadyRegistered(fd));
        }
        if self.descriptors.len() >= self.config.max_descriptors {
            return Err(EngineError::TooManyDescriptors {
                max: self.config.max_descriptors,
            });
        }
        self.source.register_descriptor(fd)?;
        self.descriptors.insert(fd);
        if !self.timers.is_active(TimerId::ChildPoll) {
            self.sample_clock();
            self.timers
                .start(TimerId::ChildPoll, self.config.child_poll_interval_ms);
        }
        tracing::debug!(message = "descriptor registered", fd = ?fd);
        Ok(())
    }

    /// # Errors
    ///
    /// [`EngineError::DescriptorNotRegistered`], or whatever the source reports.
    pub fn unregister_descriptor(&mut self, fd: ChildDescriptor) -> Result<(), EngineError> {
        if !self.descriptors.remove(&fd) {
            return Err(EngineError::DescriptorNotRegistered(fd));
        }
        self.deferred_children.retain(|it| *it != fd);
        if self.descriptors.is_empty() {
            self.timers.stop(TimerId::ChildPoll);
        }
        tracing::debug!(message = "descriptor unregistered", fd = ?fd);
        self.source.unregister_descriptor(fd)
    }

    /// Returns the next event, blocking for at most `timeout` (plus the escape delay,
    /// if a sequence is in progress when the timeout expires).
    pub fn next_event(&mut self, timeout: CallerTimeout) -> InputEvent {
        self.sample_clock();
        self.arm_timers_for_call(timeout);
        let event = self.run_event_loop(timeout);
        self.timers.stop(TimerId::CallerTimeout);
        event
    }

    fn run_event_loop(&mut self, timeout: CallerTimeout) -> InputEvent {
        loop {
            self.sample_clock();

            if self.sequence.is_empty() && !self.deferred_children.is_empty() {
                let ready = std::mem::take(&mut self.deferred_children);
                self.hooks.on_child_output(&ready, &mut self.pushback);
            }

            // Queued entries come before the terminal.
            if let Some(entry) = self.pushback.pop_front() {
                match entry {
                    PendingEntry::Event(event) if self.sequence.is_empty() => {
                        return event.into_input_event();
                    }
                    PendingEntry::Event(event) => {
                        // Nothing can extend the partial sequence ahead of this event.
                        self.pushback.push_event(event, PushbackPosition::Front);
                        return self.resolve_forced();
                    }
                    PendingEntry::Byte(byte) => {
                        if let Some(event) = self.accept_byte(byte) {
                            return event;
                        }
                        continue;
                    }
                }
            }

            if let Some(byte) = self.source.read_byte_nonblocking() {
                if let Some(event) = self.accept_byte(byte) {
                    return event;
                }
                continue;
            }

            let is_poll = timeout == CallerTimeout::Poll;
            if self.sequence.is_empty() {
                if is_poll || self.is_disconnected || self.timers.is_expired(TimerId::CallerTimeout) {
                    return InputEvent::Timeout;
                }
            } else if self.is_disconnected {
                // A truncated sequence at end of input is flushed as literal bytes.
                return self.emit_first_byte_literally();
            } else if is_poll || self.timers.is_expired(TimerId::Escape) {
                return self.resolve_forced();
            }

            // Hooks may push events, and only the escape timer may end a partial sequence.
            if self.sequence.is_empty() && self.service_timers() {
                continue;
            }

            match self.source.wait(self.wait_budget_ms()) {
                WaitResult::Readable | WaitResult::TimedOut => {}
                WaitResult::ChildActivity if self.sequence.is_empty() => {
                    self.dispatch_child_output();
                }
                WaitResult::ChildActivity => self.defer_child_output(),
                WaitResult::Disconnected => {
                    tracing::debug!(message = "terminal disconnected");
                    self.is_disconnected = true;
                }
            }
        }
    }

    fn sample_clock(&mut self) { self.timers.sample(self.clock.now_ms()); }

    fn arm_timers_for_call(&mut self, timeout: CallerTimeout) {
        match self.config.idle_interval_ms {
            Some(interval) => self.timers.start(TimerId::Idle, interval),
            None => self.timers.stop(TimerId::Idle),
        }
        if !self.timers.is_active(TimerId::Update) {
            self.timers
                .start(TimerId::Update, self.config.update_interval_ms());
        }
        if self.config.minute_timer && !self.timers.is_active(TimerId::Minute) {
            self.timers
                .start(TimerId::Minute, self.clock.ms_until_next_minute());
        }
        if !self.descriptors.is_empty() && !self.timers.is_active(TimerId::ChildPoll) {
            self.timers
                .start(TimerId::ChildPoll, self.config.child_poll_interval_ms);
        }
        match timeout {
            CallerTimeout::Millis(ms) => self.timers.start(TimerId::CallerTimeout, ms),
            CallerTimeout::Forever | CallerTimeout::Poll => {
                self.timers.stop(TimerId::CallerTimeout);
            }
        }
    }

    /// A sequence in progress waits on its escape timer alone. The caller's timeout and
    /// the background timers only bound the wait between sequences.
    fn wait_budget_ms(&self) -> Option<u64> {
        if !self.sequence.is_empty() {
            return self.timers.earliest_remaining_ms([TimerId::Escape]);
        }
        let mut ids: SmallVec<[TimerId; 5]> = SmallVec::from_slice(&BACKGROUND_TIMERS);
        ids.push(TimerId::CallerTimeout);
        self.timers.earliest_remaining_ms(ids)
    }

    /// Runs the hooks of every expired timer. Returns `true` if any fired.
    fn service_timers(&mut self) -> bool {
        let mut is_fired = false;

        if self.timers.is_expired(TimerId::Idle) {
            self.hooks.on_idle(&mut self.pushback);
            match self.config.idle_interval_ms {
                Some(interval) => self.timers.start(TimerId::Idle, interval),
                None => self.timers.stop(TimerId::Idle),
            }
            is_fired = true;
        }

        if self.timers.is_expired(TimerId::Minute) {
            self.hooks.on_minute(&mut self.pushback);
            self.timers
                .start(TimerId::Minute, self.clock.ms_until_next_minute());
            is_fired = true;
        }

        if self.timers.is_expired(TimerId::Update) {
            self.timers.stop(TimerId::Update);
            self.hooks.on_update();
            is_fired = true;
        }

        if self.timers.is_expired(TimerId::ChildPoll) {
            self.dispatch_child_output();
            if self.descriptors.is_empty() {
                self.timers.stop(TimerId::ChildPoll);
            } else {
                self.timers
                    .start(TimerId::ChildPoll, self.config.child_poll_interval_ms);
            }
            is_fired = true;
        }

        is_fired
    }

    fn dispatch_child_output(&mut self) {
        let ready = self.source.poll_children();
        if !ready.is_empty() {
            self.hooks.on_child_output(&ready, &mut self.pushback);
        }
    }

    /// Takes the ready set off the source so [`RawSource::wait`] stops reporting it.
    fn defer_child_output(&mut self) {
        for fd in self.source.poll_children() {
            if !self.deferred_children.contains(&fd) {
                self.deferred_children.push(fd);
            }
        }
    }

    /// Adds `byte` to the sequence and evaluates it. `None` means more bytes are needed.
    fn accept_byte(&mut self, byte: u8) -> Option<InputEvent> {
        if self.is_raw_byte_mode && self.sequence.is_empty() {
            return Some(InputEvent::RawByte(byte));
        }

        let is_full = self.sequence.push(byte);
        match self.evaluate(DecodeMode::Incremental) {
            Verdict::Resolved(decoded) => Some(self.finish(decoded)),
            Verdict::NoMatch => Some(self.emit_first_byte_literally()),
            Verdict::NeedMore if is_full => Some(self.resolve_forced()),
            Verdict::NeedMore => {
                // Armed once per sequence, later bytes don't extend the deadline.
                if !self.timers.is_active(TimerId::Escape) {
                    let delay = u64::from(self.config.escape_delay.ms());
                    self.timers.start(TimerId::Escape, delay);
                }
                None
            }
        }
    }

    fn evaluate(&self, mode: DecodeMode) -> Verdict {
        let bytes = self.sequence.as_slice();
        let is_force = mode == DecodeMode::Force;

        match self.matcher.match_sequence(bytes) {
            SequenceMatch::Exact(code) => return Verdict::Resolved(Decoded::key(code)),
            SequenceMatch::ExactAndPrefix(code) if is_force => {
                return Verdict::Resolved(Decoded::key(code));
            }
            SequenceMatch::ExactAndPrefix(_) | SequenceMatch::Prefix if !is_force => {
                return Verdict::NeedMore;
            }
            _ => {}
        }

        match decode(bytes, &DecodeContext::new(self.config.protocols, mode)) {
            DecodeOutcome::Resolved(decoded) => Verdict::Resolved(decoded),
            DecodeOutcome::NeedMore if !is_force => Verdict::NeedMore,
            DecodeOutcome::NeedMore | DecodeOutcome::NotMine => Verdict::NoMatch,
        }
    }

    /// No more bytes are coming for this sequence.
    fn resolve_forced(&mut self) -> InputEvent {
        match self.evaluate(DecodeMode::Force) {
            Verdict::Resolved(decoded) => self.finish(decoded),
            Verdict::NeedMore | Verdict::NoMatch => self.emit_first_byte_literally(),
        }
    }

    fn finish(&mut self, decoded: Decoded) -> InputEvent {
        let bytes = self.sequence.take();
        self.timers.stop(TimerId::Escape);

        DEBUG_TERM_INPUT_SHOW_DECODING.then(|| {
            tracing::debug!(
                message = "sequence resolved",
                bytes = ?bytes.as_slice(),
                code = %decoded.code
            );
        });
        self.playback.record(bytes.clone(), decoded.code);

        match decoded.mouse {
            Some(report) => {
                let (window, location) = self.locator.locate(report.col, report.row);
                InputEvent::Mouse(MouseEvent {
                    code: decoded.code,
                    col: report.col,
                    row: report.row,
                    window,
                    location,
                    timestamp_ms: self.timers.now_ms(),
                    raw: Some(bytes),
                })
            }
            None => InputEvent::KeyDown(decoded.code),
        }
    }

    /// Returns the first buffered byte as-is and puts the rest back to be decoded
    /// again.
    fn emit_first_byte_literally(&mut self) -> InputEvent {
        let bytes = self.sequence.take();
        self.timers.stop(TimerId::Escape);

        let Some((&first, rest)) = bytes.split_first() else {
            return InputEvent::KeyDown(KeyCode::VOID);
        };
        self.pushback.push_bytes_front(rest);

        let code = KeyCode::literal_byte(first);
        DEBUG_TERM_INPUT_SHOW_DECODING.then(|| {
            tracing::debug!(
                message = "no match, emitting first byte",
                bytes = ?bytes.as_slice(),
                code = %code
            );
        });
        self.playback.record(smallvec![first], code);
        InputEvent::KeyDown(code)
    }
}
