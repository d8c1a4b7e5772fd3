// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! End to end tests of [`crate::InputEngine`], driven by a
//! [`crate::test_fixtures::ScriptedSource`] and a [`crate::ManualClock`], so every
//! timing decision is deterministic.
//!
//! | Test module                     | What it validates                              |
//! |:--------------------------------|:-----------------------------------------------|
//! | [`test_decoding`]               | Sequences split across reads, protocols, meta  |
//! | [`test_escape_timing`]          | Escape delay, forced resolution, literal bytes |
//! | [`test_timers_and_hooks`]       | Caller timeout, idle, update, minute hooks     |
//! | [`test_queue_and_descriptors`]  | Pushback ordering, child descriptors           |

// Attach.
mod test_decoding;
mod test_escape_timing;
mod test_queue_and_descriptors;
mod test_timers_and_hooks;

use std::{cell::RefCell, rc::Rc};

use crate::{CallerTimeout, ChildDescriptor, EngineConfig, EngineHooks, EscapeDelay,
            InputEngine, InputEvent, KeyCode, ManualClock, ProtocolFlags, PushbackQueue,
            test_fixtures::ScriptedSource};

pub const TEST_ESCAPE_DELAY_MS: u32 = 750;

pub type TestEngine = InputEngine<ScriptedSource, ManualClock>;

/// A config that ignores `ESCDELAY` and the wall clock.
pub fn test_config(protocols: ProtocolFlags) -> EngineConfig {
    EngineConfig {
        protocols,
        escape_delay: EscapeDelay::from_command_line(TEST_ESCAPE_DELAY_MS).unwrap(),
        minute_timer: false,
        ..Default::default()
    }
}

/// `build` adds the script to a source that shares the returned clock.
pub fn new_engine(
    config: EngineConfig,
    build: impl FnOnce(ScriptedSource) -> ScriptedSource,
) -> (TestEngine, ManualClock) {
    let clock = ManualClock::new(0);
    let source = build(ScriptedSource::new(clock.clone()));
    (InputEngine::new(source, clock.clone(), config), clock)
}

pub fn key(code: impl Into<KeyCode>) -> InputEvent { InputEvent::KeyDown(code.into()) }

/// Polls until nothing is left.
pub fn drain(engine: &mut TestEngine) -> Vec<InputEvent> {
    let mut acc = vec![];
    loop {
        match engine.next_event(CallerTimeout::Poll) {
            InputEvent::Timeout => return acc,
            event => acc.push(event),
        }
    }
}

/// Records every callback, and optionally pushes a key from the ones that can.
#[derive(Debug, Default, Clone)]
pub struct RecordingHooks {
    pub calls: Rc<RefCell<Vec<String>>>,
    pub push_on_idle: Option<KeyCode>,
    pub push_on_minute: Option<KeyCode>,
    pub push_on_child_output: Option<KeyCode>,
}

impl RecordingHooks {
    pub fn calls(&self) -> Vec<String> { self.calls.borrow().clone() }

    fn record(&self, call: impl Into<String>) { self.calls.borrow_mut().push(call.into()); }
}

impl EngineHooks for RecordingHooks {
    fn on_idle(&mut self, pushback: &mut PushbackQueue) {
        self.record("idle");
        if let Some(code) = self.push_on_idle {
            pushback.push_key(code);
        }
    }

    fn on_update(&mut self) { self.record("update"); }

    fn on_minute(&mut self, pushback: &mut PushbackQueue) {
        self.record("minute");
        if let Some(code) = self.push_on_minute {
            pushback.push_key(code);
        }
    }

    fn on_child_output(&mut self, ready: &[ChildDescriptor], pushback: &mut PushbackQueue) {
        let fds: Vec<i32> = ready.iter().map(|it| it.0).collect();
        self.record(format!("child {fds:?}"));
        if let Some(code) = self.push_on_child_output {
            pushback.push_key(code);
        }
    }
}
