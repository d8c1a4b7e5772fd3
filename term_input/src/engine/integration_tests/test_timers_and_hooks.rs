// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use pretty_assertions::assert_eq;

use super::{RecordingHooks, key, new_engine, test_config};
use crate::{CallerTimeout, EngineConfig, InputEvent, KeyCode, MAX_UPDATE_INTERVAL_MS, MiscKey,
            MonotonicClock, ProtocolFlags, TimerId};

fn config_with(update: impl FnOnce(&mut EngineConfig)) -> EngineConfig {
    let mut it = test_config(ProtocolFlags::default());
    update(&mut it);
    it
}

#[test]
fn test_caller_timeout_without_input() {
    let (mut engine, clock) = new_engine(test_config(ProtocolFlags::default()), |it| it);

    assert_eq!(engine.next_event(CallerTimeout::Millis(200)), InputEvent::Timeout);
    assert_eq!(clock.now_ms(), 200);
    assert!(!engine.timers().is_active(TimerId::CallerTimeout));
}

#[test]
fn test_caller_timeout_returns_early_input() {
    let (mut engine, clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(80, b"q"));

    assert_eq!(engine.next_event(CallerTimeout::Millis(200)), key('q'));
    assert_eq!(clock.now_ms(), 80);
}

#[test]
fn test_caller_timeout_never_cuts_a_sequence_short() {
    let (mut engine, clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b").bytes_at(300, b"[A")
    });

    assert_eq!(engine.next_event(CallerTimeout::Millis(100)), key(MiscKey::Up));
    assert_eq!(clock.now_ms(), 300);
}

#[test]
fn test_poll_never_waits() {
    let (mut engine, clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(10, b"a"));

    assert_eq!(engine.next_event(CallerTimeout::Poll), InputEvent::Timeout);
    assert_eq!(clock.now_ms(), 0);
    assert!(engine.source().waits().is_empty());
}

#[test]
fn test_idle_hook_can_push_events() {
    let hooks = RecordingHooks {
        push_on_idle: Some(KeyCode::function(5)),
        ..Default::default()
    };
    let config = config_with(|it| it.idle_interval_ms = Some(500));
    let (engine, clock) = new_engine(config, |it| it);
    let mut engine = engine.with_hooks(hooks.clone());

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(KeyCode::function(5)));
    assert_eq!(clock.now_ms(), 500);
    assert_eq!(hooks.calls(), vec!["idle"]);
}

#[test]
fn test_idle_timer_restarts_on_every_call() {
    let hooks = RecordingHooks::default();
    let config = config_with(|it| it.idle_interval_ms = Some(500));
    let (engine, _clock) = new_engine(config, |it| it.bytes_at(300, b"a").bytes_at(700, b"b"));
    let mut engine = engine.with_hooks(hooks.clone());

    assert_eq!(engine.next_event(CallerTimeout::Forever), key('a'));
    assert_eq!(engine.next_event(CallerTimeout::Forever), key('b'));
    assert!(hooks.calls().is_empty());
}

#[test]
fn test_caller_timeout_wins_over_idle_at_same_deadline() {
    let hooks = RecordingHooks::default();
    let config = config_with(|it| it.idle_interval_ms = Some(200));
    let (engine, _clock) = new_engine(config, |it| it);
    let mut engine = engine.with_hooks(hooks.clone());

    assert_eq!(engine.next_event(CallerTimeout::Millis(200)), InputEvent::Timeout);
    assert!(hooks.calls().is_empty());
}

#[test]
fn test_idle_hook_waits_for_partial_sequence() {
    let hooks = RecordingHooks {
        push_on_idle: Some(KeyCode::function(5)),
        ..Default::default()
    };
    let config = config_with(|it| it.idle_interval_ms = Some(100));
    let (engine, clock) = new_engine(config, |it| it.bytes_at(0, b"\x1b").bytes_at(200, b"[A"));
    let mut engine = engine.with_hooks(hooks.clone());

    // The idle deadline at 100 passes while ESC waits for the rest of the sequence.
    assert_eq!(engine.next_event(CallerTimeout::Millis(1_000)), key(MiscKey::Up));
    assert_eq!(clock.now_ms(), 200);
    assert!(hooks.calls().is_empty());
    assert_eq!(engine.source().waits(), &[Some(750)]);

    assert_eq!(engine.next_event(CallerTimeout::Millis(1_000)), key(KeyCode::function(5)));
    assert_eq!(clock.now_ms(), 300);
    assert_eq!(hooks.calls(), vec!["idle"]);
}

#[test]
fn test_minute_hook_waits_for_partial_sequence() {
    let hooks = RecordingHooks {
        push_on_minute: Some(KeyCode::function(9)),
        ..Default::default()
    };
    let config = config_with(|it| it.minute_timer = true);
    let (engine, clock) = new_engine(config, |it| {
        it.bytes_at(59_950, b"\x1b").bytes_at(60_100, b"OB")
    });
    let mut engine = engine.with_hooks(hooks.clone());
    clock.set(59_900);

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Down));
    assert_eq!(clock.now_ms(), 60_100);
    assert!(hooks.calls().is_empty());

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(KeyCode::function(9)));
    assert_eq!(hooks.calls(), vec!["minute"]);
}

#[test]
fn test_update_hook() {
    let hooks = RecordingHooks::default();
    let config = config_with(|it| it.update_interval_ms = 50);
    let (mut engine, clock) = new_engine(config, |it| it);
    engine.set_hooks(Box::new(hooks.clone()));

    assert_eq!(engine.next_event(CallerTimeout::from_ms(120)), InputEvent::Timeout);
    assert_eq!(clock.now_ms(), 120);
    assert_eq!(hooks.calls(), vec!["update"]);
    assert_eq!(engine.source().waits(), &[Some(50), Some(70)]);
}

#[test]
fn test_update_interval_is_bounded() {
    let hooks = RecordingHooks::default();
    let config = config_with(|it| it.update_interval_ms = 10_000);
    let (engine, _clock) = new_engine(config, |it| it);
    let mut engine = engine.with_hooks(hooks.clone());

    assert_eq!(engine.next_event(CallerTimeout::Millis(5_000)), InputEvent::Timeout);
    assert_eq!(hooks.calls(), vec!["update"]);
    assert_eq!(
        engine.source().waits(),
        &[Some(MAX_UPDATE_INTERVAL_MS), Some(5_000 - MAX_UPDATE_INTERVAL_MS)]
    );
}

#[test]
fn test_minute_hook_is_aligned_to_the_minute() {
    let hooks = RecordingHooks {
        push_on_minute: Some(KeyCode::function(9)),
        ..Default::default()
    };
    let config = config_with(|it| it.minute_timer = true);
    let (engine, clock) = new_engine(config, |it| it);
    let mut engine = engine.with_hooks(hooks.clone());
    clock.set(59_900);

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(KeyCode::function(9)));
    assert_eq!(clock.now_ms(), 60_000);
    assert_eq!(hooks.calls(), vec!["minute"]);
    assert_eq!(engine.timers().remaining_ms(TimerId::Minute), 60_000);
}

#[test]
fn test_exhausted_source_returns_timeout() {
    let hooks = RecordingHooks::default();
    let (engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| it);
    let mut engine = engine.with_hooks(hooks.clone());

    assert_eq!(engine.next_event(CallerTimeout::Forever), InputEvent::Timeout);
    assert!(engine.is_disconnected());
    assert_eq!(hooks.calls(), vec!["update"]);
}
