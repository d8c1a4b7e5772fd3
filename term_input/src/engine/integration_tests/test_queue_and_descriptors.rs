// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use pretty_assertions::assert_eq;

use super::{RecordingHooks, drain, key, new_engine, test_config};
use crate::{CallerTimeout, ChildDescriptor, EngineConfig, EngineError, InputEvent, KeyCode,
            MiscKey, MonotonicClock, MouseAction, MouseEvent, ProtocolFlags, PushbackPosition,
            TimerId, WindowId, WindowLocation};

#[test]
fn test_pushed_events_come_before_terminal_input() {
    let (mut engine, _clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(0, b"a"));

    engine
        .push_back(KeyCode::function(1), None, PushbackPosition::Back)
        .unwrap();
    engine
        .push_back(KeyCode::function(2), None, PushbackPosition::Front)
        .unwrap();

    assert_eq!(
        drain(&mut engine),
        vec![key(KeyCode::function(2)), key(KeyCode::function(1)), key('a')]
    );
}

#[test]
fn test_pushed_bytes_are_decoded() {
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| it);

    engine.push_back_bytes(b"\x1b[Bz");
    assert_eq!(drain(&mut engine), vec![key(MiscKey::Down), key('z')]);
}

#[test]
fn test_pushed_mouse_event() {
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| it);
    let press = KeyCode::mouse(1, MouseAction::Press);
    let mouse = MouseEvent {
        code: press,
        col: 3,
        row: 4,
        window: WindowId(2),
        location: WindowLocation::Border,
        timestamp_ms: 0,
        raw: None,
    };

    assert_eq!(
        engine.push_back(KeyCode::char('a'), Some(mouse.clone()), PushbackPosition::Back),
        Err(EngineError::MouseAttachedToNonMouseCode {
            code: KeyCode::char('a')
        })
    );
    assert!(engine.pushback_queue().is_empty());

    let release = KeyCode::mouse(1, MouseAction::Release);
    engine
        .push_back(release, Some(mouse.clone()), PushbackPosition::Back)
        .unwrap();
    assert_eq!(
        engine.next_event(CallerTimeout::Poll),
        InputEvent::Mouse(MouseEvent {
            code: release,
            ..mouse
        })
    );
}

#[test]
fn test_peek_pending_does_not_consume() {
    let (mut engine, _clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(0, b"a"));

    assert!(engine.peek_pending());
    assert!(engine.peek_pending());
    assert_eq!(engine.next_event(CallerTimeout::Poll), key('a'));
    assert!(!engine.peek_pending());
    assert!(engine.source().waits().is_empty());
}

#[test]
fn test_child_activity_calls_hook() {
    let fd = ChildDescriptor(5);
    let hooks = RecordingHooks {
        push_on_child_output: Some(KeyCode::function(7)),
        ..Default::default()
    };
    let (engine, clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.child_ready_at(50, fd)
    });
    let mut engine = engine.with_hooks(hooks.clone());
    engine.register_descriptor(fd).unwrap();
    assert!(engine.timers().is_active(TimerId::ChildPoll));

    assert_eq!(engine.next_event(CallerTimeout::Millis(200)), key(KeyCode::function(7)));
    assert_eq!(clock.now_ms(), 50);
    assert_eq!(hooks.calls(), vec!["child [5]"]);
}

#[test]
fn test_child_activity_waits_for_partial_sequence() {
    let fd = ChildDescriptor(5);
    let hooks = RecordingHooks {
        push_on_child_output: Some(KeyCode::function(7)),
        ..Default::default()
    };
    let (engine, clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b")
            .child_ready_at(50, fd)
            .bytes_at(100, b"[A")
    });
    let mut engine = engine.with_hooks(hooks.clone());
    engine.register_descriptor(fd).unwrap();

    assert_eq!(engine.next_event(CallerTimeout::Millis(1_000)), key(MiscKey::Up));
    assert_eq!(clock.now_ms(), 100);
    assert!(hooks.calls().is_empty());
    assert_eq!(engine.source().waits(), &[Some(750), Some(700)]);

    // The held activity is reported before anything else on the next call.
    assert_eq!(engine.next_event(CallerTimeout::Millis(1_000)), key(KeyCode::function(7)));
    assert_eq!(clock.now_ms(), 100);
    assert_eq!(hooks.calls(), vec!["child [5]"]);
}

#[test]
fn test_held_child_activity_dropped_on_unregister() {
    let fd = ChildDescriptor(5);
    let hooks = RecordingHooks::default();
    let (engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b")
            .child_ready_at(50, fd)
            .bytes_at(100, b"[B")
    });
    let mut engine = engine.with_hooks(hooks.clone());
    engine.register_descriptor(fd).unwrap();

    assert_eq!(engine.next_event(CallerTimeout::Millis(1_000)), key(MiscKey::Down));
    engine.unregister_descriptor(fd).unwrap();
    assert_eq!(engine.next_event(CallerTimeout::Poll), InputEvent::Timeout);
    assert!(hooks.calls().is_empty());
}

#[test]
fn test_child_poll_timer_without_activity() {
    let fd = ChildDescriptor(5);
    let hooks = RecordingHooks::default();
    let (engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| it);
    let mut engine = engine.with_hooks(hooks.clone());
    engine.register_descriptor(fd).unwrap();

    assert_eq!(engine.next_event(CallerTimeout::Millis(250)), InputEvent::Timeout);
    // Nothing was ready, so the hook never ran, but the source was polled twice.
    assert!(hooks.calls().is_empty());
    assert_eq!(engine.source().waits(), &[Some(100), Some(100), Some(50)]);
}

#[test]
fn test_descriptor_registration_rules() {
    let config = EngineConfig {
        max_descriptors: 2,
        ..test_config(ProtocolFlags::default())
    };
    let (mut engine, _clock) = new_engine(config, |it| it);

    engine.register_descriptor(ChildDescriptor(3)).unwrap();
    assert_eq!(
        engine.register_descriptor(ChildDescriptor(3)),
        Err(EngineError::DescriptorAlreadyRegistered(ChildDescriptor(3)))
    );
    engine.register_descriptor(ChildDescriptor(4)).unwrap();
    assert_eq!(
        engine.register_descriptor(ChildDescriptor(5)),
        Err(EngineError::TooManyDescriptors { max: 2 })
    );

    assert_eq!(
        engine.unregister_descriptor(ChildDescriptor(9)),
        Err(EngineError::DescriptorNotRegistered(ChildDescriptor(9)))
    );
    engine.unregister_descriptor(ChildDescriptor(3)).unwrap();
    assert!(engine.timers().is_active(TimerId::ChildPoll));
    engine.unregister_descriptor(ChildDescriptor(4)).unwrap();
    assert!(!engine.timers().is_active(TimerId::ChildPoll));
    assert!(engine.source().registered().is_empty());
}
