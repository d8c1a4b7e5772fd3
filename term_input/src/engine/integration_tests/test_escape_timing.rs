// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use pretty_assertions::assert_eq;

use super::{TEST_ESCAPE_DELAY_MS, drain, key, new_engine, test_config};
use crate::{CallerTimeout, EngineError, EscapeDelaySource, InputEvent, KeyCode, MiscKey,
            MonotonicClock, ProtocolFlags, SEQUENCE_BUFFER_CAPACITY, TimerId};

#[test]
fn test_lone_escape_resolves_after_delay() {
    let (mut engine, clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b").bytes_at(1_000, b"x")
    });

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Escape));
    assert_eq!(clock.now_ms(), u64::from(TEST_ESCAPE_DELAY_MS));

    // The late byte starts a fresh sequence instead of becoming meta-x.
    assert_eq!(engine.next_event(CallerTimeout::Forever), key('x'));
    assert_eq!(clock.now_ms(), 1_000);
}

#[test]
fn test_escape_deadline_is_not_extended_by_later_bytes() {
    let (mut engine, clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b")
            .bytes_at(500, b"[")
            .bytes_at(700, b"1")
            .bytes_at(900, b"A")
    });

    // `ESC [ 1` is still incomplete when the deadline passes at 750.
    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Escape));
    assert_eq!(clock.now_ms(), 750);
    assert_eq!(
        drain(&mut engine),
        vec![key('['), key('1')]
    );
    assert_eq!(engine.next_event(CallerTimeout::Forever), key('A'));
}

#[test]
fn test_unknown_sequence_emits_first_byte_and_redecodes_the_rest() {
    let (mut engine, _clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(0, b"\x1b[1;5x"));

    assert_eq!(
        drain(&mut engine),
        vec![
            key(MiscKey::Escape),
            key('['),
            key('1'),
            key(';'),
            key('5'),
            key('x'),
        ]
    );
}

#[test]
fn test_incomplete_sequence_forced_by_poll() {
    let (mut engine, clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(0, b"\x1b[1;"));

    assert_eq!(
        drain(&mut engine),
        vec![key(MiscKey::Escape), key('['), key('1'), key(';')]
    );
    assert_eq!(clock.now_ms(), 0);
    assert!(engine.source().waits().is_empty());
}

#[test]
fn test_full_buffer_is_forced_without_waiting() {
    let mut bytes = b"\x1b[".to_vec();
    while bytes.len() < SEQUENCE_BUFFER_CAPACITY {
        bytes.extend_from_slice(b"1;");
    }
    bytes.truncate(SEQUENCE_BUFFER_CAPACITY);
    let (mut engine, clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(0, &bytes));

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Escape));
    assert_eq!(clock.now_ms(), 0);

    // Nothing lost, nothing duplicated.
    let rest = drain(&mut engine);
    let expected: Vec<InputEvent> = bytes[1..]
        .iter()
        .map(|byte| key(KeyCode::char(char::from(*byte))))
        .collect();
    assert_eq!(rest, expected);
}

#[test]
fn test_disconnect_flushes_partial_sequence() {
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b").disconnect_at(5)
    });

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Escape));
    assert!(engine.is_disconnected());
    assert_eq!(engine.next_event(CallerTimeout::Forever), InputEvent::Timeout);
}

#[test]
fn test_disconnect_flushes_truncated_sequence_as_literals() {
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b[1").disconnect_at(5)
    });

    let mut acc = vec![];
    loop {
        match engine.next_event(CallerTimeout::Forever) {
            InputEvent::Timeout => break,
            event => acc.push(event),
        }
    }
    assert_eq!(acc, vec![key(MiscKey::Escape), key('['), key('1')]);
}

#[test]
fn test_set_escape_delay() {
    let (mut engine, clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b")
    });
    assert_eq!(
        engine.escape_delay(),
        (750, EscapeDelaySource::CommandLine)
    );

    assert_eq!(engine.set_escape_delay(100), Ok(750));
    assert_eq!(engine.escape_delay(), (100, EscapeDelaySource::Explicit));
    assert_eq!(
        engine.set_escape_delay(10_000),
        Err(EngineError::EscapeDelayOutOfRange(10_000))
    );
    assert_eq!(engine.escape_delay(), (100, EscapeDelaySource::Explicit));

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Escape));
    assert_eq!(clock.now_ms(), 100);
    assert!(!engine.timers().is_active(TimerId::Escape));
}

#[test]
fn test_zero_escape_delay_still_reads_available_bytes() {
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b[B").bytes_at(10, b"\x1b")
    });
    engine.set_escape_delay(0).unwrap();

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Down));
    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Escape));
}
