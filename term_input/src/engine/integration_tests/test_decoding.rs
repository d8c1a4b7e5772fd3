// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words Cygwin

use pretty_assertions::assert_eq;
use test_case::test_case;

use super::{drain, key, new_engine, test_config};
use crate::{CallerTimeout, InputEvent, KeyCode, KeyModifiers, MiscKey, MonotonicClock,
            MouseAction, MouseEvent, ProtocolFlags, RawSequence, WindowId, WindowLocation,
            WindowLocator};

#[test]
fn test_cursor_key_split_across_reads() {
    let (mut engine, clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b").bytes_at(10, b"[").bytes_at(20, b"A")
    });

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Up));
    assert_eq!(clock.now_ms(), 20);
    assert!(!engine.timers().is_active(crate::TimerId::Escape));
}

#[test]
fn test_application_mode_cursor_key_with_ctrl() {
    let (mut engine, _clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(0, b"\x1bO1;5A"));

    assert_eq!(
        engine.next_event(CallerTimeout::Forever),
        key(KeyCode::misc(MiscKey::Up).with_modifiers(KeyModifiers::CTRL))
    );
}

// Fields are key-down;repeat;vk;scan;char;state. Return with key-down 0 is its release.
#[test_case(b"0;1;13;28;13;0K", KeyCode::VOID; "return release is consumed")]
#[test_case(b"1;1;13;28;13;0K", MiscKey::Return.into(); "return press")]
fn test_cygwin_raw_mode(body: &[u8], expected: KeyCode) {
    let mut bytes = b"\x1b{".to_vec();
    bytes.extend_from_slice(body);
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::CYGWIN), |it| {
        it.bytes_at(0, &bytes).bytes_at(5, b"z")
    });

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(expected));
    // Nothing of the report leaks out as characters.
    assert_eq!(engine.next_event(CallerTimeout::Forever), key('z'));
}

#[test]
fn test_xterm_modify_other_keys_ctrl_tab() {
    let protocols = ProtocolFlags::META_ESCAPE | ProtocolFlags::XTERM_MOK2;
    let (mut engine, _clock) =
        new_engine(test_config(protocols), |it| it.bytes_at(0, b"\x1b[27;5;9~"));

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::CtrlTab));
}

#[test]
fn test_meta_letter_within_delay() {
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b").bytes_at(100, b"x")
    });

    assert_eq!(
        engine.next_event(CallerTimeout::Forever),
        key(KeyCode::char('X').with_modifiers(KeyModifiers::META))
    );
}

#[test]
fn test_text_and_utf8() {
    let (mut engine, _clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(0, "hé\r"));

    assert_eq!(
        drain(&mut engine),
        vec![key('h'), key('é'), key(MiscKey::Return)]
    );
}

#[test]
fn test_default_table_linux_console_function_key() {
    let (mut engine, _clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(0, b"\x1b[[B"));

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(KeyCode::function(2)));
}

#[test]
fn test_user_binding_wins_over_meta() {
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1bxy")
            .bytes_at(2_000, b"\x1bx")
    });
    assert_eq!(
        engine.bind_sequence(b"\x1bxy", KeyCode::function(12)),
        Ok(None)
    );

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(KeyCode::function(12)));

    // A proper prefix of a binding waits out the delay, then falls back to the decoders.
    assert_eq!(
        engine.next_event(CallerTimeout::Forever),
        key(KeyCode::char('X').with_modifiers(KeyModifiers::META))
    );

    assert_eq!(engine.unbind_sequence(b"\x1bxy"), Some(KeyCode::function(12)));
}

#[test]
fn test_binding_that_is_also_a_prefix_resolves_when_forced() {
    let (mut engine, clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b[2$")
    });
    engine
        .bind_sequence(b"\x1b[2$$", KeyCode::function(20))
        .unwrap();

    let shift_insert = KeyCode::misc(MiscKey::Insert).with_modifiers(KeyModifiers::SHIFT);
    assert_eq!(engine.next_event(CallerTimeout::Forever), key(shift_insert));
    assert_eq!(clock.now_ms(), u64::from(super::TEST_ESCAPE_DELAY_MS));
}

#[test]
fn test_raw_byte_mode() {
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b[A").bytes_at(10, b"\x1b[B")
    });

    engine.set_raw_byte_mode(true);
    assert_eq!(
        drain(&mut engine),
        vec![
            InputEvent::RawByte(0x1b),
            InputEvent::RawByte(b'['),
            InputEvent::RawByte(b'A'),
        ]
    );

    engine.set_raw_byte_mode(false);
    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Down));
}

/// Column 40 and up is the second window, the last row is the mode line.
#[derive(Debug)]
struct TwoPaneLocator;

impl WindowLocator for TwoPaneLocator {
    fn locate(&self, col: u16, row: u16) -> (WindowId, WindowLocation) {
        let location = if row == 23 {
            WindowLocation::ModeLine
        } else {
            WindowLocation::Text
        };
        (WindowId(u32::from(col / 40)), location)
    }
}

#[test]
fn test_sgr_mouse_press_is_located() {
    let bytes = b"\x1b[<0;50;24M";
    let (engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(25, bytes)
    });
    let mut engine = engine.with_window_locator(TwoPaneLocator);

    assert_eq!(
        engine.next_event(CallerTimeout::Forever),
        InputEvent::Mouse(MouseEvent {
            code: KeyCode::mouse(1, MouseAction::Press),
            col: 49,
            row: 23,
            window: WindowId(1),
            location: WindowLocation::ModeLine,
            timestamp_ms: 25,
            raw: Some(RawSequence::from_slice(bytes)),
        })
    );
}

#[test]
fn test_wheel_scrolls_as_cursor_keys() {
    let (mut engine, _clock) =
        new_engine(test_config(ProtocolFlags::default()), |it| it.bytes_at(0, b"\x1b[<65;1;1M"));

    assert_eq!(engine.next_event(CallerTimeout::Forever), key(MiscKey::Down));
}

#[test]
fn test_playback_log_records_resolved_sequences() {
    let (mut engine, _clock) = new_engine(test_config(ProtocolFlags::default()), |it| {
        it.bytes_at(0, b"\x1b[Aa")
    });

    assert_eq!(drain(&mut engine), vec![key(MiscKey::Up), key('a')]);

    let codes: Vec<KeyCode> = engine.playback_log().iter().map(|it| it.code).collect();
    assert_eq!(codes, vec![MiscKey::Up.into(), KeyCode::char('a')]);
    assert_eq!(engine.playback_log().replay_bytes(), b"\x1b[Aa".to_vec());
}
