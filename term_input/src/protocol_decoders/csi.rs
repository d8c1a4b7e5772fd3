// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words kitty mintty keypad

//! Control sequences (`ESC [` or `0x9B`). The final byte, together with an optional
//! private marker, picks the sub grammar:
//!
//! | Form                               | Meaning                                   |
//! |:-----------------------------------|:------------------------------------------|
//! | `CSI [1[;m]] A..D E F H P..S`      | cursor keys, begin, end, home, `F1`-`F4`  |
//! | `CSI n [;m] ~`                     | VT editing keys and function keys         |
//! | `CSI 27 ; m ; code ~`              | xterm modifyOtherKeys level 2             |
//! | `CSI 200 ~`, `CSI 201 ~`           | bracketed paste start and end             |
//! | `CSI code [;m[:event]] u`          | kitty, or mintty modifyOtherKeys          |
//! | `CSI Vk;Sc;Uc;Kd;Cs;Rc _`          | win32-input-mode                          |
//! | `CSI [1;m] Z`                      | back tab                                  |
//! | `CSI I`, `CSI O`                   | focus in and out                          |
//! | `CSI M Cb Cx Cy`                   | X10 / normal mouse report                 |
//! | `CSI < b ; x ; y M\|m`             | SGR mouse report                          |
//! | `CSI b ; x ; y M`                  | urxvt mouse report                        |

use super::{CsiParse, CsiSequence, DecodeContext, DecodeOutcome, Win32KeyRecord, mouse,
            parse_csi, win32_keys};
use crate::{KEYPAD_ENTER, KeyCode, KeyModifiers, MiscKey, ProtocolFlags};

/// `CSI 27 ; mods ; code ~` marker used by xterm modifyOtherKeys.
const XTERM_MOK_MARKER: u32 = 27;
const PASTE_START: u32 = 200;
const PASTE_END: u32 = 201;
/// Kitty's event type sub parameter for a key release.
const KITTY_EVENT_RELEASE: u32 = 3;

/// `body` is everything after the CSI introducer.
pub fn decode(body: &[u8], ctx: &DecodeContext) -> DecodeOutcome {
    // X10 mouse reports carry 3 raw bytes after `M`, they don't follow the CSI grammar.
    if let [b'M', report @ ..] = body {
        return mouse::decode_x10(report, ctx);
    }

    match parse_csi(body) {
        CsiParse::Complete(seq) => dispatch(&seq, ctx),
        CsiParse::Incomplete => ctx.incomplete(),
        CsiParse::Invalid => DecodeOutcome::NotMine,
    }
}

fn dispatch(seq: &CsiSequence, ctx: &DecodeContext) -> DecodeOutcome {
    if !seq.intermediates.is_empty() {
        return DecodeOutcome::NotMine;
    }
    match (seq.private_marker, seq.final_byte) {
        (Some(b'<'), b'M' | b'm') => mouse::decode_sgr(seq),
        (Some(_), _) => DecodeOutcome::NotMine,
        (None, b'M') if seq.params.len() == 3 => mouse::decode_urxvt(seq),
        (None, b'~') => decode_tilde(seq, ctx),
        (None, b'u') => decode_csi_u(seq, ctx),
        (None, b'_') if ctx.protocols.contains(ProtocolFlags::WIN32_INPUT) => {
            decode_win32_input(seq)
        }
        (None, b'I') if seq.has_no_params() => DecodeOutcome::key(MiscKey::FocusIn.into()),
        (None, b'O') if seq.has_no_params() => DecodeOutcome::key(MiscKey::FocusOut.into()),
        (None, final_byte) => match letter_key(final_byte) {
            Some(key) => decode_letter(seq, key),
            None => DecodeOutcome::NotMine,
        },
    }
}

fn letter_key(final_byte: u8) -> Option<KeyCode> {
    let it = match final_byte {
        b'A' => MiscKey::Up.into(),
        b'B' => MiscKey::Down.into(),
        b'C' => MiscKey::Right.into(),
        b'D' => MiscKey::Left.into(),
        b'E' => MiscKey::Begin.into(),
        b'F' => MiscKey::End.into(),
        b'H' => MiscKey::Home.into(),
        b'P'..=b'S' => KeyCode::function(final_byte - b'P' + 1),
        b'Z' => MiscKey::BackTab.into(),
        _ => return None,
    };
    Some(it)
}

/// `CSI X`, `CSI 1 X` and `CSI 1 ; 1 X` are the same unmodified key. `CSI 1 ; m X`
/// carries modifiers.
fn decode_letter(seq: &CsiSequence, key: KeyCode) -> DecodeOutcome {
    let first_ok = matches!(seq.param(0), None | Some(1));
    let mods = match seq.params.len() {
        0 => KeyModifiers::empty(),
        1 if first_ok => KeyModifiers::empty(),
        2 if first_ok => KeyModifiers::from_xterm_param(seq.param_or(1, 1)),
        _ => return DecodeOutcome::NotMine,
    };
    DecodeOutcome::key(key.add_modifiers(mods))
}

/// Keys of the VT220 style `CSI n ~` form.
fn vt_tilde_key(number: u32) -> Option<KeyCode> {
    let it = match number {
        1 | 7 => MiscKey::Home.into(),
        2 => MiscKey::Insert.into(),
        3 => MiscKey::Delete.into(),
        4 | 8 => MiscKey::End.into(),
        5 => MiscKey::PageUp.into(),
        6 => MiscKey::PageDown.into(),
        11..=15 => KeyCode::function(u8::try_from(number - 10).ok()?),
        17..=21 => KeyCode::function(u8::try_from(number - 11).ok()?),
        23..=26 => KeyCode::function(u8::try_from(number - 12).ok()?),
        28 | 29 => KeyCode::function(u8::try_from(number - 13).ok()?),
        31..=34 => KeyCode::function(u8::try_from(number - 14).ok()?),
        PASTE_START => MiscKey::PasteStart.into(),
        PASTE_END => MiscKey::PasteEnd.into(),
        _ => return None,
    };
    Some(it)
}

fn decode_tilde(seq: &CsiSequence, ctx: &DecodeContext) -> DecodeOutcome {
    let Some(number) = seq.param(0) else {
        return DecodeOutcome::NotMine;
    };

    if number == XTERM_MOK_MARKER
        && seq.params.len() == 3
        && ctx.protocols.contains(ProtocolFlags::XTERM_MOK2)
    {
        let mods = KeyModifiers::from_xterm_param(seq.param_or(1, 1));
        return match seq.param(2).and_then(|code| KeyCode::modified_scalar(code, mods)) {
            Some(code) => DecodeOutcome::key(code),
            None => DecodeOutcome::NotMine,
        };
    }

    if seq.params.len() > 2 {
        return DecodeOutcome::NotMine;
    }
    match vt_tilde_key(number) {
        Some(key) => {
            let mods = KeyModifiers::from_xterm_param(seq.param_or(1, 1));
            DecodeOutcome::key(key.add_modifiers(mods))
        }
        None => DecodeOutcome::NotMine,
    }
}

/// Kitty's private use area codes for keys that have no Unicode character.
fn kitty_functional_key(code: u32) -> Option<KeyCode> {
    let it = match code {
        57_376..=57_398 => KeyCode::function(u8::try_from(code - 57_376 + 13).ok()?),
        57_399..=57_408 => KeyCode::keypad(b'0' + u8::try_from(code - 57_399).ok()?),
        57_409 => KeyCode::keypad(b'.'),
        57_410 => KeyCode::keypad(b'/'),
        57_411 => KeyCode::keypad(b'*'),
        57_412 => KeyCode::keypad(b'-'),
        57_413 => KeyCode::keypad(b'+'),
        57_414 => KeyCode::keypad(KEYPAD_ENTER),
        57_415 => KeyCode::keypad(b'='),
        57_416 => KeyCode::keypad(b','),
        57_417 => MiscKey::Left.into(),
        57_418 => MiscKey::Right.into(),
        57_419 => MiscKey::Up.into(),
        57_420 => MiscKey::Down.into(),
        57_421 => MiscKey::PageUp.into(),
        57_422 => MiscKey::PageDown.into(),
        57_423 => MiscKey::Home.into(),
        57_424 => MiscKey::End.into(),
        57_425 => MiscKey::Insert.into(),
        57_426 => MiscKey::Delete.into(),
        57_427 => MiscKey::Begin.into(),
        // Lock keys, media keys, and lone modifiers.
        57_344..=63_743 => KeyCode::VOID,
        _ => return None,
    };
    Some(it)
}

fn decode_csi_u(seq: &CsiSequence, ctx: &DecodeContext) -> DecodeOutcome {
    if !ctx
        .protocols
        .intersects(ProtocolFlags::KITTY | ProtocolFlags::MINTTY_MOK2)
    {
        return DecodeOutcome::NotMine;
    }
    let Some(code) = seq.param(0) else {
        return DecodeOutcome::NotMine;
    };
    if seq.sub_param(1) == Some(KITTY_EVENT_RELEASE) {
        return DecodeOutcome::key(KeyCode::VOID);
    }

    let mods = KeyModifiers::from_kitty_param(seq.param_or(1, 1));
    let key = match kitty_functional_key(code) {
        Some(KeyCode::VOID) => return DecodeOutcome::key(KeyCode::VOID),
        Some(key) => Some(key.add_modifiers(mods)),
        None => KeyCode::modified_scalar(code, mods),
    };
    match key {
        Some(key) => DecodeOutcome::key(key),
        None => DecodeOutcome::NotMine,
    }
}

fn decode_win32_input(seq: &CsiSequence) -> DecodeOutcome {
    let field = |index: usize, default: u32| seq.param_or(index, default);
    let record = Win32KeyRecord {
        virtual_key: field(0, 0),
        scan_code: field(1, 0),
        unicode_char: field(2, 0),
        key_down: field(3, 0) != 0,
        control_key_state: field(4, 0),
        repeat_count: field(5, 1),
    };
    DecodeOutcome::key(win32_keys::translate(&record))
}
