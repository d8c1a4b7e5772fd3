// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words urxvt

//! Mouse reports in the three encodings terminals use. All three carry the same button
//! byte `Cb`:
//!
//! ```text
//!   bit  7   6   5   4   3   2   1 0
//!      ┌───┬───┬───┬───┬───┬───┬─────┐
//!      │ext│whl│drg│ C │ M │ S │ btn │
//!      └───┴───┴───┴───┴───┴───┴─────┘
//! ```
//!
//! Wheel events without a click or drag don't become mouse codes. They become cursor
//! keys, so scrolling works in any mode: wheel up / down is `up` / `down` (or
//! `page-up` / `page-down` with shift), and horizontal wheel is `left` / `right`.

use super::{CsiSequence, DecodeContext, DecodeOutcome, Decoded, MouseReport};
use crate::{KeyCode, KeyModifiers, MiscKey, MouseAction};

const BUTTON_BITS: u16 = 0b0000_0011;
const SHIFT_BIT: u16 = 0b0000_0100;
const META_BIT: u16 = 0b0000_1000;
const CTRL_BIT: u16 = 0b0001_0000;
const DRAG_BIT: u16 = 0b0010_0000;
const WHEEL_BIT: u16 = 0b0100_0000;
const EXTRA_BUTTON_BIT: u16 = 0b1000_0000;

/// X10 and urxvt encodings add 32 to every field.
const LEGACY_OFFSET: u16 = 32;

/// Released as far as the report can tell. X10 doesn't say which button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    Implicit,
    Explicit,
    No,
}

fn modifiers(cb: u16) -> KeyModifiers {
    let mut it = KeyModifiers::empty();
    if cb & SHIFT_BIT != 0 {
        it |= KeyModifiers::SHIFT;
    }
    if cb & META_BIT != 0 {
        it |= KeyModifiers::META;
    }
    if cb & CTRL_BIT != 0 {
        it |= KeyModifiers::CTRL;
    }
    it
}

/// `col` and `row` are 1 based, as sent by the terminal.
fn classify(cb: u16, col: u16, row: u16, release: Release) -> DecodeOutcome {
    if col == 0 || row == 0 {
        return DecodeOutcome::NotMine;
    }
    let mods = modifiers(cb);
    let low = cb & BUTTON_BITS;
    let is_drag = cb & DRAG_BIT != 0;

    if cb & WHEEL_BIT != 0 && cb & EXTRA_BUTTON_BIT == 0 {
        if is_drag || release == Release::Explicit {
            return DecodeOutcome::key(KeyCode::VOID);
        }
        return DecodeOutcome::key(wheel_key(low, mods));
    }

    let button = if cb & EXTRA_BUTTON_BIT != 0 {
        8 + u8::try_from(low).unwrap_or(0)
    } else {
        u8::try_from(low).unwrap_or(0) + 1
    };
    let (button, action) = match (release, is_drag, low) {
        (Release::Explicit, _, _) => (button, MouseAction::Release),
        (_, true, BUTTON_BITS) => (0, MouseAction::Move),
        (_, true, _) => (button, MouseAction::Drag),
        (Release::Implicit, false, BUTTON_BITS) => (0, MouseAction::Release),
        _ => (button, MouseAction::Press),
    };

    DecodeOutcome::Resolved(Decoded {
        code: KeyCode::mouse(button, action).with_modifiers(mods),
        mouse: Some(MouseReport { col: col - 1, row: row - 1 }),
    })
}

fn wheel_key(direction: u16, mods: KeyModifiers) -> KeyCode {
    let shifted = mods.contains(KeyModifiers::SHIFT);
    let (key, mods) = match (direction, shifted) {
        (0, true) => (MiscKey::PageUp, mods - KeyModifiers::SHIFT),
        (0, false) => (MiscKey::Up, mods),
        (1, true) => (MiscKey::PageDown, mods - KeyModifiers::SHIFT),
        (1, false) => (MiscKey::Down, mods),
        (2, _) => (MiscKey::Left, mods),
        _ => (MiscKey::Right, mods),
    };
    KeyCode::misc(key).with_modifiers(mods)
}

/// `CSI M Cb Cx Cy`, where `report` is the bytes after `M`.
pub fn decode_x10(report: &[u8], ctx: &DecodeContext) -> DecodeOutcome {
    match report {
        [cb, cx, cy] => {
            let [cb, cx, cy] = [*cb, *cx, *cy].map(u16::from);
            if cb < LEGACY_OFFSET || cx < LEGACY_OFFSET || cy < LEGACY_OFFSET {
                return DecodeOutcome::NotMine;
            }
            classify(
                cb - LEGACY_OFFSET,
                cx - LEGACY_OFFSET,
                cy - LEGACY_OFFSET,
                Release::Implicit,
            )
        }
        _ if report.len() < 3 => ctx.incomplete(),
        _ => DecodeOutcome::NotMine,
    }
}

/// `CSI < b ; x ; y M` (press, drag, motion) or `... m` (release).
pub fn decode_sgr(seq: &CsiSequence) -> DecodeOutcome {
    let (Some(cb), Some(col), Some(row)) = (seq.param(0), seq.param(1), seq.param(2)) else {
        return DecodeOutcome::NotMine;
    };
    if seq.params.len() != 3 {
        return DecodeOutcome::NotMine;
    }
    let (Ok(cb), Ok(col), Ok(row)) = (u16::try_from(cb), u16::try_from(col), u16::try_from(row))
    else {
        return DecodeOutcome::NotMine;
    };
    let release = if seq.final_byte == b'm' { Release::Explicit } else { Release::No };
    classify(cb, col, row, release)
}

/// `CSI Cb ; Cx ; Cy M` with decimal fields. Only `Cb` carries the +32 offset.
pub fn decode_urxvt(seq: &CsiSequence) -> DecodeOutcome {
    let (Some(cb), Some(col), Some(row)) = (seq.param(0), seq.param(1), seq.param(2)) else {
        return DecodeOutcome::NotMine;
    };
    let (Ok(cb), Ok(col), Ok(row)) = (u16::try_from(cb), u16::try_from(col), u16::try_from(row))
    else {
        return DecodeOutcome::NotMine;
    };
    match cb.checked_sub(LEGACY_OFFSET) {
        Some(cb) => classify(cb, col, row, Release::Implicit),
        None => DecodeOutcome::NotMine,
    }
}
