// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words Cygwin

//! Cygwin console raw mode: `ESC { kd ; rc ; vk ; sc ; uc ; cs K`, one Windows key
//! event record per sequence. Translation is shared with win32-input-mode.

use super::{DecodeContext, DecodeOutcome, Win32KeyRecord, win32_keys};
use crate::KeyCode;

const FIELD_COUNT: usize = 6;
const TERMINATOR: u8 = b'K';
/// Six 10 digit fields and their separators.
const MAX_BODY_LEN: usize = FIELD_COUNT * 11;

/// `body` is everything after `ESC {`.
pub fn decode(body: &[u8], ctx: &DecodeContext) -> DecodeOutcome {
    let Some((&last, fields)) = body.split_last() else {
        return ctx.incomplete();
    };

    let is_field_byte = |byte: &u8| byte.is_ascii_digit() || *byte == b';';
    if last != TERMINATOR {
        return if is_field_byte(&last) && body.iter().all(is_field_byte) && body.len() < MAX_BODY_LEN
        {
            ctx.incomplete()
        } else {
            DecodeOutcome::NotMine
        };
    }

    let mut values = [0_u32; FIELD_COUNT];
    let mut count = 0;
    for field in fields.split(|byte| *byte == b';') {
        let Some(slot) = values.get_mut(count) else {
            return DecodeOutcome::NotMine;
        };
        let Some(value) = std::str::from_utf8(field).ok().and_then(|it| it.parse().ok()) else {
            return DecodeOutcome::NotMine;
        };
        *slot = value;
        count += 1;
    }
    if count != FIELD_COUNT {
        return DecodeOutcome::NotMine;
    }

    let [kd, rc, vk, sc, uc, cs] = values;
    let record = Win32KeyRecord {
        key_down: kd != 0,
        repeat_count: rc,
        virtual_key: vk,
        scan_code: sc,
        unicode_char: uc,
        control_key_state: cs,
    };
    DecodeOutcome::key(win32_keys::translate(&record))
}
