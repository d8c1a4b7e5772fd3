// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Multi byte UTF-8 characters. Single byte ASCII never gets here.

use super::{DecodeContext, DecodeOutcome};
use crate::KeyCode;

/// Expected sequence length for a lead byte, `None` for bytes that can't start one.
/// `0xC0`, `0xC1` (always overlong) and `0xF8..` are excluded.
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}

fn is_continuation(byte: u8) -> bool { byte & 0xC0 == 0x80 }

/// Decodes one character. Malformed input (bad continuation, overlong encoding,
/// surrogate, beyond `U+10FFFF`) is [`DecodeOutcome::NotMine`], so the engine emits
/// the lead byte as-is. A truncated character that is forced becomes `U+FFFD`.
pub fn decode(buffer: &[u8], ctx: &DecodeContext) -> DecodeOutcome {
    let Some((&lead, tail)) = buffer.split_first() else {
        return DecodeOutcome::NeedMore;
    };
    let Some(expected_len) = sequence_len(lead) else {
        return DecodeOutcome::NotMine;
    };
    if tail.len() >= expected_len || !tail.iter().all(|byte| is_continuation(*byte)) {
        return DecodeOutcome::NotMine;
    }
    if buffer.len() < expected_len {
        return if ctx.is_force() {
            DecodeOutcome::key(KeyCode::char(char::REPLACEMENT_CHARACTER))
        } else {
            DecodeOutcome::NeedMore
        };
    }

    // Overlong, surrogate and out of range checks are done by the standard library.
    match std::str::from_utf8(buffer) {
        Ok(text) => match text.chars().next() {
            Some(ch) => DecodeOutcome::key(KeyCode::char(ch)),
            None => DecodeOutcome::NotMine,
        },
        Err(_) => DecodeOutcome::NotMine,
    }
}
