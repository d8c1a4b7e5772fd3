// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `ESC` on its own, and `ESC` used as a meta prefix.

use super::{DecodeContext, DecodeOutcome, router};
use crate::{ASCII_ESC, KeyCode, KeyModifiers, MiscKey, ProtocolFlags};

/// A lone `ESC` is ambiguous until the escape delay runs out.
pub fn decode_lone_escape(ctx: &DecodeContext) -> DecodeOutcome {
    if ctx.is_force() {
        DecodeOutcome::key(MiscKey::Escape.into())
    } else {
        DecodeOutcome::NeedMore
    }
}

/// `ESC` followed by anything that is not a control sequence introducer is meta +
/// whatever the rest decodes to: `ESC x` is `M-X`, `ESC ^A` is `C-M-A`, `ESC DEL` is
/// `alt-backspace`, `ESC ESC [ A` is `M-up`.
///
/// Only one level of meta is applied. `ESC ESC x` is not `M-M-X`.
pub fn decode_meta(buffer: &[u8], ctx: &DecodeContext) -> DecodeOutcome {
    if !ctx.protocols.contains(ProtocolFlags::META_ESCAPE) {
        return DecodeOutcome::NotMine;
    }

    let inner = &buffer[1..];
    match inner {
        // Bare `ESC [` / `ESC O` only reach here when forced.
        [byte @ (b'[' | b'O')] => {
            DecodeOutcome::key(KeyCode::char(char::from(*byte)).add_modifiers(KeyModifiers::META))
        }
        [ASCII_ESC, next, ..] if !matches!(next, b'[' | b'O') => DecodeOutcome::NotMine,
        _ => router::decode(inner, ctx).map_key(|code| code.add_modifiers(KeyModifiers::META)),
    }
}
