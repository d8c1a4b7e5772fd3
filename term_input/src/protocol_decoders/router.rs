// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words Cygwin

//! This module exports [`decode`], the single entry point the engine uses to ask "what
//! are these bytes?". See the function documentation for the routing rules.

use super::{DecodeContext, DecodeOutcome, control, csi, cygwin, escape, ss3, utf8};
use crate::{ASCII_DEL, ASCII_ESC, ProtocolFlags};

/// 8-bit control sequence introducer.
pub const C1_CSI: u8 = 0x9B;
/// 8-bit single shift 3.
pub const C1_SS3: u8 = 0x8F;
pub const CSI_BRACKET: u8 = b'[';
pub const SS3_O: u8 = b'O';
pub const CYGWIN_BRACE: u8 = b'{';

/// Decodes the buffered bytes `buffer`, which always start at a sequence boundary.
///
/// The first one or two bytes pick the grammar:
///
/// | Input pattern              | Routed to                                   |
/// |:---------------------------|:--------------------------------------------|
/// | `[ ESC ]` alone            | wait, or the Escape key when forced         |
/// | `[ ESC, '[', .. ]`, `0x9B` | CSI (keys, mouse, focus, paste, win32)      |
/// | `[ ESC, 'O', .. ]`, `0x8F` | SS3 (application cursor keys, keypad, F1-F4)|
/// | `[ ESC, '{', .. ]`         | Cygwin raw mode (when enabled)              |
/// | `[ ESC, .. ]`              | meta + the rest (when enabled)              |
/// | `0x00..=0x1F`, `0x7F`      | control keys                                |
/// | `0xC2..=0xF7`              | UTF-8 multi byte character                  |
/// | anything else              | the byte as a character                     |
///
/// With a forced [`DecodeContext`], a bare `ESC [` or `ESC O` is meta + `[` or `O`,
/// since no terminator is coming.
#[must_use]
pub fn decode(buffer: &[u8], ctx: &DecodeContext) -> DecodeOutcome {
    let meta = ctx.protocols.contains(ProtocolFlags::META_ESCAPE);
    match buffer {
        [] => DecodeOutcome::NeedMore,
        [ASCII_ESC] => escape::decode_lone_escape(ctx),
        [ASCII_ESC, CSI_BRACKET | SS3_O] if ctx.is_force() && meta => {
            escape::decode_meta(buffer, ctx)
        }
        [ASCII_ESC, CSI_BRACKET, body @ ..] | [C1_CSI, body @ ..] => csi::decode(body, ctx),
        [ASCII_ESC, SS3_O, body @ ..] | [C1_SS3, body @ ..] => ss3::decode(body, ctx),
        [ASCII_ESC, CYGWIN_BRACE, body @ ..]
            if ctx.protocols.contains(ProtocolFlags::CYGWIN) =>
        {
            cygwin::decode(body, ctx)
        }
        [ASCII_ESC, ..] => escape::decode_meta(buffer, ctx),
        [first, rest @ ..] if *first < 0x20 || *first == ASCII_DEL => {
            control::decode(*first, rest)
        }
        [0xC2..=0xF7, ..] => utf8::decode(buffer, ctx),
        [single] => DecodeOutcome::key(crate::KeyCode::literal_byte(*single)),
        _ => DecodeOutcome::NotMine,
    }
}
