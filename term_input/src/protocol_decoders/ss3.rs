// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Single shift 3 sequences (`ESC O x` or `0x8F x`): application mode cursor keys,
//! `F1`-`F4`, and the keypad. Some terminals put xterm modifiers in between, either as
//! `ESC O 1 ; 5 A` or as `ESC O 5 A`.

use super::{CsiParse, DecodeContext, DecodeOutcome, parse_csi};
use crate::{KEYPAD_ENTER, KeyCode, KeyModifiers, MiscKey};

/// Key for the final byte of an SS3 sequence.
fn ss3_key(final_byte: u8) -> Option<KeyCode> {
    let it = match final_byte {
        b'A' => MiscKey::Up.into(),
        b'B' => MiscKey::Down.into(),
        b'C' => MiscKey::Right.into(),
        b'D' => MiscKey::Left.into(),
        b'E' => MiscKey::Begin.into(),
        b'F' => MiscKey::End.into(),
        b'H' => MiscKey::Home.into(),
        b'I' => MiscKey::Tab.into(),
        b'M' => KeyCode::keypad(KEYPAD_ENTER),
        b'P'..=b'S' => KeyCode::function(final_byte - b'P' + 1),
        b'X' => KeyCode::keypad(b'='),
        b'j' => KeyCode::keypad(b'*'),
        b'k' => KeyCode::keypad(b'+'),
        b'l' => KeyCode::keypad(b','),
        b'm' => KeyCode::keypad(b'-'),
        b'n' => KeyCode::keypad(b'.'),
        b'o' => KeyCode::keypad(b'/'),
        b'p'..=b'y' => KeyCode::keypad(final_byte - b'p' + b'0'),
        _ => return None,
    };
    Some(it)
}

/// `body` is everything after the SS3 introducer.
pub fn decode(body: &[u8], ctx: &DecodeContext) -> DecodeOutcome {
    // Same shape as a CSI body, minus private markers and intermediates.
    let seq = match parse_csi(body) {
        CsiParse::Complete(seq) => seq,
        CsiParse::Incomplete => return ctx.incomplete(),
        CsiParse::Invalid => return DecodeOutcome::NotMine,
    };
    if seq.private_marker.is_some() || !seq.intermediates.is_empty() || seq.params.len() > 2 {
        return DecodeOutcome::NotMine;
    }
    let Some(key) = ss3_key(seq.final_byte) else {
        return DecodeOutcome::NotMine;
    };

    let modifier_param = match seq.params.len() {
        2 => seq.param_or(1, 1),
        1 => seq.param_or(0, 1),
        _ => 1,
    };
    DecodeOutcome::key(key.add_modifiers(KeyModifiers::from_xterm_param(modifier_param)))
}

#[cfg(test)]
mod tests_ss3 {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::{DecodeMode, ProtocolFlags};

    fn ctx(mode: DecodeMode) -> DecodeContext { DecodeContext::new(ProtocolFlags::default(), mode) }

    #[test_case(b"A", MiscKey::Up.into())]
    #[test_case(b"H", MiscKey::Home.into())]
    #[test_case(b"P", KeyCode::function(1))]
    #[test_case(b"S", KeyCode::function(4))]
    #[test_case(b"M", KeyCode::keypad(KEYPAD_ENTER))]
    #[test_case(b"p", KeyCode::keypad(b'0'))]
    #[test_case(b"y", KeyCode::keypad(b'9'))]
    #[test_case(b"j", KeyCode::keypad(b'*'))]
    #[test_case(b"1;5A", KeyCode::misc(MiscKey::Up).with_modifiers(KeyModifiers::CTRL))]
    #[test_case(b"5A", KeyCode::misc(MiscKey::Up).with_modifiers(KeyModifiers::CTRL))]
    #[test_case(b"2P", KeyCode::function(1).with_modifiers(KeyModifiers::SHIFT))]
    #[test_case(b"1;2I", MiscKey::BackTab.into())]
    fn test_decode(body: &[u8], expected: KeyCode) {
        assert_eq!(decode(body, &ctx(DecodeMode::Incremental)), DecodeOutcome::key(expected));
    }

    #[test]
    fn test_incomplete_and_unknown() {
        assert_eq!(decode(b"", &ctx(DecodeMode::Incremental)), DecodeOutcome::NeedMore);
        assert_eq!(decode(b"1;", &ctx(DecodeMode::Incremental)), DecodeOutcome::NeedMore);
        assert_eq!(decode(b"1;", &ctx(DecodeMode::Force)), DecodeOutcome::NotMine);
        assert_eq!(decode(b"z", &ctx(DecodeMode::Incremental)), DecodeOutcome::NotMine);
    }
}
