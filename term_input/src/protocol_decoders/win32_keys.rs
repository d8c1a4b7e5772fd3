// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words Cygwin keypad numpad

//! Translation of a Windows console `KEY_EVENT_RECORD` into a [`KeyCode`]. Both
//! win32-input-mode (`CSI ... _`) and Cygwin raw mode (`ESC { ... K`) report these
//! records, they only differ in field order.

use crate::{KEYPAD_ENTER, KeyCode, KeyModifiers, MiscKey};

/// `dwControlKeyState` bits.
pub const RIGHT_ALT_PRESSED: u32 = 0x0001;
pub const LEFT_ALT_PRESSED: u32 = 0x0002;
pub const RIGHT_CTRL_PRESSED: u32 = 0x0004;
pub const LEFT_CTRL_PRESSED: u32 = 0x0008;
pub const SHIFT_PRESSED: u32 = 0x0010;

/// One Windows console key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Win32KeyRecord {
    pub key_down: bool,
    /// Ignored, the terminal repeats the whole sequence for auto repeat.
    pub repeat_count: u32,
    pub virtual_key: u32,
    pub scan_code: u32,
    pub unicode_char: u32,
    pub control_key_state: u32,
}

impl Win32KeyRecord {
    #[must_use]
    pub fn modifiers(&self) -> KeyModifiers {
        let state = self.control_key_state;
        let mut it = KeyModifiers::empty();
        if state & SHIFT_PRESSED != 0 {
            it |= KeyModifiers::SHIFT;
        }
        if state & (LEFT_CTRL_PRESSED | RIGHT_CTRL_PRESSED) != 0 {
            it |= KeyModifiers::CTRL;
        }
        if state & (LEFT_ALT_PRESSED | RIGHT_ALT_PRESSED) != 0 {
            it |= KeyModifiers::META;
        }
        it
    }

    /// AltGr is reported as right alt + left ctrl. When it produced a character, the
    /// character already accounts for both.
    fn is_alt_gr_char(&self) -> bool {
        let alt_gr = RIGHT_ALT_PRESSED | LEFT_CTRL_PRESSED;
        self.control_key_state & alt_gr == alt_gr && self.unicode_char >= 0x20
    }
}

/// Virtual key codes for keys that don't produce a character.
fn virtual_key(vk: u32) -> Option<KeyCode> {
    let it = match vk {
        0x08 => MiscKey::Backspace.into(),
        0x09 => MiscKey::Tab.into(),
        0x0D => MiscKey::Return.into(),
        0x1B => MiscKey::Escape.into(),
        0x21 => MiscKey::PageUp.into(),
        0x22 => MiscKey::PageDown.into(),
        0x23 => MiscKey::End.into(),
        0x24 => MiscKey::Home.into(),
        0x25 => MiscKey::Left.into(),
        0x26 => MiscKey::Up.into(),
        0x27 => MiscKey::Right.into(),
        0x28 => MiscKey::Down.into(),
        0x0C => MiscKey::Begin.into(),
        0x2D => MiscKey::Insert.into(),
        0x2E => MiscKey::Delete.into(),
        0x60..=0x69 => KeyCode::keypad(b'0' + u8::try_from(vk - 0x60).ok()?),
        0x6A => KeyCode::keypad(b'*'),
        0x6B => KeyCode::keypad(b'+'),
        0x6C => KeyCode::keypad(KEYPAD_ENTER),
        0x6D => KeyCode::keypad(b'-'),
        0x6E => KeyCode::keypad(b'.'),
        0x6F => KeyCode::keypad(b'/'),
        0x70..=0x87 => KeyCode::function(u8::try_from(vk - 0x70 + 1).ok()?),
        _ => return None,
    };
    Some(it)
}

/// Shift, ctrl, alt, caps lock, the windows keys, num lock, scroll lock and their
/// left / right variants.
fn is_modifier_only(vk: u32) -> bool {
    matches!(vk, 0x10..=0x12 | 0x14 | 0x5B | 0x5C | 0x90 | 0x91 | 0xA0..=0xA5)
}

/// Key ups, lone modifier presses and unknown keys all become [`KeyCode::VOID`].
#[must_use]
pub fn translate(record: &Win32KeyRecord) -> KeyCode {
    if !record.key_down || is_modifier_only(record.virtual_key) {
        return KeyCode::VOID;
    }

    let mods = record.modifiers();
    if let Some(key) = virtual_key(record.virtual_key) {
        return key.add_modifiers(mods);
    }

    let uc = record.unicode_char;
    if record.is_alt_gr_char() {
        return KeyCode::from_scalar(uc).unwrap_or(KeyCode::VOID);
    }
    if uc != 0 {
        // The character already reflects shift (and ctrl for control characters).
        let mods = if uc < 0x20 { mods - KeyModifiers::CTRL } else { mods - KeyModifiers::SHIFT };
        return KeyCode::modified_scalar(uc, mods).unwrap_or(KeyCode::VOID);
    }

    // Ctrl + digit, ctrl + space and the like produce no character, fall back to the
    // key's label.
    match record.virtual_key {
        vk @ (0x20 | 0x30..=0x39 | 0x41..=0x5A) => {
            KeyCode::modified_scalar(vk, mods).unwrap_or(KeyCode::VOID)
        }
        _ => KeyCode::VOID,
    }
}

#[cfg(test)]
mod tests_win32_keys {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn down(vk: u32, uc: u32, state: u32) -> Win32KeyRecord {
        Win32KeyRecord {
            key_down: true,
            repeat_count: 1,
            virtual_key: vk,
            scan_code: 0,
            unicode_char: uc,
            control_key_state: state,
        }
    }

    #[test_case(down(0x41, 'a' as u32, 0), KeyCode::char('a'))]
    #[test_case(down(0x41, 'A' as u32, SHIFT_PRESSED), KeyCode::char('A'))]
    #[test_case(down(0x41, 0x01, LEFT_CTRL_PRESSED), KeyCode::char('A').with_modifiers(KeyModifiers::CTRL))]
    #[test_case(down(0x41, 'a' as u32, LEFT_ALT_PRESSED), KeyCode::char('A').with_modifiers(KeyModifiers::META))]
    #[test_case(down(0x32, 0, LEFT_CTRL_PRESSED), KeyCode::char('2').with_modifiers(KeyModifiers::CTRL))]
    #[test_case(down(0x51, '@' as u32, RIGHT_ALT_PRESSED | LEFT_CTRL_PRESSED), KeyCode::char('@'); "alt gr")]
    #[test_case(down(0x0D, 0x0D, 0), MiscKey::Return.into())]
    #[test_case(down(0x09, 0x09, SHIFT_PRESSED), MiscKey::BackTab.into())]
    #[test_case(down(0x08, 0x08, LEFT_CTRL_PRESSED), MiscKey::CtrlBackspace.into())]
    #[test_case(down(0x26, 0, LEFT_CTRL_PRESSED), KeyCode::misc(MiscKey::Up).with_modifiers(KeyModifiers::CTRL))]
    #[test_case(down(0x74, 0, 0), KeyCode::function(5))]
    #[test_case(down(0x87, 0, 0), KeyCode::function(24))]
    #[test_case(down(0x67, '7' as u32, 0), KeyCode::keypad(b'7'))]
    #[test_case(down(0x20, 0, LEFT_CTRL_PRESSED), KeyCode::char(' ').with_modifiers(KeyModifiers::CTRL))]
    #[test_case(down(0x10, 0, SHIFT_PRESSED), KeyCode::VOID; "lone shift")]
    #[test_case(down(0xFF, 0, 0), KeyCode::VOID; "unknown")]
    fn test_translate(record: Win32KeyRecord, expected: KeyCode) {
        assert_eq!(translate(&record), expected);
    }

    #[test]
    fn test_key_up_is_void() {
        let record = Win32KeyRecord {
            key_down: false,
            ..down(0x41, 'a' as u32, 0)
        };
        assert_eq!(translate(&record), KeyCode::VOID);
    }

    #[test]
    fn test_repeat_count_is_ignored() {
        let record = Win32KeyRecord {
            repeat_count: 9,
            ..down(0x41, 'a' as u32, 0)
        };
        assert_eq!(translate(&record), KeyCode::char('a'));
    }
}
