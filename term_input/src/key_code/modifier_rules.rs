// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Rules that turn "a key plus some modifiers" into one canonical [`KeyCode`].
//!
//! Every decoder funnels through [`KeyCode::add_modifiers`], so the same physical key
//! produces the same code no matter which protocol reported it:
//!
//! | Input                       | Result                       |
//! |-----------------------------|------------------------------|
//! | `0x00`                      | `C-space`                    |
//! | `0x01` ..= `0x1A`           | `C-A` ..= `C-Z`              |
//! | `0x09`, `0x0D`, `0x1B`      | `tab`, `return`, `escape`    |
//! | `0x7F`                      | `backspace`                  |
//! | `tab` + ctrl / meta / shift | `ctrl-tab`, `alt-tab`, `back-tab` |
//! | `backspace` + modifiers     | `ctrl-`, `alt-`, `shift-backspace` |
//! | letter + ctrl or meta       | upper case letter            |
//! | letter + shift only         | upper case letter, no shift  |

use super::{KeyCode, KeyModifiers, MiscKey};

pub const ASCII_NUL: u8 = 0x00;
pub const ASCII_TAB: u8 = 0x09;
pub const ASCII_CR: u8 = 0x0D;
pub const ASCII_ESC: u8 = 0x1B;
pub const ASCII_DEL: u8 = 0x7F;

impl KeyCode {
    /// Maps a single C0 control byte (or `DEL`) to its key.
    ///
    /// `0x08` stays `C-H` rather than backspace. Terminals that send `0x08` for the
    /// backspace key can bind it in the [`crate::SequenceMatcher`].
    #[must_use]
    pub fn from_control_byte(byte: u8) -> Self {
        match byte {
            ASCII_NUL => KeyCode::char(' ').with_modifiers(KeyModifiers::CTRL),
            ASCII_TAB => MiscKey::Tab.into(),
            ASCII_CR => MiscKey::Return.into(),
            ASCII_ESC => MiscKey::Escape.into(),
            ASCII_DEL => MiscKey::Backspace.into(),
            0x01..=0x1F => {
                KeyCode::char(char::from(byte + 0x40)).with_modifiers(KeyModifiers::CTRL)
            }
            _ => KeyCode::char(char::from(byte)),
        }
    }

    /// The key for a byte that no decoder claimed, emitted as-is.
    #[must_use]
    pub fn literal_byte(byte: u8) -> Self {
        if byte < 0x20 || byte == ASCII_DEL {
            Self::from_control_byte(byte)
        } else {
            KeyCode::char(char::from(byte))
        }
    }

    /// Builds the code for Unicode scalar `value` pressed with `mods`. This is the
    /// shared entry point for protocols that report "code point + modifiers" (xterm
    /// modifyOtherKeys, kitty, mintty, win32). `None` if `value` is not a scalar.
    #[must_use]
    pub fn modified_scalar(value: u32, mods: KeyModifiers) -> Option<Self> {
        let base = match u8::try_from(value) {
            Ok(byte) if byte < 0x20 || byte == ASCII_DEL => Self::from_control_byte(byte),
            _ => Self::from_scalar(value)?,
        };
        Some(base.add_modifiers(mods))
    }

    /// Adds `mods` to this code, applying the Tab, Backspace and letter case rules. The
    /// modifier consumed by a dedicated code (eg: ctrl for `ctrl-tab`) is cleared.
    #[must_use]
    pub fn add_modifiers(self, mods: KeyModifiers) -> Self {
        let all = self.modifiers() | mods;
        let base = self.without_modifiers();
        if all.is_empty() {
            return base;
        }
        match (base.as_misc(), base.as_char()) {
            (Some(MiscKey::Tab), _) => tab_with(all),
            (Some(MiscKey::Backspace), _) => backspace_with(all),
            (_, Some(ch)) => char_with(ch, all),
            _ => base.with_modifiers(all),
        }
    }
}

fn tab_with(mods: KeyModifiers) -> KeyCode {
    let (key, consumed) = if mods.contains(KeyModifiers::CTRL) {
        (MiscKey::CtrlTab, KeyModifiers::CTRL)
    } else if mods.contains(KeyModifiers::META) {
        (MiscKey::AltTab, KeyModifiers::META)
    } else {
        (MiscKey::BackTab, KeyModifiers::SHIFT)
    };
    KeyCode::misc(key).with_modifiers(mods - consumed)
}

fn backspace_with(mods: KeyModifiers) -> KeyCode {
    let (key, consumed) = if mods.contains(KeyModifiers::CTRL) {
        (MiscKey::CtrlBackspace, KeyModifiers::CTRL)
    } else if mods.contains(KeyModifiers::META) {
        (MiscKey::AltBackspace, KeyModifiers::META)
    } else {
        (MiscKey::ShiftBackspace, KeyModifiers::SHIFT)
    };
    KeyCode::misc(key).with_modifiers(mods - consumed)
}

fn char_with(ch: char, mods: KeyModifiers) -> KeyCode {
    if !ch.is_ascii_alphabetic() {
        return KeyCode::char(ch).with_modifiers(mods);
    }
    let upper = KeyCode::char(ch.to_ascii_uppercase());
    if mods.intersects(KeyModifiers::CTRL | KeyModifiers::META) {
        upper.with_modifiers(mods)
    } else {
        // Shift alone is already expressed by the case of the letter.
        upper.with_modifiers(mods - KeyModifiers::SHIFT)
    }
}
