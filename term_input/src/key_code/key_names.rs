// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Human readable key names, used for logging, the `keyview` binary and for building
//! key codes in tests. Modifiers are written as `C-`, `M-`, `S-` prefixes (in that
//! order), eg: `C-M-A`, `S-up`, `f5`, `kp-7`, `mouse-1-press`.

use std::{fmt, str::FromStr};

use super::{KEYPAD_ENTER, KeyCode, KeyModifiers, KeyRange, MiscKey, MouseAction};

const MODIFIER_PREFIXES: [(&str, KeyModifiers); 3] = [
    ("C-", KeyModifiers::CTRL),
    ("M-", KeyModifiers::META),
    ("S-", KeyModifiers::SHIFT),
];

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mods = self.modifiers();
        for (prefix, flag) in MODIFIER_PREFIXES {
            if mods.contains(flag) {
                f.write_str(prefix)?;
            }
        }

        let value = self.value();
        match self.range() {
            KeyRange::Character => match self.as_char() {
                Some(' ') => f.write_str("space"),
                Some(ch) if !ch.is_control() => write!(f, "{ch}"),
                _ => write!(f, "U+{value:04X}"),
            },
            KeyRange::Function => write!(f, "f{value}"),
            KeyRange::Keypad => match u8::try_from(value) {
                Ok(KEYPAD_ENTER) => f.write_str("kp-enter"),
                Ok(label) => write!(f, "kp-{}", char::from(label)),
                Err(_) => write!(f, "kp-{value:x}"),
            },
            KeyRange::Misc => match self.as_misc() {
                Some(key) => f.write_str(key.into()),
                None => write!(f, "misc-{value:x}"),
            },
            KeyRange::Mouse => match self.as_mouse() {
                Some((button, action)) => {
                    let action: &'static str = action.into();
                    write!(f, "mouse-{button}-{action}")
                }
                None => write!(f, "mouse-{value:x}"),
            },
            KeyRange::Private if self.without_modifiers().is_void() => f.write_str("void"),
            KeyRange::Private => write!(f, "private-{value:x}"),
            KeyRange::Multikey => write!(f, "multikey-{value:x}"),
        }
    }
}

impl fmt::Debug for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyCode({self} = {:#010x})", self.raw())
    }
}

/// Returned when a key name can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown key name: {0:?}")]
pub struct KeyNameParseError(pub String);

impl FromStr for KeyCode {
    type Err = KeyNameParseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let err = || KeyNameParseError(name.to_string());

        let mut mods = KeyModifiers::empty();
        let mut rest = name;
        'strip: loop {
            for (prefix, flag) in MODIFIER_PREFIXES {
                if let Some(tail) = rest.strip_prefix(prefix)
                    && !tail.is_empty()
                {
                    mods |= flag;
                    rest = tail;
                    continue 'strip;
                }
            }
            break;
        }

        let base = parse_base_name(rest).ok_or_else(err)?;
        Ok(base.with_modifiers(mods))
    }
}

fn parse_base_name(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::char(ch));
    }

    if name == "space" {
        return Some(KeyCode::char(' '));
    }
    if name == "void" {
        return Some(KeyCode::VOID);
    }
    if name == "kp-enter" {
        return Some(KeyCode::keypad(KEYPAD_ENTER));
    }
    if let Some(label) = name.strip_prefix("kp-") {
        return match label.as_bytes() {
            [byte] => Some(KeyCode::keypad(*byte)),
            _ => None,
        };
    }
    if let Some(hex) = name.strip_prefix("U+") {
        return u32::from_str_radix(hex, 16).ok().and_then(KeyCode::from_scalar);
    }
    if let Some(number) = name.strip_prefix('f')
        && let Ok(number) = number.parse::<u8>()
    {
        return Some(KeyCode::function(number));
    }
    if let Some(mouse) = name.strip_prefix("mouse-") {
        let (button, action) = mouse.split_once('-')?;
        return Some(KeyCode::mouse(
            button.parse().ok()?,
            MouseAction::from_str(action).ok()?,
        ));
    }
    MiscKey::from_str(name).ok().map(KeyCode::misc)
}
