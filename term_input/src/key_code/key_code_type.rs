// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{KeyModifiers, KeyRange, MiscKey, MouseAction};

pub const KEY_VALUE_MASK: u32 = 0x001F_FFFF;
pub const KEY_MODIFIER_MASK: u32 = 0x0700_0000;
pub const KEY_RANGE_MASK: u32 = 0xF000_0000;
pub const KEY_RANGE_SHIFT: u32 = 28;

/// Highest function key number that fits the naming scheme (`f1` ..= `f63`).
pub const MAX_FUNCTION_KEY: u8 = 63;

/// Keypad Enter has no printable character, so it uses the carriage return value.
pub const KEYPAD_ENTER: u8 = b'\r';

const MOUSE_ACTION_SHIFT: u32 = 8;
const MOUSE_BUTTON_MASK: u32 = 0xFF;

/// Value of [`KeyCode::VOID`] inside the private range.
const VOID_VALUE: u32 = 0xFFFF;

/// A modifier qualified key. See the [module docs](crate::key_code) for the layout.
///
/// The value, modifier and range fields are disjoint, so [`KeyCode::with_modifiers`]
/// never changes the value or the range of a code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(u32);

impl KeyCode {
    /// Fully consumed input that means nothing (key release, modifier only press, ...).
    pub const VOID: KeyCode = KeyCode(((KeyRange::Private as u32) << KEY_RANGE_SHIFT) | VOID_VALUE);

    const fn from_parts(range: KeyRange, value: u32) -> Self {
        KeyCode(((range as u32) << KEY_RANGE_SHIFT) | (value & KEY_VALUE_MASK))
    }

    /// Validates a raw 32-bit code. Bits outside the three fields, or an unknown range
    /// tag, make it invalid.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        let reserved = !(KEY_VALUE_MASK | KEY_MODIFIER_MASK | KEY_RANGE_MASK);
        if raw & reserved != 0 {
            return None;
        }
        KeyRange::from_repr(raw >> KEY_RANGE_SHIFT).map(|_| KeyCode(raw))
    }

    #[must_use]
    pub const fn char(ch: char) -> Self { Self::from_parts(KeyRange::Character, ch as u32) }

    /// `None` for values that are not Unicode scalars (surrogates, > `U+10FFFF`).
    #[must_use]
    pub fn from_scalar(value: u32) -> Option<Self> { char::from_u32(value).map(Self::char) }

    /// Function key `f{number}`. Numbers are clamped to `1..=63`.
    #[must_use]
    pub fn function(number: u8) -> Self {
        Self::from_parts(
            KeyRange::Function,
            u32::from(number.clamp(1, MAX_FUNCTION_KEY)),
        )
    }

    /// Keypad key labelled with `label` (`b'0'`..=`b'9'`, `b'*'`, `b'+'`, ... or
    /// [`KEYPAD_ENTER`]).
    #[must_use]
    pub const fn keypad(label: u8) -> Self { Self::from_parts(KeyRange::Keypad, label as u32) }

    #[must_use]
    pub const fn misc(key: MiscKey) -> Self { Self::from_parts(KeyRange::Misc, key as u32) }

    /// Mouse button `button` (`1` left, `2` middle, `3` right, `8`.. extra buttons, `0`
    /// unknown) with `action`.
    #[must_use]
    pub const fn mouse(button: u8, action: MouseAction) -> Self {
        Self::from_parts(
            KeyRange::Mouse,
            ((action as u32) << MOUSE_ACTION_SHIFT) | button as u32,
        )
    }

    #[must_use]
    pub const fn raw(self) -> u32 { self.0 }

    #[must_use]
    pub const fn value(self) -> u32 { self.0 & KEY_VALUE_MASK }

    #[must_use]
    pub const fn modifiers(self) -> KeyModifiers {
        KeyModifiers::from_bits_truncate(self.0 & KEY_MODIFIER_MASK)
    }

    /// The tag is only ever set through the constructors above, so the fallback is
    /// unreachable in practice.
    #[must_use]
    pub fn range(self) -> KeyRange {
        KeyRange::from_repr(self.0 >> KEY_RANGE_SHIFT).unwrap_or(KeyRange::Private)
    }

    /// Adds modifier bits, leaving value and range untouched. Use
    /// [`KeyCode::add_modifiers`] to also apply the Tab / Backspace / letter rules.
    #[must_use]
    pub const fn with_modifiers(self, mods: KeyModifiers) -> Self {
        KeyCode(self.0 | mods.bits())
    }

    #[must_use]
    pub const fn without_modifiers(self) -> Self { KeyCode(self.0 & !KEY_MODIFIER_MASK) }

    #[must_use]
    pub const fn is_void(self) -> bool { self.0 == Self::VOID.0 }

    #[must_use]
    pub fn is_mouse(self) -> bool { self.range() == KeyRange::Mouse }

    #[must_use]
    pub fn as_char(self) -> Option<char> {
        match self.range() {
            KeyRange::Character => char::from_u32(self.value()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_misc(self) -> Option<MiscKey> {
        match self.range() {
            KeyRange::Misc => u16::try_from(self.value()).ok().and_then(MiscKey::from_repr),
            _ => None,
        }
    }

    /// `(button, action)` for mouse range codes.
    #[must_use]
    pub fn as_mouse(self) -> Option<(u8, MouseAction)> {
        if !self.is_mouse() {
            return None;
        }
        let value = self.value();
        let button = u8::try_from(value & MOUSE_BUTTON_MASK).ok()?;
        MouseAction::from_repr(value >> MOUSE_ACTION_SHIFT).map(|action| (button, action))
    }

    /// Same key ignoring modifiers.
    #[must_use]
    pub fn is_key(self, other: KeyCode) -> bool {
        self.without_modifiers() == other.without_modifiers()
    }
}

impl From<MiscKey> for KeyCode {
    fn from(key: MiscKey) -> Self { Self::misc(key) }
}

impl From<char> for KeyCode {
    fn from(ch: char) -> Self { Self::char(ch) }
}
