// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use strum_macros::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// The range tag stored in the top 4 bits of a [`crate::KeyCode`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, FromRepr,
)]
#[repr(u32)]
pub enum KeyRange {
    /// A Unicode scalar value, possibly with modifiers.
    Character = 0,
    /// Function keys `f1` ..= `f63`.
    Function = 1,
    /// Keypad keys, the value is the ASCII character printed on the key.
    Keypad = 2,
    /// Named keys that are neither characters nor function keys, see [`MiscKey`].
    Misc = 3,
    /// Multi key (compose) sequences, reserved for the layer above.
    Multikey = 4,
    /// Engine internal codes, eg: [`crate::KeyCode::VOID`].
    Private = 5,
    /// Mouse buttons and wheel, see [`MouseAction`].
    Mouse = 6,
}

/// Named keys in the [`KeyRange::Misc`] range. The discriminant is the value field of
/// the key code, and the kebab case variant name is the key's display name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    IntoStaticStr,
    FromRepr,
)]
#[strum(serialize_all = "kebab-case")]
#[repr(u16)]
pub enum MiscKey {
    Up = 1,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    /// Keypad 5 without num lock, `CSI E` or `SS3 E`.
    Begin,
    Backspace,
    Tab,
    BackTab,
    CtrlTab,
    AltTab,
    ShiftBackspace,
    CtrlBackspace,
    AltBackspace,
    Return,
    Escape,
    FocusIn,
    FocusOut,
    PasteStart,
    PasteEnd,
}

/// What happened to a mouse button. Packed into bits 8.. of a mouse key code's value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    IntoStaticStr,
    FromRepr,
)]
#[strum(serialize_all = "kebab-case")]
#[repr(u32)]
pub enum MouseAction {
    Press = 0,
    Release = 1,
    Drag = 2,
    /// Pointer motion with no button held.
    Move = 3,
}
