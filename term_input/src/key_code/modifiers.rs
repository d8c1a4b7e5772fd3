// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use bitflags::bitflags;

bitflags! {
    /// Modifier bits of a [`crate::KeyCode`]. The flags are stored already shifted into
    /// the modifier field, so they can be or-ed straight into a raw code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    pub struct KeyModifiers: u32 {
        const SHIFT = 0x0100_0000;
        const CTRL  = 0x0200_0000;
        const META  = 0x0400_0000;
    }
}

/// Xterm style modifier parameters encode `1 + bits`.
const XTERM_SHIFT_BIT: u32 = 0b0001;
const XTERM_ALT_BIT: u32 = 0b0010;
const XTERM_CTRL_BIT: u32 = 0b0100;
/// Super has no slot of its own, it folds into meta.
const XTERM_SUPER_BIT: u32 = 0b1000;

/// Kitty extends the xterm bitfield with hyper and meta (both fold into meta), plus
/// caps lock and num lock which are ignored.
const KITTY_HYPER_BIT: u32 = 0b01_0000;
const KITTY_META_BIT: u32 = 0b10_0000;

impl KeyModifiers {
    /// Decodes an xterm modifier parameter (`2` = shift, `3` = alt, `5` = ctrl, ...).
    /// Values of `0` and `1` both mean "no modifiers".
    #[must_use]
    pub fn from_xterm_param(param: u32) -> Self {
        let bits = param.saturating_sub(1);
        let mut it = Self::empty();
        if bits & XTERM_SHIFT_BIT != 0 {
            it |= Self::SHIFT;
        }
        if bits & (XTERM_ALT_BIT | XTERM_SUPER_BIT) != 0 {
            it |= Self::META;
        }
        if bits & XTERM_CTRL_BIT != 0 {
            it |= Self::CTRL;
        }
        it
    }

    /// Decodes the modifier field of a kitty `CSI code ; mods u` report.
    #[must_use]
    pub fn from_kitty_param(param: u32) -> Self {
        let bits = param.saturating_sub(1);
        let mut it = Self::from_xterm_param(param);
        if bits & (KITTY_HYPER_BIT | KITTY_META_BIT) != 0 {
            it |= Self::META;
        }
        it
    }

    /// Inverse of [`Self::from_xterm_param`], used when re-encoding a key for display
    /// or for tests.
    #[must_use]
    pub fn to_xterm_param(self) -> u32 {
        let mut bits = 0;
        if self.contains(Self::SHIFT) {
            bits |= XTERM_SHIFT_BIT;
        }
        if self.contains(Self::META) {
            bits |= XTERM_ALT_BIT;
        }
        if self.contains(Self::CTRL) {
            bits |= XTERM_CTRL_BIT;
        }
        bits + 1
    }
}
