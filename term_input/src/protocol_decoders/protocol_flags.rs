// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words mintty Cygwin kitty

use bitflags::bitflags;

bitflags! {
    /// The input protocols the terminal was asked to speak. The first group gates which
    /// decoders are active. The second group only controls which reports the terminal
    /// is asked to send; their sequences are always decoded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ProtocolFlags: u16 {
        /// `ESC x` means meta + `x`.
        const META_ESCAPE = 1 << 0;
        /// xterm modifyOtherKeys level 2, `CSI 27 ; mods ; code ~`.
        const XTERM_MOK2 = 1 << 1;
        /// mintty's modifyOtherKeys in `CSI code ; mods u` format.
        const MINTTY_MOK2 = 1 << 2;
        /// kitty progressive enhancement, `CSI code ; mods u`.
        const KITTY = 1 << 3;
        /// Windows Terminal win32-input-mode, `CSI Vk;Sc;Uc;Kd;Cs;Rc _`.
        const WIN32_INPUT = 1 << 4;
        /// Cygwin console raw mode, `ESC { kd;rc;vk;sc;uc;cs K`.
        const CYGWIN = 1 << 5;

        const MOUSE = 1 << 8;
        const FOCUS_EVENTS = 1 << 9;
        const BRACKETED_PASTE = 1 << 10;
    }
}

impl Default for ProtocolFlags {
    fn default() -> Self { Self::META_ESCAPE }
}

/// Names accepted by [`ProtocolFlags::parse_list`], in display order.
const FLAG_NAMES: [(&str, ProtocolFlags); 9] = [
    ("meta", ProtocolFlags::META_ESCAPE),
    ("xterm-mok2", ProtocolFlags::XTERM_MOK2),
    ("mintty-mok2", ProtocolFlags::MINTTY_MOK2),
    ("kitty", ProtocolFlags::KITTY),
    ("win32", ProtocolFlags::WIN32_INPUT),
    ("cygwin", ProtocolFlags::CYGWIN),
    ("mouse", ProtocolFlags::MOUSE),
    ("focus", ProtocolFlags::FOCUS_EVENTS),
    ("paste", ProtocolFlags::BRACKETED_PASTE),
];

/// `(flag, enable, disable)`. Cygwin raw mode is a console setting, it has no
/// sequence.
const FLAG_SEQUENCES: [(ProtocolFlags, &str, &str); 8] = [
    (ProtocolFlags::META_ESCAPE, "\x1b[?1036h", "\x1b[?1036l"),
    (ProtocolFlags::XTERM_MOK2, "\x1b[>4;2m", "\x1b[>4m"),
    (ProtocolFlags::MINTTY_MOK2, "\x1b[>4;2m", "\x1b[>4m"),
    (ProtocolFlags::KITTY, "\x1b[>1u", "\x1b[<1u"),
    (ProtocolFlags::WIN32_INPUT, "\x1b[?9001h", "\x1b[?9001l"),
    (
        ProtocolFlags::MOUSE,
        "\x1b[?1000h\x1b[?1002h\x1b[?1006h",
        "\x1b[?1006l\x1b[?1002l\x1b[?1000l",
    ),
    (ProtocolFlags::FOCUS_EVENTS, "\x1b[?1004h", "\x1b[?1004l"),
    (ProtocolFlags::BRACKETED_PASTE, "\x1b[?2004h", "\x1b[?2004l"),
];

impl ProtocolFlags {
    /// Parses a comma separated list of protocol names, eg: `"meta,kitty,mouse"`.
    /// `"none"` and the empty string give no flags.
    ///
    /// # Errors
    ///
    /// The first unknown name.
    pub fn parse_list(list: &str) -> Result<Self, String> {
        let mut it = Self::empty();
        for name in list.split(',').map(str::trim).filter(|it| !it.is_empty()) {
            if name == "none" {
                continue;
            }
            let (_, flag) = FLAG_NAMES
                .iter()
                .find(|(known, _)| *known == name)
                .ok_or_else(|| name.to_string())?;
            it |= *flag;
        }
        Ok(it)
    }

    /// Names of the set flags, comma separated.
    #[must_use]
    pub fn to_list(self) -> String {
        FLAG_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// What to write to the terminal to turn these protocols on. Shared sequences are
    /// written once.
    #[must_use]
    pub fn enable_sequence(self) -> String { self.collect_sequences(|(_, on, _)| on) }

    /// What to write to the terminal to turn these protocols off, in reverse order.
    #[must_use]
    pub fn disable_sequence(self) -> String {
        let mut parts = self.sequence_parts(|(_, _, off)| off);
        parts.reverse();
        parts.concat()
    }

    fn collect_sequences(
        self,
        pick: impl Fn((ProtocolFlags, &'static str, &'static str)) -> &'static str,
    ) -> String {
        self.sequence_parts(pick).concat()
    }

    fn sequence_parts(
        self,
        pick: impl Fn((ProtocolFlags, &'static str, &'static str)) -> &'static str,
    ) -> Vec<&'static str> {
        let mut parts: Vec<&'static str> = vec![];
        for entry in FLAG_SEQUENCES {
            let part = pick(entry);
            if self.contains(entry.0) && !parts.contains(&part) {
                parts.push(part);
            }
        }
        parts
    }
}
