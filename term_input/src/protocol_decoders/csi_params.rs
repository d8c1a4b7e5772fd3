// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Splits the body of a control sequence (everything after `ESC [` or `0x9B`) into an
//! optional private marker, numeric parameters with `:` sub parameters, intermediate
//! bytes, and the final byte.
//!
//! ```text
//!   <  0 ; 10 : 3 ; 5   $     M
//!   │  └──────┬──────┘  │     │
//!   │     parameters    │   final (0x40..=0x7E)
//! private         intermediates (0x20..=0x2F)
//! marker (0x3C..=0x3F)
//! ```

use std::fmt;

use smallvec::SmallVec;

use crate::{ASCII_ESC, SEQUENCE_BUFFER_CAPACITY};

/// One `;` separated parameter. `value` is `None` when the field was empty (which the
/// protocols treat as their default).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsiParam {
    pub value: Option<u32>,
    pub sub: SmallVec<[Option<u32>; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsiSequence {
    pub private_marker: Option<u8>,
    pub params: SmallVec<[CsiParam; 8]>,
    pub intermediates: SmallVec<[u8; 2]>,
    pub final_byte: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsiParse {
    Complete(CsiSequence),
    /// Valid so far, no final byte yet.
    Incomplete,
    Invalid,
}

impl CsiSequence {
    /// The value of parameter `index`, `None` when missing or empty.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<u32> {
        self.params.get(index).and_then(|it| it.value)
    }

    #[must_use]
    pub fn param_or(&self, index: usize, default: u32) -> u32 {
        self.param(index).unwrap_or(default)
    }

    /// First sub parameter of parameter `index` (eg: the kitty event type in
    /// `CSI 97 ; 5:3 u`).
    #[must_use]
    pub fn sub_param(&self, index: usize) -> Option<u32> {
        self.params
            .get(index)
            .and_then(|it| it.sub.first().copied().flatten())
    }

    #[must_use]
    pub fn has_no_params(&self) -> bool {
        self.params.iter().all(|it| it.value.is_none() && it.sub.is_empty())
    }
}

/// Canonical `ESC [ ...` form. Re-parsing it gives back an equal [`CsiSequence`].
impl fmt::Display for CsiSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", char::from(ASCII_ESC))?;
        if let Some(marker) = self.private_marker {
            write!(f, "{}", char::from(marker))?;
        }
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(";")?;
            }
            if let Some(value) = param.value {
                write!(f, "{value}")?;
            }
            for sub in &param.sub {
                f.write_str(":")?;
                if let Some(value) = sub {
                    write!(f, "{value}")?;
                }
            }
        }
        for byte in &self.intermediates {
            write!(f, "{}", char::from(*byte))?;
        }
        write!(f, "{}", char::from(self.final_byte))
    }
}

/// Parameter values above this are rejected instead of overflowing.
const MAX_PARAM_VALUE: u32 = 0x10_FFFF * 16;

/// Parses `body`, the bytes after the CSI introducer. The final byte must be the last
/// byte of `body`.
#[must_use]
pub fn parse_csi(body: &[u8]) -> CsiParse {
    if body.len() >= SEQUENCE_BUFFER_CAPACITY {
        return CsiParse::Invalid;
    }

    let mut seq = CsiSequence::default();
    let mut rest = body;

    if let [marker @ 0x3C..=0x3F, tail @ ..] = rest {
        seq.private_marker = Some(*marker);
        rest = tail;
    }

    let mut current = CsiParam::default();
    let mut in_sub = false;
    let mut saw_param_bytes = false;

    for (index, byte) in rest.iter().enumerate() {
        match *byte {
            b'0'..=b'9' if seq.intermediates.is_empty() => {
                saw_param_bytes = true;
                let digit = u32::from(byte - b'0');
                let slot = if in_sub {
                    match current.sub.last_mut() {
                        Some(slot) => slot,
                        None => return CsiParse::Invalid,
                    }
                } else {
                    &mut current.value
                };
                let next = slot.unwrap_or(0) * 10 + digit;
                if next > MAX_PARAM_VALUE {
                    return CsiParse::Invalid;
                }
                *slot = Some(next);
            }
            b':' if seq.intermediates.is_empty() => {
                saw_param_bytes = true;
                in_sub = true;
                current.sub.push(None);
            }
            b';' if seq.intermediates.is_empty() => {
                saw_param_bytes = true;
                seq.params.push(std::mem::take(&mut current));
                in_sub = false;
            }
            0x20..=0x2F => seq.intermediates.push(*byte),
            0x40..=0x7E => {
                if index + 1 != rest.len() {
                    return CsiParse::Invalid;
                }
                if saw_param_bytes {
                    seq.params.push(current);
                }
                seq.final_byte = *byte;
                return CsiParse::Complete(seq);
            }
            _ => return CsiParse::Invalid,
        }
    }

    CsiParse::Incomplete
}
