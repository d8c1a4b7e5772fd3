// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::DecodeOutcome;
use crate::KeyCode;

/// C0 controls and `DEL` are always exactly one byte long.
pub fn decode(byte: u8, rest: &[u8]) -> DecodeOutcome {
    if rest.is_empty() {
        DecodeOutcome::key(KeyCode::from_control_byte(byte))
    } else {
        DecodeOutcome::NotMine
    }
}
