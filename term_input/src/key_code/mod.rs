// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The 32-bit key code space shared by every decoder and by the editor above.
//!
//! ```text
//!  31   28 27  26 25 24 23  21 20                      0
//! ┌───────┬───┬──┬──┬──┬─────┬─────────────────────────┐
//! │ RANGE │ - │M │C │S │  -  │          VALUE          │
//! └───────┴───┴──┴──┴──┴─────┴─────────────────────────┘
//! ```
//!
//! - `VALUE` holds a Unicode scalar for the character range, a function key number, a
//!   keypad character, a [`MiscKey`], or a packed mouse button and action.
//! - `S`, `C`, `M` are the [`KeyModifiers`] (shift, control, meta).
//! - `RANGE` is the [`KeyRange`] tag.

// Attach sources.
pub mod key_code_type;
pub mod key_names;
pub mod modifier_rules;
pub mod modifiers;
pub mod named_keys;

// Re-export.
pub use key_code_type::*;
pub use key_names::*;
pub use modifier_rules::*;
pub use modifiers::*;
pub use named_keys::*;
