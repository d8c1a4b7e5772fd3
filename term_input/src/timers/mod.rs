// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod clock;
pub mod timer_set;

// Re-export.
pub use clock::*;
pub use timer_set::*;
