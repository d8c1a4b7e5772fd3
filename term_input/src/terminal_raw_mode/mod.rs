// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Unix terminal setup for the real tty backend: locating the controlling terminal, and
//! an RAII guard that puts it in raw mode and turns input protocols on, restoring both
//! on drop.

// Attach sources.
pub mod raw_mode_guard;
pub mod terminal_fd;

// Re-export.
pub use raw_mode_guard::*;
pub use terminal_fd::*;
