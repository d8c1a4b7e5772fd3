// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
#[cfg(unix)]
pub mod mio_raw_source;
pub mod raw_source_trait;

// Re-export.
#[cfg(unix)]
pub use mio_raw_source::*;
pub use raw_source_trait::*;
