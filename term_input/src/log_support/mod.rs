// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Structured logging via [`tracing`]. The engine only emits events, a binary picks
//! where they go by building a [`TracingConfig`] and installing it.
//!
//! Since the terminal is in raw mode while the engine runs, logging to the display is
//! rarely useful. The usual setup is [`WriterConfig::File`].

// Attach sources.
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use tracing_config::*;
pub use tracing_init::*;
