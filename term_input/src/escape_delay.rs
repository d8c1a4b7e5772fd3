// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words ESCDELAY

//! How long a partial escape sequence may wait for its next byte, and where that value
//! came from.
//!
//! Priority, highest first:
//! 1. A value set at runtime with [`EscapeDelay::set_explicit`].
//! 2. A value given on the command line at startup.
//! 3. The `ESCDELAY` environment variable, read lazily on first use.
//! 4. [`DEFAULT_ESCAPE_DELAY_MS`].

use std::cell::OnceCell;

use strum_macros::Display;

use crate::EngineError;

pub const DEFAULT_ESCAPE_DELAY_MS: u16 = 750;
pub const MAX_ESCAPE_DELAY_MS: u16 = 9_999;
pub const ESCAPE_DELAY_ENV_VAR: &str = "ESCDELAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EscapeDelaySource {
    Default,
    Environment,
    CommandLine,
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Override {
    None,
    CommandLine(u16),
    Explicit(u16),
}

#[derive(Debug, Clone)]
pub struct EscapeDelay {
    over: Override,
    from_env: OnceCell<Option<u16>>,
}

impl Default for EscapeDelay {
    fn default() -> Self {
        Self {
            over: Override::None,
            from_env: OnceCell::new(),
        }
    }
}

impl EscapeDelay {
    /// # Errors
    ///
    /// [`EngineError::EscapeDelayOutOfRange`] for values above
    /// [`MAX_ESCAPE_DELAY_MS`].
    pub fn from_command_line(ms: u32) -> Result<Self, EngineError> {
        Ok(Self {
            over: Override::CommandLine(validate(ms)?),
            ..Default::default()
        })
    }

    /// Replaces the delay, returning the previous effective value.
    ///
    /// # Errors
    ///
    /// [`EngineError::EscapeDelayOutOfRange`], in which case nothing changes.
    pub fn set_explicit(&mut self, ms: u32) -> Result<u16, EngineError> {
        let ms = validate(ms)?;
        let (previous, _) = self.current();
        self.over = Override::Explicit(ms);
        Ok(previous)
    }

    /// The effective delay and where it came from.
    #[must_use]
    pub fn current(&self) -> (u16, EscapeDelaySource) {
        match self.over {
            Override::Explicit(ms) => (ms, EscapeDelaySource::Explicit),
            Override::CommandLine(ms) => (ms, EscapeDelaySource::CommandLine),
            Override::None => match self.from_env.get_or_init(read_env_var) {
                Some(ms) => (*ms, EscapeDelaySource::Environment),
                None => (DEFAULT_ESCAPE_DELAY_MS, EscapeDelaySource::Default),
            },
        }
    }

    #[must_use]
    pub fn ms(&self) -> u16 { self.current().0 }
}

fn validate(ms: u32) -> Result<u16, EngineError> {
    u16::try_from(ms)
        .ok()
        .filter(|ms| *ms <= MAX_ESCAPE_DELAY_MS)
        .ok_or(EngineError::EscapeDelayOutOfRange(ms))
}

fn read_env_var() -> Option<u16> {
    let value = std::env::var(ESCAPE_DELAY_ENV_VAR).ok()?;
    let it = parse_env_value(&value);
    if it.is_none() {
        tracing::warn!(
            message = "Ignoring invalid escape delay from the environment",
            env_var = ESCAPE_DELAY_ENV_VAR,
            value = ?value
        );
    }
    it
}

/// Decimal milliseconds in `0..=9999`, surrounding whitespace allowed.
#[must_use]
pub fn parse_env_value(value: &str) -> Option<u16> {
    let ms = value.trim().parse::<u32>().ok()?;
    validate(ms).ok()
}
