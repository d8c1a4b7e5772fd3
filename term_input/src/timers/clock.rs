// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{cell::Cell, fmt::Debug, rc::Rc, time::Instant};

use chrono::Timelike;

pub const MS_PER_MINUTE: u64 = 60_000;

/// Millisecond clock that drives the [`crate::TimerSet`]. Only differences between
/// samples matter, the origin is arbitrary.
pub trait MonotonicClock: Debug {
    fn now_ms(&self) -> u64;

    /// How long until the wall clock reaches the next whole minute. Used to align the
    /// minute timer so a clock in the mode line ticks over on time. Always in
    /// `1..=60_000`.
    fn ms_until_next_minute(&self) -> u64;
}

/// The real clock. Monotonic time from [`Instant`], minute alignment from the local
/// wall clock via [`chrono`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn ms_until_next_minute(&self) -> u64 {
        let now = chrono::Local::now();
        let into_minute = u64::from(now.second()) * 1_000
            + u64::from(now.nanosecond() / 1_000_000).min(999);
        MS_PER_MINUTE - into_minute.min(MS_PER_MINUTE - 1)
    }
}

/// A clock that only moves when told to. Clones share the same time, so a test can
/// hand one clone to the engine and another to a scripted source.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, delta_ms: u64) { self.now.set(self.now.get() + delta_ms); }

    /// Time never goes backwards, earlier values are ignored.
    pub fn set(&self, now_ms: u64) { self.now.set(self.now.get().max(now_ms)); }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> u64 { self.now.get() }

    /// The manual clock's origin is taken to be a whole minute.
    fn ms_until_next_minute(&self) -> u64 { MS_PER_MINUTE - (self.now.get() % MS_PER_MINUTE) }
}
