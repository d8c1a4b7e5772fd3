// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A fixed set of named deadlines, all measured against one clock sample per engine
//! iteration.
//!
//! Every query ([`TimerSet::is_expired`], [`TimerSet::remaining_ms`]) compares against
//! the time captured by the last [`TimerSet::sample`], not the live clock. This keeps
//! all the decisions made in one pass of the event loop consistent with each other.

use strum::EnumCount as _;
use strum_macros::{Display, EnumCount, EnumIter};

/// The timers the engine multiplexes with terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
pub enum TimerId {
    /// Fires after a period with no input, eg: to autosave.
    Idle,
    /// Bounded screen update timer.
    Update,
    /// Aligned to the wall clock minute.
    Minute,
    /// The deadline the caller of [`crate::InputEngine::next_event`] passed in.
    CallerTimeout,
    /// Bounds how long a partial escape sequence may wait for more bytes.
    Escape,
    /// Periodic poll of child process descriptors.
    ChildPoll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TimerState {
    #[default]
    Inactive,
    Armed {
        deadline_ms: u64,
    },
}

#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    timers: [TimerState; TimerId::COUNT],
    now_ms: u64,
}

impl TimerSet {
    #[must_use]
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms,
            ..Default::default()
        }
    }

    /// Captures the clock. Samples never move backwards.
    pub fn sample(&mut self, now_ms: u64) { self.now_ms = self.now_ms.max(now_ms); }

    #[must_use]
    pub fn now_ms(&self) -> u64 { self.now_ms }

    /// Arms `id` to fire `relative_ms` after the last sample, replacing any previous
    /// deadline.
    pub fn start(&mut self, id: TimerId, relative_ms: u64) {
        self.start_absolute(id, self.now_ms.saturating_add(relative_ms));
    }

    pub fn start_absolute(&mut self, id: TimerId, deadline_ms: u64) {
        self.timers[id as usize] = TimerState::Armed { deadline_ms };
    }

    pub fn stop(&mut self, id: TimerId) { self.timers[id as usize] = TimerState::Inactive; }

    #[must_use]
    pub fn is_active(&self, id: TimerId) -> bool {
        matches!(self.timers[id as usize], TimerState::Armed { .. })
    }

    #[must_use]
    pub fn is_expired(&self, id: TimerId) -> bool {
        match self.timers[id as usize] {
            TimerState::Armed { deadline_ms } => deadline_ms <= self.now_ms,
            TimerState::Inactive => false,
        }
    }

    /// `-1` when inactive, `0` when expired, otherwise the milliseconds left.
    #[must_use]
    pub fn remaining_ms(&self, id: TimerId) -> i64 {
        match self.timers[id as usize] {
            TimerState::Armed { deadline_ms } => {
                i64::try_from(deadline_ms.saturating_sub(self.now_ms)).unwrap_or(i64::MAX)
            }
            TimerState::Inactive => -1,
        }
    }

    /// The smallest remaining time among the active timers in `ids`, or `None` when
    /// none of them is armed (ie: wait forever).
    #[must_use]
    pub fn earliest_remaining_ms(&self, ids: impl IntoIterator<Item = TimerId>) -> Option<u64> {
        ids.into_iter()
            .filter_map(|id| u64::try_from(self.remaining_ms(id)).ok())
            .min()
    }
}
