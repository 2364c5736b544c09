//! Session timer
//!
//! Countdown state machine for timed mindfulness sessions. The core holds
//! no clock; the host drives it by calling [`SessionTimer::tick`] once per
//! elapsed second, so the timer behaves identically under a real clock and
//! under tests.

use std::time::Duration;

/// Lifecycle of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No session selected.
    Idle,
    /// Counting down.
    Running,
    /// Suspended with time remaining.
    Paused,
    /// Reached zero.
    Completed,
}

/// A whole-second countdown timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTimer {
    state: TimerState,
    total_secs: u64,
    remaining_secs: u64,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            total_secs: 0,
            remaining_secs: 0,
        }
    }

    /// Begins a countdown over `duration`, replacing any previous session.
    ///
    /// Sub-second precision is truncated; a zero duration completes
    /// immediately.
    pub fn start(&mut self, duration: Duration) {
        self.total_secs = duration.as_secs();
        self.remaining_secs = self.total_secs;
        self.state = if self.remaining_secs == 0 {
            TimerState::Completed
        } else {
            TimerState::Running
        };
    }

    /// Advances the countdown by one second.
    ///
    /// Only a running timer moves; ticks while idle, paused, or completed
    /// are ignored. Returns the state after the tick.
    pub fn tick(&mut self) -> TimerState {
        if self.state == TimerState::Running {
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                self.state = TimerState::Completed;
            }
        }
        self.state
    }

    /// Suspends a running countdown; no-op otherwise.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Resumes a paused countdown; no-op otherwise.
    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running;
        }
    }

    /// Abandons the session and returns to idle.
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
        self.total_secs = 0;
        self.remaining_secs = 0;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> Duration {
        Duration::from_secs(self.remaining_secs)
    }

    /// Fraction of the session elapsed, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            0.0
        } else {
            (self.total_secs - self.remaining_secs) as f64 / self.total_secs as f64
        }
    }

    /// Remaining time as `M:SS` display text.
    pub fn display(&self) -> String {
        format_mmss(self.remaining_secs)
    }
}

/// Formats whole seconds as `M:SS` (minutes unpadded, seconds zero-padded).
pub fn format_mmss(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
