//! Tick-driven debounce for candidate fault conditions.
//!
//! A [`DebounceTimer`] confirms a condition only after it has been observed
//! continuously for a fixed window. It holds no clock of its own: the caller
//! passes the current monotonic time on every update, which keeps the logic
//! deterministic and testable without hardware timers.
//!
//! ```text
//! ┌──────────┐  condition true   ┌──────────────┐  elapsed >= window  ┌─────────┐
//! │   Idle   │ ────────────────► │ Armed(since) │ ──────────────────► │  Fired  │
//! └──────────┘                   └──────┬───────┘                     └────┬────┘
//!      ▲                                │ condition false                  │
//!      └────────────────────────────────┴──────────────────────────────────┘
//! ```

use core::time::Duration;

/// Internal state of a [`DebounceTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceState {
    /// Condition not currently observed.
    #[default]
    Idle,
    /// Condition observed continuously since `since`.
    Armed {
        /// Time of the first observation in the current run.
        since: Duration,
    },
}

/// Debounce window for a single fault condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTimer {
    window: Duration,
    state: DebounceState,
}

impl DebounceTimer {
    /// Create an idle timer with the given confirmation window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Idle,
        }
    }

    /// Confirmation window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// True while the condition is being timed or has been confirmed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self.state, DebounceState::Armed { .. })
    }

    /// True once the condition has held for the full window as of `now`.
    #[must_use]
    pub fn has_fired(&self, now: Duration) -> bool {
        match self.state {
            DebounceState::Idle => false,
            DebounceState::Armed { since } => now.saturating_sub(since) >= self.window,
        }
    }

    /// Feed one observation of the condition and report whether it is confirmed.
    ///
    /// The first true observation arms the timer. A false observation returns
    /// it to idle immediately, ready for the next occurrence.
    pub fn update(&mut self, condition: bool, now: Duration) -> bool {
        if !condition {
            self.state = DebounceState::Idle;
            return false;
        }
        if self.state == DebounceState::Idle {
            self.state = DebounceState::Armed { since: now };
        }
        self.has_fired(now)
    }

    /// Return to idle without waiting for the condition to clear.
    pub fn reset(&mut self) {
        self.state = DebounceState::Idle;
    }
}
