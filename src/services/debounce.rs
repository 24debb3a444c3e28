//! Signal debouncing.
//!
//! Coalesces bursts of change signals into a single downstream fire after
//! a quiet interval. Each signal cancels and reschedules the pending fire;
//! the fire happens once no signal has arrived for the whole interval.
//!
//! The clock is passed in explicitly on the `_at` variants so the
//! behaviour is fully deterministic under test.

use std::time::{Duration, Instant};

/// A cancel-and-reschedule timer primitive.
#[derive(Debug)]
pub struct Debouncer {
    quiet_interval: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet_interval: Duration) -> Self {
        Self {
            quiet_interval,
            deadline: None,
        }
    }

    /// Record a signal now.
    pub fn signal(&mut self) {
        self.signal_at(Instant::now());
    }

    /// Record a signal at `now`: any pending fire is rescheduled to one
    /// quiet interval later.
    pub fn signal_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet_interval);
    }

    /// Poll now. Returns true at most once per burst of signals.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Poll at `now`: fires (returns true and disarms) when the quiet
    /// interval has elapsed since the last signal.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending fire.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a fire is scheduled.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
