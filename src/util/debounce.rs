//! Cancellable delayed-value slot for coalescing rapid edits.
//!
//! Text inputs fire on every keystroke; committing each one to a
//! view-model's pending edits would notify subscribers on every
//! character. `Delayed` holds at most one pending value and a deadline:
//! scheduling a new value cancels the previous one outright (the last
//! value within the window wins, earlier ones are dropped, not merged).

use std::time::{Duration, Instant};

/// A single-slot delayed value with explicit cancellation.
#[derive(Debug)]
pub struct Delayed<T> {
    pending: Option<(T, Instant)>,
}

impl<T> Delayed<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule `value` to become due after `delay`. Any previously
    /// scheduled value is discarded.
    pub fn schedule(&mut self, value: T, now: Instant, delay: Duration) {
        self.pending = Some((value, now + delay));
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Take the pending value if its deadline has passed.
    ///
    /// Returns `None` (and keeps the slot pending) when the deadline is
    /// still in the future.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(_, fire_at)| *fire_at <= now);
        if due {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Take the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Delayed<T> {
    fn default() -> Self {
        Self::new()
    }
}
