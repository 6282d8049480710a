use std::time::{Duration, Instant};

/// A cancellable one-shot timer carrying a value.
///
/// `schedule` cancels whatever is pending and restarts the delay; the value
/// is released by `fire` once the deadline has passed. Time is always passed
/// in by the caller, so the event loop drives it with `Instant::now()` and
/// tests drive it with synthetic instants.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the timer from `now`.
    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    /// Drop the pending value, if any, and return it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Release the pending value when its deadline is at or before `now`.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if *at <= now => self.cancel(),
            _ => None,
        }
    }
}
