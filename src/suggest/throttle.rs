//! Throttle gate for suggestion requests
//!
//! Enforces a minimum interval between accepted `generate` calls, whatever
//! their outcome. Rejected calls leave the timestamp alone, so they never
//! push back the next eligible moment.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Throttler {
    interval: Duration,
    /// Start of the last call that passed the gate
    last_allowed: Option<Instant>,
}

impl Throttler {
    /// Creates a throttler with the given minimum interval in milliseconds
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            last_allowed: None,
        }
    }

    /// Check the gate now, recording the call if it passes
    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    /// Check the gate as of `now`
    ///
    /// The first call always passes. Later calls pass once at least
    /// `interval` has elapsed since the previous accepted call.
    pub fn allow_at(&mut self, now: Instant) -> bool {
        let allowed = match self.last_allowed {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };

        if allowed {
            self.last_allowed = Some(now);
        }
        allowed
    }

    /// Time left until the gate opens again, zero if already open
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.last_allowed {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }
}

impl Default for Throttler {
    fn default() -> Self {
        Self::new(2000)
    }
}
