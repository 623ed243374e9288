//! Repeating timer polled from the frame loop.

use web_time::{Duration, Instant};

/// Fires at most once per poll when at least one period has elapsed.
///
/// Missed periods are coalesced: a long frame produces one firing, not a
/// burst, which suits idempotent work such as re-pinning scroll.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    next: Instant,
    period: Duration,
}

impl Interval {
    /// Interval whose first firing is one `period` after `now`.
    #[must_use]
    pub fn starting(now: Instant, period: Duration) -> Self {
        Self {
            next: now + period,
            period,
        }
    }

    /// Whether the interval fires at `now`. Advances the schedule past
    /// `now` when it does.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        if self.period.is_zero() {
            self.next = now;
            return true;
        }
        while self.next <= now {
            self.next += self.period;
        }
        true
    }
}
