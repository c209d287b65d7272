use std::time::Duration;

use tokio::time::Instant;

/// Tracks a periodic action inside a polling loop.
///
/// The loop asks [`Cadence::fire`] once per iteration; the action runs at
/// most once per `period`, measured from the last time it ran, regardless of
/// how long individual iterations take.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    last: Instant,
}

impl Cadence {
    /// The first firing is due one full period from now.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last) >= self.period
    }

    /// Returns whether the action is due, restarting the period if so.
    pub fn fire(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.last = now;
            true
        } else {
            false
        }
    }
}
