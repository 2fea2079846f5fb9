use std::time::Duration;

/// Delay schedule for the poll driver.
///
/// Successes poll at the base interval. After `k` consecutive failures the
/// delay is `base * 2^k`, capped at `max`. Callers keep `max >= base`.
#[derive(Debug, Clone)]
pub struct Backoff {
    base:                 Duration,
    max:                  Duration,
    current:              Duration,
    consecutive_failures: u32,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            current: base,
            consecutive_failures: 0,
        }
    }

    /// Record a failed poll and return the delay before the next attempt.
    pub fn mark_failure(&mut self) -> Duration {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let factor = 2u32.saturating_pow(self.consecutive_failures);
        self.current = self.base.saturating_mul(factor).min(self.max);
        self.current
    }

    /// Record a successful poll; the schedule returns to the base interval.
    pub fn mark_success(&mut self) -> Duration {
        self.consecutive_failures = 0;
        self.current = self.base;
        self.current
    }

    /// Delay before the next scheduled poll.
    pub fn current_delay(&self) -> Duration {
        self.current
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
