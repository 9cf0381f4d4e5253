//! Per-carousel auto-advance timer.
//!
//! Time is virtual: the session hands each timer the elapsed duration and the
//! timer reports how many periods completed. Each carousel owns at most one
//! timer; dropping it is how auto-advance stops.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoAdvance {
    period: Duration,
    until_next: Duration,
}

impl AutoAdvance {
    /// A fresh timer whose first tick is one full period away.
    ///
    /// A zero period is raised to one millisecond so `elapse` terminates.
    pub fn start(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            until_next: period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn until_next(&self) -> Duration {
        self.until_next
    }

    /// Let `dt` pass. Returns the number of ticks that fired.
    pub fn elapse(&mut self, dt: Duration) -> u32 {
        if dt < self.until_next {
            self.until_next -= dt;
            return 0;
        }
        let remaining = dt - self.until_next;
        let extra = remaining.as_nanos() / self.period.as_nanos();
        let leftover = remaining.as_nanos() % self.period.as_nanos();
        // leftover < period, which fits in u64 nanoseconds for any sane period
        self.until_next = self.period - Duration::from_nanos(leftover as u64);
        u32::try_from(extra + 1).unwrap_or(u32::MAX)
    }
}
