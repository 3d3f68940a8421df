use std::time::{Duration, Instant};

/// Fixed interval redraw timer for `ControlFlow::WaitUntil`
#[derive(Debug, Clone, Copy)]
pub struct RedrawTimer {
    interval: Duration,
    next: Instant,
}

impl RedrawTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    /// When the event loop should wake up next
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Returns true once the deadline has passed and schedules the next one.
    ///
    /// A late wake-up schedules from `now` instead of queueing the missed ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }
}
