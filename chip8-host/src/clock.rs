use std::time::{Duration, Instant};

/// Fixed-interval frame deadline tracker
///
/// Deadlines advance by exactly one interval per frame, so small scheduling
/// jitter does not accumulate.  If the caller falls more than a full frame
/// behind, the schedule restarts from the current time instead of trying to
/// catch up.
#[derive(Copy, Clone, Debug)]
pub struct FrameClock {
    interval: Duration,
    next: Instant,
}

impl FrameClock {
    /// Builds a clock whose first deadline is one interval from now
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    /// Builds a clock whose first deadline is one interval after `start`
    pub fn starting_at(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            next: start + interval,
        }
    }

    /// Returns the next frame boundary
    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    /// Time left until the next frame boundary, or zero if it has passed
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Checks whether a frame is due, advancing the deadline if so
    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }

    /// Sleeps until the next frame boundary, then advances the deadline
    pub fn wait(&mut self) {
        let now = Instant::now();
        let dt = self.remaining(now);
        if !dt.is_zero() {
            std::thread::sleep(dt);
        }
        self.due(Instant::now().max(self.next));
    }
}
