use std::time::{Duration, Instant};

/// Time source for the poll cadence, swappable so tests can run on virtual time.
pub trait Clock {
    fn now(&self) -> Instant;

    /// Block for `d`. Virtual clocks may just move their time forward.
    fn sleep(&self, d: Duration);

    /// Whole milliseconds since `since`; zero if `since` is in the future.
    fn elapsed_ms(&self, since: Instant) -> u64 {
        let ms = self.now().saturating_duration_since(since).as_millis();
        u64::try_from(ms).unwrap_or(u64::MAX)
    }
}

/// Wall-clock time from `Instant::now` and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}
