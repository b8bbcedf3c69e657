use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Time source used by the rate limiter and the cache
///
/// Everything in this crate that inspects the current time or sleeps
/// goes through this trait, so tests can substitute a fake clock
/// and never perform a real sleep
pub trait ClockExt {
    /// Current UNIX time, in seconds
    fn now(&self) -> f64;

    /// Block the calling thread for the given duration
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockExt for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
