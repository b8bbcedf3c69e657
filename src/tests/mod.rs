use std::cell::Cell;
use std::time::Duration;

use crate::clock::ClockExt;

mod limiter;
mod request;

/// Manually driven clock so no test performs a real sleep
pub struct FakeClock {
    now: Cell<f64>,
    sleeps: Cell<u32>
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0.0),
            sleeps: Cell::new(0)
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration.as_secs_f64());
    }

    pub fn sleeps(&self) -> u32 {
        self.sleeps.get()
    }
}

impl ClockExt for FakeClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);

        self.advance(duration);
    }
}
