use super::Clock;
use std::time::{Duration, Instant};

/// Wall-clock implementation of [`Clock`] over a process-local epoch.
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_us(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }

    fn hold(&mut self, us: u64) {
        std::thread::sleep(Duration::from_micros(us));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }

    #[test]
    fn test_hold_advances_time() {
        let mut clock = SystemClock::new();
        let before = clock.now_us();
        clock.hold(2_000);
        assert!(clock.now_us() - before >= 2_000);
    }
}
