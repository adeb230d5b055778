//! Host implementation of the millisecond tick.

use std::time::Instant;

use doorlock_core::Millis;

use crate::traits::Clock;

/// Tick counter backed by [`Instant`], starting at zero on construction.
///
/// Like a hardware tick counter it wraps around after `u32::MAX` milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        // Truncation is the wraparound.
        self.started.elapsed().as_millis() as Millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(second >= first);
        assert!(first < 1000);
    }
}
