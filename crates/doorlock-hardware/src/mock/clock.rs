//! Mock tick source with manually controlled time.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use doorlock_core::Millis;

use crate::traits::Clock;

/// Clock whose time only moves when told to. Clones share the same time.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockClock;
/// use doorlock_hardware::traits::Clock;
///
/// let clock = MockClock::new();
/// clock.advance(5001);
/// assert_eq!(clock.now_ms(), 5001);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Arc<AtomicU32>,
}

impl MockClock {
    /// Create a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock reading `start`.
    pub fn starting_at(start: Millis) -> Self {
        Self {
            now: Arc::new(AtomicU32::new(start)),
        }
    }

    /// Move time forward by `ms`, wrapping like a hardware tick counter.
    pub fn advance(&self, ms: Millis) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, now: Millis) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_advance_and_set() {
        let clock = MockClock::new();
        assert_eq!(clock.now_ms(), 0);

        clock.advance(250);
        assert_eq!(clock.now_ms(), 250);

        clock.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn test_mock_clock_clones_share_time() {
        let clock = MockClock::starting_at(100);
        let other = clock.clone();
        other.advance(50);
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn test_mock_clock_wraps() {
        let clock = MockClock::starting_at(u32::MAX - 1);
        clock.advance(3);
        assert_eq!(clock.now_ms(), 1);
    }
}
