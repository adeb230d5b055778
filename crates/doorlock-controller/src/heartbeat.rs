//! Liveness indicator: a status LED toggled at a fixed period.

use doorlock_core::constants::HEARTBEAT_PERIOD_MS;
use doorlock_core::{Millis, elapsed_ms};

/// Square-wave generator for the heartbeat LED.
///
/// Starts low with its reference tick at zero, so the first toggle happens
/// once the tick exceeds the period.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    period: Millis,
    last_toggle: Millis,
    level: bool,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self::with_period(HEARTBEAT_PERIOD_MS)
    }

    pub fn with_period(period: Millis) -> Self {
        Self {
            period,
            last_toggle: 0,
            level: false,
        }
    }

    /// Toggle the LED if more than one period has passed since the last
    /// toggle. Returns the new level when it changed.
    pub fn poll(&mut self, now: Millis) -> Option<bool> {
        if elapsed_ms(now, self.last_toggle) <= self.period {
            return None;
        }

        self.last_toggle = now;
        self.level = !self.level;
        Some(self.level)
    }

    pub fn level(&self) -> bool {
        self.level
    }

    pub fn period(&self) -> Millis {
        self.period
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}
