//! Mock digital output for testing and development.
//!
//! This module provides an in-memory output pin that records every write so
//! tests can inspect the level and the full write history, and can inject
//! write failures.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{HardwareError, Result, traits::DigitalOutput};

#[derive(Debug, Default)]
struct PinState {
    level: bool,
    writes: Vec<bool>,
    fail_next: Option<String>,
}

/// Mock output pin.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockOutput;
/// use doorlock_hardware::traits::DigitalOutput;
///
/// let (mut pin, handle) = MockOutput::new("DOOR_STATUS");
/// pin.write(true).unwrap();
///
/// assert!(handle.level());
/// assert_eq!(handle.writes(), vec![true]);
/// ```
#[derive(Debug)]
pub struct MockOutput {
    name: String,
    state: Arc<Mutex<PinState>>,
}

impl MockOutput {
    /// Create a mock pin, initially low, and a handle to observe it.
    pub fn new(name: impl Into<String>) -> (Self, MockOutputHandle) {
        let name = name.into();
        let state = Arc::new(Mutex::new(PinState::default()));

        let pin = Self {
            name: name.clone(),
            state: Arc::clone(&state),
        };
        let handle = MockOutputHandle { name, state };

        (pin, handle)
    }
}

impl DigitalOutput for MockOutput {
    fn write(&mut self, active: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(message) = state.fail_next.take() {
            return Err(HardwareError::output_failed(self.name.clone(), message));
        }

        state.level = active;
        state.writes.push(active);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Handle for observing and controlling a mock output pin.
///
/// It can be cloned and kept by tests after the pin itself has been moved
/// into the controller.
#[derive(Debug, Clone)]
pub struct MockOutputHandle {
    name: String,
    state: Arc<Mutex<PinState>>,
}

impl MockOutputHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, PinState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current pin level.
    pub fn level(&self) -> bool {
        self.lock().level
    }

    /// Every successful write, oldest first.
    pub fn writes(&self) -> Vec<bool> {
        self.lock().writes.clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    /// Number of level changes across the write history, starting from low.
    pub fn toggle_count(&self) -> usize {
        let state = self.lock();
        let mut previous = false;
        let mut toggles = 0;
        for &level in &state.writes {
            if level != previous {
                toggles += 1;
            }
            previous = level;
        }
        toggles
    }

    /// Make the next write fail with `message`.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    /// Get the pin name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
