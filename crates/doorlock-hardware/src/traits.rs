//! Collaborator trait definitions.
//!
//! The lock controller never touches pins or timers directly. It consumes two
//! capabilities: writing a digital output and reading a monotonic millisecond
//! clock. Board support code implements these traits; the [`mock`](crate::mock)
//! module provides in-memory versions for tests and the host binary.
//!
//! Unlike peripheral I/O these calls are synchronous: the control cycle is a
//! non-blocking polling loop and a pin write or a tick read never waits.

use doorlock_core::Millis;

use crate::error::Result;

/// A single digital output pin (lock actuator, status LED).
///
/// # Examples
///
/// ```
/// use doorlock_hardware::traits::DigitalOutput;
/// use doorlock_hardware::Result;
///
/// fn engage<O: DigitalOutput>(pin: &mut O) -> Result<()> {
///     pin.write(false)
/// }
/// ```
pub trait DigitalOutput: Send {
    /// Drive the pin high (`true`) or low (`false`).
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be driven.
    fn write(&mut self, active: bool) -> Result<()>;

    /// Human-readable pin name, used in log lines.
    fn name(&self) -> &str;
}

/// Monotonic millisecond tick source.
///
/// The value wraps around at `u32::MAX`; consumers compare ticks with
/// [`doorlock_core::elapsed_ms`].
pub trait Clock: Send + Sync {
    /// Current tick in milliseconds.
    fn now_ms(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

impl<O: DigitalOutput + ?Sized> DigitalOutput for Box<O> {
    fn write(&mut self, active: bool) -> Result<()> {
        (**self).write(active)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
