//! Hardware collaborators of the door lock controller.
//!
//! The controller core consumes two capabilities, writing a digital output and
//! reading a monotonic millisecond tick, and receives UART bytes through a
//! ring buffer filled by the reception side. This crate defines those seams
//! and the pieces that sit on them:
//!
//! - [`traits`]: [`DigitalOutput`] and [`Clock`].
//! - [`shared`]: [`SharedRingBuffer`], the lock-protected ring buffer handed
//!   between UART reception and the control cycle.
//! - [`uart`]: [`UartReceiver`], the async producer filling that buffer from
//!   any byte stream.
//! - [`clock`]: [`SystemClock`], the host tick source.
//! - [`mock`]: in-memory pins and a manual clock for tests.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`][error::Result] with the
//! [`HardwareError`] error type.
//!
//! # Examples
//!
//! ```
//! use doorlock_hardware::mock::{MockClock, MockOutput};
//! use doorlock_hardware::traits::{Clock, DigitalOutput};
//!
//! let clock = MockClock::new();
//! let (mut actuator, handle) = MockOutput::new("DOOR_STATUS");
//!
//! clock.advance(10);
//! actuator.write(clock.now_ms() > 5).unwrap();
//! assert!(handle.level());
//! ```

pub mod clock;
pub mod error;
pub mod mock;
pub mod shared;
pub mod traits;
pub mod uart;

// Re-export commonly used types for convenience
pub use clock::SystemClock;
pub use error::{HardwareError, Result};
pub use shared::SharedRingBuffer;
pub use traits::{Clock, DigitalOutput};
pub use uart::UartReceiver;
