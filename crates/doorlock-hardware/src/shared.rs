//! Ring buffer shared between the UART reception side and the control cycle.
//!
//! [`RingBuffer`] updates `head`, `tail` and `full` as separate fields, so a
//! producer and a consumer running concurrently could observe a torn update.
//! [`SharedRingBuffer`] runs every access inside one lock acquisition, the
//! host counterpart of masking the receive interrupt around a buffer access.
//!
//! ```text
//! ┌──────────────┐  write_slice   ┌──────────────────┐  read_byte   ┌───────────────┐
//! │ UART receive │───────────────►│ SharedRingBuffer │─────────────►│ control cycle │
//! │ (producer)   │                │  Mutex<RingBuf>  │              │ (consumer)    │
//! └──────────────┘                └──────────────────┘              └───────────────┘
//! ```
//!
//! # Examples
//!
//! ```
//! use doorlock_core::CommandAccumulator;
//! use doorlock_hardware::SharedRingBuffer;
//!
//! let rx = SharedRingBuffer::<64>::new().unwrap();
//! let producer = rx.clone();
//! producer.write_slice(b"1234\r");
//!
//! let mut consumer = rx;
//! let commands = CommandAccumulator::uart().process(&mut consumer);
//! assert_eq!(commands.len(), 1);
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use doorlock_core::{ByteSource, RingBuffer};

use crate::error::Result;

/// Cloneable, lock-protected handle to a [`RingBuffer`].
///
/// All clones refer to the same buffer. Each method holds the lock only for
/// its own duration.
#[derive(Debug, Clone)]
pub struct SharedRingBuffer<const N: usize> {
    inner: Arc<Mutex<RingBuffer<N>>>,
}

impl<const N: usize> SharedRingBuffer<N> {
    /// Create an empty shared buffer.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Core` if `N` is not a valid ring buffer capacity.
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(RingBuffer::new()?)),
        })
    }

    /// Run `f` inside the critical section.
    ///
    /// A panic in another holder cannot leave the buffer half-updated (every
    /// operation is a handful of field stores), so a poisoned lock is entered
    /// anyway instead of propagating the panic.
    pub fn with<R>(&self, f: impl FnOnce(&mut RingBuffer<N>) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    pub fn write(&self, byte: u8) {
        self.with(|rb| rb.write(byte));
    }

    /// Write all of `bytes`, returning how many unread bytes were overwritten.
    pub fn write_slice(&self, bytes: &[u8]) -> usize {
        self.with(|rb| {
            let dropped = (rb.size() + bytes.len()).saturating_sub(N);
            rb.write_slice(bytes);
            dropped
        })
    }

    pub fn read(&self) -> Option<u8> {
        self.with(RingBuffer::read)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.with(|rb| rb.size())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with(|rb| rb.is_empty())
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.with(|rb| rb.is_full())
    }

    pub fn reset(&self) {
        self.with(RingBuffer::reset);
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> ByteSource for SharedRingBuffer<N> {
    fn read_byte(&mut self) -> Option<u8> {
        self.read()
    }
}
