//! Fixed-capacity circular byte buffer with overwrite-on-full semantics.
//!
//! The UART reception side writes every received byte into a [`RingBuffer`];
//! the control cycle drains it once per cycle. When the buffer is full the
//! oldest unread byte is discarded to make room, so the consumer always sees
//! the most recent `N` bytes. For a low-rate command link stale bytes are
//! worthless, and a write never fails.
//!
//! # Layout
//!
//! ```text
//!  tail (next read)        head (next write)
//!    v                       v
//! [ .. | b0 | b1 | b2 | b3 | .. | .. ]
//! ```
//!
//! `head == tail` means either empty or full; the `full` flag disambiguates.
//!
//! # Concurrency
//!
//! The buffer is not synchronized. A producer and a consumer on different
//! execution contexts must wrap it in a critical section; the hardware crate
//! provides `SharedRingBuffer` for that.
//!
//! # Examples
//!
//! ```
//! use doorlock_core::RingBuffer;
//!
//! let mut rb = RingBuffer::<4>::new().unwrap();
//! for byte in b"abcdef" {
//!     rb.write(*byte);
//! }
//!
//! // Only the four most recent bytes survive.
//! assert_eq!(rb.size(), 4);
//! assert_eq!(rb.read(), Some(b'c'));
//! ```

use crate::{Result, constants::MAX_RING_BUFFER_CAPACITY, error::Error};

/// A non-blocking source of bytes.
///
/// Implemented by anything the UART accumulator can drain: the plain
/// [`RingBuffer`] and its shared, lock-protected wrapper.
pub trait ByteSource {
    /// Pop the oldest available byte, or `None` when nothing is pending.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Circular byte store holding at most `N` unread bytes.
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize> {
    /// Backing storage. Never zeroed after construction.
    buffer: [u8; N],

    /// Index of the next write.
    head: usize,

    /// Index of the next read.
    tail: usize,

    /// Set when `head` caught up with `tail` on a write.
    full: bool,
}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty buffer.
    ///
    /// # Errors
    /// Returns `Error::InvalidCapacity` when `N` is 0 or greater than
    /// [`MAX_RING_BUFFER_CAPACITY`].
    pub fn new() -> Result<Self> {
        if N == 0 || N > MAX_RING_BUFFER_CAPACITY {
            return Err(Error::InvalidCapacity {
                capacity: N,
                max: MAX_RING_BUFFER_CAPACITY,
            });
        }

        Ok(Self {
            buffer: [0; N],
            head: 0,
            tail: 0,
            full: false,
        })
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Discard all unread bytes. Stored bytes are left in place.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.full = false;
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        if self.full {
            return N;
        }

        if self.head >= self.tail {
            self.head - self.tail
        } else {
            N - self.tail + self.head
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.full
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }

    /// Store a byte, dropping the oldest unread byte if the buffer is full.
    pub fn write(&mut self, byte: u8) {
        if self.full {
            self.tail = (self.tail + 1) % N;
        }

        self.buffer[self.head] = byte;
        self.head = (self.head + 1) % N;
        self.full = self.head == self.tail;
    }

    /// Store every byte of `bytes` in order, with the same overwrite rule.
    pub fn write_slice(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write(byte);
        }
    }

    /// Pop the oldest unread byte.
    pub fn read(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }

        let byte = self.buffer[self.tail];
        self.tail = (self.tail + 1) % N;
        self.full = false;
        Some(byte)
    }
}

impl<const N: usize> ByteSource for RingBuffer<N> {
    fn read_byte(&mut self) -> Option<u8> {
        self.read()
    }
}
