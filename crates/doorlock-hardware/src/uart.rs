//! UART reception: moves bytes from a serial stream into the shared ring buffer.
//!
//! This is the producer half of the UART path. It plays the role of the
//! receive interrupt: every byte that arrives is written into the
//! [`SharedRingBuffer`] and nothing else. Interpreting the bytes is left to
//! the control cycle.
//!
//! Any [`AsyncRead`] works as the stream: a serial device, stdin, a TCP
//! socket, or an in-memory duplex in tests.

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::shared::SharedRingBuffer;

/// Size of the intermediate read chunk.
const READ_CHUNK_SIZE: usize = 64;

/// Producer side of the UART ring buffer.
#[derive(Debug, Clone)]
pub struct UartReceiver<const N: usize> {
    buffer: SharedRingBuffer<N>,
}

impl<const N: usize> UartReceiver<N> {
    pub fn new(buffer: SharedRingBuffer<N>) -> Self {
        Self { buffer }
    }

    /// The ring buffer this receiver writes into.
    pub fn buffer(&self) -> &SharedRingBuffer<N> {
        &self.buffer
    }

    /// Copy bytes from `reader` into the ring buffer until end of stream.
    ///
    /// Returns the number of bytes received. When the consumer falls behind,
    /// the oldest unread bytes are overwritten; that is logged but not an error.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Io` if reading from the stream fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_hardware::{SharedRingBuffer, UartReceiver};
    ///
    /// #[tokio::main]
    /// async fn main() -> doorlock_hardware::Result<()> {
    ///     let rx = SharedRingBuffer::<64>::new()?;
    ///     let receiver = UartReceiver::new(rx.clone());
    ///
    ///     let received = receiver.pump(&b"1234\r"[..]).await?;
    ///     assert_eq!(received, 5);
    ///     assert_eq!(rx.size(), 5);
    ///     Ok(())
    /// }
    /// ```
    pub async fn pump<R: AsyncRead + Unpin>(&self, mut reader: R) -> Result<u64> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut total = 0u64;

        loop {
            let n = reader.read(&mut chunk).await?;
            if n == 0 {
                debug!(total, "UART stream closed");
                return Ok(total);
            }

            let dropped = self.buffer.write_slice(&chunk[..n]);
            if dropped > 0 {
                warn!(dropped, capacity = N, "UART ring buffer overrun, oldest bytes discarded");
            }

            total += n as u64;
            trace!(received = n, total, "UART bytes buffered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_pump_copies_until_eof() {
        let rx = SharedRingBuffer::<64>::new().unwrap();
        let receiver = UartReceiver::new(rx.clone());

        let total = receiver.pump(&b"#*O*#\n"[..]).await.unwrap();

        assert_eq!(total, 6);
        let drained: Vec<u8> = std::iter::from_fn(|| rx.read()).collect();
        assert_eq!(drained, b"#*O*#\n");
    }

    #[tokio::test]
    async fn test_pump_overrun_keeps_latest_bytes() {
        let rx = SharedRingBuffer::<8>::new().unwrap();
        let receiver = UartReceiver::new(rx.clone());

        let total = receiver.pump(&b"0123456789ab"[..]).await.unwrap();

        assert_eq!(total, 12);
        assert!(rx.is_full());
        let drained: Vec<u8> = std::iter::from_fn(|| rx.read()).collect();
        assert_eq!(drained, b"456789ab");
    }

    #[tokio::test]
    async fn test_pump_from_duplex_stream() {
        let rx = SharedRingBuffer::<64>::new().unwrap();
        let receiver = UartReceiver::new(rx.clone());
        let (mut host, device) = tokio::io::duplex(16);

        let task = tokio::spawn(async move { receiver.pump(device).await });

        host.write_all(b"1234\r").await.unwrap();
        host.write_all(b"0000\r").await.unwrap();
        drop(host);

        let total = task.await.unwrap().unwrap();
        assert_eq!(total, 10);
        assert_eq!(rx.size(), 10);
    }

    #[tokio::test]
    async fn test_receiver_exposes_buffer() {
        let rx = SharedRingBuffer::<32>::new().unwrap();
        let receiver = UartReceiver::new(rx);
        assert_eq!(receiver.buffer().capacity(), 32);
        assert!(receiver.buffer().is_empty());
    }
}
