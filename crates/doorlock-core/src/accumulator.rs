//! Command accumulation for the keypad and the UART link.
//!
//! Both input channels deliver one byte at a time and both produce discrete
//! [`Command`]s, but they decide differently when a command is complete:
//!
//! | Mode | Completes on | Overflow |
//! |------|--------------|----------|
//! | [`Keypad`](AccumulatorMode::Keypad) | `#` (kept in the command), or reaching [`MAX_COMMAND_LEN`] | cannot happen, the buffer completes first |
//! | [`Uart`](AccumulatorMode::Uart) | `\r` or `\n` (not kept) on a non-empty line | excess bytes dropped until the line ends |
//!
//! A `#` pressed on an empty keypad buffer opens a token instead of closing
//! an empty command, which is what makes `#*O*#` enterable from the keypad.
//!
//! Each channel owns its own accumulator; they never share a buffer.
//!
//! # Examples
//!
//! ```
//! use doorlock_core::{CommandAccumulator, RingBuffer};
//!
//! let mut uart = CommandAccumulator::uart();
//! let mut rb = RingBuffer::<64>::new().unwrap();
//! rb.write_slice(b"1234\r\n#*C*#\n");
//!
//! let commands = uart.process(&mut rb);
//! assert_eq!(commands.len(), 2);
//! assert_eq!(commands[0], "1234");
//! assert_eq!(commands[1], "#*C*#");
//! ```

use std::mem;

use tracing::trace;

use crate::{
    constants::{KEYPAD_TERMINATOR, MAX_COMMAND_LEN, UART_CR, UART_LF},
    ring_buffer::ByteSource,
    types::Command,
};

/// How an accumulator decides that a command is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccumulatorMode {
    /// Hex keypad: `#`-terminated tokens, completed automatically when full.
    Keypad,

    /// Serial line: `\r`/`\n`-terminated, excess characters dropped.
    Uart,
}

/// Bounded builder turning a byte stream into [`Command`]s.
#[derive(Debug, Clone)]
pub struct CommandAccumulator {
    mode: AccumulatorMode,
    buffer: heapless::Vec<u8, MAX_COMMAND_LEN>,
}

impl CommandAccumulator {
    #[must_use]
    pub fn new(mode: AccumulatorMode) -> Self {
        Self {
            mode,
            buffer: heapless::Vec::new(),
        }
    }

    /// Accumulator for keypad keystrokes.
    #[must_use]
    pub fn keypad() -> Self {
        Self::new(AccumulatorMode::Keypad)
    }

    /// Accumulator for UART lines.
    #[must_use]
    pub fn uart() -> Self {
        Self::new(AccumulatorMode::Uart)
    }

    #[must_use]
    pub fn mode(&self) -> AccumulatorMode {
        self.mode
    }

    /// Bytes collected so far for the command in progress.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop the command in progress.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Feed one byte, returning the command it completes, if any.
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        match self.mode {
            AccumulatorMode::Keypad => self.feed_keypad(byte),
            AccumulatorMode::Uart => self.feed_uart(byte),
        }
    }

    /// Drain every byte currently available from `source`.
    ///
    /// Never waits for more input. A line still open when the source runs dry
    /// stays pending and is completed by a later call.
    pub fn process<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Some(byte) = source.read_byte() {
            if let Some(command) = self.feed(byte) {
                commands.push(command);
            }
        }
        commands
    }

    fn feed_keypad(&mut self, key: u8) -> Option<Command> {
        self.push(key);

        let terminated = key == KEYPAD_TERMINATOR && self.buffer.len() > 1;
        if terminated || self.buffer.is_full() {
            return Some(self.take());
        }

        None
    }

    fn feed_uart(&mut self, byte: u8) -> Option<Command> {
        if byte == UART_CR || byte == UART_LF {
            if self.buffer.is_empty() {
                return None;
            }
            return Some(self.take());
        }

        self.push(byte);
        None
    }

    fn push(&mut self, byte: u8) {
        if self.buffer.push(byte).is_err() {
            trace!(mode = ?self.mode, byte, "command buffer full, byte dropped");
        }
    }

    fn take(&mut self) -> Command {
        Command::from_buffer(mem::take(&mut self.buffer))
    }
}
