//! Property-based tests for the ring buffer and the command accumulators.
//!
//! These tests use proptest to generate arbitrary byte streams and verify
//! that buffer bounds and command framing hold for every input.

use doorlock_core::constants::{KEYPAD_TERMINATOR, MAX_COMMAND_LEN, UART_CR, UART_LF};
use doorlock_core::{CommandAccumulator, RingBuffer};
use proptest::prelude::*;

const CAPACITY: usize = 16;

/// Strategy for keypad keys that never terminate a command.
fn non_terminator_key() -> impl Strategy<Value = u8> {
    prop::sample::select(b"0123456789ABCD*".to_vec())
}

/// Strategy for bytes that never end a UART line.
fn line_byte() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("not a line terminator", |b| *b != UART_CR && *b != UART_LF)
}

proptest! {
    /// Property: size never exceeds capacity, and after any number of writes
    /// the buffer yields exactly the most recent `capacity` bytes in order.
    #[test]
    fn prop_ring_buffer_keeps_most_recent(bytes in prop::collection::vec(any::<u8>(), 0..100)) {
        let mut rb = RingBuffer::<CAPACITY>::new().unwrap();
        for &byte in &bytes {
            rb.write(byte);
            prop_assert!(rb.size() <= CAPACITY);
        }

        let expected_len = bytes.len().min(CAPACITY);
        prop_assert_eq!(rb.size(), expected_len);
        prop_assert_eq!(rb.is_full(), bytes.len() >= CAPACITY);

        let drained: Vec<u8> = std::iter::from_fn(|| rb.read()).collect();
        prop_assert_eq!(&drained[..], &bytes[bytes.len() - expected_len..]);
        prop_assert!(rb.is_empty());
    }

    /// Property: interleaved reads and writes behave like a bounded FIFO
    /// that evicts from the front.
    #[test]
    fn prop_ring_buffer_matches_model(ops in prop::collection::vec(prop::option::of(any::<u8>()), 0..200)) {
        let mut rb = RingBuffer::<CAPACITY>::new().unwrap();
        let mut model = std::collections::VecDeque::new();

        for op in ops {
            match op {
                Some(byte) => {
                    rb.write(byte);
                    if model.len() == CAPACITY {
                        model.pop_front();
                    }
                    model.push_back(byte);
                }
                None => {
                    prop_assert_eq!(rb.read(), model.pop_front());
                }
            }
            prop_assert_eq!(rb.size(), model.len());
            prop_assert_eq!(rb.is_empty(), model.is_empty());
            prop_assert_eq!(rb.is_full(), model.len() == CAPACITY);
        }
    }

    /// Property: reset always leaves an empty buffer.
    #[test]
    fn prop_ring_buffer_reset_empties(bytes in prop::collection::vec(any::<u8>(), 0..50)) {
        let mut rb = RingBuffer::<CAPACITY>::new().unwrap();
        rb.write_slice(&bytes);
        rb.reset();
        prop_assert!(rb.is_empty());
        prop_assert_eq!(rb.size(), 0);
        prop_assert_eq!(rb.read(), None);
    }

    /// Property: exactly `MAX_COMMAND_LEN` non-terminator keys complete a
    /// keypad command on the last key, without any `#`.
    #[test]
    fn prop_keypad_completes_when_full(keys in prop::collection::vec(non_terminator_key(), MAX_COMMAND_LEN)) {
        let mut acc = CommandAccumulator::keypad();
        let (last, rest) = keys.split_last().unwrap();
        for &key in rest {
            prop_assert!(acc.feed(key).is_none());
        }

        let command = acc.feed(*last);
        prop_assert!(command.is_some());
        let command = command.unwrap();
        prop_assert_eq!(command.as_bytes(), &keys[..]);
        prop_assert_eq!(acc.pending_len(), 0);
    }

    /// Property: a keypad command never holds a `#` anywhere but at the start
    /// or the end.
    #[test]
    fn prop_keypad_hash_only_at_edges(keys in prop::collection::vec(prop::sample::select(b"0123#*".to_vec()), 0..80)) {
        let mut acc = CommandAccumulator::keypad();
        for key in keys {
            if let Some(command) = acc.feed(key) {
                let bytes = command.as_bytes();
                prop_assert!(!bytes.is_empty());
                prop_assert!(bytes.len() <= MAX_COMMAND_LEN);
                if bytes.len() > 2 {
                    let inner = &bytes[1..bytes.len() - 1];
                    prop_assert!(!inner.contains(&KEYPAD_TERMINATOR));
                }
            }
        }
    }

    /// Property: UART commands are never empty, never too long, and never
    /// contain a line terminator; one is emitted per non-empty line.
    #[test]
    fn prop_uart_commands_are_clean_lines(lines in prop::collection::vec(prop::collection::vec(line_byte(), 0..40), 0..8)) {
        let mut acc = CommandAccumulator::uart();
        let mut commands = Vec::new();
        for line in &lines {
            for &byte in line {
                prop_assert!(acc.feed(byte).is_none());
            }
            commands.extend(acc.feed(UART_LF));
        }

        let non_empty: Vec<_> = lines.iter().filter(|l| !l.is_empty()).collect();
        prop_assert_eq!(commands.len(), non_empty.len());

        for (command, line) in commands.iter().zip(non_empty) {
            let keep = line.len().min(MAX_COMMAND_LEN);
            prop_assert_eq!(command.as_bytes(), &line[..keep]);
        }
    }
}
