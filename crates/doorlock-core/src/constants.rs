//! Fixed constants of the door lock controller.
//!
//! Timing values, buffer sizes and the default credentials live here so the
//! keypad and UART paths, the state machine and the binary agree on them.
//! The unlock timeout is deliberately not part of the runtime configuration.
//!
//! # Usage
//!
//! ```
//! use doorlock_core::constants::*;
//!
//! assert_eq!(UNLOCK_TIMEOUT_MS, 5000);
//! assert_eq!(MAX_COMMAND_LEN, COMMAND_BUFFER_SIZE - 1);
//! ```

// ============================================================================
// Timing
// ============================================================================

/// How long a temporary unlock stays open, in milliseconds.
///
/// The lock re-engages on the first re-evaluation where strictly more than
/// this much time has passed since access was granted.
pub const UNLOCK_TIMEOUT_MS: u32 = 5000;

/// Period of the status indicator heartbeat, in milliseconds.
pub const HEARTBEAT_PERIOD_MS: u32 = 1000;

/// Interval between two control cycles of the binary, in milliseconds.
pub const CONTROL_CYCLE_MS: u64 = 10;

// ============================================================================
// Buffers
// ============================================================================

/// Size of a command buffer, terminator slot included.
///
/// Both the keypad and the UART line buffers use this size, so a command
/// carries at most [`MAX_COMMAND_LEN`] characters.
pub const COMMAND_BUFFER_SIZE: usize = 32;

/// Maximum number of characters in a completed command.
pub const MAX_COMMAND_LEN: usize = COMMAND_BUFFER_SIZE - 1;

/// Largest capacity a ring buffer may be created with.
///
/// Indices and sizes fit in a single byte on the target hardware.
pub const MAX_RING_BUFFER_CAPACITY: usize = 255;

/// Capacity of the ring buffer between UART reception and the control cycle.
pub const UART_RING_BUFFER_SIZE: usize = 64;

// ============================================================================
// Command framing
// ============================================================================

/// Keypad key that completes a command.
pub const KEYPAD_TERMINATOR: u8 = b'#';

/// Carriage return, one of the two UART line terminators.
pub const UART_CR: u8 = b'\r';

/// Line feed, one of the two UART line terminators.
pub const UART_LF: u8 = b'\n';

// ============================================================================
// Default credentials
// ============================================================================

/// Default access password.
pub const DEFAULT_PASSWORD: &str = "1234";

/// Default maintenance token that opens the lock permanently.
pub const DEFAULT_DEBUG_OPEN_TOKEN: &str = "#*O*#";

/// Default maintenance token that locks the door.
pub const DEFAULT_DEBUG_CLOSE_TOKEN: &str = "#*C*#";
