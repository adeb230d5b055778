//! Core building blocks of the door lock controller.
//!
//! This crate holds everything that has real invariants and no hardware
//! dependency: the overwrite ring buffer that decouples UART reception from
//! command processing, the command accumulators that turn keystrokes and
//! serial bytes into complete commands, the credential set those commands are
//! compared against, and the shared domain types.

pub mod accumulator;
pub mod config;
pub mod constants;
pub mod error;
pub mod ring_buffer;
pub mod types;

pub use accumulator::{AccumulatorMode, CommandAccumulator};
pub use config::{CredentialMatch, Credentials, LockConfig};
pub use error::{Error, Result};
pub use ring_buffer::{ByteSource, RingBuffer};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
