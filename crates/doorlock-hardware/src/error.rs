//! Error types for hardware operations.
//!
//! This module defines error types for the collaborators the lock controller
//! drives or reads from: output pins, the UART byte stream and the buffers
//! shared with the reception side.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Writing a digital output failed.
    #[error("Output write failed on {pin}: {message}")]
    OutputFailed { pin: String, message: String },

    /// Core construction or configuration error.
    #[error(transparent)]
    Core(#[from] doorlock_core::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new output write error.
    pub fn output_failed(pin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OutputFailed {
            pin: pin.into(),
            message: message.into(),
        }
    }
}
