//! Mock device implementations for testing and development.
//!
//! This module provides simulated output pins and a manually driven clock
//! that can be controlled programmatically without physical hardware.

pub mod clock;
pub mod output;

// Re-export commonly used types
pub use clock::MockClock;
pub use output::{MockOutput, MockOutputHandle};
