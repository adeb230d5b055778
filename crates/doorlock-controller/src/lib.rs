//! Door lock controller.
//!
//! This crate provides the access-control logic of the lock:
//!
//! - [`state_machine`]: the lock state, its transitions and the unlock timer
//! - [`controller`]: the per-cycle driver feeding input channels into the
//!   state machine and applying its output to the actuator
//! - [`heartbeat`]: the liveness LED
//!
//! Time is always passed in explicitly as a [`Millis`](doorlock_core::Millis)
//! tick, so every behavior here can be exercised without a real clock.

pub mod controller;
pub mod heartbeat;
pub mod state_machine;

pub use controller::{CycleReport, DoorController};
pub use heartbeat::Heartbeat;
pub use state_machine::{
    CommandOutcome, DoorStateMachine, DoorStateMachineBuilder, StateTransition, TransitionCause,
};
