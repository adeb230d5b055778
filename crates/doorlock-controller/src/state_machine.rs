//! Door lock state machine.
//!
//! This module holds the lock state and decides every transition from three
//! kinds of input: debounced button presses, completed commands from the
//! keypad or the UART link, and the passage of time.
//!
//! # States
//!
//! - `Locked`: actuator engaged (initial state)
//! - `UnlockedTemporary`: actuator released, re-locks after the unlock timeout
//! - `UnlockedPermanent`: actuator released until explicitly closed
//!
//! # Transitions
//!
//! | Event | From | To |
//! |-------|------|----|
//! | single press | `Locked` | `UnlockedTemporary` |
//! | single press | `UnlockedPermanent` | `Locked` |
//! | single press | `UnlockedTemporary` | ignored |
//! | double press | any | `UnlockedPermanent` |
//! | debug-open token | any | `UnlockedPermanent` |
//! | debug-close token | any | `Locked` |
//! | password | any | `UnlockedTemporary` |
//! | other command | any | ignored, access denied |
//! | timeout (> 5000 ms) | `UnlockedTemporary` | `Locked` |
//!
//! The machine never reads a clock: every operation takes the current tick as
//! a parameter, so tests drive time explicitly.
//!
//! # Examples
//!
//! ```
//! use doorlock_controller::DoorStateMachine;
//! use doorlock_core::{ButtonPress, Credentials, DoorState};
//!
//! let mut machine = DoorStateMachine::new(Credentials::default());
//! assert_eq!(machine.state(), DoorState::Locked);
//!
//! machine.handle_button(ButtonPress::Single, 1_000);
//! assert_eq!(machine.state(), DoorState::UnlockedTemporary);
//!
//! // Still open at exactly the timeout, closed one tick later.
//! machine.evaluate(6_000);
//! assert_eq!(machine.state(), DoorState::UnlockedTemporary);
//! machine.evaluate(6_001);
//! assert_eq!(machine.state(), DoorState::Locked);
//! ```

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use doorlock_core::constants::UNLOCK_TIMEOUT_MS;
use doorlock_core::{
    ActuatorSignal, ButtonPress, Command, CredentialMatch, Credentials, DoorState, InputSource,
    Millis, elapsed_ms,
};

/// Maximum number of state transitions to keep in history.
///
/// Each record is a few bytes; 100 entries cover several minutes of busy
/// door traffic for post-incident inspection.
const MAX_HISTORY_SIZE: usize = 100;

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum TransitionCause {
    /// Single press of the inside button.
    ButtonSingle,

    /// Double press of the inside button.
    ButtonDouble,

    /// Debug-open token received.
    DebugOpen(InputSource),

    /// Debug-close token received.
    DebugClose(InputSource),

    /// Correct password received.
    AccessGranted(InputSource),

    /// Temporary unlock expired.
    Timeout,
}

impl fmt::Display for TransitionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionCause::ButtonSingle => write!(f, "single button press"),
            TransitionCause::ButtonDouble => write!(f, "double button press"),
            TransitionCause::DebugOpen(source) => write!(f, "debug open via {source}"),
            TransitionCause::DebugClose(source) => write!(f, "debug close via {source}"),
            TransitionCause::AccessGranted(source) => write!(f, "access granted via {source}"),
            TransitionCause::Timeout => write!(f, "unlock timeout"),
        }
    }
}

/// Result of interpreting one completed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Debug-open token: lock opened permanently.
    DebugOpen,

    /// Debug-close token: lock closed.
    DebugClose,

    /// Password matched: lock opened temporarily.
    AccessGranted,

    /// Nothing matched; state unchanged.
    AccessDenied,
}

impl CommandOutcome {
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, CommandOutcome::AccessDenied)
    }
}

/// A single state transition with the tick it happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: DoorState,

    /// The state transitioned to. May equal `from`, e.g. a double press while
    /// already permanently open.
    pub to: DoorState,

    /// What triggered it.
    pub cause: TransitionCause,

    /// Tick at which it happened.
    pub at: Millis,
}

/// State machine for the door lock.
///
/// Owned by the control loop and mutated only through its event handlers,
/// which keeps a single writer for the door state.
pub struct DoorStateMachine {
    /// Current state of the lock.
    state: DoorState,

    /// Tick at which temporary access was granted. Meaningful only while
    /// `state` is `UnlockedTemporary`.
    unlock_timer: Millis,

    /// Credentials commands are compared against.
    credentials: Credentials,

    /// History of state transitions (limited to MAX_HISTORY_SIZE).
    history: VecDeque<StateTransition>,
}

impl DoorStateMachine {
    /// Create a locked state machine.
    pub fn new(credentials: Credentials) -> Self {
        Self::builder().with_credentials(credentials).build()
    }

    /// Create a builder for a machine starting in a specific state.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_controller::DoorStateMachine;
    /// use doorlock_core::DoorState;
    ///
    /// let machine = DoorStateMachine::builder()
    ///     .with_initial_state(DoorState::UnlockedPermanent)
    ///     .build();
    ///
    /// assert_eq!(machine.state(), DoorState::UnlockedPermanent);
    /// ```
    pub fn builder() -> DoorStateMachineBuilder {
        DoorStateMachineBuilder::default()
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    /// Tick at which temporary access was granted, while it lasts.
    pub fn unlock_timer(&self) -> Option<Millis> {
        self.state.expires().then_some(self.unlock_timer)
    }

    /// Milliseconds left before the temporary unlock expires.
    ///
    /// Returns `None` outside `UnlockedTemporary`, and `Some(0)` once the
    /// timeout has passed but has not been evaluated yet.
    pub fn remaining_ms(&self, now: Millis) -> Option<Millis> {
        self.unlock_timer()
            .map(|since| UNLOCK_TIMEOUT_MS.saturating_sub(elapsed_ms(now, since)))
    }

    /// Actuator signal for the current state.
    pub fn output(&self) -> ActuatorSignal {
        self.state.actuator_signal()
    }

    /// Transition history, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Get the last N state transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition> {
        self.history
            .iter()
            .rev()
            .take(count)
            .rev()
            .copied()
            .collect()
    }

    /// Handle a debounced button event.
    ///
    /// Returns the transition taken, or `None` when the press is ignored
    /// (single press while temporarily open).
    pub fn handle_button(&mut self, press: ButtonPress, now: Millis) -> Option<StateTransition> {
        match (press, self.state) {
            (ButtonPress::Single, DoorState::Locked) => {
                info!(source = %InputSource::Button, "Door opened temporarily (inside button)");
                Some(self.transition(DoorState::UnlockedTemporary, TransitionCause::ButtonSingle, now))
            }
            (ButtonPress::Single, DoorState::UnlockedPermanent) => {
                info!(source = %InputSource::Button, "Door closed (inside button in permanent mode)");
                Some(self.transition(DoorState::Locked, TransitionCause::ButtonSingle, now))
            }
            (ButtonPress::Single, DoorState::UnlockedTemporary) => {
                debug!("Single press ignored while temporarily open");
                None
            }
            (ButtonPress::Double, _) => {
                info!(source = %InputSource::Button, "Door opened permanently (double press)");
                Some(self.transition(DoorState::UnlockedPermanent, TransitionCause::ButtonDouble, now))
            }
        }
    }

    /// Interpret a completed command from the keypad or the UART link.
    ///
    /// Both channels share this path; `source` only tags the log line and the
    /// recorded transition. An unrecognized command is a normal outcome, not
    /// an error.
    pub fn handle_command(&mut self, command: &Command, source: InputSource, now: Millis) -> CommandOutcome {
        match self.credentials.classify(command) {
            CredentialMatch::DebugOpen => {
                info!(%source, "Debug: lock opened (permanent)");
                self.transition(DoorState::UnlockedPermanent, TransitionCause::DebugOpen(source), now);
                CommandOutcome::DebugOpen
            }
            CredentialMatch::DebugClose => {
                info!(%source, "Debug: lock closed");
                self.transition(DoorState::Locked, TransitionCause::DebugClose(source), now);
                CommandOutcome::DebugClose
            }
            CredentialMatch::Password => {
                info!(%source, "Access granted: door opened temporarily");
                self.transition(DoorState::UnlockedTemporary, TransitionCause::AccessGranted(source), now);
                CommandOutcome::AccessGranted
            }
            CredentialMatch::Unknown => {
                warn!(%source, len = command.len(), "Access denied: unknown command or wrong password");
                CommandOutcome::AccessDenied
            }
        }
    }

    /// Re-lock if the temporary unlock has expired.
    ///
    /// Expiry requires strictly more than `UNLOCK_TIMEOUT_MS` since access was
    /// granted.
    pub fn check_timeout(&mut self, now: Millis) -> Option<StateTransition> {
        if self.state != DoorState::UnlockedTemporary {
            return None;
        }

        if elapsed_ms(now, self.unlock_timer) <= UNLOCK_TIMEOUT_MS {
            return None;
        }

        info!("Unlock time expired: door closed");
        Some(self.transition(DoorState::Locked, TransitionCause::Timeout, now))
    }

    /// Periodic re-evaluation: apply the timeout, then report the signal the
    /// actuator must be driven with this cycle.
    pub fn evaluate(&mut self, now: Millis) -> ActuatorSignal {
        self.check_timeout(now);
        self.output()
    }

    fn transition(&mut self, to: DoorState, cause: TransitionCause, now: Millis) -> StateTransition {
        let transition = StateTransition {
            from: self.state,
            to,
            cause,
            at: now,
        };

        self.state = to;
        if to == DoorState::UnlockedTemporary {
            self.unlock_timer = now;
        }

        debug!(from = %transition.from, to = %transition.to, cause = %cause, at = now, "door state transition");
        self.add_to_history(transition);
        transition
    }

    fn add_to_history(&mut self, transition: StateTransition) {
        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for DoorStateMachine {
    fn default() -> Self {
        Self::new(Credentials::default())
    }
}

impl fmt::Debug for DoorStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoorStateMachine")
            .field("state", &self.state)
            .field("unlock_timer", &self.unlock_timer())
            .field("history_len", &self.history.len())
            .finish()
    }
}

/// Builder for constructing `DoorStateMachine` instances.
///
/// Useful for tests and for restoring a machine into a known state.
#[derive(Debug, Default)]
pub struct DoorStateMachineBuilder {
    initial_state: DoorState,
    unlock_timer: Millis,
    credentials: Credentials,
}

impl DoorStateMachineBuilder {
    pub fn with_initial_state(mut self, state: DoorState) -> Self {
        self.initial_state = state;
        self
    }

    /// Tick at which temporary access started; only used when the initial
    /// state is `UnlockedTemporary`.
    pub fn with_unlock_timer(mut self, at: Millis) -> Self {
        self.unlock_timer = at;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn build(self) -> DoorStateMachine {
        DoorStateMachine {
            state: self.initial_state,
            unlock_timer: self.unlock_timer,
            credentials: self.credentials,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }
}
