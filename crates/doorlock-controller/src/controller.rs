//! The control cycle: ties input channels, the state machine and the outputs
//! together.
//!
//! Button and keypad events arrive synchronously through [`DoorController::on_button`]
//! and [`DoorController::on_key`]. UART bytes wait in a ring buffer until
//! [`DoorController::run_cycle`] drains them. Every cycle also re-evaluates
//! the unlock timeout, drives the lock actuator and advances the heartbeat.
//!
//! # Examples
//!
//! ```
//! use doorlock_controller::DoorController;
//! use doorlock_core::{DoorState, RingBuffer};
//! use doorlock_hardware::mock::MockOutput;
//!
//! let (actuator, door) = MockOutput::new("DOOR_STATUS");
//! let (led, _) = MockOutput::new("LD2");
//! let mut controller = DoorController::new(actuator, led);
//!
//! let mut rx = RingBuffer::<64>::new().unwrap();
//! rx.write_slice(b"1234\r");
//!
//! let report = controller.run_cycle(&mut rx, 100).unwrap();
//! assert_eq!(report.state, DoorState::UnlockedTemporary);
//! assert!(door.level());
//! ```

use serde::Serialize;
use tracing::{debug, info, instrument};

use doorlock_core::{
    ActuatorSignal, ButtonPress, ByteSource, CommandAccumulator, Credentials, DoorState, InputSource,
    Millis,
};
use doorlock_hardware::{DigitalOutput, Result};

use crate::heartbeat::Heartbeat;
use crate::state_machine::{CommandOutcome, DoorStateMachine, StateTransition};

/// Summary of one control cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// State after the cycle.
    pub state: DoorState,

    /// Signal written to the actuator.
    pub signal: ActuatorSignal,

    /// Outcomes of the UART commands completed this cycle, in arrival order.
    pub outcomes: Vec<CommandOutcome>,

    /// Set when the temporary unlock expired during this cycle.
    pub expired: Option<StateTransition>,

    /// New heartbeat LED level, when it toggled this cycle.
    pub heartbeat: Option<bool>,
}

/// Door lock controller driving an actuator `A` and a heartbeat LED `L`.
pub struct DoorController<A, L> {
    machine: DoorStateMachine,
    keypad: CommandAccumulator,
    uart: CommandAccumulator,
    heartbeat: Heartbeat,
    actuator: A,
    heartbeat_led: L,
    last_signal: Option<ActuatorSignal>,
}

impl<A: DigitalOutput, L: DigitalOutput> DoorController<A, L> {
    /// Create a controller with the default credentials.
    pub fn new(actuator: A, heartbeat_led: L) -> Self {
        Self::with_machine(DoorStateMachine::default(), actuator, heartbeat_led)
    }

    /// Create a controller comparing commands against `credentials`.
    pub fn with_credentials(credentials: Credentials, actuator: A, heartbeat_led: L) -> Self {
        Self::with_machine(DoorStateMachine::new(credentials), actuator, heartbeat_led)
    }

    pub fn with_machine(machine: DoorStateMachine, actuator: A, heartbeat_led: L) -> Self {
        Self {
            machine,
            keypad: CommandAccumulator::keypad(),
            uart: CommandAccumulator::uart(),
            heartbeat: Heartbeat::new(),
            actuator,
            heartbeat_led,
            last_signal: None,
        }
    }

    /// Replace the heartbeat generator.
    pub fn with_heartbeat(mut self, heartbeat: Heartbeat) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    pub fn machine(&self) -> &DoorStateMachine {
        &self.machine
    }

    pub fn state(&self) -> DoorState {
        self.machine.state()
    }

    /// Keystrokes collected for the keypad command in progress.
    pub fn pending_keys(&self) -> &[u8] {
        self.keypad.pending()
    }

    /// Bytes collected for the UART line in progress.
    pub fn pending_line(&self) -> &[u8] {
        self.uart.pending()
    }

    /// Deliver a debounced button event carrying `count` presses.
    ///
    /// Only one and two presses mean anything; other counts are ignored.
    pub fn on_button(&mut self, count: u8, now: Millis) -> Option<StateTransition> {
        match ButtonPress::from_count(count) {
            Some(press) => self.machine.handle_button(press, now),
            None => {
                debug!(count, "Ignoring button event");
                None
            }
        }
    }

    /// Deliver one keypad keystroke. Returns the outcome when the keystroke
    /// completes a command.
    pub fn on_key(&mut self, key: u8, now: Millis) -> Option<CommandOutcome> {
        let command = self.keypad.feed(key)?;
        Some(self.machine.handle_command(&command, InputSource::Keypad, now))
    }

    /// Drain every byte available from `rx` and act on each completed line.
    pub fn on_uart<S: ByteSource + ?Sized>(&mut self, rx: &mut S, now: Millis) -> Vec<CommandOutcome> {
        self.uart
            .process(rx)
            .iter()
            .map(|command| self.machine.handle_command(command, InputSource::Uart, now))
            .collect()
    }

    /// Run one control cycle at tick `now`.
    ///
    /// Processes pending UART input, applies the unlock timeout, writes the
    /// actuator and services the heartbeat LED. The actuator is written on
    /// every cycle so a glitched pin is corrected on the next pass.
    ///
    /// # Errors
    ///
    /// Returns the first output write failure. The door state has already
    /// been updated when this happens; the next cycle writes again.
    #[instrument(level = "trace", skip(self, rx))]
    pub fn run_cycle<S: ByteSource + ?Sized>(&mut self, rx: &mut S, now: Millis) -> Result<CycleReport> {
        let outcomes = self.on_uart(rx, now);
        let expired = self.machine.check_timeout(now);
        let signal = self.machine.evaluate(now);

        self.actuator.write(signal.into())?;
        if self.last_signal != Some(signal) {
            info!(pin = self.actuator.name(), ?signal, state = %self.machine.state(), "Actuator output changed");
            self.last_signal = Some(signal);
        }

        let heartbeat = self.heartbeat.poll(now);
        if let Some(level) = heartbeat {
            self.heartbeat_led.write(level)?;
        }

        Ok(CycleReport {
            state: self.machine.state(),
            signal,
            outcomes,
            expired,
            heartbeat,
        })
    }
}

impl<A, L> std::fmt::Debug for DoorController<A, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoorController")
            .field("machine", &self.machine)
            .field("keypad", &self.keypad)
            .field("uart", &self.uart)
            .field("heartbeat", &self.heartbeat)
            .finish_non_exhaustive()
    }
}
