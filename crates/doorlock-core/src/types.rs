use crate::{Result, constants::MAX_COMMAND_LEN, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic millisecond tick, as returned by the board's tick counter.
///
/// The counter wraps after roughly 49.7 days; always compute elapsed time
/// with [`elapsed_ms`] rather than plain subtraction.
pub type Millis = u32;

/// Milliseconds elapsed between `since` and `now`, tolerant of tick rollover.
#[must_use]
pub fn elapsed_ms(now: Millis, since: Millis) -> Millis {
    now.wrapping_sub(since)
}

/// State of the door lock.
///
/// Exactly one state is active at a time. The lock starts [`Locked`](Self::Locked)
/// and never reaches a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    /// Actuator engaged.
    #[default]
    Locked,

    /// Actuator released until the unlock timeout expires.
    UnlockedTemporary,

    /// Actuator released until an explicit close.
    UnlockedPermanent,
}

impl DoorState {
    /// Signal the lock actuator must be driven with while in this state.
    #[must_use]
    pub fn actuator_signal(&self) -> ActuatorSignal {
        match self {
            DoorState::Locked => ActuatorSignal::Inactive,
            DoorState::UnlockedTemporary | DoorState::UnlockedPermanent => ActuatorSignal::Active,
        }
    }

    /// Whether the door is open in any form.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        !matches!(self, DoorState::Locked)
    }

    /// Whether this state expires on its own.
    #[must_use]
    pub fn expires(&self) -> bool {
        matches!(self, DoorState::UnlockedTemporary)
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            DoorState::Locked => "Locked",
            DoorState::UnlockedTemporary => "UnlockedTemporary",
            DoorState::UnlockedPermanent => "UnlockedPermanent",
        };
        write!(f, "{}", state_str)
    }
}

/// Desired level of the lock actuator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorSignal {
    /// Output low: bolt engaged.
    Inactive,

    /// Output high: bolt released.
    Active,
}

impl ActuatorSignal {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, ActuatorSignal::Active)
    }
}

impl From<ActuatorSignal> for bool {
    fn from(signal: ActuatorSignal) -> Self {
        signal.is_active()
    }
}

/// Input channel an event arrived on. Only used to tag log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Button,
    Keypad,
    Uart,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Button => write!(f, "button"),
            InputSource::Keypad => write!(f, "keypad"),
            InputSource::Uart => write!(f, "uart"),
        }
    }
}

/// Debounced push-button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonPress {
    Single,
    Double,
}

impl ButtonPress {
    /// Map a press count from the debounce layer to an event.
    ///
    /// Counts other than 1 and 2 carry no meaning and yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::ButtonPress;
    ///
    /// assert_eq!(ButtonPress::from_count(1), Some(ButtonPress::Single));
    /// assert_eq!(ButtonPress::from_count(2), Some(ButtonPress::Double));
    /// assert_eq!(ButtonPress::from_count(3), None);
    /// ```
    #[must_use]
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(ButtonPress::Single),
            2 => Some(ButtonPress::Double),
            _ => None,
        }
    }

    #[must_use]
    pub fn count(&self) -> u8 {
        match self {
            ButtonPress::Single => 1,
            ButtonPress::Double => 2,
        }
    }
}

/// A completed command from the keypad or the UART link.
///
/// Holds at most [`MAX_COMMAND_LEN`] raw bytes. Bytes are compared verbatim:
/// no trimming, no case folding.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Command(heapless::Vec<u8, MAX_COMMAND_LEN>);

impl Command {
    /// Build a command from raw bytes.
    ///
    /// # Errors
    /// Returns `Error::CommandTooLong` if `bytes` exceeds [`MAX_COMMAND_LEN`].
    pub fn new(bytes: &[u8]) -> Result<Self> {
        heapless::Vec::from_slice(bytes)
            .map(Command)
            .map_err(|_| Error::CommandTooLong {
                len: bytes.len(),
                max: MAX_COMMAND_LEN,
            })
    }

    pub(crate) fn from_buffer(buffer: heapless::Vec<u8, MAX_COMMAND_LEN>) -> Self {
        Command(buffer)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// The command as text, if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Command")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl std::str::FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Command::new(s.as_bytes())
    }
}

impl PartialEq<str> for Command {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Command {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DoorState::Locked, ActuatorSignal::Inactive)]
    #[case(DoorState::UnlockedTemporary, ActuatorSignal::Active)]
    #[case(DoorState::UnlockedPermanent, ActuatorSignal::Active)]
    fn test_door_state_actuator_signal(#[case] state: DoorState, #[case] signal: ActuatorSignal) {
        assert_eq!(state.actuator_signal(), signal);
        assert_eq!(state.is_unlocked(), signal.is_active());
    }

    #[test]
    fn test_door_state_default_is_locked() {
        assert_eq!(DoorState::default(), DoorState::Locked);
        assert!(DoorState::UnlockedTemporary.expires());
        assert!(!DoorState::UnlockedPermanent.expires());
    }

    #[test]
    fn test_door_state_serialization() {
        let json = serde_json::to_string(&DoorState::UnlockedTemporary).unwrap();
        assert_eq!(json, "\"unlocked_temporary\"");
        let back: DoorState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DoorState::UnlockedTemporary);
    }

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(ButtonPress::Single))]
    #[case(2, Some(ButtonPress::Double))]
    #[case(3, None)]
    #[case(255, None)]
    fn test_button_press_from_count(#[case] count: u8, #[case] expected: Option<ButtonPress>) {
        assert_eq!(ButtonPress::from_count(count), expected);
    }

    #[test]
    fn test_elapsed_ms_handles_rollover() {
        assert_eq!(elapsed_ms(6000, 1000), 5000);
        assert_eq!(elapsed_ms(100, u32::MAX - 99), 200);
    }

    #[test]
    fn test_command_from_str() {
        let cmd: Command = "1234".parse().unwrap();
        assert_eq!(cmd.as_bytes(), b"1234");
        assert_eq!(cmd.as_str(), Some("1234"));
        assert_eq!(cmd, "1234");
        assert_eq!(cmd.to_string(), "1234");
        assert_eq!(cmd.len(), 4);
    }

    #[test]
    fn test_command_at_max_len() {
        let text = "9".repeat(MAX_COMMAND_LEN);
        let cmd = Command::new(text.as_bytes()).unwrap();
        assert_eq!(cmd.len(), MAX_COMMAND_LEN);
    }

    #[test]
    fn test_command_too_long() {
        let text = "9".repeat(MAX_COMMAND_LEN + 1);
        let result = Command::new(text.as_bytes());
        assert!(matches!(result, Err(Error::CommandTooLong { .. })));
    }

    #[test]
    fn test_command_non_utf8() {
        let cmd = Command::new(&[0xff, b'1']).unwrap();
        assert_eq!(cmd.as_str(), None);
        assert!(format!("{:?}", cmd).starts_with("Command("));
    }
}
