//! Lock configuration and the credential set commands are checked against.
//!
//! [`LockConfig`] is the serializable form: three strings with defaults from
//! [`constants`](crate::constants). [`Credentials`] is the validated form the
//! state machine holds. Keypad and UART commands are both matched against the
//! same set, in a fixed order: debug-open token, debug-close token, password.
//!
//! # Examples
//!
//! ```
//! use doorlock_core::{Command, CredentialMatch, LockConfig};
//!
//! let credentials = LockConfig::default().credentials().unwrap();
//! let cmd: Command = "1234".parse().unwrap();
//! assert_eq!(credentials.classify(&cmd), CredentialMatch::Password);
//! ```

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::{
    Result,
    constants::{
        DEFAULT_DEBUG_CLOSE_TOKEN, DEFAULT_DEBUG_OPEN_TOKEN, DEFAULT_PASSWORD, MAX_COMMAND_LEN,
    },
    error::Error,
    types::Command,
};

/// Runtime configuration of the lock.
///
/// Missing fields fall back to the defaults, so an empty JSON object is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Password granting temporary access.
    pub password: String,

    /// Maintenance token opening the lock permanently.
    pub debug_open_token: String,

    /// Maintenance token locking the door.
    pub debug_close_token: String,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            password: DEFAULT_PASSWORD.to_string(),
            debug_open_token: DEFAULT_DEBUG_OPEN_TOKEN.to_string(),
            debug_close_token: DEFAULT_DEBUG_CLOSE_TOKEN.to_string(),
        }
    }
}

impl LockConfig {
    /// Check that every credential can actually be entered and that no two
    /// credentials collide.
    ///
    /// # Errors
    /// - `Error::InvalidCredential` for an empty credential, or one longer than
    ///   [`MAX_COMMAND_LEN`] (no command can be that long).
    /// - `Error::Config` when two credentials are identical.
    pub fn validate(&self) -> Result<()> {
        self.credentials().map(|_| ())
    }

    /// Validate and convert into the matching form.
    ///
    /// # Errors
    /// Same as [`validate`](Self::validate).
    pub fn credentials(&self) -> Result<Credentials> {
        let password = parse_credential("password", &self.password)?;
        let debug_open = parse_credential("debug_open_token", &self.debug_open_token)?;
        let debug_close = parse_credential("debug_close_token", &self.debug_close_token)?;

        if debug_open == debug_close {
            return Err(Error::Config(
                "debug open and close tokens must differ".to_string(),
            ));
        }
        if password == debug_open || password == debug_close {
            return Err(Error::Config(
                "password must differ from the debug tokens".to_string(),
            ));
        }

        Ok(Credentials {
            password,
            debug_open,
            debug_close,
        })
    }
}

fn parse_credential(name: &'static str, value: &str) -> Result<Command> {
    if value.is_empty() {
        return Err(Error::InvalidCredential {
            name,
            reason: "must not be empty".to_string(),
        });
    }

    Command::new(value.as_bytes()).map_err(|_| Error::InvalidCredential {
        name,
        reason: format!("{} bytes exceeds the {MAX_COMMAND_LEN}-byte command limit", value.len()),
    })
}

/// What a completed command matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialMatch {
    DebugOpen,
    DebugClose,
    Password,
    Unknown,
}

/// Validated credential set.
///
/// # Security
/// Comparisons run in constant time once lengths match, so response timing
/// does not reveal how much of the password was right.
#[derive(Clone)]
pub struct Credentials {
    password: Command,
    debug_open: Command,
    debug_close: Command,
}

impl Credentials {
    /// Classify a completed command. Exact, case-sensitive, length-sensitive.
    #[must_use]
    pub fn classify(&self, command: &Command) -> CredentialMatch {
        if matches(command, &self.debug_open) {
            CredentialMatch::DebugOpen
        } else if matches(command, &self.debug_close) {
            CredentialMatch::DebugClose
        } else if matches(command, &self.password) {
            CredentialMatch::Password
        } else {
            CredentialMatch::Unknown
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            password: Command::new(DEFAULT_PASSWORD.as_bytes()).unwrap_or_default(),
            debug_open: Command::new(DEFAULT_DEBUG_OPEN_TOKEN.as_bytes()).unwrap_or_default(),
            debug_close: Command::new(DEFAULT_DEBUG_CLOSE_TOKEN.as_bytes()).unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"<redacted>")
            .field("debug_open", &self.debug_open)
            .field("debug_close", &self.debug_close)
            .finish()
    }
}

fn matches(command: &Command, credential: &Command) -> bool {
    command.len() == credential.len() && bool::from(command.as_bytes().ct_eq(credential.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cmd(s: &str) -> Command {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = LockConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.password, "1234");
        assert_eq!(config.debug_open_token, "#*O*#");
        assert_eq!(config.debug_close_token, "#*C*#");
    }

    #[rstest]
    #[case("#*O*#", CredentialMatch::DebugOpen)]
    #[case("#*C*#", CredentialMatch::DebugClose)]
    #[case("1234", CredentialMatch::Password)]
    #[case("0000", CredentialMatch::Unknown)]
    #[case("12345", CredentialMatch::Unknown)]
    #[case("123", CredentialMatch::Unknown)]
    #[case(" 1234", CredentialMatch::Unknown)]
    #[case("1234#", CredentialMatch::Unknown)]
    #[case("#*o*#", CredentialMatch::Unknown)]
    fn test_classify_exact_match(#[case] input: &str, #[case] expected: CredentialMatch) {
        let credentials = Credentials::default();
        assert_eq!(credentials.classify(&cmd(input)), expected);
    }

    #[test]
    fn test_empty_password_rejected() {
        let config = LockConfig {
            password: String::new(),
            ..LockConfig::default()
        };
        let result = config.validate();
        assert!(matches!(
            result,
            Err(Error::InvalidCredential { name: "password", .. })
        ));
    }

    #[test]
    fn test_overlong_token_rejected() {
        let config = LockConfig {
            debug_open_token: "#".repeat(MAX_COMMAND_LEN + 1),
            ..LockConfig::default()
        };
        let result = config.validate();
        assert!(matches!(
            result,
            Err(Error::InvalidCredential { name: "debug_open_token", .. })
        ));
    }

    #[test]
    fn test_colliding_credentials_rejected() {
        let config = LockConfig {
            password: "#*C*#".to_string(),
            ..LockConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = LockConfig {
            debug_close_token: "#*O*#".to_string(),
            ..LockConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_password() {
        let config = LockConfig {
            password: "A5F0".to_string(),
            ..LockConfig::default()
        };
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.classify(&cmd("A5F0")), CredentialMatch::Password);
        assert_eq!(credentials.classify(&cmd("1234")), CredentialMatch::Unknown);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LockConfig = serde_json::from_str(r#"{"password":"9999"}"#).unwrap();
        assert_eq!(config.password, "9999");
        assert_eq!(config.debug_open_token, "#*O*#");
    }

    #[test]
    fn test_debug_output_redacts_password() {
        let rendered = format!("{:?}", Credentials::default());
        assert!(!rendered.contains("1234"));
        assert!(rendered.contains("<redacted>"));
    }
}
