//! Output pins for running the controller on a host without GPIO.

use tracing::{debug, info};

use doorlock_hardware::{DigitalOutput, Result};

/// Output pin that reports level changes through `tracing`.
///
/// Only level changes are logged; the control cycle rewrites the actuator
/// every pass.
#[derive(Debug)]
pub struct LoggedPin {
    name: String,
    level: Option<bool>,
    quiet: bool,
}

impl LoggedPin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: None,
            quiet: false,
        }
    }

    /// Log level changes at `debug` instead of `info` (heartbeat LED).
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn level(&self) -> Option<bool> {
        self.level
    }
}

impl DigitalOutput for LoggedPin {
    fn write(&mut self, active: bool) -> Result<()> {
        if self.level == Some(active) {
            return Ok(());
        }

        self.level = Some(active);
        if self.quiet {
            debug!(pin = %self.name, high = active, "Pin level changed");
        } else {
            info!(pin = %self.name, high = active, "Pin level changed");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
