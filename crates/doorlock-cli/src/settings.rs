//! Loading the lock configuration for the host binary.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use doorlock_core::LockConfig;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_ENV: &str = "DOORLOCK_CONFIG";

/// Load the configuration named by [`CONFIG_ENV`], or the defaults when the
/// variable is unset. The result is validated before it is returned.
pub fn load() -> Result<LockConfig> {
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => read_file(Path::new(&path))?,
        None => {
            info!("{CONFIG_ENV} not set, using built-in credentials");
            LockConfig::default()
        }
    };

    config.validate().context("invalid lock configuration")?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<LockConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = parse(&text).with_context(|| format!("failed to parse config file {}", path.display()))?;

    info!(path = %path.display(), "Loaded lock configuration");
    Ok(config)
}

/// Parse a JSON configuration. Missing fields keep their defaults.
pub fn parse(text: &str) -> Result<LockConfig> {
    Ok(serde_json::from_str(text)?)
}
