//! Core TOML config loading: read from path or platform default.

use crate::schema::HostConfig;
use crate::validation;
use std::path::Path;
use tracing::{info, warn};
use webhost_common::ConfigError;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// Validation problems are logged, and the parsed config is returned as-is.
pub fn load_from_path(path: &Path) -> Result<HostConfig, ConfigError> {
    let config = read_config(path)?;
    warn_if_invalid(&config);
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/webhost/config.toml`
/// On Linux: `~/.config/webhost/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<HostConfig, ConfigError> {
    let config = read_default()?;
    warn_if_invalid(&config);
    Ok(config)
}

/// Parse `path` without validating it.
pub(crate) fn read_config(path: &Path) -> Result<HostConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: HostConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Parse the default config file, creating it first if missing.
pub(crate) fn read_default() -> Result<HostConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(HostConfig::default());
    }

    read_config(&path)
}

fn warn_if_invalid(config: &HostConfig) {
    if let Err(e) = validation::validate(config) {
        warn!("config validation warning: {e}");
    }
}
