//! Configuration validation.
//!
//! Each section has its own validator; this orchestrator runs them all
//! and collects errors into a single `ConfigError`.

mod content;
mod helpers;
mod window;


use crate::schema::HostConfig;
use webhost_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &HostConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    window::validate_window(&mut errors, config);
    content::validate_content(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
