//! Webhost configuration.
//!
//! TOML-based window and content settings for a webview host. Every
//! section uses serde defaults so a partial file (or none at all) works.
//!
//! ```rust,no_run
//! use webhost_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config.window.title);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ContentConfig, HostConfig, SizeHintConfig, WindowConfig};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};

use std::path::Path;

use webhost_common::ConfigError;

/// Load config from `path` when given, otherwise from the platform default
/// location, then validate it.
///
/// Unlike [`load_from_path`], a config that fails validation is an error
/// here, reported once and not logged.
pub fn load_config(path: Option<&Path>) -> Result<HostConfig, ConfigError> {
    let config = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::FileNotFound(p.to_path_buf()));
            }
            toml_loader::read_config(p)?
        }
        None => toml_loader::read_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}
