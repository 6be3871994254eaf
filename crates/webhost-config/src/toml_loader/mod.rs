//! TOML config file loading and creation.

mod loader;
mod paths;
mod template;


pub use loader::{load_default, load_from_path};
pub(crate) use loader::{read_config, read_default};
pub use paths::{create_default_config, default_config_path};
