pub mod errors;
pub mod types;

pub use errors::{ConfigError, WebhostError};
pub use types::Color;
