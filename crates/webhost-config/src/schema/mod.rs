//! Configuration schema.

mod content;
mod window;

pub use content::ContentConfig;
pub use window::{SizeHintConfig, WindowConfig};

use serde::{Deserialize, Serialize};

/// Root configuration for one webview host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Enable the web inspector / developer tools.
    pub debug: bool,
    pub window: WindowConfig,
    pub content: ContentConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: HostConfig = toml::from_str("").unwrap();
        assert!(!config.debug);
        assert_eq!(config.window.title, "webhost");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.margin_top, 26);
        assert!(config.content.url.is_none());
    }

    #[test]
    fn partial_window_section_keeps_other_defaults() {
        let config: HostConfig = toml::from_str(
            r##"
[window]
title = "Inspector"
size_hint = "fixed"
x = 40
"##,
        )
        .unwrap();
        assert_eq!(config.window.title, "Inspector");
        assert_eq!(config.window.size_hint, SizeHintConfig::Fixed);
        assert_eq!(config.window.x, Some(40));
        assert_eq!(config.window.y, None);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.background, "#ffffff");
    }

    #[test]
    fn unknown_size_hint_is_rejected() {
        let result: Result<HostConfig, _> = toml::from_str("[window]\nsize_hint = \"huge\"\n");
        assert!(result.is_err());
    }
}
