//! Window configuration types.

use serde::{Deserialize, Serialize};

/// How `width`/`height` constrain the window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeHintConfig {
    /// Initial size, freely resizable.
    #[default]
    None,
    /// Minimum size.
    Min,
    /// Maximum size.
    Max,
    /// Fixed size, not resizable.
    Fixed,
}

/// Window appearance and placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Outer x position in logical pixels. Left to the platform when unset.
    pub x: Option<i32>,
    /// Outer y position in logical pixels. Left to the platform when unset.
    pub y: Option<i32>,
    /// Valid range: 1-16384.
    pub width: u32,
    /// Valid range: 1-16384.
    pub height: u32,
    pub size_hint: SizeHintConfig,
    /// Space reserved above the web content, in logical pixels (valid range: 0-512).
    pub margin_top: u32,
    /// `#rrggbb`, `#rrggbbaa` or `rgba(r,g,b,a)`.
    pub background: String,
    pub visible: bool,
    pub hide_from_dock: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "webhost".into(),
            x: None,
            y: None,
            width: 800,
            height: 600,
            size_hint: SizeHintConfig::None,
            margin_top: 26,
            background: "#ffffff".into(),
            visible: true,
            hide_from_dock: false,
        }
    }
}
