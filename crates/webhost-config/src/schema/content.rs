//! Initial page content.

use serde::{Deserialize, Serialize};

/// What the view loads and which scripts run before every page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Page to navigate to at startup.
    pub url: Option<String>,
    /// Scripts injected before each page load, in order.
    pub init_scripts: Vec<String>,
}
