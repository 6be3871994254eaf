use super::WebviewHost;
use crate::error::HostError;
use crate::surface::{NativeSurface, Rgba, WindowSize};

/// Initial window setup, applied through the ordinary setters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostOptions {
    pub debug: bool,
    pub title: Option<String>,
    pub position: Option<(i32, i32)>,
    pub size: Option<WindowSize>,
    pub background: Option<Rgba>,
    pub url: Option<String>,
    /// Injected before each page load, in order.
    pub init_scripts: Vec<String>,
    /// `None` leaves the platform default.
    pub visible: Option<bool>,
    pub hide_from_dock: bool,
}

impl HostOptions {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Apply every set field to `host`.
    ///
    /// Geometry goes first and navigation last, so init scripts are in
    /// place before the first page loads.
    pub fn apply<S: NativeSurface>(&self, host: &WebviewHost<S>) -> Result<(), HostError> {
        if let Some(title) = &self.title {
            host.set_title(title)?;
        }
        if let Some(size) = self.size {
            host.set_size(size)?;
        }
        if let Some((x, y)) = self.position {
            host.set_pos(x, y)?;
        }
        if let Some(color) = self.background {
            host.set_bg(color)?;
        }
        for script in &self.init_scripts {
            host.init(script)?;
        }
        if let Some(url) = &self.url {
            host.navigate(url)?;
        }
        if self.hide_from_dock {
            host.hide_from_dock(true)?;
        }
        if let Some(visible) = self.visible {
            host.show(visible)?;
        }
        Ok(())
    }
}
