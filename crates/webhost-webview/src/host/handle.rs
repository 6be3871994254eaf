//! Pass-through delegation to the native surface.

use tracing::debug;

use super::WebviewHost;
use crate::binding::IntoHandler;
use crate::error::HostError;
use crate::surface::{NativeSurface, Rgba, WindowSize};

impl<S: NativeSurface> WebviewHost<S> {
    pub fn set_title(&self, title: &str) -> Result<(), HostError> {
        self.shared.with_surface("set_title", |s| s.set_title(title))
    }

    pub fn show(&self, visible: bool) -> Result<(), HostError> {
        self.shared.with_surface("show", |s| s.show(visible))
    }

    pub fn hide_from_dock(&self, hide: bool) -> Result<(), HostError> {
        self.shared.with_surface("hide_from_dock", |s| s.hide_from_dock(hide))
    }

    pub fn set_pos(&self, x: i32, y: i32) -> Result<(), HostError> {
        self.shared.with_surface("set_pos", |s| s.set_pos(x, y))
    }

    pub fn get_x(&self) -> Result<i32, HostError> {
        self.shared.with_surface("get_x", |s| Ok(s.get_x()))
    }

    /// Channels must lie in `0.0..=1.0`.
    pub fn set_bg(&self, color: Rgba) -> Result<(), HostError> {
        let surface = self.shared.surface("set_bg")?;
        if let Some((channel, value)) = color.out_of_range() {
            return Err(HostError::InvalidColor { channel, value });
        }
        Ok(surface.set_bg(color)?)
    }

    pub fn set_size(&self, size: WindowSize) -> Result<(), HostError> {
        self.shared.with_surface("set_size", |s| s.set_size(size))
    }

    pub fn navigate(&self, url: &str) -> Result<(), HostError> {
        debug!(url, "navigate");
        self.shared.with_surface("navigate", |s| s.navigate(url))
    }

    /// Evaluate script in the current page.
    pub fn eval(&self, js: &str) -> Result<(), HostError> {
        self.shared.with_surface("eval", |s| s.eval(js))
    }

    /// Inject script that runs before each page load.
    pub fn init(&self, js: &str) -> Result<(), HostError> {
        self.shared.with_surface("init", |s| s.init(js))
    }

    /// Expose `handler` to page script as `window[name]`.
    ///
    /// Replaces any binding already registered under `name`. Allowed
    /// before and during `run`.
    pub fn bind<M>(&self, name: &str, handler: impl IntoHandler<M>) -> Result<(), HostError> {
        self.shared.bind(name, handler.into_handler())
    }

    /// Remove a binding. Unknown names are a no-op.
    pub fn unbind(&self, name: &str) -> Result<(), HostError> {
        self.shared.unbind(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.shared.registry.borrow().contains(name)
    }

    /// Registered binding names, sorted.
    pub fn binding_names(&self) -> Vec<String> {
        self.shared.registry.borrow().names()
    }
}
