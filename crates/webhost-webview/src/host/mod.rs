//! The host façade and its lifecycle state machine.
//!
//! `WebviewHost` owns one native surface and the registry of bindings
//! exposed through it:
//!
//! ```text
//! Created --run--> Running --terminate / window closed--> Terminated --destroy--> Destroyed
//!    |                                                        ^
//!    +------------------terminate (run becomes a no-op)-------+
//! Created --destroy--> Destroyed
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::binding::{BindingRegistry, Handler};
use crate::error::{HostError, LifecycleError, SurfaceError};
use crate::surface::NativeSurface;

mod controller;
mod handle;
mod lifecycle;
mod types;

#[cfg(test)]
mod tests;

pub use controller::HostController;
pub use types::HostOptions;

/// Lifecycle phase of a host's native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Created,
    Running,
    Terminated,
    Destroyed,
}

/// A native window hosting a web view, with script-callable bindings.
///
/// Single-threaded: the host, its surface and every handler live on the
/// thread that drives the run loop.
pub struct WebviewHost<S: NativeSurface> {
    shared: Rc<Shared<S>>,
}

/// State reachable from both the host and its controllers.
pub(crate) struct Shared<S> {
    /// `None` once destroyed.
    surface: RefCell<Option<Rc<S>>>,
    registry: RefCell<BindingRegistry>,
    state: Cell<RunState>,
    has_run: Cell<bool>,
    in_loop: Cell<bool>,
}

impl<S: NativeSurface> WebviewHost<S> {
    /// Create the native surface and wrap it. `debug` enables developer tools.
    pub fn new(debug: bool) -> Result<Self, HostError> {
        let surface = S::create(debug).map_err(HostError::Construction)?;
        let devtools = debug;
        debug!(devtools, "webview host created");
        Ok(Self::with_surface(surface))
    }

    /// Wrap an already created surface.
    pub fn with_surface(surface: S) -> Self {
        Self {
            shared: Rc::new(Shared {
                surface: RefCell::new(Some(Rc::new(surface))),
                registry: RefCell::new(BindingRegistry::new()),
                state: Cell::new(RunState::Created),
                has_run: Cell::new(false),
                in_loop: Cell::new(false),
            }),
        }
    }

    /// Create a host and apply `options` as ordinary setter calls.
    pub fn with_options(options: &HostOptions) -> Result<Self, HostError> {
        let host = Self::new(options.debug)?;
        options.apply(&host)?;
        Ok(host)
    }

    pub fn state(&self) -> RunState {
        self.shared.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// A non-owning handle for use inside binding handlers.
    pub fn controller(&self) -> HostController<S> {
        HostController::new(Rc::downgrade(&self.shared))
    }

    /// The underlying surface, for platform-specific calls.
    pub fn surface(&self) -> Result<Rc<S>, HostError> {
        self.shared.surface("surface")
    }
}

impl<S: NativeSurface> Drop for WebviewHost<S> {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            tracing::warn!(error = %e, "failed to destroy webview host on drop");
        }
    }
}

impl<S: NativeSurface> Shared<S> {
    pub(crate) fn surface(&self, op: &'static str) -> Result<Rc<S>, HostError> {
        self.surface
            .borrow()
            .as_ref()
            .cloned()
            .ok_or(HostError::Lifecycle(LifecycleError::Destroyed { op }))
    }

    /// Run `f` against the live surface, forwarding its error untouched.
    pub(crate) fn with_surface<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&S) -> Result<T, SurfaceError>,
    ) -> Result<T, HostError> {
        let surface = self.surface(op)?;
        Ok(f(&surface)?)
    }

    pub(crate) fn state(&self) -> RunState {
        self.state.get()
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<Rc<Handler>> {
        self.registry.borrow().resolve(name)
    }

    pub(crate) fn bind(&self, name: &str, handler: Handler) -> Result<(), HostError> {
        validate_binding_name(name)?;
        let surface = self.surface("bind")?;
        surface.bind(name)?;
        if self.registry.borrow_mut().register(name, handler).is_some() {
            debug!(name, "binding replaced");
        }
        Ok(())
    }

    pub(crate) fn unbind(&self, name: &str) -> Result<(), HostError> {
        let surface = self.surface("unbind")?;
        let removed = self.registry.borrow_mut().unregister(name);
        if removed.is_some() {
            surface.unbind(name)?;
        }
        Ok(())
    }

    pub(crate) fn terminate(&self) {
        match self.state.get() {
            RunState::Created => {
                self.state.set(RunState::Terminated);
                debug!("terminated before run; run will return immediately");
            }
            RunState::Running => {
                self.state.set(RunState::Terminated);
                if let Ok(surface) = self.surface("terminate") {
                    surface.terminate();
                }
                debug!("run loop asked to exit");
            }
            RunState::Terminated | RunState::Destroyed => {}
        }
    }
}

/// Names become properties of the page's global object.
fn validate_binding_name(name: &str) -> Result<(), HostError> {
    let reserved = name.starts_with("__webhost");
    if name.trim().is_empty() || name.chars().any(char::is_control) || reserved {
        return Err(HostError::InvalidBindingName(name.to_string()));
    }
    Ok(())
}
