//! Entering, leaving and tearing down the run loop.

use tracing::{debug, info, warn};

use super::{RunState, WebviewHost};
use crate::dispatch::CallDispatcher;
use crate::error::{HostError, LifecycleError};
use crate::surface::NativeSurface;

impl<S: NativeSurface> WebviewHost<S> {
    /// Enter the native event loop and block until it exits.
    ///
    /// Script calls are dispatched to bound handlers while it runs. The
    /// loop exits on [`terminate`](Self::terminate), on a failing handler,
    /// or when the user closes the window. A host runs at most once; if it
    /// was terminated before this call, `run` returns immediately.
    pub fn run(&self) -> Result<(), HostError> {
        let shared = &*self.shared;
        if shared.state.get() == RunState::Destroyed {
            return Err(LifecycleError::Destroyed { op: "run" }.into());
        }
        if shared.has_run.get() {
            return Err(LifecycleError::AlreadyRan.into());
        }
        shared.has_run.set(true);

        if shared.state.get() == RunState::Terminated {
            debug!("host terminated before run, skipping event loop");
            return Ok(());
        }

        let surface = shared.surface("run")?;
        shared.state.set(RunState::Running);
        shared.in_loop.set(true);
        info!(bindings = shared.registry.borrow().len(), "entering run loop");

        let result = surface.run(&CallDispatcher::new(shared, &surface));

        shared.in_loop.set(false);
        if shared.state.get() == RunState::Running {
            // Window closed by the user rather than by terminate.
            shared.state.set(RunState::Terminated);
        }
        info!("run loop exited");
        result.map_err(HostError::from)
    }

    /// Ask the run loop to exit. Safe from inside a handler.
    ///
    /// Before `run` this makes the later `run` return immediately. After
    /// the loop has exited, or after destroy, it does nothing.
    pub fn terminate(&self) {
        self.shared.terminate();
    }

    /// Unbind every name and release the native surface.
    ///
    /// Idempotent. Not allowed from inside the run loop.
    pub fn destroy(&self) -> Result<(), HostError> {
        let shared = &*self.shared;
        if shared.in_loop.get() {
            return Err(LifecycleError::DestroyWhileRunning.into());
        }
        let Some(surface) = shared.surface.borrow_mut().take() else {
            return Ok(());
        };

        let names = shared.registry.borrow_mut().clear();
        for name in &names {
            if let Err(e) = surface.unbind(name) {
                warn!(name = %name, error = %e, "failed to unbind during destroy");
            }
        }
        surface.destroy();
        shared.state.set(RunState::Destroyed);
        info!(unbound = names.len(), "webview host destroyed");
        Ok(())
    }
}
