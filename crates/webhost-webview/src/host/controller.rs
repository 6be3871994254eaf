use std::fmt;
use std::rc::{Rc, Weak};

use super::{RunState, Shared};
use crate::binding::IntoHandler;
use crate::error::{HostError, LifecycleError};
use crate::surface::NativeSurface;

/// A weak handle to a [`WebviewHost`](super::WebviewHost).
///
/// Handlers capture one of these to stop the loop, evaluate script, or
/// change bindings while a call is in flight. It does not keep the host
/// alive; once the host is gone every operation reports it destroyed.
pub struct HostController<S: NativeSurface> {
    shared: Weak<Shared<S>>,
}

impl<S: NativeSurface> HostController<S> {
    pub(super) fn new(shared: Weak<Shared<S>>) -> Self {
        Self { shared }
    }

    fn upgrade(&self, op: &'static str) -> Result<Rc<Shared<S>>, HostError> {
        self.shared
            .upgrade()
            .ok_or(HostError::Lifecycle(LifecycleError::Destroyed { op }))
    }

    pub fn state(&self) -> RunState {
        self.shared
            .upgrade()
            .map_or(RunState::Destroyed, |shared| shared.state())
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Same as [`WebviewHost::terminate`](super::WebviewHost::terminate).
    pub fn terminate(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.terminate();
        }
    }

    pub fn eval(&self, js: &str) -> Result<(), HostError> {
        self.upgrade("eval")?.with_surface("eval", |s| s.eval(js))
    }

    pub fn navigate(&self, url: &str) -> Result<(), HostError> {
        self.upgrade("navigate")?
            .with_surface("navigate", |s| s.navigate(url))
    }

    pub fn set_title(&self, title: &str) -> Result<(), HostError> {
        self.upgrade("set_title")?
            .with_surface("set_title", |s| s.set_title(title))
    }

    pub fn bind<M>(&self, name: &str, handler: impl IntoHandler<M>) -> Result<(), HostError> {
        self.upgrade("bind")?.bind(name, handler.into_handler())
    }

    pub fn unbind(&self, name: &str) -> Result<(), HostError> {
        self.upgrade("unbind")?.unbind(name)
    }
}

impl<S: NativeSurface> Clone for HostController<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S: NativeSurface> fmt::Debug for HostController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostController")
            .field("state", &self.state())
            .finish()
    }
}
