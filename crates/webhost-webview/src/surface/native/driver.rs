//! `ApplicationHandler` that drives one [`WrySurface`] run on the shared loop.

use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::WrySurface;
use crate::error::SurfaceError;
use crate::surface::staging::{LoopEvent, LoopSignal};
use crate::surface::CallSink;

pub(super) struct Driver<'a> {
    surface: &'a WrySurface,
    sink: &'a dyn CallSink,
    failure: Option<SurfaceError>,
}

impl<'a> Driver<'a> {
    pub(super) fn new(surface: &'a WrySurface, sink: &'a dyn CallSink) -> Self {
        Self {
            surface,
            sink,
            failure: None,
        }
    }

    /// The error that stopped the loop early, if any.
    pub(super) fn finish(self) -> Result<(), SurfaceError> {
        self.failure.map_or(Ok(()), Err)
    }

    fn ensure_realized(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.window.borrow().is_some() || self.failure.is_some() {
            return;
        }
        if let Err(e) = self.surface.realize(event_loop) {
            error!(error = %e, "failed to realize native window");
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn exit_if_requested(&self, event_loop: &ActiveEventLoop) {
        if self.surface.exit_requested.get() {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<LoopSignal> for Driver<'_> {
    // A loop that already resumed for an earlier host starts later runs
    // with `Init` only.
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if cause == StartCause::Init {
            self.ensure_realized(event_loop);
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_realized(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if !self.surface.owns_window(window_id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                info!("window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.surface.sync_bounds();
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, signal: LoopSignal) {
        let Some(event) = signal.for_surface(self.surface.id) else {
            return;
        };
        match event {
            LoopEvent::CallsQueued => self.surface.drain_calls(self.sink),
            LoopEvent::PageLoadStarted => self.surface.replay_page_scripts(),
            LoopEvent::Exit => event_loop.exit(),
        }
        self.exit_if_requested(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_if_requested(event_loop);
    }
}
