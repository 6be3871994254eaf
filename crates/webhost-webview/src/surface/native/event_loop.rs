//! The one `winit` event loop every surface on this thread shares.
//!
//! winit refuses to build a second `EventLoop` in a process, so the loop
//! is built on first use and lent to each surface's `run`. Runs use
//! `run_app_on_demand`, which hands control back when the app exits and
//! leaves the loop usable for the next host.

use std::cell::RefCell;

use tracing::debug;
use winit::application::ApplicationHandler;
use winit::event_loop::{EventLoop, EventLoopProxy};
use winit::platform::run_on_demand::EventLoopExtRunOnDemand;

use crate::error::SurfaceError;
use crate::surface::staging::LoopSignal;

#[derive(Default)]
struct Slot {
    /// `None` while a run has it on loan.
    event_loop: Option<EventLoop<LoopSignal>>,
    proxy: Option<EventLoopProxy<LoopSignal>>,
}

thread_local! {
    static SHARED: RefCell<Slot> = RefCell::new(Slot::default());
}

/// Proxy into the shared loop, building the loop on first use.
pub(super) fn proxy() -> Result<EventLoopProxy<LoopSignal>, SurfaceError> {
    SHARED.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(proxy) = &slot.proxy {
            return Ok(proxy.clone());
        }
        let event_loop = EventLoop::<LoopSignal>::with_user_event()
            .build()
            .map_err(|e| SurfaceError::Create(e.to_string()))?;
        let proxy = event_loop.create_proxy();
        slot.event_loop = Some(event_loop);
        slot.proxy = Some(proxy.clone());
        debug!("shared event loop built");
        Ok(proxy)
    })
}

/// Drive `app` on the shared loop until it exits.
pub(super) fn run_app(app: &mut impl ApplicationHandler<LoopSignal>) -> Result<(), SurfaceError> {
    let mut event_loop = SHARED.with(|slot| {
        let mut slot = slot.borrow_mut();
        match (slot.event_loop.take(), slot.proxy.is_some()) {
            (Some(event_loop), _) => Ok(event_loop),
            (None, true) => Err(SurfaceError::EventLoop(
                "event loop is already running on this thread".into(),
            )),
            (None, false) => Err(SurfaceError::EventLoop(
                "event loop was never built on this thread".into(),
            )),
        }
    })?;

    let result = event_loop.run_app_on_demand(app);
    SHARED.with(|slot| slot.borrow_mut().event_loop = Some(event_loop));
    result.map_err(|e| SurfaceError::EventLoop(e.to_string()))
}
