//! [`NativeSurface`] backed by a `winit` window with a `wry` child web view.
//!
//! All surfaces share one process-wide event loop (see [`event_loop`]).
//! Each surface keeps its own window state and tags the wake-ups it posts
//! with its [`SurfaceId`], so hosts can be created and run one after
//! another.
//!
//! The window and web view only exist once the event loop has resumed, so
//! primitives issued before `run` are recorded in a [`PendingWindow`] and
//! applied when the view is realized. Script calls arrive on the IPC
//! handler, are queued, and are handed to the [`CallSink`] from the loop.
//!
//! Platform notes: `hide_from_dock` switches the activation policy on
//! macOS, maps to "skip taskbar" on Windows and is unsupported elsewhere.
//! Scripts added with `init` after the view exists run immediately and
//! again at the start of every later page load.

mod bounds;
mod dock;
mod driver;
mod event_loop;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use winit::dpi::LogicalPosition;
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::window::{Window, WindowAttributes, WindowId};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use super::staging::{LoopEvent, LoopSignal, PageScripts, SurfaceId};
use super::{CallSink, NativeSurface, Rgba, WindowSize};
use crate::bridge::{self, Invocation, Reply};
use crate::error::SurfaceError;

use driver::Driver;

const BLANK_PAGE: &str = "<html><body></body></html>";

/// Window state recorded before the view is realized.
#[derive(Debug)]
struct PendingWindow {
    title: String,
    position: Option<(i32, i32)>,
    size: WindowSize,
    visible: bool,
    background: (u8, u8, u8, u8),
    /// Last explicit `hide_from_dock` request.
    hide_from_dock: Option<bool>,
    url: Option<String>,
}

impl Default for PendingWindow {
    fn default() -> Self {
        Self {
            title: String::new(),
            position: None,
            size: WindowSize::default(),
            visible: true,
            background: (255, 255, 255, 255),
            hide_from_dock: None,
            url: None,
        }
    }
}

/// A top-level window with an embedded web view.
pub struct WrySurface {
    id: SurfaceId,
    debug: bool,
    proxy: EventLoopProxy<LoopSignal>,
    pending: RefCell<PendingWindow>,
    scripts: RefCell<PageScripts>,
    window: RefCell<Option<Window>>,
    webview: RefCell<Option<WebView>>,
    calls: Arc<Mutex<VecDeque<Invocation>>>,
    exit_requested: Cell<bool>,
}

impl WrySurface {
    fn with_webview(
        &self,
        op: &'static str,
        f: impl FnOnce(&WebView) -> Result<(), wry::Error>,
    ) -> Result<(), SurfaceError> {
        let webview = self.webview.borrow();
        let webview = webview.as_ref().ok_or(SurfaceError::NotRealized(op))?;
        f(webview).map_err(|e| SurfaceError::WebView(e.to_string()))
    }

    fn is_realized(&self) -> bool {
        self.webview.borrow().is_some()
    }

    fn signal(&self, event: LoopEvent) -> LoopSignal {
        LoopSignal::new(self.id, event)
    }

    fn owns_window(&self, id: WindowId) -> bool {
        self.window.borrow().as_ref().is_some_and(|w| w.id() == id)
    }

    /// Evaluate a script produced by [`PageScripts`] in the current page.
    fn eval_now(&self, op: &'static str, js: Option<String>) -> Result<(), SurfaceError> {
        match js {
            Some(js) => self.with_webview(op, |wv| wv.evaluate_script(&js)),
            None => Ok(()),
        }
    }

    /// Create the window and web view from the recorded state.
    fn realize(&self, event_loop: &ActiveEventLoop) -> Result<(), SurfaceError> {
        let pending = self.pending.borrow();

        let mut attrs = WindowAttributes::default()
            .with_title(pending.title.clone())
            .with_visible(pending.visible);
        if let Some((x, y)) = pending.position {
            attrs = attrs.with_position(LogicalPosition::new(x, y));
        }
        let attrs = bounds::size_attributes(attrs, pending.size);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| SurfaceError::Window(e.to_string()))?;

        // The application has finished launching by now, so a policy set
        // earlier may have been reset.
        if let Some(hide) = pending.hide_from_dock {
            if let Err(e) = dock::apply(hide, Some(&window)) {
                warn!(error = %e, "failed to apply dock visibility");
            }
        }

        let (init, evals) = self.scripts.borrow_mut().bake();

        let calls = Arc::clone(&self.calls);
        let ipc_proxy = self.proxy.clone();
        let load_proxy = self.proxy.clone();
        let calls_queued = self.signal(LoopEvent::CallsQueued);
        let load_started = self.signal(LoopEvent::PageLoadStarted);

        let builder = WebViewBuilder::new()
            .with_bounds(bounds::window_content_rect(&window, pending.size.margin_top))
            .with_devtools(self.debug)
            .with_background_color(pending.background)
            .with_initialization_script(&init)
            .with_ipc_handler(move |request| {
                let body = request.body();
                let Some(call) = Invocation::from_ipc(body) else {
                    warn!(body_len = body.len(), "IPC message rejected: not a call envelope");
                    return;
                };
                if let Ok(mut queue) = calls.lock() {
                    queue.push_back(call);
                }
                let _ = ipc_proxy.send_event(calls_queued);
            })
            .with_on_page_load_handler(move |event, url| {
                debug!(url = %url, "page load");
                if let PageLoadEvent::Started = event {
                    let _ = load_proxy.send_event(load_started);
                }
            });

        let builder = match &pending.url {
            Some(url) => builder.with_url(url.as_str()),
            None => builder.with_html(BLANK_PAGE),
        };

        let webview = builder
            .build_as_child(&window)
            .map_err(|e| SurfaceError::WebView(e.to_string()))?;

        for js in &evals {
            if let Err(e) = webview.evaluate_script(js) {
                warn!(error = %e, "deferred eval failed");
            }
        }

        *self.window.borrow_mut() = Some(window);
        *self.webview.borrow_mut() = Some(webview);
        debug!("native window realized");
        Ok(())
    }

    /// Hand queued calls to `sink` until the queue is empty or exit is requested.
    fn drain_calls(&self, sink: &dyn CallSink) {
        while !self.exit_requested.get() {
            // The lock must be released before dispatch: handlers can re-enter.
            let next = match self.calls.lock() {
                Ok(mut queue) => queue.pop_front(),
                Err(_) => None,
            };
            let Some(call) = next else { break };
            sink.on_call(call);
        }
    }

    /// Answer calls the loop exited without delivering.
    fn settle_undelivered(&self) {
        let undelivered: Vec<Invocation> = match self.calls.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        if undelivered.is_empty() || !self.is_realized() {
            return;
        }
        debug!(count = undelivered.len(), "settling undelivered calls");
        for call in undelivered {
            if let Err(e) = self.respond(&call.seq, &Reply::session_terminated()) {
                warn!(seq = %call.seq, error = %e, "failed to settle undelivered call");
            }
        }
    }

    fn replay_page_scripts(&self) {
        let scripts = self.scripts.borrow().page_load_replay();
        for js in &scripts {
            if let Err(e) = self.with_webview("init", |wv| wv.evaluate_script(js)) {
                warn!(error = %e, "failed to replay page script");
            }
        }
    }

    fn sync_bounds(&self) {
        let window = self.window.borrow();
        let webview = self.webview.borrow();
        if let (Some(window), Some(webview)) = (window.as_ref(), webview.as_ref()) {
            let margin_top = self.pending.borrow().size.margin_top;
            if let Err(e) = webview.set_bounds(bounds::window_content_rect(window, margin_top)) {
                warn!(error = %e, "failed to resize web view");
            }
        }
    }
}

impl NativeSurface for WrySurface {
    fn create(debug: bool) -> Result<Self, SurfaceError> {
        let proxy = event_loop::proxy()?;
        let id = SurfaceId::next();
        debug!(surface = ?id, "native surface created");
        Ok(Self {
            id,
            debug,
            proxy,
            pending: RefCell::new(PendingWindow::default()),
            scripts: RefCell::new(PageScripts::default()),
            window: RefCell::new(None),
            webview: RefCell::new(None),
            calls: Arc::new(Mutex::new(VecDeque::new())),
            exit_requested: Cell::new(false),
        })
    }

    fn set_title(&self, title: &str) -> Result<(), SurfaceError> {
        self.pending.borrow_mut().title = title.to_string();
        if let Some(window) = self.window.borrow().as_ref() {
            window.set_title(title);
        }
        Ok(())
    }

    fn show(&self, visible: bool) -> Result<(), SurfaceError> {
        self.pending.borrow_mut().visible = visible;
        if let Some(window) = self.window.borrow().as_ref() {
            window.set_visible(visible);
        }
        Ok(())
    }

    fn hide_from_dock(&self, hide: bool) -> Result<(), SurfaceError> {
        self.pending.borrow_mut().hide_from_dock = Some(hide);
        dock::apply(hide, self.window.borrow().as_ref())
    }

    fn set_pos(&self, x: i32, y: i32) -> Result<(), SurfaceError> {
        self.pending.borrow_mut().position = Some((x, y));
        if let Some(window) = self.window.borrow().as_ref() {
            window.set_outer_position(LogicalPosition::new(x, y));
        }
        Ok(())
    }

    fn get_x(&self) -> i32 {
        if let Some(window) = self.window.borrow().as_ref() {
            if let Ok(pos) = window.outer_position() {
                return pos.to_logical::<i32>(window.scale_factor()).x;
            }
        }
        self.pending.borrow().position.map_or(0, |(x, _)| x)
    }

    fn set_bg(&self, color: Rgba) -> Result<(), SurfaceError> {
        let rgba = color.to_u8();
        self.pending.borrow_mut().background = rgba;
        if self.is_realized() {
            self.with_webview("set_bg", |wv| wv.set_background_color(rgba))?;
        }
        Ok(())
    }

    fn set_size(&self, size: WindowSize) -> Result<(), SurfaceError> {
        self.pending.borrow_mut().size = size;
        if let Some(window) = self.window.borrow().as_ref() {
            bounds::apply_size(window, size);
        }
        self.sync_bounds();
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<(), SurfaceError> {
        self.pending.borrow_mut().url = Some(url.to_string());
        if self.is_realized() {
            self.with_webview("navigate", |wv| wv.load_url(url))?;
        }
        Ok(())
    }

    fn eval(&self, js: &str) -> Result<(), SurfaceError> {
        if self.is_realized() {
            return self.with_webview("eval", |wv| wv.evaluate_script(js));
        }
        self.scripts.borrow_mut().defer_eval(js);
        Ok(())
    }

    fn init(&self, js: &str) -> Result<(), SurfaceError> {
        let now = self.scripts.borrow_mut().add_init(js);
        self.eval_now("init", now)
    }

    fn bind(&self, name: &str) -> Result<(), SurfaceError> {
        let now = self.scripts.borrow_mut().bind(name);
        self.eval_now("bind", now)
    }

    fn unbind(&self, name: &str) -> Result<(), SurfaceError> {
        let now = self.scripts.borrow_mut().unbind(name);
        self.eval_now("unbind", now)
    }

    fn respond(&self, seq: &str, reply: &Reply) -> Result<(), SurfaceError> {
        let js = bridge::js_settle(seq, reply);
        self.with_webview("respond", |wv| wv.evaluate_script(&js))
    }

    fn run(&self, sink: &dyn CallSink) -> Result<(), SurfaceError> {
        self.exit_requested.set(false);

        let mut driver = Driver::new(self, sink);
        let looped = event_loop::run_app(&mut driver);
        let finished = driver.finish();
        self.settle_undelivered();
        looped?;
        finished
    }

    fn terminate(&self) {
        self.exit_requested.set(true);
        if self.proxy.send_event(self.signal(LoopEvent::Exit)).is_err() {
            debug!("event loop already closed");
        }
    }

    fn destroy(&self) {
        self.webview.borrow_mut().take();
        self.window.borrow_mut().take();
        debug!(surface = ?self.id, "native window released");
    }
}
