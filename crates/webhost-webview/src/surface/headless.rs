//! In-memory surface with no window system behind it.
//!
//! Records every primitive it receives and plays a queue of scripted
//! calls from its run loop. Once the queue is empty the loop behaves as
//! if the user closed the window. Observations go through a
//! [`SurfaceProbe`], which stays readable after the host has destroyed
//! the surface itself.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;

use tracing::debug;

use super::{CallSink, NativeSurface, Rgba, WindowSize};
use crate::bridge::{Invocation, Reply};
use crate::error::SurfaceError;

/// One primitive received by a [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    SetTitle(String),
    Show(bool),
    HideFromDock(bool),
    SetPos(i32, i32),
    SetBg(Rgba),
    SetSize(WindowSize),
    Navigate(String),
    Eval(String),
    Init(String),
    Bind(String),
    Unbind(String),
    Run,
    Terminate,
    Destroy,
}

/// Shared view into a [`HeadlessSurface`]: what it recorded, and the
/// queue of calls its loop will deliver.
#[derive(Debug, Default)]
pub struct SurfaceProbe {
    ops: RefCell<Vec<SurfaceOp>>,
    replies: RefCell<Vec<(String, Reply)>>,
    bound: RefCell<BTreeSet<String>>,
    calls: RefCell<VecDeque<Invocation>>,
    delivered: Cell<usize>,
    terminate_count: Cell<usize>,
    destroy_count: Cell<usize>,
}

impl SurfaceProbe {
    /// Queue a script call for the run loop. May be used while it runs.
    pub fn push_call(&self, call: Invocation) {
        self.calls.borrow_mut().push_back(call);
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.borrow().clone()
    }

    /// Replies in the order they were sent.
    pub fn replies(&self) -> Vec<(String, Reply)> {
        self.replies.borrow().clone()
    }

    /// All replies sent for `seq`.
    pub fn replies_for(&self, seq: &str) -> Vec<Reply> {
        self.replies
            .borrow()
            .iter()
            .filter(|(s, _)| s == seq)
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Names currently bound on the surface, sorted.
    pub fn bound_names(&self) -> Vec<String> {
        self.bound.borrow().iter().cloned().collect()
    }

    pub fn pending_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn delivered_calls(&self) -> usize {
        self.delivered.get()
    }

    pub fn terminate_count(&self) -> usize {
        self.terminate_count.get()
    }

    pub fn destroy_count(&self) -> usize {
        self.destroy_count.get()
    }

    fn record(&self, op: SurfaceOp) {
        self.ops.borrow_mut().push(op);
    }
}

/// A [`NativeSurface`] that runs entirely in memory.
#[derive(Debug)]
pub struct HeadlessSurface {
    debug: bool,
    probe: Rc<SurfaceProbe>,
    position: Cell<(i32, i32)>,
    exit_requested: Cell<bool>,
}

impl HeadlessSurface {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            probe: Rc::new(SurfaceProbe::default()),
            position: Cell::new((0, 0)),
            exit_requested: Cell::new(false),
        }
    }

    pub fn probe(&self) -> Rc<SurfaceProbe> {
        Rc::clone(&self.probe)
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl NativeSurface for HeadlessSurface {
    fn create(debug: bool) -> Result<Self, SurfaceError> {
        Ok(Self::new(debug))
    }

    fn set_title(&self, title: &str) -> Result<(), SurfaceError> {
        self.probe.record(SurfaceOp::SetTitle(title.to_string()));
        Ok(())
    }

    fn show(&self, visible: bool) -> Result<(), SurfaceError> {
        self.probe.record(SurfaceOp::Show(visible));
        Ok(())
    }

    fn hide_from_dock(&self, hide: bool) -> Result<(), SurfaceError> {
        self.probe.record(SurfaceOp::HideFromDock(hide));
        Ok(())
    }

    fn set_pos(&self, x: i32, y: i32) -> Result<(), SurfaceError> {
        self.position.set((x, y));
        self.probe.record(SurfaceOp::SetPos(x, y));
        Ok(())
    }

    fn get_x(&self) -> i32 {
        self.position.get().0
    }

    fn set_bg(&self, color: Rgba) -> Result<(), SurfaceError> {
        self.probe.record(SurfaceOp::SetBg(color));
        Ok(())
    }

    fn set_size(&self, size: WindowSize) -> Result<(), SurfaceError> {
        self.probe.record(SurfaceOp::SetSize(size));
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<(), SurfaceError> {
        self.probe.record(SurfaceOp::Navigate(url.to_string()));
        Ok(())
    }

    fn eval(&self, js: &str) -> Result<(), SurfaceError> {
        self.probe.record(SurfaceOp::Eval(js.to_string()));
        Ok(())
    }

    fn init(&self, js: &str) -> Result<(), SurfaceError> {
        self.probe.record(SurfaceOp::Init(js.to_string()));
        Ok(())
    }

    fn bind(&self, name: &str) -> Result<(), SurfaceError> {
        self.probe.bound.borrow_mut().insert(name.to_string());
        self.probe.record(SurfaceOp::Bind(name.to_string()));
        Ok(())
    }

    fn unbind(&self, name: &str) -> Result<(), SurfaceError> {
        self.probe.bound.borrow_mut().remove(name);
        self.probe.record(SurfaceOp::Unbind(name.to_string()));
        Ok(())
    }

    fn respond(&self, seq: &str, reply: &Reply) -> Result<(), SurfaceError> {
        self.probe
            .replies
            .borrow_mut()
            .push((seq.to_string(), reply.clone()));
        Ok(())
    }

    fn run(&self, sink: &dyn CallSink) -> Result<(), SurfaceError> {
        self.probe.record(SurfaceOp::Run);
        self.exit_requested.set(false);

        while !self.exit_requested.get() {
            // Release the queue borrow before dispatching: handlers may push.
            let next = self.probe.calls.borrow_mut().pop_front();
            let Some(call) = next else {
                debug!("headless surface: call queue drained, closing window");
                break;
            };
            self.probe.delivered.set(self.probe.delivered.get() + 1);
            sink.on_call(call);
        }

        let abandoned: Vec<Invocation> = self.probe.calls.borrow_mut().drain(..).collect();
        if !abandoned.is_empty() {
            debug!(count = abandoned.len(), "headless surface: settling undelivered calls");
        }
        for call in abandoned {
            self.respond(&call.seq, &Reply::session_terminated())?;
        }

        Ok(())
    }

    fn terminate(&self) {
        self.probe.record(SurfaceOp::Terminate);
        self.probe
            .terminate_count
            .set(self.probe.terminate_count.get() + 1);
        self.exit_requested.set(true);
    }

    fn destroy(&self) {
        self.probe.record(SurfaceOp::Destroy);
        self.probe.destroy_count.set(self.probe.destroy_count.get() + 1);
    }
}
