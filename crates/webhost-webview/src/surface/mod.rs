//! The contract with the native window + web rendering component.
//!
//! A [`NativeSurface`] owns one window and its view. The host drives it
//! exclusively through these primitives; everything platform-specific
//! stays behind the trait.

mod headless;
#[cfg(feature = "wry-surface")]
pub mod native;
mod staging;

pub use headless::{HeadlessSurface, SurfaceOp, SurfaceProbe};

use crate::bridge::{Invocation, Reply};
use crate::error::SurfaceError;

/// How a [`WindowSize`] constrains the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeHint {
    /// Initial size, freely resizable.
    #[default]
    None,
    /// Minimum size.
    Min,
    /// Maximum size.
    Max,
    /// Fixed size, not resizable.
    Fixed,
}

impl SizeHint {
    /// Native integer code (0 = none, 1 = min, 2 = max, 3 = fixed).
    pub fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Min => 1,
            Self::Max => 2,
            Self::Fixed => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Min),
            2 => Some(Self::Max),
            3 => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Window dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
    pub hint: SizeHint,
    /// Space kept free above the web content (title bar area).
    pub margin_top: u32,
}

impl WindowSize {
    pub const DEFAULT_MARGIN_TOP: u32 = 26;

    /// A resizable size with the default top margin.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            hint: SizeHint::None,
            margin_top: Self::DEFAULT_MARGIN_TOP,
        }
    }

    pub fn with_hint(mut self, hint: SizeHint) -> Self {
        self.hint = hint;
        self
    }

    pub fn with_margin_top(mut self, margin_top: u32) -> Self {
        self.margin_top = margin_top;
        self
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Background color with unit-float channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// First channel outside `0.0..=1.0` (NaN included), if any.
    pub fn out_of_range(&self) -> Option<(&'static str, f64)> {
        [("r", self.r), ("g", self.g), ("b", self.b), ("a", self.a)]
            .into_iter()
            .find(|(_, v)| !(0.0..=1.0).contains(v))
    }

    /// Channels scaled to 8 bits.
    pub fn to_u8(&self) -> (u8, u8, u8, u8) {
        let scale = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b), scale(self.a))
    }
}

/// Receives script calls from a running surface.
///
/// The surface invokes this on its loop thread, one call at a time, in
/// the order the calls arrived.
pub trait CallSink {
    fn on_call(&self, call: Invocation);
}

/// Primitive operations of a native window hosting a web view.
///
/// All methods take `&self`: a surface is re-entered from inside its own
/// run loop (a binding handler may evaluate script or terminate while a
/// call is being dispatched), so implementations keep their mutable
/// state behind cells.
pub trait NativeSurface {
    /// Create the window and view. `debug` enables developer tools.
    fn create(debug: bool) -> Result<Self, SurfaceError>
    where
        Self: Sized;

    fn set_title(&self, title: &str) -> Result<(), SurfaceError>;

    fn show(&self, visible: bool) -> Result<(), SurfaceError>;

    fn hide_from_dock(&self, hide: bool) -> Result<(), SurfaceError>;

    fn set_pos(&self, x: i32, y: i32) -> Result<(), SurfaceError>;

    /// Current outer x position in logical pixels.
    fn get_x(&self) -> i32;

    fn set_bg(&self, color: Rgba) -> Result<(), SurfaceError>;

    fn set_size(&self, size: WindowSize) -> Result<(), SurfaceError>;

    fn navigate(&self, url: &str) -> Result<(), SurfaceError>;

    /// Evaluate script in the current page.
    fn eval(&self, js: &str) -> Result<(), SurfaceError>;

    /// Inject script that runs before each page load.
    fn init(&self, js: &str) -> Result<(), SurfaceError>;

    /// Expose `name` to page script. Calls to it are delivered to the
    /// [`CallSink`] passed to [`run`](Self::run).
    fn bind(&self, name: &str) -> Result<(), SurfaceError>;

    fn unbind(&self, name: &str) -> Result<(), SurfaceError>;

    /// Deliver the reply for call `seq` to the script caller.
    fn respond(&self, seq: &str, reply: &Reply) -> Result<(), SurfaceError>;

    /// Block in the event loop until [`terminate`](Self::terminate) is
    /// called or the window is closed.
    ///
    /// Calls still queued when the loop exits never reach the sink; each
    /// is answered with [`Reply::session_terminated`] instead.
    fn run(&self, sink: &dyn CallSink) -> Result<(), SurfaceError>;

    /// Ask a running loop to exit.
    fn terminate(&self);

    /// Release the window and view.
    fn destroy(&self);
}
