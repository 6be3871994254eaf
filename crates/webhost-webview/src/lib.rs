//! Native window hosting a web view, with Rust functions callable from
//! page script.
//!
//! Provides:
//! - [`WebviewHost`]: lifecycle state machine over one native surface
//! - Named bindings: Rust closures exposed to script as promise-returning globals
//! - Call dispatch with a reply for every call, and fatal handler errors
//! - [`HostController`] for re-entrant control from inside handlers
//! - [`NativeSurface`] as the platform seam, with an in-memory
//!   [`HeadlessSurface`] and a `wry` + `winit` one behind `wry-surface`
//!
//! ```
//! use webhost_webview::{HeadlessSurface, Invocation, Reply, WebviewHost};
//!
//! let host = WebviewHost::<HeadlessSurface>::new(false)?;
//! host.bind("add", |a: i64, b: i64| Ok::<_, String>(a + b))?;
//!
//! let probe = host.surface()?.probe();
//! probe.push_call(Invocation::new("1", "add", "[2,3]"));
//! host.run()?;
//!
//! assert_eq!(probe.replies_for("1"), vec![Reply::Success(5.into())]);
//! # Ok::<(), webhost_webview::HostError>(())
//! ```

pub mod binding;
pub mod bridge;
pub mod dispatch;
pub mod error;
pub mod surface;

mod host;

pub use binding::{Arity, BindingRegistry, Handler, HandlerResult, IntoHandler};
pub use bridge::{Invocation, Reply};
pub use dispatch::Dispatched;
pub use error::{DispatchError, HandlerError, HostError, LifecycleError, SurfaceError};
pub use host::{HostController, HostOptions, RunState, WebviewHost};
pub use surface::{
    CallSink, HeadlessSurface, NativeSurface, Rgba, SizeHint, SurfaceOp, SurfaceProbe, WindowSize,
};

#[cfg(feature = "wry-surface")]
pub use surface::native::WrySurface;
