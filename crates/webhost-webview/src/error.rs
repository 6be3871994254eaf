//! Error types for the host, its native surface, and call dispatch.

use thiserror::Error;

/// Errors raised by a [`NativeSurface`](crate::NativeSurface) primitive.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface creation failed: {0}")]
    Create(String),

    #[error("window error: {0}")]
    Window(String),

    #[error("webview error: {0}")]
    WebView(String),

    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("{0} needs a realized view")]
    NotRealized(&'static str),
}

/// An operation was issued in a lifecycle phase that cannot accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("`{op}` called after the host was destroyed")]
    Destroyed { op: &'static str },

    #[error("the run loop can only be entered once per host")]
    AlreadyRan,

    #[error("cannot destroy the host while its run loop is active")]
    DestroyWhileRunning,
}

/// Errors returned by [`WebviewHost`](crate::WebviewHost) operations.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to construct native surface: {0}")]
    Construction(#[source] SurfaceError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("invalid binding name {0:?}")]
    InvalidBindingName(String),

    #[error("color channel {channel} = {value} is outside 0..1")]
    InvalidColor { channel: &'static str, value: f64 },
}

/// A script call that could not be handed to its handler.
///
/// Reported back to the caller as a failure; the session keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("malformed arguments for `{name}`: {reason}")]
    MalformedArguments { name: String, reason: String },

    #[error("no binding named `{0}`")]
    UnknownBinding(String),

    #[error("`{name}` takes {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("argument {index} of `{name}`: {reason}")]
    InvalidArgument {
        name: String,
        index: usize,
        reason: String,
    },
}

/// A binding handler failed. Fatal to the session: the host terminates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Build from a payload caught by `catch_unwind`.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::new(format!("handler panicked: {detail}"))
    }
}
