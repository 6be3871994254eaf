//! Functions the bundled page can call.

use std::convert::Infallible;

use serde_json::Value;
use webhost_webview::{Handler, HandlerError, HostError, NativeSurface, WebviewHost};

/// Binding names installed by [`install`], sorted.
pub const NAMES: [&str; 5] = ["add", "echo", "fail", "quit", "set_title"];

pub fn install<S: NativeSurface>(host: &WebviewHost<S>) -> Result<(), HostError> {
    host.bind("add", |a: f64, b: f64| Ok::<_, Infallible>(a + b))?;

    host.bind("echo", Handler::variadic(|args| Ok(Value::Array(args))))?;

    // Any failure reported by a binding ends the session.
    host.bind(
        "fail",
        Handler::variadic(|args| {
            let message = args
                .first()
                .and_then(Value::as_str)
                .unwrap_or("failure requested by page");
            Err(HandlerError::new(message))
        }),
    )?;

    let ctl = host.controller();
    host.bind("quit", move || {
        ctl.terminate();
        Ok::<_, Infallible>(())
    })?;

    let ctl = host.controller();
    host.bind("set_title", move |title: String| ctl.set_title(&title))?;

    tracing::debug!(count = NAMES.len(), "bindings installed");
    Ok(())
}
