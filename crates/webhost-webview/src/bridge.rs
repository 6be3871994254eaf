//! Script-side protocol between the view and the host.
//!
//! Messages flow in both directions:
//! - **JS -> Rust**: calling a bound function `window.add(2, 3)` posts
//!   `{"id": "<seq>", "method": "add", "params": [2, 3]}` through
//!   `window.ipc.postMessage` and returns a Promise.
//! - **Rust -> JS**: the host answers by evaluating
//!   `window.__webhost__.settle(seq, status, value)`, which resolves
//!   (`status == 0`) or rejects the pending Promise for `seq`.

use serde::Deserialize;
use serde_json::Value;

/// One script-originated call awaiting a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Correlation token chosen by the script side.
    pub seq: String,
    /// Name of the bound function.
    pub name: String,
    /// Arguments as a serialized JSON array.
    pub raw_args: String,
}

impl Invocation {
    pub fn new(seq: impl Into<String>, name: impl Into<String>, raw_args: impl Into<String>) -> Self {
        Self {
            seq: seq.into(),
            name: name.into(),
            raw_args: raw_args.into(),
        }
    }

    /// Parse an IPC body posted by the bridge script.
    ///
    /// Returns `None` when the body is not a call envelope; such messages
    /// carry no sequence id, so nothing can be replied to.
    pub fn from_ipc(body: &str) -> Option<Self> {
        let wire: WireCall = serde_json::from_str(body).ok()?;
        let seq = match wire.id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(Self {
            seq,
            name: wire.method,
            raw_args: wire.params.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct WireCall {
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

/// Outcome delivered back to the script caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Success(Value),
    Failure(String),
}

impl Reply {
    /// Status code on the wire: 0 resolves the Promise, anything else rejects it.
    pub fn status(&self) -> i32 {
        match self {
            Self::Success(_) => 0,
            Self::Failure(_) => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Rejection for calls still queued when the run loop exits.
    pub fn session_terminated() -> Self {
        Self::Failure(SESSION_TERMINATED.to_string())
    }
}

/// Failure text sent to calls the run loop never delivered.
pub const SESSION_TERMINATED: &str = "session terminated";

/// Installs `window.__webhost__`. Injected before every page load.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    if (window.__webhost__) {
        return;
    }
    var pending = {};
    var nextSeq = 1;
    window.__webhost__ = {
        call: function(name, args) {
            var seq = String(nextSeq++);
            return new Promise(function(resolve, reject) {
                pending[seq] = { resolve: resolve, reject: reject };
                window.ipc.postMessage(JSON.stringify({
                    id: seq,
                    method: name,
                    params: args
                }));
            });
        },
        settle: function(seq, status, value) {
            var entry = pending[seq];
            if (!entry) {
                return;
            }
            delete pending[seq];
            if (status === 0) {
                entry.resolve(value);
            } else {
                entry.reject(new Error(value));
            }
        },
        bind: function(name) {
            window[name] = function() {
                return window.__webhost__.call(name, Array.prototype.slice.call(arguments));
            };
        },
        unbind: function(name) {
            delete window[name];
        }
    };
})();
"#;

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script that exposes `name` as a Promise-returning global function.
pub fn js_bind(name: &str) -> String {
    format!("window.__webhost__.bind({});", js_string(name))
}

/// Script that removes a previously bound global function.
pub fn js_unbind(name: &str) -> String {
    format!("window.__webhost__.unbind({});", js_string(name))
}

/// Script that settles the pending call `seq` with `reply`.
pub fn js_settle(seq: &str, reply: &Reply) -> String {
    let value = match reply {
        Reply::Success(value) => serde_json::to_string(value).unwrap_or_else(|_| "null".to_string()),
        Reply::Failure(message) => js_string(message),
    };
    format!(
        "window.__webhost__.settle({}, {}, {});",
        js_string(seq),
        reply.status(),
        value
    )
}
