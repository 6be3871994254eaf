//! Routing of script calls to bound handlers.

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::binding::CallFailure;
use crate::bridge::{Invocation, Reply};
use crate::error::{DispatchError, HandlerError};
use crate::host::Shared;
use crate::surface::{CallSink, NativeSurface};

/// What became of one script call.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// The handler returned a value.
    Returned(Value),
    /// The call never reached a handler, or its arguments did not decode.
    ///
    /// Not fatal: the caller gets a failure reply and the session keeps
    /// running. Malformed argument payloads land here too, since they
    /// come from page script rather than from host code.
    Rejected(DispatchError),
    /// The handler failed or panicked.
    Failed(HandlerError),
}

impl Dispatched {
    /// The reply owed to the calling script.
    pub fn reply(&self) -> Reply {
        match self {
            Self::Returned(value) => Reply::Success(value.clone()),
            Self::Rejected(e) => Reply::Failure(e.to_string()),
            Self::Failed(e) => Reply::Failure(e.to_string()),
        }
    }

    /// Whether the session must end after replying.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Resolves calls against the host's registry and replies through the
/// surface. Lives for the duration of one `run`.
pub(crate) struct CallDispatcher<'a, S> {
    shared: &'a Shared<S>,
    surface: &'a S,
}

impl<'a, S: NativeSurface> CallDispatcher<'a, S> {
    pub(crate) fn new(shared: &'a Shared<S>, surface: &'a S) -> Self {
        Self { shared, surface }
    }

    pub(crate) fn dispatch(&self, call: &Invocation) -> Dispatched {
        let args: Vec<Value> = match serde_json::from_str(&call.raw_args) {
            Ok(args) => args,
            Err(e) => {
                return Dispatched::Rejected(DispatchError::MalformedArguments {
                    name: call.name.clone(),
                    reason: e.to_string(),
                })
            }
        };

        // The registry borrow ends here, so the handler may bind or unbind.
        let Some(handler) = self.shared.resolve(&call.name) else {
            return Dispatched::Rejected(DispatchError::UnknownBinding(call.name.clone()));
        };

        let arity = handler.arity();
        if !arity.accepts(args.len()) {
            return Dispatched::Rejected(DispatchError::ArityMismatch {
                name: call.name.clone(),
                expected: arity.expected().unwrap_or_default(),
                got: args.len(),
            });
        }

        match panic::catch_unwind(AssertUnwindSafe(|| handler.invoke(args))) {
            Ok(Ok(value)) => Dispatched::Returned(value),
            Ok(Err(CallFailure::Argument { index, reason })) => {
                Dispatched::Rejected(DispatchError::InvalidArgument {
                    name: call.name.clone(),
                    index,
                    reason,
                })
            }
            Ok(Err(CallFailure::Handler(e))) => Dispatched::Failed(e),
            Err(payload) => Dispatched::Failed(HandlerError::from_panic(payload)),
        }
    }
}

impl<S: NativeSurface> CallSink for CallDispatcher<'_, S> {
    fn on_call(&self, call: Invocation) {
        debug!(seq = %call.seq, name = %call.name, "dispatching script call");
        let outcome = self.dispatch(&call);

        match &outcome {
            Dispatched::Returned(_) => {}
            Dispatched::Rejected(e) => {
                warn!(seq = %call.seq, error = %e, "script call rejected");
            }
            Dispatched::Failed(e) => {
                error!(seq = %call.seq, name = %call.name, error = %e, "binding failed, terminating");
            }
        }

        if let Err(e) = self.surface.respond(&call.seq, &outcome.reply()) {
            warn!(seq = %call.seq, error = %e, "failed to deliver reply");
        }

        if outcome.is_fatal() {
            self.shared.terminate();
        }
    }
}
