//! Host functions exposed to page script.
//!
//! A [`Handler`] takes the call's arguments as JSON values and returns a
//! JSON value or a [`HandlerError`]. Plain closures with typed positional
//! parameters convert into handlers through [`IntoHandler`]:
//!
//! ```
//! use webhost_webview::{Handler, IntoHandler};
//!
//! let add = (|a: i64, b: i64| Ok::<_, String>(a + b)).into_handler();
//! assert_eq!(add.arity().expected(), Some(2));
//!
//! let count = Handler::variadic(|args| Ok(serde_json::json!(args.len())));
//! assert_eq!(count.arity().expected(), None);
//! ```

mod registry;

pub use registry::BindingRegistry;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::HandlerError;

pub type HandlerResult = Result<Value, HandlerError>;

/// How many arguments a handler accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => n == count,
            Self::Variadic => true,
        }
    }

    /// The exact count, or `None` for variadic handlers.
    pub fn expected(self) -> Option<usize> {
        match self {
            Self::Exact(n) => Some(n),
            Self::Variadic => None,
        }
    }
}

/// Why a handler invocation did not produce a value.
#[derive(Debug)]
pub(crate) enum CallFailure {
    /// An argument did not decode into the parameter type.
    Argument { index: usize, reason: String },
    Handler(HandlerError),
}

type BoxedFn = Box<dyn Fn(Vec<Value>) -> Result<Value, CallFailure>>;

/// A registered host function.
pub struct Handler {
    arity: Arity,
    func: BoxedFn,
}

impl Handler {
    /// A handler that receives the full argument list, whatever its length.
    pub fn variadic<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> HandlerResult + 'static,
    {
        Self::from_raw(Arity::Variadic, move |args| f(args).map_err(CallFailure::Handler))
    }

    /// A handler over raw JSON values with a declared argument count.
    pub fn with_arity<F>(count: usize, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> HandlerResult + 'static,
    {
        Self::from_raw(Arity::Exact(count), move |args| f(args).map_err(CallFailure::Handler))
    }

    fn from_raw<F>(arity: Arity, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, CallFailure> + 'static,
    {
        Self {
            arity,
            func: Box::new(f),
        }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Call with arguments whose count already matches [`arity`](Self::arity).
    pub(crate) fn invoke(&self, args: Vec<Value>) -> Result<Value, CallFailure> {
        (self.func)(args)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Conversion into a [`Handler`].
///
/// Implemented for [`Handler`] itself and for closures taking up to four
/// deserializable parameters and returning `Result<R, E>` where `R`
/// serializes and `E` displays. The closure's parameter count becomes the
/// handler's arity. `Marker` only disambiguates the implementations.
pub trait IntoHandler<Marker> {
    fn into_handler(self) -> Handler;
}

impl IntoHandler<Handler> for Handler {
    fn into_handler(self) -> Handler {
        self
    }
}

fn decode_arg<T: DeserializeOwned>(
    args: &mut std::vec::IntoIter<Value>,
    index: usize,
) -> Result<T, CallFailure> {
    let value = args.next().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| CallFailure::Argument {
        index,
        reason: e.to_string(),
    })
}

fn encode_return<R: Serialize, E: fmt::Display>(result: Result<R, E>) -> Result<Value, CallFailure> {
    let value = result.map_err(|e| CallFailure::Handler(HandlerError::new(e.to_string())))?;
    serde_json::to_value(value).map_err(|e| {
        CallFailure::Handler(HandlerError::new(format!(
            "return value could not be serialized: {e}"
        )))
    })
}

macro_rules! impl_into_handler {
    ($count:expr; $($arg:ident: $ty:ident => $idx:expr),*) => {
        impl<F, R, E, $($ty,)*> IntoHandler<fn($($ty,)*) -> Result<R, E>> for F
        where
            F: Fn($($ty),*) -> Result<R, E> + 'static,
            R: Serialize,
            E: fmt::Display,
            $($ty: DeserializeOwned,)*
        {
            #[allow(unused_mut, unused_variables)]
            fn into_handler(self) -> Handler {
                Handler::from_raw(Arity::Exact($count), move |args: Vec<Value>| {
                    let mut args = args.into_iter();
                    $(let $arg: $ty = decode_arg(&mut args, $idx)?;)*
                    encode_return((self)($($arg),*))
                })
            }
        }
    };
}

impl_into_handler!(0;);
impl_into_handler!(1; a: A => 0);
impl_into_handler!(2; a: A => 0, b: B => 1);
impl_into_handler!(3; a: A => 0, b: B => 1, c: C => 2);
impl_into_handler!(4; a: A => 0, b: B => 1, c: C => 2, d: D => 3);
