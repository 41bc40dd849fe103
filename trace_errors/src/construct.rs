//! Constructors returning type-erased errors.
//!
//! Every constructor is `#[track_caller]` and captures exactly one location:
//! the line of application code that called it. The `wrap` family treats a
//! missing error as a no-op and returns `None` without allocating.
//!
//! Capture breaks if a closure sits between a constructor and
//! [`Location::capture`], which is why the wrapping paths below `match`
//! instead of using `Option::map`.

use std::fmt;

use crate::location::Location;
use crate::node::{BoxError, TraceError};

/// Create an error with `message` and no cause.
#[track_caller]
pub fn new(message: impl Into<String>) -> BoxError {
    TraceError::new(message).into()
}

/// Create an error from preformatted arguments.
///
/// ```rust
/// let err = trace_errors::newf(format_args!("db failure: {}", "timeout"));
/// assert!(err.to_string().starts_with("db failure: timeout"));
/// ```
#[track_caller]
pub fn newf(args: fmt::Arguments<'_>) -> BoxError {
    TraceError::new(fmt::format(args)).into()
}

/// Wrap `err` with `message`. Returns `None` when `err` is `None`.
#[track_caller]
pub fn wrap<E>(err: Option<E>, message: impl Into<String>) -> Option<BoxError>
where
    E: Into<BoxError>,
{
    match err {
        Some(err) => Some(TraceError::wrap(err, message).into()),
        None => None,
    }
}

/// Wrap `err` with a formatted message. Returns `None` when `err` is `None`.
#[track_caller]
pub fn wrapf<E>(err: Option<E>, args: fmt::Arguments<'_>) -> Option<BoxError>
where
    E: Into<BoxError>,
{
    match err {
        Some(err) => Some(TraceError::wrap(err, fmt::format(args)).into()),
        None => None,
    }
}

#[doc(hidden)]
pub fn wrap_at<E>(err: Option<E>, message: String, location: Location) -> Option<BoxError>
where
    E: Into<BoxError>,
{
    match err {
        Some(err) => Some(TraceError::from_parts(message, Some(err.into()), location).into()),
        None => None,
    }
}

/// Annotate the error side of a `Result`.
///
/// `Ok` values pass through untouched, mirroring `wrap(None, ..)`.
pub trait ResultExt<T> {
    /// Wrap the error with `message`, located at the caller.
    fn wrap_err(self, message: impl Into<String>) -> Result<T, BoxError>;

    /// Wrap the error with a lazily built message, located at the caller.
    fn wrap_err_with<M, F>(self, message: F) -> Result<T, BoxError>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[track_caller]
    fn wrap_err(self, message: impl Into<String>) -> Result<T, BoxError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(TraceError::wrap(err, message).into()),
        }
    }

    #[track_caller]
    fn wrap_err_with<M, F>(self, message: F) -> Result<T, BoxError>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(TraceError::wrap(err, message()).into()),
        }
    }
}

/// Create an error from a format string, recording the enclosing function.
///
/// ```rust
/// use trace_errors::trace_err;
///
/// let err = trace_err!("fetch user {}", 42);
/// assert!(err.to_string().starts_with("fetch user 42"));
/// ```
#[macro_export]
macro_rules! trace_err {
    ($($arg:tt)+) => {
        $crate::BoxError::from($crate::TraceError::from_parts(
            ::std::format!($($arg)+),
            ::core::option::Option::None,
            $crate::Location::capture_in($crate::function_path!()),
        ))
    };
}

/// Wrap an `Option` of an error with a formatted message, recording the
/// enclosing function. `None` passes through.
///
/// ```rust
/// use trace_errors::{trace_err, wrap_err};
///
/// let err = wrap_err!(Some(trace_err!("timeout")), "fetch user {}", 42).unwrap();
/// assert!(err.to_string().starts_with("fetch user 42: timeout"));
/// ```
#[macro_export]
macro_rules! wrap_err {
    ($err:expr, $($arg:tt)+) => {
        $crate::construct::wrap_at(
            $err,
            ::std::format!($($arg)+),
            $crate::Location::capture_in($crate::function_path!()),
        )
    };
}
