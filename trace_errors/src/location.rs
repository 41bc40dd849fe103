//! Call-site capture.
//!
//! A [`Location`] records the function, file and line that created a
//! [`TraceError`](crate::TraceError). Capture relies on `#[track_caller]`:
//! [`Location::capture`] and every constructor carry the attribute, so
//! `std::panic::Location::caller()` resolves past both of them to the
//! application code that called the constructor.
//!
//! `#[track_caller]` yields file and line only. The enclosing function is
//! resolved by walking the native stack with the `backtrace` crate and
//! picking the frame whose debug info points at that same file and line, so
//! the capture routine and the constructor frames are skipped whether or not
//! they were inlined. Without debug info the function renders as `unknown`.
//! The [`trace_err!`](crate::trace_err) and [`wrap_err!`](crate::wrap_err)
//! macros expand at the call site and name it with
//! [`function_path!`](crate::function_path) instead.

use std::borrow::Cow;
use std::fmt;
use std::panic;

use tracing::trace;

/// Placeholder rendered when call-site information is missing.
pub const UNKNOWN: &str = "unknown";

/// Source call site that created an error node.
///
/// Renders as `"<function>\n\t<file>:<line>"`, or `unknown` for
/// [`Location::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Call site with file and line resolved.
    Resolved {
        /// Fully qualified path of the calling function, if known.
        function: Option<Cow<'static, str>>,
        /// Source file of the call.
        file: &'static str,
        /// Line of the call.
        line: u32,
    },
    /// No call-site information is available.
    Unknown,
}

impl Location {
    /// Capture the location of the caller's caller, resolving its function
    /// from the native stack.
    ///
    /// Must only be reached through `#[track_caller]` functions. A closure
    /// between the constructor and this call resets tracking to the closure.
    #[track_caller]
    pub fn capture() -> Self {
        let loc = panic::Location::caller();
        let function = resolve_function(loc.file(), loc.line());
        Self::resolved(function.map(Cow::Owned), loc)
    }

    /// Capture the caller's location, recording `function` as its identifier.
    ///
    /// Skips the stack walk; used by the constructor macros.
    #[track_caller]
    #[inline]
    pub fn capture_in(function: &'static str) -> Self {
        Self::resolved(Some(Cow::Borrowed(function)), panic::Location::caller())
    }

    /// Build a location from explicit parts.
    ///
    /// An empty `file` or a zero `line` cannot name a call site and yields
    /// [`Location::Unknown`].
    pub const fn new(function: Option<&'static str>, file: &'static str, line: u32) -> Self {
        if file.is_empty() || line == 0 {
            return Self::Unknown;
        }
        let function = match function {
            Some(name) => Some(Cow::Borrowed(name)),
            None => None,
        };
        Self::Resolved {
            function,
            file,
            line,
        }
    }

    fn resolved(function: Option<Cow<'static, str>>, loc: &'static panic::Location<'static>) -> Self {
        match Self::new(None, loc.file(), loc.line()) {
            Self::Resolved { file, line, .. } => Self::Resolved {
                function,
                file,
                line,
            },
            Self::Unknown => Self::Unknown,
        }
    }

    /// Calling function path, if one was recorded.
    pub fn function(&self) -> Option<&str> {
        match self {
            Self::Resolved { function, .. } => function.as_deref(),
            Self::Unknown => None,
        }
    }

    /// Source file, if known.
    pub const fn file(&self) -> Option<&'static str> {
        match self {
            Self::Resolved { file, .. } => Some(*file),
            Self::Unknown => None,
        }
    }

    /// Source line, if known.
    pub const fn line(&self) -> Option<u32> {
        match self {
            Self::Resolved { line, .. } => Some(*line),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved {
                function,
                file,
                line,
            } => write!(
                f,
                "{}\n\t{}:{}",
                function.as_deref().unwrap_or(UNKNOWN),
                file,
                line
            ),
            Self::Unknown => f.write_str(UNKNOWN),
        }
    }
}

/// Find the function whose frame is executing `file:line`.
///
/// Inlined frames resolve to several symbols; the one carrying the call
/// site's own file and line is the caller.
fn resolve_function(file: &str, line: u32) -> Option<String> {
    let mut found: Option<String> = None;
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() || symbol.lineno() != Some(line) {
                return;
            }
            if !symbol.filename().is_some_and(|path| path.ends_with(file)) {
                return;
            }
            found = symbol
                .name()
                .map(|name| strip_closures(&format!("{name:#}")).to_string());
        });
        found.is_none()
    });

    if found.is_none() {
        trace!(file, line, "caller symbol not resolved");
    }
    found
}

/// Drop trailing closure segments (`{{closure}}` or `{closure#N}`).
fn strip_closures(mut name: &str) -> &str {
    while let Some((head, last)) = name.rsplit_once("::") {
        if !last.starts_with("{closure") && !last.starts_with("{{closure") {
            break;
        }
        name = head;
    }
    name
}

/// Expands to the fully qualified path of the enclosing function.
///
/// Closures are stripped, so the path names the function containing them.
#[macro_export]
macro_rules! function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.trim_end_matches("::{{closure}}")
    }};
}
