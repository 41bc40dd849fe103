//! The annotated error node.
//!
//! A [`TraceError`] carries an optional message, an optional owned cause and
//! the call site that created it. It renders as its message, `": "`, and the
//! cause's own rendering, followed, when the node's [`TraceConfig`] asks for
//! it, by a newline and the assembled location trace. A nested node renders
//! under its own configuration, so with tracing enabled at every level the
//! inner traces appear ahead of the outer one.

use std::error::Error;
use std::fmt;

use static_assertions::assert_impl_all;
use tracing::warn;

use crate::chain::{Chain, Link, stack_trace_with};
use crate::config::TraceConfig;
use crate::location::Location;

/// Type-erased error used for causes and constructor results.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// An error annotated with a message and the call site that created it.
///
/// Immutable once built: [`with_config`](Self::with_config) and
/// [`at`](Self::at) consume the node before it is shared.
#[derive(Debug)]
pub struct TraceError {
    message: String,
    cause: Option<BoxError>,
    location: Option<Location>,
    config: TraceConfig,
}

assert_impl_all!(TraceError: Send, Sync, Error);

impl TraceError {
    /// Create a node with no cause, located at the caller.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_parts(message.into(), None, Location::capture())
    }

    /// Create a node wrapping `cause`, located at the caller.
    #[track_caller]
    pub fn wrap(cause: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::from_parts(message.into(), Some(cause.into()), Location::capture())
    }

    #[doc(hidden)]
    pub fn from_parts(message: String, cause: Option<BoxError>, location: Location) -> Self {
        Self {
            message,
            cause,
            location: Some(location),
            config: TraceConfig::default(),
        }
    }

    /// Replace the rendering configuration.
    pub fn with_config(self, config: TraceConfig) -> Self {
        Self { config, ..self }
    }

    /// Replace the captured location. `None` leaves the node unlocated: it
    /// contributes nothing to traces.
    pub fn at(self, location: Option<Location>) -> Self {
        Self { location, ..self }
    }

    /// Annotation attached at this node. Empty when none was given.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped error, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Call site that created this node. `None` when unlocated.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Rendering configuration this node was built with.
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Location trace of the chain starting at this node, oldest first.
    pub fn stack_trace(&self) -> String {
        stack_trace_with(Some(self as &(dyn Error + 'static)), &self.config)
    }

    /// Message chain without any trace suffix, at any level.
    pub fn message_chain(&self) -> String {
        let depth = self.config.max_depth.max(1);
        let mut out = String::new();
        for (visited, link) in Chain::new(Some(self as &(dyn Error + 'static)), depth).enumerate() {
            match link {
                Link::Node(node) => {
                    if !node.message.is_empty() {
                        out.push_str(&node.message);
                        if node.cause.is_some() && visited + 1 < depth {
                            out.push_str(": ");
                        }
                    }
                }
                Link::Foreign(err) => out.push_str(&err.to_string()),
            }
        }
        out
    }

    /// Render this node with `config` instead of its own configuration.
    ///
    /// Nested nodes still render with their own configuration.
    pub fn render(&self, config: &TraceConfig) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_rendered(&mut out, config, config.max_depth.max(1));
        out
    }

    /// Write the message, the cause's own rendering, then this node's trace.
    ///
    /// `budget` is the number of chain links still allowed, this one included.
    fn write_rendered<W: fmt::Write>(
        &self,
        out: &mut W,
        config: &TraceConfig,
        budget: usize,
    ) -> fmt::Result {
        let visit_cause = budget > 1;
        if !self.message.is_empty() {
            out.write_str(&self.message)?;
            if self.cause.is_some() && visit_cause {
                out.write_str(": ")?;
            }
        }

        if let Some(cause) = self.source() {
            if visit_cause {
                match Link::classify(cause) {
                    Link::Node(node) => node.write_rendered(out, &node.config, budget - 1)?,
                    Link::Foreign(err) => write!(out, "{err}")?,
                }
            } else {
                warn!(
                    max_depth = config.max_depth,
                    "error chain exceeds depth limit, truncating rendering"
                );
            }
        }

        if config.include_trace && self.location.is_some() {
            out.write_char('\n')?;
            out.write_str(&stack_trace_with(Some(self as &(dyn Error + 'static)), config))?;
        }
        Ok(())
    }
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_rendered(f, &self.config, self.config.max_depth.max(1))
    }
}

impl Error for TraceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}
