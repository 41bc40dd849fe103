//! Trace Errors Library
//!
//! Annotate errors with a message and the call site that produced them, and
//! rebuild the ordered list of those call sites across a chain of wrapped
//! errors.
//!
//! # Module Structure
//!
//! - [`node`] - The [`TraceError`] node and its rendering
//! - [`construct`] - `new` / `newf` / `wrap` / `wrapf` and [`ResultExt`]
//! - [`location`] - Call-site capture
//! - [`chain`] - Cause-chain traversal and [`stack_trace`]
//! - [`config`] - [`TraceConfig`] and TOML loading
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use trace_errors::{new, stack_trace, wrap};
//!
//! let inner = new("connection refused");
//! let err = wrap(Some(inner), "fetch user").unwrap();
//!
//! let rendered = err.to_string();
//! assert!(rendered.starts_with("fetch user: connection refused\n"));
//!
//! // Innermost call site first.
//! let trace = stack_trace(Some(&*err));
//! assert_eq!(trace.lines().count(), 4);
//! ```

pub mod chain;
pub mod config;
pub mod construct;
pub mod location;
pub mod node;
pub mod prelude;

pub use chain::{stack_trace, stack_trace_with};
pub use config::{ConfigError, ConfigLoader, TraceConfig};
pub use construct::{ResultExt, new, newf, wrap, wrapf};
pub use location::Location;
pub use node::{BoxError, TraceError};
