//! Prelude module for common re-exports.
//!
//! This module provides convenient re-exports of commonly used types
//! so that consumers can do `use trace_errors::prelude::*;` and get
//! the constructors, the node type and the extension trait in one line.
//!
//! # Usage
//!
//! ```rust
//! use trace_errors::prelude::*;
//!
//! fn open() -> Result<(), BoxError> {
//!     Err(std::io::Error::other("denied")).wrap_err("open config")
//! }
//!
//! assert!(open().is_err());
//! ```

// ─── Error Values ───────────────────────────────────────────────────
pub use crate::node::{BoxError, TraceError};

// ─── Constructors ───────────────────────────────────────────────────
pub use crate::construct::{ResultExt, new, newf, wrap, wrapf};
pub use crate::{trace_err, wrap_err};

// ─── Tracing ────────────────────────────────────────────────────────
pub use crate::chain::{stack_trace, stack_trace_with};
pub use crate::location::Location;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, TraceConfig};
