//! Rendering configuration and TOML loading.
//!
//! [`TraceConfig`] is an immutable value. Every [`TraceError`](crate::TraceError)
//! stores the configuration it was built with, and
//! [`TraceError::render`](crate::TraceError::render) accepts an explicit one,
//! so both settings can be exercised in the same process.
//!
//! # Usage
//!
//! ```rust,no_run
//! use trace_errors::config::{ConfigError, ConfigLoader, TraceConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = TraceConfig::load(Path::new("trace.toml"))?;
//!     config.validate()?;
//!     println!("include trace: {}", config.include_trace);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default cap on the number of chain links visited during traversal.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Options controlling how an error chain is rendered and traversed.
///
/// # TOML Example
///
/// ```toml
/// include_trace = false
/// max_depth = 64
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Append the assembled location trace to the rendered message.
    pub include_trace: bool,

    /// Maximum number of chain links visited while rendering or tracing.
    pub max_depth: usize,
}

impl TraceConfig {
    /// Configuration that renders the message chain only.
    pub const MESSAGE_ONLY: Self = Self {
        include_trace: false,
        max_depth: DEFAULT_MAX_DEPTH,
    };

    /// Returns a copy with `include_trace` replaced.
    pub const fn with_trace(self, include_trace: bool) -> Self {
        Self {
            include_trace,
            ..self
        }
    }

    /// Returns a copy with `max_depth` replaced.
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `max_depth` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ValidationError(
                "max_depth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            include_trace: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Any serde-deserializable struct can use ConfigLoader.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_includes_trace() {
        let config = TraceConfig::default();
        assert!(config.include_trace);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders_replace_single_field() {
        let config = TraceConfig::default().with_trace(false).with_max_depth(8);
        assert!(!config.include_trace);
        assert_eq!(config.max_depth, 8);
        assert_eq!(TraceConfig::MESSAGE_ONLY.with_trace(true), TraceConfig::default());
    }

    #[test]
    fn test_validation_zero_depth() {
        let config = TraceConfig::default().with_max_depth(0);
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = TraceConfig::from_toml_str("include_trace = false").unwrap();
        assert!(!config.include_trace);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH); // Default
    }

    #[test]
    fn test_from_toml_str_unknown_field() {
        let result = TraceConfig::from_toml_str("include_stack = true");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_loader_file_not_found() {
        let result = TraceConfig::load(Path::new("/nonexistent/path/trace.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound)));
    }

    #[test]
    fn test_config_loader_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid toml {{{{").unwrap();

        let result = TraceConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_loader_success() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"include_trace = false
max_depth = 16
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = TraceConfig::load(file.path()).unwrap();
        assert_eq!(
            config,
            TraceConfig {
                include_trace: false,
                max_depth: 16,
            }
        );
    }
}
