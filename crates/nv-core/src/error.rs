//! Error types for the nv-core crate.
//!
//! This module provides the [`ConfigError`] type for failures while loading or
//! validating a [`Config`](crate::Config).

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use nv_core::ConfigError;
///
/// let error = ConfigError::InvalidOption {
///     option: "routes.pages_root".to_owned(),
///     reason: "must not be empty".to_owned(),
/// };
/// assert!(error.to_string().contains("routes.pages_root"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The dotted name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`Config`](crate::Config).
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
