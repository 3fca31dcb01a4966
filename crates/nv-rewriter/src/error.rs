//! Error types for the nv-rewriter crate.

use nv_ts_parser::ParseError;

/// Errors raised while building a rule registry.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A rule's pattern is not a valid regular expression.
    #[error("invalid pattern for rule '{description}': {source}")]
    InvalidPattern {
        /// Description of the offending rule.
        description: &'static str,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while transforming one source file.
///
/// These are per-file failures: the caller records them and moves on to the
/// next file.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The file could not be parsed at all.
    #[error("structural pass failed: {0}")]
    Parse(#[from] ParseError),

    /// The rule registry could not be built.
    #[error(transparent)]
    Rules(#[from] RuleError),
}

impl TransformError {
    /// Returns `true` if the failure is specific to the file being processed.
    #[inline]
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        match self {
            Self::Parse(err) => err.is_per_file(),
            Self::Rules(_) => false,
        }
    }
}
