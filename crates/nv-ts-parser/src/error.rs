//! Error types for the nv-ts-parser crate.

/// Errors that can occur while parsing TypeScript or TSX source.
///
/// # Examples
///
/// ```
/// use nv_ts_parser::ParseError;
///
/// fn describe(err: &ParseError) -> &'static str {
///     match err {
///         ParseError::LanguageInit => "grammar could not be loaded",
///         ParseError::QueryCompile { .. } => "query is broken",
///         ParseError::Timeout { .. } => "file took too long",
///         ParseError::Parse => "parser gave up",
///     }
/// }
///
/// assert_eq!(describe(&ParseError::Parse), "parser gave up");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the grammar on the parser.
    #[error("failed to set TypeScript language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The underlying query error.
        kind: tree_sitter::QueryError,
    },

    /// The parse exceeded the configured timeout.
    #[error("parse exceeded the {micros}us timeout")]
    Timeout {
        /// The configured limit in microseconds.
        micros: u64,
    },

    /// The parser returned no tree.
    #[error("failed to parse source code")]
    Parse,
}

impl ParseError {
    /// Returns `true` if retrying with a different input could succeed.
    ///
    /// Grammar and query failures affect every file equally.
    #[inline]
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = ParseError::Timeout { micros: 500 };
        assert_eq!(err.to_string(), "parse exceeded the 500us timeout");
        assert!(err.is_per_file());
    }

    #[test]
    fn test_language_init_is_global() {
        assert!(!ParseError::LanguageInit.is_per_file());
        assert_eq!(
            ParseError::LanguageInit.to_string(),
            "failed to set TypeScript language"
        );
    }
}
