//! Pre-compiled tree-sitter queries for import extraction.
//!
//! Each query is compiled lazily once per grammar and cached for the life of
//! the process.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;
use crate::parser::Dialect;

/// Tree-sitter query for extracting import statements.
///
/// # Capture Names
///
/// - `import.source` - The module specifier string
/// - `import.statement` - The full `import_statement` node
/// - `import.named.specifier` - An `import_specifier` (`a` or `a as b`)
/// - `import.default.name` - Default import identifier
/// - `import.namespace.name` - Namespace import identifier
pub const IMPORT_QUERY: &str = r"
; Static imports with source path
(import_statement
  source: (string) @import.source) @import.statement

; Named imports: import { useRouter } from 'next/router'
(import_statement
  (import_clause
    (named_imports
      (import_specifier) @import.named.specifier)))

; Default imports: import Link from 'next/link'
(import_statement
  (import_clause
    (identifier) @import.default.name))

; Namespace imports: import * as fs from 'fs'
(import_statement
  (import_clause
    (namespace_import
      (identifier) @import.namespace.name)))
";

/// Capture index for `import.source`.
pub const CAPTURE_IMPORT_SOURCE: u32 = 0;

/// Capture index for `import.statement`.
pub const CAPTURE_IMPORT_STATEMENT: u32 = 1;

/// Capture index for `import.named.specifier`.
pub const CAPTURE_IMPORT_NAMED_SPECIFIER: u32 = 2;

/// Capture index for `import.default.name`.
pub const CAPTURE_IMPORT_DEFAULT_NAME: u32 = 3;

/// Capture index for `import.namespace.name`.
pub const CAPTURE_IMPORT_NAMESPACE_NAME: u32 = 4;

static IMPORT_QUERY_TS: OnceLock<Query> = OnceLock::new();
static IMPORT_QUERY_TSX: OnceLock<Query> = OnceLock::new();

/// Returns the compiled import query for `dialect`.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn import_query(dialect: Dialect) -> Result<&'static Query, ParseError> {
    let cache = match dialect {
        Dialect::TypeScript => &IMPORT_QUERY_TS,
        Dialect::Tsx => &IMPORT_QUERY_TSX,
    };
    if let Some(query) = cache.get() {
        return Ok(query);
    }

    let query = compile_query(&dialect.language(), IMPORT_QUERY)?;
    Ok(cache.get_or_init(|| query))
}

/// Compiles `source` for the given language.
pub(crate) fn compile_query(language: &Language, source: &str) -> Result<Query, ParseError> {
    Query::new(language, source).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_compiles_for_both_dialects() {
        assert!(import_query(Dialect::TypeScript).is_ok());
        assert!(import_query(Dialect::Tsx).is_ok());
    }

    #[test]
    fn test_capture_indices_match_names() {
        let query = import_query(Dialect::TypeScript).expect("query compiles");
        let names = query.capture_names();
        assert_eq!(names[CAPTURE_IMPORT_SOURCE as usize], "import.source");
        assert_eq!(names[CAPTURE_IMPORT_STATEMENT as usize], "import.statement");
        assert_eq!(
            names[CAPTURE_IMPORT_NAMED_SPECIFIER as usize],
            "import.named.specifier"
        );
        assert_eq!(
            names[CAPTURE_IMPORT_DEFAULT_NAME as usize],
            "import.default.name"
        );
        assert_eq!(
            names[CAPTURE_IMPORT_NAMESPACE_NAME as usize],
            "import.namespace.name"
        );
    }

    #[test]
    fn test_query_pattern_count() {
        let query = import_query(Dialect::Tsx).expect("query compiles");
        assert_eq!(query.pattern_count(), 4);
    }
}
