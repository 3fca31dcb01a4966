//! Parser management.
//!
//! [`TsParser`] wraps a tree-sitter parser for one [`Dialect`] and returns
//! the syntax tree together with the module's imports and exports.

use nv_core::ImportInfo;
use smallvec::SmallVec;
use tree_sitter::{Language, Parser, Query, Tree};

use crate::error::ParseError;
use crate::exports::{ExportInfo, extract_exports};
use crate::import::extract_imports;
use crate::queries::import_query;

/// The grammar used for a source file.
///
/// `.ts` files use the plain TypeScript grammar so that `<T>value` casts
/// parse; every other code file may contain JSX.
///
/// # Examples
///
/// ```
/// use nv_ts_parser::Dialect;
///
/// assert_eq!(Dialect::for_file("lib/api.ts"), Dialect::TypeScript);
/// assert_eq!(Dialect::for_file("pages/index.jsx"), Dialect::Tsx);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// TypeScript without JSX.
    TypeScript,
    /// TypeScript or JavaScript with JSX.
    Tsx,
}

impl Dialect {
    /// Picks the dialect for a file name.
    #[must_use]
    pub fn for_file(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".ts") || lower.ends_with(".mts") || lower.ends_with(".cts") {
            Self::TypeScript
        } else {
            Self::Tsx
        }
    }

    /// The tree-sitter language for this dialect.
    #[must_use]
    pub fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Result of parsing one source file.
#[derive(Debug)]
pub struct ParseResult {
    /// Static imports in source order.
    pub imports: SmallVec<[ImportInfo; 8]>,

    /// Top-level exports in source order.
    pub exports: Vec<ExportInfo>,

    /// The syntax tree.
    pub tree: Tree,
}

impl ParseResult {
    /// Returns `true` if the tree contains syntax errors.
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// The module's default export, if any.
    #[must_use]
    pub fn default_export(&self) -> Option<&ExportInfo> {
        self.exports.iter().find(|e| e.is_default)
    }

    /// The export binding `name`, if any.
    #[must_use]
    pub fn export_named(&self, name: &str) -> Option<&ExportInfo> {
        self.exports.iter().find(|e| e.is_named(name))
    }
}

/// A reusable parser for one dialect.
///
/// # Examples
///
/// ```
/// use nv_ts_parser::{Dialect, TsParser};
///
/// let mut parser = TsParser::new(Dialect::Tsx)?;
/// let result = parser.parse("import Link from 'next/link';\nexport default function A() { return <Link href=\"/\" />; }")?;
/// assert_eq!(result.imports.len(), 1);
/// assert!(result.default_export().is_some());
/// # Ok::<(), nv_ts_parser::ParseError>(())
/// ```
pub struct TsParser {
    parser: Parser,
    dialect: Dialect,
    timeout_micros: u64,
}

impl TsParser {
    /// Creates a parser for `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the grammar cannot be set.
    pub fn new(dialect: Dialect) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&dialect.language())
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self {
            parser,
            dialect,
            timeout_micros: 0,
        })
    }

    /// Limits every parse to `micros` microseconds. `0` removes the limit.
    #[must_use]
    pub fn with_timeout(mut self, micros: u64) -> Self {
        self.timeout_micros = micros;
        #[allow(deprecated)]
        self.parser.set_timeout_micros(micros);
        self
    }

    /// The dialect this parser was created for.
    #[inline]
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn query(&self) -> Result<&'static Query, ParseError> {
        import_query(self.dialect)
    }

    /// Parses `source` and extracts its imports and exports.
    ///
    /// A tree with syntax errors is still returned; check
    /// [`ParseResult::has_errors`].
    ///
    /// # Errors
    ///
    /// - [`ParseError::Timeout`] if a timeout is set and was exceeded
    /// - [`ParseError::Parse`] if the parser produced no tree
    /// - [`ParseError::QueryCompile`] if the import query fails to compile
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, ParseError> {
        let Some(tree) = self.parser.parse(source, None) else {
            self.parser.reset();
            return Err(if self.timeout_micros > 0 {
                ParseError::Timeout {
                    micros: self.timeout_micros,
                }
            } else {
                ParseError::Parse
            });
        };

        let imports = extract_imports(&tree, source, self.query()?);
        let exports = extract_exports(&tree, source);

        Ok(ParseResult {
            imports,
            exports,
            tree,
        })
    }
}

impl std::fmt::Debug for TsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsParser")
            .field("dialect", &self.dialect)
            .field("timeout_micros", &self.timeout_micros)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nv_core::{FrameworkModule, ImportKind};

    #[test]
    fn test_parser_new_both_dialects() {
        assert!(TsParser::new(Dialect::TypeScript).is_ok());
        assert!(TsParser::new(Dialect::Tsx).is_ok());
    }

    #[test]
    fn test_dialect_for_file() {
        assert_eq!(Dialect::for_file("a.ts"), Dialect::TypeScript);
        assert_eq!(Dialect::for_file("a.tsx"), Dialect::Tsx);
        assert_eq!(Dialect::for_file("a.js"), Dialect::Tsx);
        assert_eq!(Dialect::for_file("A.TS"), Dialect::TypeScript);
    }

    #[test]
    fn test_parse_page() {
        let mut parser = TsParser::new(Dialect::Tsx).expect("parser");
        let source = r"
import { useRouter } from 'next/router';
import Head from 'next/head';

export default function Post() {
  const router = useRouter();
  return <Head><title>{router.query.id}</title></Head>;
}
";
        let result = parser.parse(source).expect("parse");
        assert!(!result.has_errors());
        assert_eq!(result.imports.len(), 2);
        assert_eq!(result.imports[0].module, Some(FrameworkModule::NextRouter));
        assert_eq!(result.imports[1].kind, ImportKind::Default);
        assert!(result.default_export().is_some_and(|e| e.is_named("Post")));
    }

    #[test]
    fn test_parse_empty_source() {
        let mut parser = TsParser::new(Dialect::TypeScript).expect("parser");
        let result = parser.parse("").expect("parse");
        assert!(result.imports.is_empty());
        assert!(result.exports.is_empty());
    }

    #[test]
    fn test_parse_broken_source_still_returns_tree() {
        let mut parser = TsParser::new(Dialect::Tsx).expect("parser");
        let result = parser.parse("export default function ( {").expect("parse");
        assert!(result.has_errors());
    }

    #[test]
    fn test_parser_debug() {
        let parser = TsParser::new(Dialect::Tsx)
            .expect("parser")
            .with_timeout(1_000);
        let debug = format!("{parser:?}");
        assert!(debug.contains("Tsx"));
        assert!(debug.contains("1000"));
    }
}
