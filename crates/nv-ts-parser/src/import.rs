//! Import extraction from a parsed syntax tree.

use nv_core::{ImportInfo, ImportKind, SourceLocation};
use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use crate::node::{find_ancestor, node_location, node_text};
use crate::queries::{
    CAPTURE_IMPORT_DEFAULT_NAME, CAPTURE_IMPORT_NAMED_SPECIFIER, CAPTURE_IMPORT_NAMESPACE_NAME,
    CAPTURE_IMPORT_SOURCE, CAPTURE_IMPORT_STATEMENT,
};
use crate::source::{detect_framework_module, strip_quotes};

/// Extracts all static imports from a parsed syntax tree.
///
/// Imports are returned in source order. Aliased named imports contribute
/// their local alias to [`ImportInfo::names`].
pub fn extract_imports(tree: &Tree, source: &str, query: &Query) -> SmallVec<[ImportInfo; 8]> {
    let mut cursor = QueryCursor::new();

    // Keyed by the byte range of the owning import_statement.
    let mut builders: FxHashMap<(usize, usize), ImportBuilder> = FxHashMap::default();

    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());
    while let Some(match_) = matches.next() {
        for capture in match_.captures {
            let node = capture.node;
            let Some(statement) = find_ancestor(node, "import_statement") else {
                continue;
            };
            let builder = builders
                .entry((statement.start_byte(), statement.end_byte()))
                .or_insert_with(|| ImportBuilder::new(statement, source));

            match capture.index {
                CAPTURE_IMPORT_STATEMENT => {}
                CAPTURE_IMPORT_SOURCE => builder.set_source(node, source),
                CAPTURE_IMPORT_NAMED_SPECIFIER => builder.add_named(node, source),
                CAPTURE_IMPORT_DEFAULT_NAME => builder.set_default(node, source),
                CAPTURE_IMPORT_NAMESPACE_NAME => builder.set_namespace(node, source),
                _ => {}
            }
        }
    }

    let mut imports: SmallVec<[ImportInfo; 8]> = builders
        .into_values()
        .filter_map(ImportBuilder::build)
        .collect();
    imports.sort_by_key(|i| i.location.byte_offset);
    imports
}

/// Accumulates the captures of one `import_statement`.
struct ImportBuilder {
    path: Option<String>,
    names: SmallVec<[String; 4]>,
    has_default: bool,
    has_named: bool,
    has_namespace: bool,
    is_type_only: bool,
    location: SourceLocation,
}

impl ImportBuilder {
    fn new(statement: Node<'_>, source: &str) -> Self {
        Self {
            path: None,
            names: smallvec![],
            has_default: false,
            has_named: false,
            has_namespace: false,
            is_type_only: node_text(statement, source).is_some_and(is_type_only_statement),
            location: node_location(statement),
        }
    }

    fn set_source(&mut self, node: Node<'_>, source: &str) {
        if let Some(text) = node_text(node, source) {
            self.path = Some(strip_quotes(text).to_owned());
        }
    }

    fn add_named(&mut self, specifier: Node<'_>, source: &str) {
        let local = specifier
            .child_by_field_name("alias")
            .or_else(|| specifier.child_by_field_name("name"));
        if let Some(text) = local.and_then(|n| node_text(n, source)) {
            self.names.push(text.to_owned());
            self.has_named = true;
        }
    }

    fn set_default(&mut self, node: Node<'_>, source: &str) {
        if let Some(text) = node_text(node, source) {
            self.names.insert(0, text.to_owned());
            self.has_default = true;
        }
    }

    fn set_namespace(&mut self, node: Node<'_>, source: &str) {
        if let Some(text) = node_text(node, source) {
            self.names.push(text.to_owned());
            self.has_namespace = true;
        }
    }

    fn build(self) -> Option<ImportInfo> {
        let path = self.path?;
        let kind = if self.is_type_only {
            ImportKind::TypeOnly
        } else if self.has_namespace {
            ImportKind::Namespace
        } else if self.has_default {
            ImportKind::Default
        } else if self.has_named {
            ImportKind::Named
        } else {
            ImportKind::SideEffect
        };

        Some(ImportInfo {
            module: detect_framework_module(&path),
            path,
            kind,
            names: self.names,
            location: self.location,
        })
    }
}

/// `import type { A } from '...'`, but not `import typeorm from 'typeorm'`.
fn is_type_only_statement(text: &str) -> bool {
    text.strip_prefix("import")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix("type"))
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_whitespace() || c == '{' || c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Dialect;
    use crate::queries::import_query;
    use nv_core::FrameworkModule;
    use tree_sitter::Parser;

    fn extract(source: &str) -> SmallVec<[ImportInfo; 8]> {
        let mut parser = Parser::new();
        parser
            .set_language(&Dialect::Tsx.language())
            .expect("language loads");
        let tree = parser.parse(source, None).expect("parse succeeds");
        let query = import_query(Dialect::Tsx).expect("query compiles");
        extract_imports(&tree, source, query)
    }

    #[test]
    fn test_named_import_with_alias() {
        let imports = extract("import { useRouter as useNextRouter, withRouter } from 'next/router';");
        assert_eq!(imports.len(), 1);
        let import = &imports[0];
        assert_eq!(import.path, "next/router");
        assert_eq!(import.kind, ImportKind::Named);
        assert_eq!(import.names.as_slice(), ["useNextRouter", "withRouter"]);
        assert_eq!(import.module, Some(FrameworkModule::NextRouter));
    }

    #[test]
    fn test_default_and_named_together() {
        let imports = extract("import React, { useState } from 'react';");
        assert_eq!(imports[0].kind, ImportKind::Default);
        assert_eq!(imports[0].names.first().map(String::as_str), Some("React"));
        assert!(imports[0].binds("useState"));
        assert_eq!(imports[0].module, None);
    }

    #[test]
    fn test_type_only_and_side_effect() {
        let source = "import type { NextPage } from 'next';\nimport '../styles/globals.css';\nimport typeorm from 'typeorm';";
        let imports = extract(source);
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].kind, ImportKind::TypeOnly);
        assert_eq!(imports[0].module, Some(FrameworkModule::Next));
        assert_eq!(imports[1].kind, ImportKind::SideEffect);
        assert!(imports[1].names.is_empty());
        assert_eq!(imports[2].kind, ImportKind::Default);
    }

    #[test]
    fn test_namespace_import_of_builtin() {
        let imports = extract("import * as fs from 'node:fs';");
        assert_eq!(imports[0].kind, ImportKind::Namespace);
        assert_eq!(imports[0].module, Some(FrameworkModule::NodeBuiltin));
    }

    #[test]
    fn test_source_order_and_location() {
        let imports = extract("import Link from 'next/link';\nimport Image from 'next/image';");
        assert_eq!(imports[0].path, "next/link");
        assert_eq!(imports[1].path, "next/image");
        assert_eq!(imports[1].location.line, 2);
    }
}
