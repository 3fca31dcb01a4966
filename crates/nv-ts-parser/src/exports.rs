//! Top-level export extraction.
//!
//! Only the statements directly under the program node are inspected, which
//! is where page components, data-fetching functions, API handlers and
//! middleware are exported.
//!
//! # Export Shapes Detected
//!
//! - `export default function Page() {}` / `export default Page;`
//! - `export async function getServerSideProps() {}`
//! - `export const getStaticProps = async () => {}`
//! - `export { handler as default, config }`
//! - `export interface Props {}` / `export type Props = {}`

use std::ops::Range;

use nv_core::SourceLocation;
use tree_sitter::{Node, Tree};

use crate::node::{has_token, node_location, node_text};

/// The syntactic shape of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ExportKind {
    /// A function declaration or a variable bound to a function.
    Function,
    /// A class declaration.
    Class,
    /// A variable bound to a non-function value.
    Variable,
    /// `export default Name;`
    Identifier,
    /// Any other default-exported expression (`export default withAuth(Page)`).
    Expression,
    /// A specifier of an `export { ... }` clause.
    Clause,
    /// A specifier re-exported from another module.
    ReExport,
    /// An interface, type alias or enum.
    Type,
}

/// One exported binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportInfo {
    /// The exported local name, `None` for anonymous defaults.
    pub name: Option<String>,
    /// The syntactic shape.
    pub kind: ExportKind,
    /// `true` for the module's default export.
    pub is_default: bool,
    /// `true` when the exported function is `async`.
    pub is_async: bool,
    /// Where the export statement starts.
    pub location: SourceLocation,
    /// Byte range of the whole `export_statement`.
    pub statement: Range<usize>,
    /// Byte range of the function node (declaration, arrow or expression)
    /// for [`ExportKind::Function`] exports.
    pub function: Option<Range<usize>>,
}

impl ExportInfo {
    /// Returns `true` if this export binds `name`.
    #[inline]
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Extracts the exports of a parsed module, in source order.
pub fn extract_exports(tree: &Tree, source: &str) -> Vec<ExportInfo> {
    let root = tree.root_node();
    let mut exports = Vec::new();
    let mut cursor = root.walk();

    for statement in root.named_children(&mut cursor) {
        if statement.kind() == "export_statement" {
            collect_statement(statement, source, &mut exports);
        }
    }

    exports
}

fn collect_statement(statement: Node<'_>, source: &str, out: &mut Vec<ExportInfo>) {
    let is_default = has_token(statement, "default");
    let base = |name: Option<String>, kind: ExportKind| ExportInfo {
        name,
        kind,
        is_default,
        is_async: false,
        location: node_location(statement),
        statement: statement.byte_range(),
        function: None,
    };

    if let Some(declaration) = statement.child_by_field_name("declaration") {
        collect_declaration(declaration, source, &base, out);
        return;
    }

    if let Some(value) = statement.child_by_field_name("value") {
        let mut info = match value.kind() {
            "identifier" => base(text(value, source), ExportKind::Identifier),
            "arrow_function" | "function_expression" | "function" => {
                let mut info = base(
                    value
                        .child_by_field_name("name")
                        .and_then(|n| text(n, source)),
                    ExportKind::Function,
                );
                info.function = Some(value.byte_range());
                info.is_async = has_token(value, "async");
                info
            }
            _ => base(None, ExportKind::Expression),
        };
        info.is_default = true;
        out.push(info);
        return;
    }

    let reexport = statement.child_by_field_name("source").is_some();
    let mut cursor = statement.walk();
    for clause in statement.named_children(&mut cursor) {
        if clause.kind() != "export_clause" {
            continue;
        }
        let mut inner = clause.walk();
        for specifier in clause.named_children(&mut inner) {
            if specifier.kind() != "export_specifier" {
                continue;
            }
            let name = specifier
                .child_by_field_name("name")
                .and_then(|n| text(n, source));
            let exported_as = specifier
                .child_by_field_name("alias")
                .and_then(|n| text(n, source));
            let kind = if reexport {
                ExportKind::ReExport
            } else {
                ExportKind::Clause
            };
            let mut info = base(name, kind);
            info.is_default = exported_as.as_deref() == Some("default");
            out.push(info);
        }
    }
}

fn collect_declaration<F>(declaration: Node<'_>, source: &str, base: &F, out: &mut Vec<ExportInfo>)
where
    F: Fn(Option<String>, ExportKind) -> ExportInfo,
{
    let name_of = |node: Node<'_>| {
        node.child_by_field_name("name")
            .and_then(|n| text(n, source))
    };

    match declaration.kind() {
        "function_declaration" | "generator_function_declaration" => {
            let mut info = base(name_of(declaration), ExportKind::Function);
            info.function = Some(declaration.byte_range());
            info.is_async = has_token(declaration, "async");
            out.push(info);
        }
        "class_declaration" | "abstract_class_declaration" => {
            out.push(base(name_of(declaration), ExportKind::Class));
        }
        "interface_declaration" | "type_alias_declaration" | "enum_declaration" => {
            out.push(base(name_of(declaration), ExportKind::Type));
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = declaration.walk();
            for declarator in declaration.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let value = declarator.child_by_field_name("value");
                let function = value.filter(|v| {
                    matches!(
                        v.kind(),
                        "arrow_function" | "function_expression" | "function"
                    )
                });
                let kind = if function.is_some() {
                    ExportKind::Function
                } else {
                    ExportKind::Variable
                };
                let mut info = base(name_of(declarator), kind);
                info.function = function.map(|f| f.byte_range());
                info.is_async = function.is_some_and(|f| has_token(f, "async"));
                out.push(info);
            }
        }
        _ => {}
    }
}

fn text(node: Node<'_>, source: &str) -> Option<String> {
    node_text(node, source).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Dialect, TsParser};

    fn exports_of(source: &str) -> Vec<ExportInfo> {
        let mut parser = TsParser::new(Dialect::Tsx).expect("parser");
        parser.parse(source).expect("parse").exports
    }

    #[test]
    fn test_page_with_server_side_props() {
        let source = r"
export async function getServerSideProps(context) {
  return { props: {} };
}

export default function Home({ posts }) {
  return <main />;
}
";
        let exports = exports_of(source);
        assert_eq!(exports.len(), 2);

        assert!(exports[0].is_named("getServerSideProps"));
        assert_eq!(exports[0].kind, ExportKind::Function);
        assert!(exports[0].is_async);
        assert!(!exports[0].is_default);

        assert!(exports[1].is_named("Home"));
        assert!(exports[1].is_default);
        assert!(exports[1].function.is_some());
    }

    #[test]
    fn test_arrow_function_variable() {
        let exports = exports_of("export const getStaticProps = async () => ({ props: {} });");
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].kind, ExportKind::Function);
        assert!(exports[0].is_async);
    }

    #[test]
    fn test_default_identifier_and_config() {
        let source = "const Page = () => null;\nexport const config = { runtime: 'edge' };\nexport default Page;";
        let exports = exports_of(source);
        assert_eq!(exports.len(), 2);
        assert_eq!(exports[0].kind, ExportKind::Variable);
        assert!(exports[0].is_named("config"));
        assert_eq!(exports[1].kind, ExportKind::Identifier);
        assert!(exports[1].is_default);
        assert!(exports[1].is_named("Page"));
    }

    #[test]
    fn test_export_clause_with_default_alias() {
        let exports = exports_of("function handler() {}\nexport { handler as default, handler };");
        assert_eq!(exports.len(), 2);
        assert!(exports[0].is_default);
        assert!(!exports[1].is_default);
        assert_eq!(exports[1].kind, ExportKind::Clause);
    }

    #[test]
    fn test_type_exports() {
        let exports = exports_of("export interface Props { id: string }\nexport type Id = string;");
        assert!(exports.iter().all(|e| e.kind == ExportKind::Type));
    }
}
