//! The Structural Transformer: syntax-tree rewrites run before the rules.
//!
//! The string rules only understand canonical spellings (`useRouter` bound to
//! `router`, `Link` imported under its own name, one name per `next` type
//! import). This pass parses the file, recognizes the role of each construct
//! and rewrites it into that canonical form, or into its React Router
//! equivalent when the rewrite needs the tree:
//!
//! | Pass | Gate | Constructs |
//! |------|------|------------|
//! | imports | per module | aliased and multi-name framework imports |
//! | router | `use_react_router` | `useRouter()` bindings, `router.query`, `router.isReady` |
//! | data fetching | `transform_data_fetching` | `getServerSideProps`, `getStaticProps`, page props |
//! | components | `replace_components` | `<Image>`, `<Link><a>`, `_app` / `_document` |
//! | handlers | `convert_api_routes`, `handle_middleware` | API handlers, middleware |
//!
//! Every pass computes edits against the original text; the edits are
//! applied once at the end. Constructs that are recognized but not rewritten
//! produce warnings, and a construct that cannot be rewritten never stops the
//! rest of the file.

mod components;
mod data_fetching;
mod edit;
mod handlers;
mod imports;
mod router;

use nv_core::{ConversionOptions, FileKind, FrameworkModule, ImportInfo, StructuralTransformResult};
use nv_ts_parser::{Dialect, Node, ParseResult, TsParser, find_ancestor, node_text};
use tracing::debug;

use crate::error::TransformError;

pub use edit::{Applied, Edit, EditSet};

/// File name assumed by [`StructuralTransformer::apply`].
const ANONYMOUS_FILE: &str = "module.tsx";

/// Rewrites framework constructs that need the syntax tree.
///
/// # Examples
///
/// ```
/// use nv_core::ConversionOptions;
/// use nv_rewriter::StructuralTransformer;
///
/// let transformer = StructuralTransformer::new(ConversionOptions::all());
/// let source = "import { useRouter as useNav } from 'next/router';\n\
///               export default function A() { const nav = useNav(); return nav.query.id; }\n";
///
/// let result = transformer.apply(source)?;
/// assert!(result.code.contains("import { useRouter } from 'next/router';"));
/// assert!(result.code.contains("const router = useRouter();"));
/// assert!(result.code.contains("return params.id;"));
/// # Ok::<(), nv_rewriter::TransformError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StructuralTransformer {
    options: ConversionOptions,
    parse_timeout_micros: u64,
}

impl StructuralTransformer {
    /// A transformer running the passes `options` allows.
    #[must_use]
    pub const fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            parse_timeout_micros: 0,
        }
    }

    /// Limits each parse to `micros` microseconds. `0` removes the limit.
    #[must_use]
    pub const fn with_parse_timeout(mut self, micros: u64) -> Self {
        self.parse_timeout_micros = micros;
        self
    }

    /// The options this transformer was built with.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Rewrites an anonymous TSX module.
    ///
    /// # Errors
    ///
    /// See [`apply_to_file`](Self::apply_to_file).
    pub fn apply(&self, source: &str) -> Result<StructuralTransformResult, TransformError> {
        self.apply_to_file(ANONYMOUS_FILE, source, FileKind::Code)
    }

    /// Rewrites `source`, read from `file_name`, whose role is `kind`.
    ///
    /// The file name picks the grammar and whether type annotations may be
    /// emitted. A file with syntax errors is returned unchanged with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Parse`] if the parser produced no tree or
    /// the parse timed out.
    pub fn apply_to_file(
        &self,
        file_name: &str,
        source: &str,
        kind: FileKind,
    ) -> Result<StructuralTransformResult, TransformError> {
        let dialect = Dialect::for_file(file_name);
        let mut parser = TsParser::new(dialect)?.with_timeout(self.parse_timeout_micros);
        let parsed = parser.parse(source)?;

        if parsed.has_errors() {
            debug!(file = file_name, "syntax errors, structural pass skipped");
            return Ok(StructuralTransformResult {
                code: source.to_owned(),
                changes: Vec::new(),
                warnings: vec!["syntax errors found; structural rewrites skipped".to_owned()],
            });
        }

        let cx = FileContext {
            source,
            parsed: &parsed,
            typed: is_typed_file(file_name),
            kind,
        };
        let mut out = Outcome::default();
        let options = &self.options;

        imports::canonicalize_next_imports(&cx, options, &mut out);
        if options.replace_components {
            imports::canonicalize_component_imports(&cx, &mut out);
            components::run(&cx, &mut out);
        }
        if options.use_react_router {
            router::run(&cx, &mut out);
        }
        if options.transform_data_fetching {
            data_fetching::run(&cx, &mut out);
        }
        handlers::run(&cx, options, &mut out);

        let Outcome {
            mut edits,
            changes,
            mut warnings,
            required,
        } = out;
        if let Some(edit) = render_required_imports(&cx, &required) {
            edits.push(edit);
        }

        let applied = edits.apply(source);
        if applied.skipped > 0 {
            warnings.push(format!(
                "{} overlapping rewrites skipped; review the file manually",
                applied.skipped
            ));
        }
        debug!(
            file = file_name,
            changes = changes.len(),
            warnings = warnings.len(),
            "structural pass finished"
        );

        Ok(StructuralTransformResult {
            code: applied.text,
            changes,
            warnings,
        })
    }
}

/// Returns `true` if type annotations may be written into `file_name`.
fn is_typed_file(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    [".ts", ".tsx", ".mts", ".cts"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

/// What a pass knows about the file it rewrites.
pub(crate) struct FileContext<'a> {
    pub source: &'a str,
    pub parsed: &'a ParseResult,
    /// The file accepts type annotations.
    pub typed: bool,
    /// Role hint from the caller.
    pub kind: FileKind,
}

impl<'a> FileContext<'a> {
    pub fn root(&self) -> Node<'a> {
        self.parsed.tree.root_node()
    }

    pub fn text(&self, node: Node<'_>) -> &'a str {
        node_text(node, self.source).unwrap_or_default()
    }

    /// Imports of `module`, in source order.
    pub fn imports_of(&self, module: FrameworkModule) -> impl Iterator<Item = &'a ImportInfo> {
        self.parsed
            .imports
            .iter()
            .filter(move |import| import.module == Some(module))
    }

    /// Returns `true` if any import binds `name`.
    pub fn is_imported(&self, name: &str) -> bool {
        self.parsed.imports.iter().any(|import| import.binds(name))
    }

    /// The `import_statement` node an import was extracted from.
    pub fn import_statement(&self, import: &ImportInfo) -> Option<Node<'a>> {
        let offset = import.location.byte_offset as usize;
        let node = self.root().descendant_for_byte_range(offset, offset)?;
        find_ancestor(node, "import_statement")
    }

    /// A top-level function bound to `name`, by declaration or `const`.
    pub fn top_level_function(&self, name: &str) -> Option<Node<'a>> {
        let root = self.root();
        let mut cursor = root.walk();
        let statements: Vec<Node<'a>> = root.named_children(&mut cursor).collect();
        statements.into_iter().find_map(|statement| {
            let declaration = if statement.kind() == "export_statement" {
                statement.child_by_field_name("declaration")?
            } else {
                statement
            };
            self.function_in_declaration(declaration, name)
        })
    }

    fn function_in_declaration(&self, declaration: Node<'a>, name: &str) -> Option<Node<'a>> {
        match declaration.kind() {
            "function_declaration" | "generator_function_declaration" => declaration
                .child_by_field_name("name")
                .filter(|n| self.text(*n) == name)
                .map(|_| declaration),
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = declaration.walk();
                let declarators: Vec<Node<'a>> =
                    declaration.named_children(&mut cursor).collect();
                declarators.into_iter().find_map(|declarator| {
                    let bound = declarator.child_by_field_name("name")?;
                    let value = declarator.child_by_field_name("value")?;
                    (self.text(bound) == name && is_function(value)).then_some(value)
                })
            }
            _ => None,
        }
    }

    /// The smallest function node spanning exactly `range`.
    pub fn function_at(&self, range: std::ops::Range<usize>) -> Option<Node<'a>> {
        let mut node = self
            .root()
            .descendant_for_byte_range(range.start, range.end)?;
        loop {
            if is_function(node) && node.byte_range() == range {
                return Some(node);
            }
            node = node.parent()?;
            if node.start_byte() < range.start {
                return None;
            }
        }
    }

    /// Byte offset just past the last top-level import, or 0.
    pub fn import_insertion_point(&self) -> usize {
        let root = self.root();
        let mut cursor = root.walk();
        let end = root
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "import_statement")
            .map(|n| n.end_byte())
            .last();
        end.unwrap_or(0)
    }

    /// Leading whitespace of the line containing `pos`.
    pub fn indent_at(&self, pos: usize) -> &'a str {
        let line_start = self.source[..pos].rfind('\n').map_or(0, |i| i + 1);
        let line = &self.source[line_start..];
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }
}

/// Edits, change records and warnings accumulated by the passes.
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    pub edits: EditSet,
    pub changes: Vec<String>,
    pub warnings: Vec<String>,
    required: Vec<RequiredImport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequiredImport {
    module: &'static str,
    name: &'static str,
    type_only: bool,
}

impl Outcome {
    pub fn edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn change(&mut self, message: impl Into<String>) {
        self.changes.push(message.into());
    }

    /// Records a warning tied to the line of `node`.
    pub fn warn_at(&mut self, node: Node<'_>, message: impl std::fmt::Display) {
        self.warnings
            .push(format!("line {}: {message}", node.start_position().row + 1));
    }

    /// Takes over everything `other` collected.
    pub fn merge(&mut self, other: Outcome) {
        self.edits.append(other.edits);
        self.changes.extend(other.changes);
        self.warnings.extend(other.warnings);
        for import in other.required {
            if !self.required.contains(&import) {
                self.required.push(import);
            }
        }
    }

    /// Requests an import to be added after the file's imports.
    pub fn require_import(&mut self, module: &'static str, name: &'static str, type_only: bool) {
        let wanted = RequiredImport {
            module,
            name,
            type_only,
        };
        if !self.required.contains(&wanted) {
            self.required.push(wanted);
        }
    }
}

/// One insertion holding every requested import not already bound,
/// grouped by module and type-only-ness in first-requested order.
fn render_required_imports(cx: &FileContext<'_>, required: &[RequiredImport]) -> Option<Edit> {
    let mut groups: Vec<(&str, bool, Vec<&str>)> = Vec::new();
    for import in required.iter().filter(|r| !cx.is_imported(r.name)) {
        match groups
            .iter_mut()
            .find(|(module, type_only, _)| *module == import.module && *type_only == import.type_only)
        {
            Some((_, _, names)) => names.push(import.name),
            None => groups.push((import.module, import.type_only, vec![import.name])),
        }
    }
    if groups.is_empty() {
        return None;
    }

    let lines: Vec<String> = groups
        .iter()
        .map(|(module, type_only, names)| {
            let keyword = if *type_only { "import type" } else { "import" };
            format!("{keyword} {{ {} }} from '{module}';", names.join(", "))
        })
        .collect();

    let at = cx.import_insertion_point();
    let text = if at == 0 {
        format!("{}\n", lines.join("\n"))
    } else {
        format!("\n{}", lines.join("\n"))
    };
    Some(Edit::insert(at, text))
}

/// Returns `true` for nodes that introduce a function scope.
pub(crate) fn is_function(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "arrow_function"
            | "method_definition"
    )
}

/// Every named descendant of `node`, in document order.
pub(crate) fn descendants(node: Node<'_>) -> Vec<Node<'_>> {
    collect_descendants(node, true)
}

/// Named descendants of `node` that are not inside a nested function.
pub(crate) fn scoped_descendants(node: Node<'_>) -> Vec<Node<'_>> {
    collect_descendants(node, false)
}

fn collect_descendants(node: Node<'_>, cross_functions: bool) -> Vec<Node<'_>> {
    let mut found = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        let mut cursor = current.walk();
        let children: Vec<Node<'_>> = current.named_children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            if cross_functions || !is_function(child) {
                stack.push(child);
            }
        }
        if current != node {
            found.push(current);
        }
    }
    found
}

/// The first parameter pattern of a function, and its type annotation.
pub(crate) struct FirstParam<'t> {
    /// The whole parameter list (`formal_parameters`) or the bare parameter
    /// of `x => ...`.
    pub list: Node<'t>,
    /// The binding pattern (identifier or object pattern), if any parameter
    /// is declared.
    pub pattern: Option<Node<'t>>,
    /// The annotated type, without the colon.
    pub annotation: Option<Node<'t>>,
    /// Number of declared parameters.
    pub count: usize,
}

pub(crate) fn first_param(function: Node<'_>) -> Option<FirstParam<'_>> {
    if let Some(bare) = function.child_by_field_name("parameter") {
        return Some(FirstParam {
            list: bare,
            pattern: Some(bare),
            annotation: None,
            count: 1,
        });
    }

    let list = function.child_by_field_name("parameters")?;
    let mut cursor = list.walk();
    let params: Vec<Node<'_>> = list
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect();
    let Some(first) = params.first().copied() else {
        return Some(FirstParam {
            list,
            pattern: None,
            annotation: None,
            count: 0,
        });
    };

    let (pattern, annotation) = match first.kind() {
        "required_parameter" | "optional_parameter" => (
            first.child_by_field_name("pattern"),
            first
                .child_by_field_name("type")
                .and_then(|t| t.named_child(0)),
        ),
        _ => (Some(first), None),
    };

    Some(FirstParam {
        list,
        pattern,
        annotation,
        count: params.len(),
    })
}

/// Role of the module's default export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportRole {
    /// A React component rendered for a route.
    PageComponent,
    /// A request handler taking `(req, res)`.
    ApiHandler,
}

/// Classifies the default export. The caller's role hint wins; without one,
/// a function of two parameters named like a request and a response is an
/// API handler.
pub(crate) fn default_export_role(cx: &FileContext<'_>) -> Option<ExportRole> {
    match cx.kind {
        FileKind::ApiRoute => return Some(ExportRole::ApiHandler),
        FileKind::Page | FileKind::Layout => return Some(ExportRole::PageComponent),
        FileKind::Middleware => return None,
        _ => {}
    }

    let export = cx.parsed.default_export()?;
    let function = default_export_function(cx)?;
    let Some(list) = function.child_by_field_name("parameters") else {
        return Some(ExportRole::PageComponent);
    };
    let mut cursor = list.walk();
    let names: Vec<&str> = list
        .named_children(&mut cursor)
        .filter_map(|param| {
            let pattern = param.child_by_field_name("pattern").unwrap_or(param);
            (pattern.kind() == "identifier").then(|| cx.text(pattern))
        })
        .collect();

    let handler_like = matches!(
        names.as_slice(),
        [req, res] if matches!(*req, "req" | "request") && matches!(*res, "res" | "response")
    );
    let typed_handler = cx.text(list).contains("NextApiRequest");
    debug!(export = ?export.name, handler_like, typed_handler, "default export classified");

    Some(if handler_like || typed_handler {
        ExportRole::ApiHandler
    } else {
        ExportRole::PageComponent
    })
}

/// The function node behind the default export, following `export default Name`.
pub(crate) fn default_export_function<'a>(cx: &FileContext<'a>) -> Option<Node<'a>> {
    let export = cx.parsed.default_export()?;
    match (&export.function, export.name.as_deref()) {
        (Some(range), _) => cx.function_at(range.clone()),
        (None, Some(name)) => cx.top_level_function(name),
        (None, None) => None,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use nv_core::{ConversionOptions, FileKind, StructuralTransformResult};

    use super::StructuralTransformer;

    pub fn run(file_name: &str, kind: FileKind, source: &str) -> StructuralTransformResult {
        StructuralTransformer::new(ConversionOptions::all())
            .apply_to_file(file_name, source, kind)
            .expect("structural pass succeeds")
    }

    pub fn has_warning(result: &StructuralTransformResult, needle: &str) -> bool {
        result.warnings.iter().any(|w| w.contains(needle))
    }
}
