//! Canonical spelling of framework imports.
//!
//! The import rules match one spelling per construct: a single name per
//! statement for `next` and `next/router`, no aliases, and the component
//! modules bound to their documented default names.

use std::ops::Range;

use nv_core::{ConversionOptions, FrameworkModule, ImportInfo, ImportKind};
use nv_ts_parser::{Node, has_token};

use super::{Edit, FileContext, Outcome, descendants};

/// Component modules and the default binding the rules expect.
const COMPONENT_DEFAULTS: [(FrameworkModule, &str); 5] = [
    (FrameworkModule::NextLink, "Link"),
    (FrameworkModule::NextImage, "Image"),
    (FrameworkModule::NextHead, "Head"),
    (FrameworkModule::NextScript, "Script"),
    (FrameworkModule::NextDynamic, "dynamic"),
];

/// One `name` or `name as alias` inside `{ ... }`.
struct Specifier<'a> {
    name: &'a str,
    alias: Option<&'a str>,
    is_type: bool,
}

/// Splits multi-name imports from `next` and the router modules into one
/// statement per name and drops aliases, renaming their uses.
pub(super) fn canonicalize_next_imports(
    cx: &FileContext<'_>,
    options: &ConversionOptions,
    out: &mut Outcome,
) {
    for import in &cx.parsed.imports {
        let allowed = match import.module {
            Some(FrameworkModule::Next) if import.path == "next" => {
                options.transform_data_fetching
                    || options.preserve_typescript
                    || options.convert_api_routes
            }
            Some(FrameworkModule::NextRouter | FrameworkModule::NextNavigation) => {
                options.use_react_router
            }
            _ => false,
        };
        if allowed && matches!(import.kind, ImportKind::Named | ImportKind::TypeOnly) {
            canonicalize_statement(cx, import, out);
        }
    }
}

fn canonicalize_statement(cx: &FileContext<'_>, import: &ImportInfo, out: &mut Outcome) {
    let Some(statement) = cx.import_statement(import) else {
        return;
    };
    let Some(specifiers) = named_specifiers(cx, statement) else {
        return;
    };
    let split = specifiers.len() > 1;
    if !split && specifiers.iter().all(|s| s.alias.is_none()) {
        return;
    }
    let Some(source) = statement.child_by_field_name("source").map(|n| cx.text(n)) else {
        return;
    };

    let statement_is_type = has_token(statement, "type");
    let mut lines = Vec::with_capacity(specifiers.len());
    for spec in &specifiers {
        let mut binding = spec.name.to_owned();
        if let Some(alias) = spec.alias {
            if is_bound_elsewhere(cx, spec.name, statement.byte_range()) {
                out.warn_at(
                    statement,
                    format_args!("cannot rename {alias} to {}: the name is already bound", spec.name),
                );
                binding = format!("{} as {alias}", spec.name);
            } else {
                rename_identifiers(cx, alias, spec.name, statement.byte_range(), out);
                out.change(format!(
                    "Renamed {alias} to {} (imported from '{}')",
                    spec.name, import.path
                ));
            }
        }
        let keyword = if statement_is_type || spec.is_type {
            "import type"
        } else {
            "import"
        };
        lines.push(format!("{keyword} {{ {binding} }} from {source};"));
    }

    out.edit(Edit::replace(statement.byte_range(), lines.join("\n")));
    if split {
        out.change(format!(
            "Split import from '{}' into one import per name",
            import.path
        ));
    }
}

/// Binds the default import of each component module to its canonical name.
pub(super) fn canonicalize_component_imports(cx: &FileContext<'_>, out: &mut Outcome) {
    for (module, canonical) in COMPONENT_DEFAULTS {
        for import in cx.imports_of(module) {
            if import.kind != ImportKind::Default {
                continue;
            }
            let Some(statement) = cx.import_statement(import) else {
                continue;
            };
            let Some(local) = default_binding(statement) else {
                continue;
            };
            let local_name = cx.text(local);
            if local_name == canonical {
                continue;
            }
            if is_bound_elsewhere(cx, canonical, statement.byte_range()) {
                out.warn_at(
                    statement,
                    format_args!("cannot rename {local_name} to {canonical}: the name is already bound"),
                );
                continue;
            }

            out.edit(Edit::replace(local.byte_range(), canonical));
            rename_identifiers(cx, local_name, canonical, statement.byte_range(), out);
            out.change(format!(
                "Renamed {local_name} to {canonical} (imported from '{}')",
                import.path
            ));
        }
    }
}

/// The specifiers of an import whose clause is only `{ ... }`.
fn named_specifiers<'a>(cx: &FileContext<'a>, statement: Node<'a>) -> Option<Vec<Specifier<'a>>> {
    let mut cursor = statement.walk();
    let clause = statement
        .named_children(&mut cursor)
        .find(|n| n.kind() == "import_clause")?;

    let mut clause_cursor = clause.walk();
    let parts: Vec<Node<'a>> = clause.named_children(&mut clause_cursor).collect();
    let [named] = parts.as_slice() else {
        return None;
    };
    if named.kind() != "named_imports" {
        return None;
    }

    let mut named_cursor = named.walk();
    let specifiers: Vec<Specifier<'a>> = named
        .named_children(&mut named_cursor)
        .filter(|n| n.kind() == "import_specifier")
        .filter_map(|spec| {
            Some(Specifier {
                name: cx.text(spec.child_by_field_name("name")?),
                alias: spec.child_by_field_name("alias").map(|a| cx.text(a)),
                is_type: has_token(spec, "type"),
            })
        })
        .collect();
    (!specifiers.is_empty()).then_some(specifiers)
}

fn default_binding(statement: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = statement.walk();
    let clause = statement
        .named_children(&mut cursor)
        .find(|n| n.kind() == "import_clause")?;
    let mut clause_cursor = clause.walk();
    clause
        .named_children(&mut clause_cursor)
        .find(|n| n.kind() == "identifier")
}

/// Returns `true` if `name` is imported or used as an identifier anywhere
/// outside `statement`.
fn is_bound_elsewhere(cx: &FileContext<'_>, name: &str, statement: Range<usize>) -> bool {
    let imported = cx.parsed.imports.iter().any(|import| {
        import.binds(name) && import.location.byte_offset as usize != statement.start
    });
    imported
        || descendants(cx.root()).into_iter().any(|node| {
            is_reference(node)
                && !statement.contains(&node.start_byte())
                && cx.text(node) == name
        })
}

/// Renames every reference to `from` outside `skip`.
///
/// Object shorthands keep their key: `{ from }` becomes `{ from: to }`.
fn rename_identifiers(cx: &FileContext<'_>, from: &str, to: &str, skip: Range<usize>, out: &mut Outcome) {
    for node in descendants(cx.root()) {
        if !is_reference(node) || skip.contains(&node.start_byte()) || cx.text(node) != from {
            continue;
        }
        let replacement = if node.kind() == "shorthand_property_identifier" {
            format!("{from}: {to}")
        } else {
            to.to_owned()
        };
        out.edit(Edit::replace(node.byte_range(), replacement));
    }
}

fn is_reference(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "identifier" | "type_identifier" | "shorthand_property_identifier"
    )
}
