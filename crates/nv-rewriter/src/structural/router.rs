//! `useRouter()` bindings.
//!
//! The routing rules expect the hook result bound to `router` and only
//! rewrite members with a direct React Router counterpart. This pass
//! renames other bindings, replaces `query` and `isReady`, and flags the
//! members and shapes that have no counterpart.

use nv_core::{FrameworkModule, FxHashSet, ImportKind, fx_hash_set};
use nv_ts_parser::{Node, find_ancestor};

use super::{Edit, FileContext, Outcome, descendants, is_function};

const ROUTER_MODULES: [FrameworkModule; 2] =
    [FrameworkModule::NextRouter, FrameworkModule::NextNavigation];

pub(super) fn run(cx: &FileContext<'_>, out: &mut Outcome) {
    let hooks = hook_locals(cx, out);
    if hooks.is_empty() {
        return;
    }

    for node in descendants(cx.root()) {
        if node.kind() != "call_expression" {
            continue;
        }
        let Some(function) = node.child_by_field_name("function") else {
            continue;
        };
        if function.kind() != "identifier" || !hooks.contains(cx.text(function)) {
            continue;
        }
        rewrite_hook_call(cx, node, out);
    }
}

/// Local names bound to `useRouter`; flags `withRouter` and the default
/// `Router` singleton along the way.
fn hook_locals<'a>(cx: &FileContext<'a>, out: &mut Outcome) -> FxHashSet<&'a str> {
    let mut hooks = fx_hash_set();
    for module in ROUTER_MODULES {
        for import in cx.imports_of(module) {
            let Some(statement) = cx.import_statement(import) else {
                continue;
            };
            if import.kind == ImportKind::Default && module == FrameworkModule::NextRouter {
                out.warn_at(
                    statement,
                    "default Router import from next/router; call useNavigate() inside components instead",
                );
            }
            for specifier in descendants(statement).into_iter().filter(|n| n.kind() == "import_specifier") {
                let Some(name) = specifier.child_by_field_name("name").map(|n| cx.text(n)) else {
                    continue;
                };
                let local = specifier
                    .child_by_field_name("alias")
                    .map_or(name, |alias| cx.text(alias));
                match name {
                    "useRouter" => {
                        hooks.insert(local);
                    }
                    "withRouter" => out.warn_at(
                        specifier,
                        "withRouter has no React Router equivalent; use hooks in the wrapped component",
                    ),
                    _ => {}
                }
            }
        }
    }
    hooks
}

fn rewrite_hook_call(cx: &FileContext<'_>, call: Node<'_>, out: &mut Outcome) {
    let declarator = call
        .parent()
        .filter(|p| p.kind() == "variable_declarator")
        .filter(|p| p.child_by_field_name("value") == Some(call));
    let Some(declarator) = declarator else {
        out.warn_at(
            call,
            "useRouter() result used without a binding; rewrite it with useNavigate() or useLocation()",
        );
        return;
    };
    let Some(name) = declarator.child_by_field_name("name") else {
        return;
    };
    if name.kind() != "identifier" {
        out.warn_at(
            name,
            "destructured useRouter() result; rewrite it with useNavigate(), useParams() and useLocation()",
        );
        return;
    }

    let binding = cx.text(name);
    if binding != "router" {
        out.edit(Edit::replace(name.byte_range(), "router"));
        out.change(format!("Renamed useRouter() binding {binding} to router"));
    }

    let function = enclosing_function(declarator);
    let scope = function.map_or(cx.root(), |f| f.child_by_field_name("body").unwrap_or(f));
    let params_taken = is_taken(cx, function.unwrap_or(cx.root()), "params");
    let mut uses_query = false;
    let mut rewrote_ready = false;
    for member in descendants(scope) {
        if member.kind() != "member_expression" {
            continue;
        }
        let (Some(object), Some(property)) = (
            member.child_by_field_name("object"),
            member.child_by_field_name("property"),
        ) else {
            continue;
        };
        if object.kind() != "identifier" || cx.text(object) != binding {
            continue;
        }

        match cx.text(property) {
            "query" if params_taken => out.warn_at(
                member,
                "router.query kept: params is already bound here; call useParams() under another name",
            ),
            "query" => {
                out.edit(Edit::replace(member.byte_range(), "params"));
                uses_query = true;
            }
            "isReady" => {
                out.edit(Edit::replace(member.byte_range(), "true"));
                rewrote_ready = true;
            }
            "events" => out.warn_at(
                member,
                "router.events has no React Router equivalent; use a useLocation() effect",
            ),
            "locale" | "locales" | "defaultLocale" => out.warn_at(
                member,
                format_args!("router.{} needs an i18n library", cx.text(property)),
            ),
            _ if binding != "router" => out.edit(Edit::replace(object.byte_range(), "router")),
            _ => {}
        }
    }

    if uses_query {
        if let Some(statement) = find_ancestor(declarator, "lexical_declaration")
            .or_else(|| find_ancestor(declarator, "variable_declaration"))
        {
            let indent = cx.indent_at(statement.start_byte());
            out.edit(Edit::insert(
                statement.end_byte(),
                format!("\n{indent}const params = useParams();"),
            ));
        }
        out.change("Replaced router.query with useParams()");
    }
    if rewrote_ready {
        out.change("Replaced router.isReady with true");
    }
}

/// The innermost function around `node`.
fn enclosing_function(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node.parent();
    while let Some(n) = current {
        if is_function(n) {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// Returns `true` if `name` is imported, or appears as an identifier
/// anywhere in `scope`, parameters included.
fn is_taken(cx: &FileContext<'_>, scope: Node<'_>, name: &str) -> bool {
    cx.parsed.imports.iter().any(|import| import.binds(name))
        || descendants(scope).into_iter().any(|node| {
            matches!(
                node.kind(),
                "identifier" | "shorthand_property_identifier_pattern" | "shorthand_property_identifier"
            ) && cx.text(node) == name
        })
}
