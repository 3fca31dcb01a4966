//! Rendering of a [`RouteTree`] as a `createBrowserRouter` module.

use std::fmt::Write as _;

use camino::Utf8Path;
use nv_core::RouteObject;

use crate::target::RouteTree;

/// Renders the tree as TSX source that builds a browser router.
///
/// Each component is lazily imported from its file, extension removed.
///
/// # Examples
///
/// ```
/// use nv_core::RouteConfig;
/// use nv_routes::{build_source_routes, convert_routes, render_route_module};
///
/// let config = RouteConfig::default();
/// let tree = convert_routes(&build_source_routes(&["pages/index.tsx"], &config), &config);
/// let module = render_route_module(&tree);
///
/// assert!(module.contains("const Index = lazy(() => import('./pages/index'));"));
/// assert!(module.contains("{ path: '/', element: <Index /> },"));
/// ```
#[must_use]
pub fn render_route_module(tree: &RouteTree) -> String {
    let mut out = String::new();
    if !tree.components.is_empty() {
        out.push_str("import { lazy } from 'react';\n");
    }
    out.push_str("import { createBrowserRouter } from 'react-router-dom';\n\n");

    for component in &tree.components {
        let module = Utf8Path::new(&component.file).with_extension("");
        let _ = writeln!(
            out,
            "const {} = lazy(() => import({}));",
            component.name,
            quote(&format!("./{module}"))
        );
    }
    if !tree.components.is_empty() {
        out.push('\n');
    }

    out.push_str("export const router = createBrowserRouter([\n");
    for route in &tree.routes {
        render_route(&mut out, route, 1);
    }
    out.push_str("]);\n");
    out
}

fn render_route(out: &mut String, route: &RouteObject, depth: usize) {
    let indent = "  ".repeat(depth);
    match route.children.as_deref() {
        None => {
            let _ = writeln!(
                out,
                "{indent}{{ path: {}, element: {} }},",
                quote(&route.path),
                route.element
            );
        }
        Some(children) => {
            let _ = writeln!(out, "{indent}{{");
            let _ = writeln!(out, "{indent}  path: {},", quote(&route.path));
            let _ = writeln!(out, "{indent}  element: {},", route.element);
            let _ = writeln!(out, "{indent}  children: [");
            for child in children {
                render_route(out, child, depth + 2);
            }
            let _ = writeln!(out, "{indent}  ],");
            let _ = writeln!(out, "{indent}}},");
        }
    }
}

/// Single-quoted string literal.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\'' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
