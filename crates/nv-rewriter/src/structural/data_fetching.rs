//! Data-fetching exports and the page props they feed.
//!
//! `getServerSideProps` and `getStaticProps` become a React Router `loader`:
//! the context parameter turns into `{ params, request }`, `props` results are
//! unwrapped, `notFound` throws a 404 response and `redirect` results call
//! `redirect()`. The page component then reads its former props through
//! `useLoaderData()`.
//!
//! A function touching the request or response objects, or a module
//! importing server-only code, stays as it is with a warning: it needs a
//! server runtime a client loader cannot provide.

use nv_ts_parser::{ExportInfo, ExportKind, Node, strip_quotes};

use super::{
    Edit, ExportRole, FileContext, Outcome, default_export_function, default_export_role,
    descendants, first_param, scoped_descendants,
};

const LOADER: &str = "loader";

const SEARCH_PARAMS: &str = "Object.fromEntries(new URL(request.url).searchParams)";

const SERVER_ONLY: &str = "it reads the request or response object, which needs a server runtime";

pub(super) fn run(cx: &FileContext<'_>, out: &mut Outcome) {
    let mut converted: Option<&str> = None;

    for export in &cx.parsed.exports {
        let Some(name) = export.name.as_deref() else {
            continue;
        };
        let Some(statement) = statement_node(cx, export) else {
            continue;
        };
        match name {
            "getServerSideProps" | "getStaticProps" => {
                if let Some(first) = converted {
                    out.warn_at(
                        statement,
                        format_args!("{name} left unchanged: {first} already became the loader"),
                    );
                    continue;
                }
                match convert_loader(cx, export) {
                    Ok(rewrite) => {
                        out.merge(rewrite);
                        out.change(format!("Converted {name} to a React Router loader"));
                        converted = Some(name);
                    }
                    Err(reason) => {
                        out.warn_at(statement, format_args!("{name} left unchanged: {reason}"));
                    }
                }
            }
            "getStaticPaths" => out.warn_at(
                statement,
                "getStaticPaths has no client-side equivalent; every path is resolved at runtime",
            ),
            _ => {}
        }
    }

    flag_initial_props(cx, out);

    if converted.is_some() {
        read_loader_data(cx, out);
    }
}

fn statement_node<'a>(cx: &FileContext<'a>, export: &ExportInfo) -> Option<Node<'a>> {
    cx.root()
        .descendant_for_byte_range(export.statement.start, export.statement.end)
}

/// How the context parameter is declared.
enum Context<'t> {
    None,
    Named(&'t str),
    Destructured(Node<'t>),
}

fn convert_loader(cx: &FileContext<'_>, export: &ExportInfo) -> Result<Outcome, &'static str> {
    if export.kind == ExportKind::Clause {
        return Err("it is exported through an export clause; rename it to loader by hand");
    }
    let function = export
        .function
        .clone()
        .and_then(|range| cx.function_at(range))
        .ok_or("it is not a function")?;
    if cx
        .parsed
        .imports
        .iter()
        .any(|import| import.module.is_some_and(|m| m.is_server_only()))
    {
        return Err("the module imports server-only code");
    }
    let body = function
        .child_by_field_name("body")
        .ok_or("it has no body")?;

    let param = first_param(function);
    let context = match param.as_ref().and_then(|p| p.pattern) {
        None => Context::None,
        Some(p) if p.kind() == "identifier" => Context::Named(cx.text(p)),
        Some(p) if p.kind() == "object_pattern" => Context::Destructured(p),
        Some(_) => return Err("its context parameter has an unsupported shape"),
    };

    let mut rw = Outcome::default();
    rename_to_loader(cx, function, &mut rw)?;

    match context {
        Context::None => {}
        Context::Named(ctx) => rewrite_context_uses(cx, body, ctx, &mut rw)?,
        Context::Destructured(pattern) => rewrite_destructured(cx, body, pattern, &mut rw)?,
    }
    if let Some(param) = param.filter(|p| p.count > 0) {
        let args = if cx.typed {
            rw.require_import("react-router-dom", "LoaderFunctionArgs", true);
            "({ params, request }: LoaderFunctionArgs)"
        } else {
            "({ params, request })"
        };
        rw.edit(Edit::replace(param.list.byte_range(), args));
    }

    if body.kind() == "statement_block" {
        let returns = scoped_descendants(body)
            .into_iter()
            .filter(|n| n.kind() == "return_statement");
        for statement in returns {
            if let Some(value) = statement.named_child(0) {
                rewrite_result(cx, Some(statement), value, &mut rw);
            }
        }
    } else {
        rewrite_result(cx, None, body, &mut rw);
    }

    Ok(rw)
}

fn rename_to_loader(cx: &FileContext<'_>, function: Node<'_>, rw: &mut Outcome) -> Result<(), &'static str> {
    let name = match function.child_by_field_name("name") {
        Some(name) if function.kind() == "function_declaration" => name,
        _ => function
            .parent()
            .filter(|p| p.kind() == "variable_declarator")
            .and_then(|d| d.child_by_field_name("name"))
            .ok_or("it is not bound to a name")?,
    };
    if cx.text(name) != LOADER {
        rw.edit(Edit::replace(name.byte_range(), LOADER));
    }
    Ok(())
}

/// `ctx.params` and `ctx.query` uses of a named context parameter.
fn rewrite_context_uses(
    cx: &FileContext<'_>,
    body: Node<'_>,
    ctx: &str,
    rw: &mut Outcome,
) -> Result<(), &'static str> {
    for node in descendants(body) {
        if node.kind() != "identifier" || cx.text(node) != ctx {
            continue;
        }
        let member = node
            .parent()
            .filter(|p| p.kind() == "member_expression")
            .filter(|p| p.child_by_field_name("object") == Some(node));
        let Some(member) = member else {
            rw.warn_at(
                node,
                format_args!("{ctx} is passed along as a whole; pass params and request instead"),
            );
            continue;
        };
        let property = member
            .child_by_field_name("property")
            .map(|p| cx.text(p))
            .unwrap_or_default();
        match property {
            "req" | "res" => return Err(SERVER_ONLY),
            "params" => rw.edit(Edit::replace(member.byte_range(), "params")),
            "query" => rw.edit(Edit::replace(member.byte_range(), SEARCH_PARAMS)),
            other => rw.warn_at(
                member,
                format_args!("context.{other} has no loader equivalent"),
            ),
        }
    }
    Ok(())
}

/// Keys of a destructured context parameter.
fn rewrite_destructured(
    cx: &FileContext<'_>,
    body: Node<'_>,
    pattern: Node<'_>,
    rw: &mut Outcome,
) -> Result<(), &'static str> {
    let mut declarations = Vec::new();
    let mut cursor = pattern.walk();
    let entries: Vec<Node<'_>> = pattern.named_children(&mut cursor).collect();

    for entry in entries {
        let (key, binding) = match entry.kind() {
            "shorthand_property_identifier_pattern" => (cx.text(entry), None),
            "pair_pattern" => (
                entry
                    .child_by_field_name("key")
                    .map(|k| strip_quotes(cx.text(k)))
                    .unwrap_or_default(),
                entry.child_by_field_name("value").map(|v| cx.text(v)),
            ),
            "object_assignment_pattern" => (
                entry
                    .child_by_field_name("left")
                    .map(|k| cx.text(k))
                    .unwrap_or_default(),
                None,
            ),
            _ => {
                rw.warn_at(entry, "rest element in the context parameter; review the loader by hand");
                continue;
            }
        };
        match key {
            "req" | "res" => return Err(SERVER_ONLY),
            "params" => {
                if let Some(binding) = binding {
                    declarations.push(format!("const {binding} = params;"));
                }
            }
            "query" => {
                let binding = binding.unwrap_or("query");
                declarations.push(format!("const {binding} = {SEARCH_PARAMS};"));
            }
            other => rw.warn_at(entry, format_args!("context.{other} has no loader equivalent")),
        }
    }

    if declarations.is_empty() {
        return Ok(());
    }
    if body.kind() != "statement_block" {
        return Err("its context needs statements but the body is an expression");
    }
    let indent = block_indent(cx, body);
    let text: String = declarations
        .iter()
        .map(|d| format!("\n{indent}{d}"))
        .collect();
    rw.edit(Edit::insert(body.start_byte() + 1, text));
    Ok(())
}

/// Rewrites one result object. `statement` is the enclosing `return`, absent
/// for expression-bodied arrows.
fn rewrite_result(cx: &FileContext<'_>, statement: Option<Node<'_>>, value: Node<'_>, rw: &mut Outcome) {
    let mut object = value;
    while object.kind() == "parenthesized_expression" {
        match object.named_child(0) {
            Some(inner) => object = inner,
            None => break,
        }
    }
    if object.kind() != "object" {
        rw.warn_at(value, "result is not an object literal; unwrap its props by hand");
        return;
    }

    let mut props = None;
    let mut redirect = None;
    let mut not_found = false;
    let mut cursor = object.walk();
    let entries: Vec<Node<'_>> = object.named_children(&mut cursor).collect();
    for entry in entries {
        let (key, value) = match entry.kind() {
            "pair" => match (entry.child_by_field_name("key"), entry.child_by_field_name("value")) {
                (Some(key), Some(value)) => (strip_quotes(cx.text(key)), value),
                _ => continue,
            },
            "shorthand_property_identifier" => (cx.text(entry), entry),
            _ => continue,
        };
        match key {
            "props" => props = Some(value),
            "redirect" => redirect = Some(value),
            "notFound" => not_found = cx.text(value) == "true",
            "revalidate" => rw.warn_at(
                entry,
                "revalidate is ignored; a client loader runs on every navigation",
            ),
            _ => {}
        }
    }

    if let Some(redirect) = redirect {
        let destination = (redirect.kind() == "object")
            .then(|| object_value(cx, redirect, "destination"))
            .flatten();
        match (statement, destination) {
            (Some(statement), Some(destination)) => {
                rw.edit(Edit::replace(
                    statement.byte_range(),
                    format!("return redirect({destination});"),
                ));
                rw.require_import("react-router-dom", "redirect", false);
            }
            _ => rw.warn_at(redirect, "redirect result could not be converted"),
        }
        return;
    }

    if not_found {
        match statement {
            Some(statement) => rw.edit(Edit::replace(
                statement.byte_range(),
                "throw new Response('Not Found', { status: 404 });",
            )),
            None => rw.warn_at(value, "notFound result could not be converted"),
        }
        return;
    }

    match props {
        Some(props) => rw.edit(Edit::replace(object.byte_range(), cx.text(props))),
        None => rw.warn_at(value, "result has no props; review the loader return value"),
    }
}

fn object_value<'a>(cx: &FileContext<'a>, object: Node<'_>, key: &str) -> Option<&'a str> {
    let mut cursor = object.walk();
    let pairs: Vec<Node<'_>> = object.named_children(&mut cursor).collect();
    pairs.into_iter().find_map(|pair| match pair.kind() {
        "pair" => {
            let k = pair.child_by_field_name("key")?;
            (strip_quotes(cx.text(k)) == key)
                .then(|| pair.child_by_field_name("value").map(|v| cx.text(v)))
                .flatten()
        }
        "shorthand_property_identifier" => (cx.text(pair) == key).then(|| cx.text(pair)),
        _ => None,
    })
}

/// `Page.getInitialProps = ...` assignments.
fn flag_initial_props(cx: &FileContext<'_>, out: &mut Outcome) {
    for node in descendants(cx.root()) {
        if node.kind() != "assignment_expression" {
            continue;
        }
        let assigns_initial_props = node
            .child_by_field_name("left")
            .filter(|left| left.kind() == "member_expression")
            .and_then(|left| left.child_by_field_name("property"))
            .is_some_and(|p| cx.text(p) == "getInitialProps");
        if assigns_initial_props {
            out.warn_at(
                node,
                "getInitialProps has no React Router equivalent; move the fetch into a loader",
            );
        }
    }
}

/// Replaces the page component's props with a `useLoaderData()` read.
fn read_loader_data(cx: &FileContext<'_>, out: &mut Outcome) {
    if default_export_role(cx) != Some(ExportRole::PageComponent) {
        return;
    }
    let Some(function) = default_export_function(cx) else {
        let wrapped = cx
            .parsed
            .default_export()
            .and_then(|export| statement_node(cx, export));
        if let Some(statement) = wrapped {
            out.warn_at(
                statement,
                "default export is wrapped; read the loader data with useLoaderData() inside the component",
            );
        }
        return;
    };
    let Some(param) = first_param(function) else {
        return;
    };
    let Some(pattern) = param.pattern else {
        return;
    };
    if !matches!(pattern.kind(), "object_pattern" | "identifier") {
        out.warn_at(pattern, "page props have an unsupported shape; use useLoaderData() by hand");
        return;
    }
    let Some(body) = function.child_by_field_name("body") else {
        return;
    };

    let cast = match param.annotation {
        Some(annotation) => format!(" as {}", cx.text(annotation)),
        None if cx.typed => " as Awaited<ReturnType<typeof loader>>".to_owned(),
        None => String::new(),
    };
    let read = format!("const {} = useLoaderData(){cast};", cx.text(pattern));

    out.edit(Edit::replace(param.list.byte_range(), "()"));
    if body.kind() == "statement_block" {
        let indent = block_indent(cx, body);
        out.edit(Edit::insert(body.start_byte() + 1, format!("\n{indent}{read}")));
    } else {
        let base = cx.indent_at(function.start_byte());
        out.edit(Edit::replace(
            body.byte_range(),
            format!("{{\n{base}  {read}\n{base}  return {};\n{base}}}", cx.text(body)),
        ));
    }
    out.require_import("react-router-dom", "useLoaderData", false);
    out.change("Replaced page props with useLoaderData()");
}

/// Indentation for a statement inserted at the top of `block`.
fn block_indent(cx: &FileContext<'_>, block: Node<'_>) -> String {
    let mut cursor = block.walk();
    let first = block.named_children(&mut cursor).next();
    match first {
        Some(first) if first.start_position().row > block.start_position().row => {
            cx.indent_at(first.start_byte()).to_owned()
        }
        _ => format!("{}  ", cx.indent_at(block.start_byte())),
    }
}

#[cfg(test)]
mod tests {
    use nv_core::FileKind;

    use crate::structural::testing::{has_warning, run};

    #[test]
    fn test_server_side_props_to_loader() {
        let source = "import type { GetServerSidePropsContext } from 'next';

export async function getServerSideProps(ctx: GetServerSidePropsContext) {
  const post = await fetchPost(ctx.params.id);
  return { props: { post } };
}

export default function Post({ post }) {
  return <h1>{post.title}</h1>;
}
";
        let result = run("pages/posts/[id].tsx", FileKind::Page, source);
        insta::assert_snapshot!(result.code, @r"
        import type { GetServerSidePropsContext } from 'next';
        import type { LoaderFunctionArgs } from 'react-router-dom';
        import { useLoaderData } from 'react-router-dom';

        export async function loader({ params, request }: LoaderFunctionArgs) {
          const post = await fetchPost(params.id);
          return { post };
        }

        export default function Post() {
          const { post } = useLoaderData() as Awaited<ReturnType<typeof loader>>;
          return <h1>{post.title}</h1>;
        }
        ");
        assert_eq!(
            result.changes,
            [
                "Converted getServerSideProps to a React Router loader",
                "Replaced page props with useLoaderData()",
            ]
        );
    }

    #[test]
    fn test_static_props_arrow_in_javascript() {
        let source = "export const getStaticProps = async ({ params: { slug } }) => {
  const doc = await load(slug);
  if (!doc) {
    return { notFound: true };
  }
  return { props: { doc }, revalidate: 10 };
};

const Doc = (props) => <article>{props.doc.body}</article>;

export default Doc;
";
        let result = run("pages/docs/[slug].jsx", FileKind::Page, source);
        let code = &result.code;
        assert!(code.starts_with("import { useLoaderData } from 'react-router-dom';\n"));
        assert!(code.contains("export const loader = async ({ params, request }) => {\n  const { slug } = params;"));
        assert!(code.contains("throw new Response('Not Found', { status: 404 });"));
        assert!(code.contains("return { doc };"));
        assert!(code.contains("const Doc = () => {\n  const props = useLoaderData();\n  return <article>{props.doc.body}</article>;\n}"));
        assert!(has_warning(&result, "revalidate is ignored"));
    }

    #[test]
    fn test_redirect_and_query() {
        let source = "export async function getServerSideProps({ query }) {
  if (!query.q) {
    return { redirect: { destination: '/search', permanent: false } };
  }
  return { props: { q: query.q } };
}
";
        let result = run("pages/search.js", FileKind::Page, source);
        let code = &result.code;
        assert!(code.contains(
            "export async function loader({ params, request }) {\n  const query = Object.fromEntries(new URL(request.url).searchParams);"
        ));
        assert!(code.contains("return redirect('/search');"));
        assert!(code.starts_with("import { redirect } from 'react-router-dom';\n"));
    }

    #[test]
    fn test_request_access_stays_server_side() {
        let source = "export async function getServerSideProps({ req }) {
  return { props: { ua: req.headers['user-agent'] } };
}

export default function Page({ ua }) {
  return ua;
}
";
        let result = run("pages/ua.jsx", FileKind::Page, source);
        assert_eq!(result.code, source);
        assert!(has_warning(&result, "getServerSideProps left unchanged"));
        assert!(has_warning(&result, "needs a server runtime"));
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_static_paths_and_initial_props_warn() {
        let source = "export async function getStaticPaths() {
  return { paths: [], fallback: false };
}

function Legacy() {
  return null;
}
Legacy.getInitialProps = async () => ({});

export default Legacy;
";
        let result = run("pages/legacy.jsx", FileKind::Page, source);
        assert!(has_warning(&result, "line 1: getStaticPaths"));
        assert!(has_warning(&result, "line 8: getInitialProps"));
        assert_eq!(result.code, source);
    }

    #[test]
    fn test_annotated_props_keep_their_type() {
        let source = "export async function getStaticProps() {
  return { props: { items: [] } };
}

export default function List({ items }: Props) {
  return items.length;
}
";
        let result = run("pages/list.tsx", FileKind::Page, source);
        assert!(result.code.contains("export async function loader() {"));
        assert!(result.code.contains("const { items } = useLoaderData() as Props;"));
        assert!(!result.code.contains("LoaderFunctionArgs"));
    }
}
