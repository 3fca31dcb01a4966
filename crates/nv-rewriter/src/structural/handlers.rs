//! API handlers and middleware.
//!
//! Neither has a client-side counterpart, so nothing is rewritten here: the
//! pass recognizes them and says where they have to go.

use nv_core::{ConversionOptions, FileKind, FrameworkModule};
use nv_ts_parser::{ExportInfo, Node, strip_quotes};

use super::{ExportRole, FileContext, Outcome, default_export_role, descendants};

pub(super) fn run(cx: &FileContext<'_>, options: &ConversionOptions, out: &mut Outcome) {
    if options.convert_api_routes && cx.kind != FileKind::Middleware {
        api_handler(cx, out);
    }
    if options.handle_middleware {
        middleware(cx, out);
    }
}

fn api_handler(cx: &FileContext<'_>, out: &mut Outcome) {
    if default_export_role(cx) != Some(ExportRole::ApiHandler) {
        return;
    }
    if let Some(statement) = export_statement(cx, |e| e.is_default) {
        out.warn_at(
            statement,
            "API handler needs a server runtime; port it to an Express endpoint",
        );
    }
    if let Some(statement) = export_statement(cx, |e| e.is_named("config")) {
        out.warn_at(
            statement,
            "API route config (bodyParser, runtime) has no Express equivalent",
        );
    }
}

fn middleware(cx: &FileContext<'_>, out: &mut Outcome) {
    let is_middleware =
        cx.kind == FileKind::Middleware || cx.parsed.export_named("middleware").is_some();

    if is_middleware {
        if let Some(statement) = export_statement(cx, |e| e.is_named("middleware") || e.is_default) {
            out.warn_at(
                statement,
                "middleware runs before every request on the server; move its checks into route loaders",
            );
        }
        if let Some(statement) = export_statement(cx, |e| e.is_named("config")) {
            let matcher = statement_matcher(cx, statement);
            out.warn_at(
                statement,
                format_args!(
                    "middleware matcher {} must be enforced by the routes themselves",
                    matcher.unwrap_or("(none)")
                ),
            );
        }
        return;
    }

    for import in cx.imports_of(FrameworkModule::NextServer) {
        if let Some(statement) = cx.import_statement(import) {
            out.warn_at(statement, "next/server APIs need a server runtime");
        }
    }
}

fn export_statement<'a>(
    cx: &FileContext<'a>,
    pred: impl Fn(&ExportInfo) -> bool,
) -> Option<Node<'a>> {
    let export = cx.parsed.exports.iter().find(|e| pred(*e))?;
    cx.root()
        .descendant_for_byte_range(export.statement.start, export.statement.end)
}

/// The text of the `matcher` value inside an exported `config` object.
fn statement_matcher<'a>(cx: &FileContext<'a>, statement: Node<'a>) -> Option<&'a str> {
    descendants(statement)
        .into_iter()
        .filter(|n| n.kind() == "pair")
        .find(|pair| {
            pair.child_by_field_name("key")
                .is_some_and(|k| strip_quotes(cx.text(k)) == "matcher")
        })
        .and_then(|pair| pair.child_by_field_name("value"))
        .map(|value| cx.text(value))
}

#[cfg(test)]
mod tests {
    use nv_core::FileKind;

    use crate::structural::testing::{has_warning, run};

    #[test]
    fn test_api_route_flagged() {
        let source = "import type { NextApiRequest, NextApiResponse } from 'next';

export const config = { api: { bodyParser: false } };

export default function handler(req: NextApiRequest, res: NextApiResponse) {
  res.status(200).json({ ok: true });
}
";
        let result = run("pages/api/health.ts", FileKind::ApiRoute, source);
        assert!(has_warning(&result, "line 5: API handler needs a server runtime"));
        assert!(has_warning(&result, "line 3: API route config"));
    }

    #[test]
    fn test_handler_inferred_without_hint() {
        let source = "export default async (req, res) => {\n  res.end();\n};\n";
        let result = run("lib/handler.js", FileKind::Code, source);
        assert!(has_warning(&result, "API handler needs a server runtime"));
    }

    #[test]
    fn test_page_default_export_not_flagged() {
        let source = "export default function Home() {\n  return <main />;\n}\n";
        let result = run("pages/index.tsx", FileKind::Page, source);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_middleware_and_matcher() {
        let source = "import { NextResponse } from 'next/server';

export function middleware(request) {
  return NextResponse.next();
}

export const config = { matcher: ['/admin/:path*'] };
";
        let result = run("middleware.js", FileKind::Middleware, source);
        assert!(has_warning(&result, "line 3: middleware runs before every request"));
        assert!(has_warning(&result, "middleware matcher ['/admin/:path*']"));
        assert!(!has_warning(&result, "next/server APIs"));
    }

    #[test]
    fn test_next_server_outside_middleware() {
        let source = "import { NextResponse } from 'next/server';\n\nexport const ok = () => NextResponse.json({});\n";
        let result = run("lib/respond.ts", FileKind::Code, source);
        assert!(has_warning(&result, "line 1: next/server APIs need a server runtime"));
    }
}
