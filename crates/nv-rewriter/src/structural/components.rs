//! Framework component usages the component rules cannot judge from text.

use nv_core::{FrameworkModule, ImportKind};
use nv_ts_parser::Node;

use super::{Edit, FileContext, Outcome, descendants};

pub(super) fn run(cx: &FileContext<'_>, out: &mut Outcome) {
    let image = default_local(cx, FrameworkModule::NextImage);
    let link = default_local(cx, FrameworkModule::NextLink);

    for node in descendants(cx.root()) {
        match node.kind() {
            "jsx_self_closing_element" | "jsx_opening_element" => {
                if image.is_some_and(|local| element_name(cx, node) == Some(local)) {
                    check_image(cx, node, out);
                }
            }
            "jsx_element" => {
                let opening = node.child_by_field_name("open_tag");
                if link.is_some_and(|local| opening.and_then(|o| element_name(cx, o)) == Some(local))
                    && wraps_anchor(cx, node)
                {
                    out.warn_at(
                        node,
                        "<Link> wraps an <a>; move the anchor's props onto <Link> and drop the <a>",
                    );
                }
            }
            _ => {}
        }
    }

    for import in &cx.parsed.imports {
        let Some(statement) = cx.import_statement(import) else {
            continue;
        };
        match import.module {
            Some(FrameworkModule::NextApp) => out.warn_at(
                statement,
                "next/app import; move the app shell into main.tsx around <RouterProvider>",
            ),
            Some(FrameworkModule::NextDocument) => out.warn_at(
                statement,
                "next/document import; move the document markup into index.html",
            ),
            Some(FrameworkModule::Next) if import.path.starts_with("next/font") => out.warn_at(
                statement,
                "next/font has no Vite equivalent; load the font with CSS",
            ),
            _ => {}
        }
    }
}

/// The local name of a module's default import.
fn default_local<'a>(cx: &FileContext<'a>, module: FrameworkModule) -> Option<&'a str> {
    cx.imports_of(module)
        .find(|import| import.kind == ImportKind::Default)
        .and_then(|import| import.names.first())
        .map(String::as_str)
}

fn element_name<'a>(cx: &FileContext<'a>, element: Node<'_>) -> Option<&'a str> {
    element.child_by_field_name("name").map(|n| cx.text(n))
}

fn attribute_names<'a>(cx: &FileContext<'a>, element: Node<'a>) -> Vec<(&'a str, Node<'a>)> {
    let mut cursor = element.walk();
    let attributes: Vec<Node<'a>> = element
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "jsx_attribute")
        .collect();
    attributes
        .into_iter()
        .filter_map(|attribute| Some((cx.text(attribute.named_child(0)?), attribute)))
        .collect()
}

/// `fill` becomes `layout="fullWidth"`; an image with neither size nor
/// `fill` cannot be laid out by `@unpic/react`.
fn check_image(cx: &FileContext<'_>, element: Node<'_>, out: &mut Outcome) {
    let attributes = attribute_names(cx, element);
    let has = |name: &str| attributes.iter().any(|(n, _)| *n == name);

    if let Some((_, fill)) = attributes.iter().find(|(n, _)| *n == "fill") {
        out.edit(Edit::replace(fill.byte_range(), "layout=\"fullWidth\""));
        out.change("Converted <Image fill> to layout=\"fullWidth\"");
    } else if !(has("width") && has("height")) && !has("layout") {
        out.warn_at(
            element,
            "<Image> without width and height; @unpic/react needs both or a layout",
        );
    }

    if attributes
        .iter()
        .any(|(n, a)| *n == "placeholder" && cx.text(*a).contains("blur"))
    {
        out.warn_at(element, "<Image placeholder=\"blur\"> is not supported by @unpic/react");
    }
}

fn wraps_anchor(cx: &FileContext<'_>, element: Node<'_>) -> bool {
    let mut cursor = element.walk();
    let children: Vec<Node<'_>> = element.named_children(&mut cursor).collect();
    children.into_iter().any(|child| {
        let opening = match child.kind() {
            "jsx_element" => child.child_by_field_name("open_tag"),
            "jsx_self_closing_element" => Some(child),
            _ => None,
        };
        opening.and_then(|o| element_name(cx, o)) == Some("a")
    })
}
