//! Small helpers over tree-sitter nodes shared by the extractors and the
//! structural rewriter.

use nv_core::SourceLocation;
use tree_sitter::Node;

/// Returns the source text covered by `node`.
#[inline]
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Converts a node's start position to a [`SourceLocation`].
#[allow(clippy::cast_possible_truncation)]
pub fn node_location(node: Node<'_>) -> SourceLocation {
    let start = node.start_position();
    SourceLocation::new(
        start.row as u32 + 1,
        start.column as u32,
        node.start_byte() as u32,
    )
}

/// Walks up from `node` (inclusive) to the first node of `kind`.
pub fn find_ancestor<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut current = Some(node);
    while let Some(n) = current {
        if n.kind() == kind {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// Returns `true` if `node` has an unnamed child token `token` (`async`, `default`).
pub fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token)
}
