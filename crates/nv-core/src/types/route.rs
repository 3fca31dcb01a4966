//! Route records: file-based source routes and target route objects.
//!
//! A [`SourceRoute`] describes one page file of the source project and is
//! derived purely from its file name. A [`RouteObject`] is a node of the
//! client-side router's route tree.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A page route reconstructed from the source project's file layout.
///
/// Never mutated after creation.
///
/// # Examples
///
/// ```
/// use nv_core::SourceRoute;
/// use smallvec::smallvec;
///
/// let route = SourceRoute {
///     path: "/posts/[id]".to_owned(),
///     component: "pages/posts/[id].tsx".to_owned(),
///     is_dynamic: true,
///     has_params: true,
///     params: smallvec!["id".to_owned()],
///     layout: None,
///     is_index: false,
///     is_optional_catch_all: false,
///     is_catch_all: false,
/// };
/// assert!(!route.is_wildcard());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct SourceRoute {
    /// The page file name with the routing root and extension removed,
    /// still in bracket syntax (`/posts/[id]`). `/` for the root index.
    pub path: String,

    /// The page file name as given (`pages/posts/[id].tsx`).
    pub component: String,

    /// `true` when the path contains both `[` and `]`.
    pub is_dynamic: bool,

    /// `true` when at least one parameter was extracted.
    pub has_params: bool,

    /// One entry per bracketed segment, brackets removed, `...` kept.
    pub params: SmallVec<[String; 2]>,

    /// The nearest ancestor directory's layout file, if any.
    pub layout: Option<String>,

    /// `true` when the file stem is `index`.
    pub is_index: bool,

    /// `true` for `[[...name]]` segments.
    pub is_optional_catch_all: bool,

    /// `true` for `[...name]` segments, optional ones included.
    pub is_catch_all: bool,
}

impl SourceRoute {
    /// Returns `true` if the route matches any remaining path (`*`).
    #[inline]
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        self.is_catch_all || self.is_optional_catch_all
    }
}

/// A node of the target router's route tree.
///
/// # Examples
///
/// ```
/// use nv_core::RouteObject;
///
/// let leaf = RouteObject::leaf("/about", "<About />");
/// assert!(leaf.children.is_none());
///
/// let json = serde_json::to_string(&leaf)?;
/// assert!(!json.contains("children"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteObject {
    /// Route path in router syntax (`/posts/:id`, `*`, or layout-relative).
    pub path: String,

    /// Element expression rendered for this route (`<Post />`).
    pub element: String,

    /// Nested routes, present only for layout wrappers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RouteObject>>,
}

impl RouteObject {
    /// Creates a route without children.
    #[must_use]
    pub fn leaf(path: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            element: element.into(),
            children: None,
        }
    }

    /// Returns the number of route objects in this subtree, itself included.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self
            .children
            .as_deref()
            .map_or(0, |children| children.iter().map(Self::count).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_object_count() {
        let wrapper = RouteObject {
            path: "/admin".to_owned(),
            element: "<AdminLayout />".to_owned(),
            children: Some(vec![
                RouteObject::leaf("", "<Admin />"),
                RouteObject::leaf("settings", "<Settings />"),
            ]),
        };
        assert_eq!(wrapper.count(), 3);
        assert_eq!(RouteObject::leaf("/", "<Home />").count(), 1);
    }

    #[test]
    fn test_children_serialized_when_present() {
        let wrapper = RouteObject {
            path: "/admin".to_owned(),
            element: "<AdminLayout />".to_owned(),
            children: Some(vec![]),
        };
        let json = serde_json::to_string(&wrapper).expect("serialize");
        assert!(json.contains("\"children\":[]"));
    }
}
