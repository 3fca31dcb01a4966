//! File roles inside a source project.

use serde::{Deserialize, Serialize};

/// The role a file plays in the source project.
///
/// Classification is by name only; see `nv_executor::analysis` for the rules.
///
/// # Examples
///
/// ```
/// use nv_core::FileKind;
///
/// assert!(FileKind::Page.is_code());
/// assert!(!FileKind::Stylesheet.is_code());
/// assert_eq!(FileKind::ApiRoute.label(), "api route");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FileKind {
    /// A routable page under the routing root.
    Page,
    /// A request handler under an `/api/` segment.
    ApiRoute,
    /// A `middleware.*` file.
    Middleware,
    /// A directory layout file.
    Layout,
    /// A `.css` or `.scss` file.
    Stylesheet,
    /// The `package.json` manifest.
    Manifest,
    /// Any other code file.
    Code,
    /// Anything else.
    Asset,
}

impl FileKind {
    /// Returns `true` for roles whose content goes through the rewriter.
    #[inline]
    #[must_use]
    pub const fn is_code(self) -> bool {
        matches!(
            self,
            Self::Page | Self::ApiRoute | Self::Middleware | Self::Layout | Self::Code
        )
    }

    /// Returns a lowercase label for this role.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::ApiRoute => "api route",
            Self::Middleware => "middleware",
            Self::Layout => "layout",
            Self::Stylesheet => "stylesheet",
            Self::Manifest => "manifest",
            Self::Code => "code",
            Self::Asset => "asset",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
