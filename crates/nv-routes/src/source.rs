//! Source route discovery from file names.
//!
//! Two flat passes over the names: the first indexes layout files by
//! directory, the second turns every page file into a [`SourceRoute`]. No
//! directory is ever read; only the names matter.

use camino::Utf8Path;
use nv_core::{FxHashMap, RouteConfig, SourceRoute};
use smallvec::SmallVec;
use tracing::debug;

use crate::segment::Segment;

/// Extensions of files that can define a route or a layout.
pub const ROUTE_EXTENSIONS: [&str; 4] = ["tsx", "jsx", "ts", "js"];

/// Layout files keyed by the directory they apply to.
pub type LayoutIndex = FxHashMap<String, String>;

/// Returns `true` if `name` has a route-capable extension.
#[must_use]
pub fn has_route_extension(name: &str) -> bool {
    Utf8Path::new(name).extension().is_some_and(|ext| {
        ROUTE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// The part of `name` below the routing root, without the separating slash.
fn below_root<'n>(name: &'n str, config: &RouteConfig) -> Option<&'n str> {
    name.strip_prefix(config.pages_root.as_str())?
        .strip_prefix('/')
}

/// Returns `true` for a directory layout file (`pages/admin/_layout.tsx`).
///
/// # Examples
///
/// ```
/// use nv_core::RouteConfig;
/// use nv_routes::is_layout_file;
///
/// let config = RouteConfig::default();
/// assert!(is_layout_file("pages/admin/_layout.tsx", &config));
/// assert!(!is_layout_file("components/_layout.tsx", &config));
/// ```
#[must_use]
pub fn is_layout_file(name: &str, config: &RouteConfig) -> bool {
    below_root(name, config).is_some()
        && has_route_extension(name)
        && Utf8Path::new(name).file_stem() == Some(config.layout_stem.as_str())
}

/// Returns `true` for a file under the routing root's `api/` directory.
#[must_use]
pub fn is_api_file(name: &str, config: &RouteConfig) -> bool {
    below_root(name, config).is_some_and(|rest| rest.starts_with("api/"))
        && has_route_extension(name)
}

/// Returns `true` for a routable page file.
///
/// A page lives under the routing root, has no `_`-private segment and has
/// a route-capable extension, which rules out stylesheets. API handlers are
/// pages too; [`is_api_file`] inventories them on top.
///
/// # Examples
///
/// ```
/// use nv_core::RouteConfig;
/// use nv_routes::is_page_file;
///
/// let config = RouteConfig::default();
/// assert!(is_page_file("pages/posts/[id].tsx", &config));
/// assert!(!is_page_file("pages/_app.tsx", &config));
/// assert!(is_page_file("pages/api/hello.ts", &config));
/// assert!(!is_page_file("pages/home.module.css", &config));
/// ```
#[must_use]
pub fn is_page_file(name: &str, config: &RouteConfig) -> bool {
    let Some(rest) = below_root(name, config) else {
        return false;
    };
    !rest.starts_with('_')
        && !rest.contains("/_")
        && has_route_extension(name)
}

/// Indexes layout files by their directory. The first layout seen for a
/// directory wins.
pub fn index_layouts<S: AsRef<str>>(file_names: &[S], config: &RouteConfig) -> LayoutIndex {
    let mut layouts = LayoutIndex::default();
    for name in file_names.iter().map(AsRef::as_ref) {
        if !is_layout_file(name, config) {
            continue;
        }
        if let Some(dir) = Utf8Path::new(name).parent() {
            layouts
                .entry(dir.as_str().to_owned())
                .or_insert_with(|| name.to_owned());
        }
    }
    layouts
}

/// Builds one [`SourceRoute`] per page file, in input order.
///
/// # Examples
///
/// ```
/// use nv_core::RouteConfig;
/// use nv_routes::build_source_routes;
///
/// let files = ["pages/index.tsx", "pages/admin/_layout.tsx", "pages/admin/settings.tsx"];
/// let routes = build_source_routes(&files, &RouteConfig::default());
///
/// assert_eq!(routes.len(), 2);
/// assert_eq!(routes[0].path, "/");
/// assert_eq!(routes[1].layout.as_deref(), Some("pages/admin/_layout.tsx"));
/// ```
pub fn build_source_routes<S: AsRef<str>>(file_names: &[S], config: &RouteConfig) -> Vec<SourceRoute> {
    let layouts = index_layouts(file_names, config);
    let routes: Vec<SourceRoute> = file_names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| is_page_file(name, config))
        .map(|name| source_route(name, config, &layouts))
        .collect();

    debug!(
        files = file_names.len(),
        layouts = layouts.len(),
        routes = routes.len(),
        "source routes built"
    );
    routes
}

/// Derives the route of one page file.
fn source_route(name: &str, config: &RouteConfig, layouts: &LayoutIndex) -> SourceRoute {
    let path = route_path(name, config);
    let segments: Vec<Segment<'_>> = path.split('/').map(Segment::parse).collect();
    let params: SmallVec<[String; 2]> = segments.iter().filter_map(|s| s.param()).collect();

    SourceRoute {
        is_dynamic: path.contains('[') && path.contains(']'),
        has_params: !params.is_empty(),
        is_index: Utf8Path::new(name).file_stem() == Some("index"),
        is_optional_catch_all: segments
            .iter()
            .any(|s| matches!(s, Segment::OptionalCatchAll(_))),
        is_catch_all: segments
            .iter()
            .any(|s| matches!(s, Segment::CatchAll(_) | Segment::OptionalCatchAll(_))),
        layout: find_layout(name, config, layouts),
        component: name.to_owned(),
        params,
        path,
    }
}

/// Strips the routing root and extension; a trailing `/index` collapses
/// to `/`.
fn route_path(name: &str, config: &RouteConfig) -> String {
    let rest = name
        .strip_prefix(config.pages_root.as_str())
        .unwrap_or(name);
    let without_ext = match Utf8Path::new(rest).extension() {
        Some(ext) => &rest[..rest.len() - ext.len() - 1],
        None => rest,
    };
    match without_ext.strip_suffix("/index") {
        Some(parent) => format!("{parent}/"),
        None => without_ext.to_owned(),
    }
}

/// Walks up from the page's directory to the first directory with a
/// layout. The routing root itself is not consulted.
fn find_layout(name: &str, config: &RouteConfig, layouts: &LayoutIndex) -> Option<String> {
    let root = Utf8Path::new(&config.pages_root);
    let mut dir = Utf8Path::new(name).parent();
    while let Some(current) = dir {
        if current == root || !current.starts_with(root) {
            return None;
        }
        if let Some(layout) = layouts.get(current.as_str()) {
            return Some(layout.clone());
        }
        dir = current.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes(files: &[&str]) -> Vec<SourceRoute> {
        build_source_routes(files, &RouteConfig::default())
    }

    #[test]
    fn test_index_route() {
        let routes = routes(&["pages/index.tsx"]);
        let route = &routes[0];
        assert_eq!(route.path, "/");
        assert!(route.is_index);
        assert!(!route.is_dynamic);
        assert!(route.params.is_empty());
        assert_eq!(route.component, "pages/index.tsx");
    }

    #[test]
    fn test_nested_index_keeps_trailing_slash() {
        let routes = routes(&["pages/blog/index.jsx"]);
        assert_eq!(routes[0].path, "/blog/");
        assert!(routes[0].is_index);
    }

    #[test]
    fn test_dynamic_route() {
        let routes = routes(&["pages/posts/[id].tsx"]);
        let route = &routes[0];
        assert_eq!(route.path, "/posts/[id]");
        assert!(route.is_dynamic);
        assert!(route.has_params);
        assert_eq!(route.params.as_slice(), ["id"]);
        assert!(!route.is_wildcard());
    }

    #[test]
    fn test_catch_all_routes() {
        let routes = routes(&["pages/docs/[...slug].tsx", "pages/shop/[[...filters]].tsx"]);
        assert!(routes[0].is_catch_all);
        assert!(!routes[0].is_optional_catch_all);
        assert_eq!(routes[0].params.as_slice(), ["...slug"]);
        assert!(routes[0].is_wildcard());

        assert!(routes[1].is_optional_catch_all);
        assert!(routes[1].is_catch_all);
        assert_eq!(routes[1].params.as_slice(), ["...filters"]);
        assert!(routes[1].is_wildcard());
    }

    #[test]
    fn test_private_and_styles_excluded() {
        let routes = routes(&[
            "pages/_app.tsx",
            "pages/_document.tsx",
            "pages/admin/_layout.tsx",
            "pages/home.module.css",
            "pages/theme.scss",
            "components/Button.tsx",
            "pages/about.mdx",
            "pages/about.tsx",
        ]);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/about");
    }

    #[test]
    fn test_api_handlers_are_routes() {
        let config = RouteConfig::default();
        let routes = routes(&["pages/api/hello.ts", "pages/about.tsx", "pages/api/users/[id].ts"]);
        let paths: Vec<&str> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/api/hello", "/about", "/api/users/[id]"]);
        assert!(is_api_file("pages/api/hello.ts", &config));
        assert!(!is_api_file("pages/about.tsx", &config));
    }

    #[test]
    fn test_nearest_layout_wins() {
        let routes = routes(&[
            "pages/admin/users/[id].tsx",
            "pages/admin/_layout.tsx",
            "pages/admin/users/_layout.tsx",
            "pages/admin/settings.tsx",
        ]);
        assert_eq!(
            routes[0].layout.as_deref(),
            Some("pages/admin/users/_layout.tsx")
        );
        assert_eq!(routes[1].layout.as_deref(), Some("pages/admin/_layout.tsx"));
    }

    #[test]
    fn test_root_layout_not_consulted() {
        let routes = routes(&["pages/_layout.tsx", "pages/about.tsx"]);
        assert_eq!(routes[0].layout, None);
    }

    #[test]
    fn test_custom_root() {
        let config = RouteConfig {
            pages_root: "src/pages".to_owned(),
            ..RouteConfig::default()
        };
        let routes = build_source_routes(&["src/pages/contact.tsx", "pages/ignored.tsx"], &config);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/contact");
    }

    #[test]
    fn test_layout_index_first_wins() {
        let layouts = index_layouts(
            &["pages/a/_layout.tsx", "pages/a/_layout.js"],
            &RouteConfig::default(),
        );
        assert_eq!(layouts.get("pages/a").map(String::as_str), Some("pages/a/_layout.tsx"));
    }
}
