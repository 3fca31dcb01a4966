//! Conversion of source routes into the router's route-object tree.

use camino::Utf8Path;
use nv_core::{
    FxHashMap, FxHashSet, RouteConfig, RouteObject, SourceRoute, fx_hash_map, fx_hash_set,
};
use serde::Serialize;
use tracing::debug;

use crate::segment::router_path;

/// A component the route tree renders, with the file that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteComponent {
    /// Identifier used in the `element` expression.
    pub name: String,
    /// Source file the component is loaded from.
    pub file: String,
}

/// The converted route tree plus the components its elements reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteTree {
    /// Top-level route objects: ungrouped pages first, then one wrapper per
    /// layout.
    pub routes: Vec<RouteObject>,
    /// Every component referenced by `routes`, in first-use order.
    pub components: Vec<RouteComponent>,
}

impl RouteTree {
    /// Total number of route objects, wrappers included.
    #[must_use]
    pub fn count(&self) -> usize {
        self.routes.iter().map(RouteObject::count).sum()
    }

    /// Returns `true` if no route was converted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Converts source routes into router route objects.
///
/// Shorthand for [`convert_routes`] when only the tree is needed.
///
/// # Examples
///
/// ```
/// use nv_core::RouteConfig;
/// use nv_routes::{build_source_routes, to_target_routes};
///
/// let config = RouteConfig::default();
/// let files = ["pages/about.tsx", "pages/admin/_layout.tsx", "pages/admin/index.tsx"];
/// let routes = to_target_routes(&build_source_routes(&files, &config), &config);
///
/// assert_eq!(routes[0].path, "/about");
/// assert_eq!(routes[1].path, "/admin");
/// assert_eq!(routes[1].children.as_ref().map(|c| c[0].path.as_str()), Some(""));
/// ```
#[must_use]
pub fn to_target_routes(routes: &[SourceRoute], config: &RouteConfig) -> Vec<RouteObject> {
    convert_routes(routes, config).routes
}

/// Groups routes by layout and converts each group.
///
/// Routes without a layout come first, in input order. Each layout then
/// gets one wrapper, in the order its first route appeared, whose children
/// carry paths relative to the wrapper.
#[must_use]
pub fn convert_routes(routes: &[SourceRoute], config: &RouteConfig) -> RouteTree {
    let mut ungrouped: Vec<&SourceRoute> = Vec::new();
    let mut groups: Vec<(&str, Vec<&SourceRoute>)> = Vec::new();
    for route in routes {
        match route.layout.as_deref() {
            None => ungrouped.push(route),
            Some(layout) => match groups.iter_mut().find(|(key, _)| *key == layout) {
                Some((_, members)) => members.push(route),
                None => groups.push((layout, vec![route])),
            },
        }
    }

    let mut names = ComponentNames::new(config);
    let mut tree = RouteTree::default();

    for route in ungrouped {
        let element = names.element(&route.component);
        tree.routes.push(RouteObject::leaf(router_path(&route.path), element));
    }

    for (layout, members) in &groups {
        let base = layout_base_path(layout, config);
        let element = names.element(layout);
        let children = members
            .iter()
            .map(|route| RouteObject::leaf(child_path(route, &base), names.element(&route.component)))
            .collect();
        tree.routes.push(RouteObject {
            path: base,
            element,
            children: Some(children),
        });
    }

    tree.components = names.into_components();
    debug!(
        routes = routes.len(),
        layouts = groups.len(),
        objects = tree.count(),
        "route tree converted"
    );
    tree
}

/// The wrapper path of a layout: its directory below the routing root.
fn layout_base_path(layout: &str, config: &RouteConfig) -> String {
    let dir = Utf8Path::new(layout).parent().map_or("", Utf8Path::as_str);
    let below = dir.strip_prefix(config.pages_root.as_str()).unwrap_or(dir);
    router_path(below)
}

/// A child path relative to its wrapper. The wrapper's own index is `""`.
fn child_path(route: &SourceRoute, base: &str) -> String {
    let full = router_path(&route.path);
    if full == base {
        return String::new();
    }
    match full.strip_prefix(base) {
        Some(rest) if base == "/" || rest.starts_with('/') => rest.trim_start_matches('/').to_owned(),
        _ => full,
    }
}

/// Assigns unique component identifiers to files.
struct ComponentNames<'c> {
    config: &'c RouteConfig,
    by_file: FxHashMap<String, String>,
    taken: FxHashSet<String>,
    components: Vec<RouteComponent>,
}

impl<'c> ComponentNames<'c> {
    fn new(config: &'c RouteConfig) -> Self {
        Self {
            config,
            by_file: fx_hash_map(),
            taken: fx_hash_set(),
            components: Vec::new(),
        }
    }

    /// The `<Name />` element for `file`, naming it on first use.
    fn element(&mut self, file: &str) -> String {
        format!("<{} />", self.name(file))
    }

    fn name(&mut self, file: &str) -> String {
        if let Some(name) = self.by_file.get(file) {
            return name.clone();
        }
        let base = component_name(file, self.config);
        let mut name = base.clone();
        let mut n = 2;
        while self.taken.contains(&name) {
            name = format!("{base}{n}");
            n += 1;
        }
        self.taken.insert(name.clone());
        self.by_file.insert(file.to_owned(), name.clone());
        self.components.push(RouteComponent {
            name: name.clone(),
            file: file.to_owned(),
        });
        name
    }

    fn into_components(self) -> Vec<RouteComponent> {
        self.components
    }
}

/// PascalCase identifier for a page or layout file.
///
/// Words come from the path below the routing root. Brackets, dots and
/// separators split words; a trailing `index` is dropped.
///
/// # Examples
///
/// ```
/// use nv_core::RouteConfig;
/// use nv_routes::component_name;
///
/// let config = RouteConfig::default();
/// assert_eq!(component_name("pages/posts/[id].tsx", &config), "PostsId");
/// assert_eq!(component_name("pages/index.tsx", &config), "Index");
/// assert_eq!(component_name("pages/admin/_layout.tsx", &config), "AdminLayout");
/// assert_eq!(component_name("pages/404.tsx", &config), "Page404");
/// ```
#[must_use]
pub fn component_name(file: &str, config: &RouteConfig) -> String {
    let path = Utf8Path::new(file);
    let stem_path = path.with_extension("");
    let stem_path = stem_path.as_str();
    let below = stem_path
        .strip_prefix(config.pages_root.as_str())
        .unwrap_or(stem_path);
    let below = below.strip_suffix("/index").unwrap_or(below);

    let mut name: String = below
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();

    if name.is_empty() {
        name.push_str("Index");
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "Page");
    }
    name
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}
