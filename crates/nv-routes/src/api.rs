//! Inventory of API route files.

use camino::Utf8Path;
use nv_core::RouteConfig;
use serde::Serialize;

use crate::segment::router_path;
use crate::source::is_api_file;

/// An API route file and the endpoint it served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiEndpoint {
    /// File name as given.
    pub file: String,
    /// Endpoint path in router syntax (`/api/posts/:id`).
    pub path: String,
}

/// Lists the API route files among `file_names`, in input order.
///
/// # Examples
///
/// ```
/// use nv_core::RouteConfig;
/// use nv_routes::api_endpoints;
///
/// let files = ["pages/api/posts/[id].ts", "pages/api/index.ts", "pages/about.tsx"];
/// let endpoints = api_endpoints(&files, &RouteConfig::default());
///
/// assert_eq!(endpoints.len(), 2);
/// assert_eq!(endpoints[0].path, "/api/posts/:id");
/// assert_eq!(endpoints[1].path, "/api");
/// ```
#[must_use]
pub fn api_endpoints<S: AsRef<str>>(file_names: &[S], config: &RouteConfig) -> Vec<ApiEndpoint> {
    file_names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| is_api_file(name, config))
        .map(|name| {
            let stem_path = Utf8Path::new(name).with_extension("");
            let stem_path = stem_path.as_str();
            let below = stem_path
                .strip_prefix(config.pages_root.as_str())
                .unwrap_or(stem_path);
            let below = below.strip_suffix("/index").unwrap_or(below);
            ApiEndpoint {
                file: name.to_owned(),
                path: router_path(below),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_all_endpoint() {
        let endpoints = api_endpoints(&["pages/api/auth/[...nextauth].js"], &RouteConfig::default());
        assert_eq!(endpoints[0].path, "/api/auth/*");
        assert_eq!(endpoints[0].file, "pages/api/auth/[...nextauth].js");
    }

    #[test]
    fn test_non_code_api_files_skipped() {
        let endpoints = api_endpoints(
            &["pages/api/README.md", "lib/api/client.ts"],
            &RouteConfig::default(),
        );
        assert!(endpoints.is_empty());
    }
}
