//! Framework module detection from import specifiers.
//!
//! Maps a module specifier (`'next/link'`, `"node:fs"`) to the
//! [`FrameworkModule`] it refers to. Subpaths of the bare `next` package that
//! are not listed map to [`FrameworkModule::Next`].

use nv_core::FrameworkModule;

/// Node.js builtin modules that cannot run in a browser bundle.
const NODE_BUILTINS: &[&str] = &[
    "fs",
    "fs/promises",
    "path",
    "os",
    "crypto",
    "child_process",
    "http",
    "https",
    "net",
    "tls",
    "dns",
    "stream",
    "zlib",
    "cluster",
    "worker_threads",
    "readline",
];

/// Detects the [`FrameworkModule`] a specifier refers to.
///
/// The specifier may still carry its quotes.
///
/// # Examples
///
/// ```
/// use nv_core::FrameworkModule;
/// use nv_ts_parser::detect_framework_module;
///
/// assert_eq!(detect_framework_module("'next/link'"), Some(FrameworkModule::NextLink));
/// assert_eq!(detect_framework_module("\"node:fs\""), Some(FrameworkModule::NodeBuiltin));
/// assert_eq!(detect_framework_module("next"), Some(FrameworkModule::Next));
/// assert_eq!(detect_framework_module("next-auth"), None);
/// assert_eq!(detect_framework_module("react"), None);
/// ```
pub fn detect_framework_module(specifier: &str) -> Option<FrameworkModule> {
    let path = strip_quotes(specifier);

    if let Some(builtin) = path.strip_prefix("node:") {
        return (!builtin.is_empty()).then_some(FrameworkModule::NodeBuiltin);
    }
    if NODE_BUILTINS.contains(&path) {
        return Some(FrameworkModule::NodeBuiltin);
    }

    if path == "next" {
        return Some(FrameworkModule::Next);
    }
    let subpath = path.strip_prefix("next/")?;
    let head = subpath.split('/').next().unwrap_or(subpath);
    Some(match head {
        "router" => FrameworkModule::NextRouter,
        "navigation" => FrameworkModule::NextNavigation,
        "link" => FrameworkModule::NextLink,
        "image" | "legacy" => FrameworkModule::NextImage,
        "head" => FrameworkModule::NextHead,
        "script" => FrameworkModule::NextScript,
        "dynamic" => FrameworkModule::NextDynamic,
        "server" => FrameworkModule::NextServer,
        "config" => FrameworkModule::NextConfig,
        "app" => FrameworkModule::NextApp,
        "document" => FrameworkModule::NextDocument,
        _ => FrameworkModule::Next,
    })
}

/// Strips leading and trailing quotes from a string literal.
///
/// Handles single quotes, double quotes and backticks.
#[inline]
pub fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_subpaths() {
        assert_eq!(
            detect_framework_module("next/router"),
            Some(FrameworkModule::NextRouter)
        );
        assert_eq!(
            detect_framework_module("next/navigation"),
            Some(FrameworkModule::NextNavigation)
        );
        assert_eq!(
            detect_framework_module("'next/legacy/image'"),
            Some(FrameworkModule::NextImage)
        );
        assert_eq!(
            detect_framework_module("next/font/google"),
            Some(FrameworkModule::Next)
        );
    }

    #[test]
    fn test_node_builtins() {
        assert_eq!(
            detect_framework_module("'fs'"),
            Some(FrameworkModule::NodeBuiltin)
        );
        assert_eq!(
            detect_framework_module("node:path"),
            Some(FrameworkModule::NodeBuiltin)
        );
        assert_eq!(detect_framework_module("node:"), None);
    }

    #[test]
    fn test_lookalikes_are_not_next() {
        assert_eq!(detect_framework_module("nextra"), None);
        assert_eq!(detect_framework_module("@next/font"), None);
        assert_eq!(detect_framework_module("./next/link"), None);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'a'"), "a");
        assert_eq!(strip_quotes("\"b\""), "b");
        assert_eq!(strip_quotes("c"), "c");
    }
}
