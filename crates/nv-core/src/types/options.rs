//! Conversion feature flags.

use serde::{Deserialize, Serialize};

use super::rule::RuleCategory;

/// Which parts of the migration to perform.
///
/// Every flag defaults to `true`. Each rule category is gated by exactly one
/// flag, see [`allows`](Self::allows).
///
/// # Examples
///
/// ```
/// use nv_core::{ConversionOptions, RuleCategory};
///
/// let options = ConversionOptions {
///     replace_components: false,
///     ..ConversionOptions::default()
/// };
/// assert!(!options.allows(RuleCategory::Component));
/// assert!(options.allows(RuleCategory::Routing));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConversionOptions {
    /// Rewrite router hooks and emit the client-side route tree.
    pub use_react_router: bool,

    /// Rewrite API handler types and inventory API endpoints.
    pub convert_api_routes: bool,

    /// Turn server-side data-fetching exports into loaders.
    pub transform_data_fetching: bool,

    /// Replace framework components with library equivalents.
    pub replace_components: bool,

    /// Plan `package.json` dependency changes.
    pub update_dependencies: bool,

    /// Keep TypeScript annotations, rewriting framework types to neutral ones.
    pub preserve_typescript: bool,

    /// Handle middleware and framework configuration.
    pub handle_middleware: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl ConversionOptions {
    /// All features enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            use_react_router: true,
            convert_api_routes: true,
            transform_data_fetching: true,
            replace_components: true,
            update_dependencies: true,
            preserve_typescript: true,
            handle_middleware: true,
        }
    }

    /// All features disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            use_react_router: false,
            convert_api_routes: false,
            transform_data_fetching: false,
            replace_components: false,
            update_dependencies: false,
            preserve_typescript: false,
            handle_middleware: false,
        }
    }

    /// Returns `true` if rules of `category` may run under these options.
    #[inline]
    #[must_use]
    pub const fn allows(&self, category: RuleCategory) -> bool {
        match category {
            RuleCategory::Component => self.replace_components,
            RuleCategory::Routing => self.use_react_router,
            RuleCategory::DataFetching => self.transform_data_fetching,
            RuleCategory::Api => self.convert_api_routes,
            RuleCategory::Config => self.handle_middleware,
            RuleCategory::General => self.preserve_typescript,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_everything() {
        let options = ConversionOptions::default();
        assert!(RuleCategory::ALL.iter().all(|c| options.allows(*c)));
    }

    #[test]
    fn test_none_allows_nothing() {
        let options = ConversionOptions::none();
        assert!(RuleCategory::ALL.iter().all(|c| !options.allows(*c)));
    }

    #[test]
    fn test_each_flag_gates_one_category() {
        let options = ConversionOptions {
            handle_middleware: false,
            ..ConversionOptions::all()
        };
        let denied: Vec<_> = RuleCategory::ALL
            .into_iter()
            .filter(|c| !options.allows(*c))
            .collect();
        assert_eq!(denied, vec![RuleCategory::Config]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: ConversionOptions =
            serde_json::from_str(r#"{"update_dependencies": false}"#).expect("valid options");
        assert!(!options.update_dependencies);
        assert!(options.convert_api_routes);
    }
}
