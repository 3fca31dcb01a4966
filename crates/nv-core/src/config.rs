//! Configuration structures for nv-migrate.
//!
//! - [`ScanConfig`] - project walking (skipped directories, symlinks)
//! - [`RouteConfig`] - routing-root conventions of the source project
//! - [`ExecutorConfig`] - code-file recognition and per-file limits
//! - [`Config`] - root configuration combining all sections
//!
//! Every section is `#[serde(default)]`, so a configuration file only needs
//! to mention the values it changes.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::ConversionOptions;

/// Configuration for walking a project directory.
///
/// # Examples
///
/// ```
/// use nv_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.skip_dirs.iter().any(|d| d == "node_modules"));
/// assert!(!config.follow_links);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,

    /// Whether to follow symbolic links.
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip_dirs: vec![
                "node_modules".to_owned(),
                ".next".to_owned(),
                "dist".to_owned(),
                "build".to_owned(),
                ".git".to_owned(),
                "coverage".to_owned(),
            ],
            follow_links: false,
        }
    }
}

/// Routing conventions of the source project.
///
/// # Examples
///
/// ```
/// use nv_core::RouteConfig;
///
/// let config = RouteConfig::default();
/// assert_eq!(config.pages_root, "pages");
/// assert_eq!(config.layout_stem, "_layout");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Directory that holds file-based routes, relative to the project root.
    pub pages_root: String,

    /// File stem that marks a directory's layout file.
    pub layout_stem: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            pages_root: "pages".to_owned(),
            layout_stem: "_layout".to_owned(),
        }
    }
}

/// Settings for the conversion executor.
///
/// # Examples
///
/// ```
/// use nv_core::ExecutorConfig;
///
/// let config = ExecutorConfig::default();
/// assert!(config.is_code_file("pages/index.TSX"));
/// assert!(!config.is_code_file("styles/site.css"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Extensions (with leading dot) of files that go through the rewriter.
    pub code_extensions: Vec<String>,

    /// Keep the rewritten text of every modified file in the result.
    pub collect_outputs: bool,

    /// Upper bound for a single tree-sitter parse, in microseconds.
    /// `0` disables the limit.
    pub parse_timeout_micros: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            code_extensions: vec![
                ".js".to_owned(),
                ".jsx".to_owned(),
                ".ts".to_owned(),
                ".tsx".to_owned(),
            ],
            collect_outputs: false,
            parse_timeout_micros: 0,
        }
    }
}

impl ExecutorConfig {
    /// Returns `true` if `file_name` ends with one of the code extensions.
    ///
    /// The comparison ignores ASCII case.
    #[must_use]
    pub fn is_code_file(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.code_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
    }
}

/// Root configuration for nv-migrate.
///
/// # Examples
///
/// ```
/// use nv_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"routes": {"pages_root": "src/pages"}}"#)?;
/// assert_eq!(config.routes.pages_root, "src/pages");
/// assert!(config.options.update_dependencies);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion feature flags.
    pub options: ConversionOptions,

    /// Routing conventions.
    pub routes: RouteConfig,

    /// Executor settings.
    pub executor: ExecutorConfig,

    /// Project walking settings.
    pub scan: ScanConfig,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid JSON, and
    /// [`ConfigError::InvalidOption`] if validation fails.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] naming the first bad option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let root = self.routes.pages_root.trim_matches('/');
        if root.is_empty() {
            return Err(ConfigError::invalid_option(
                "routes.pages_root",
                "must not be empty",
            ));
        }
        if self.routes.layout_stem.is_empty() || self.routes.layout_stem.contains('/') {
            return Err(ConfigError::invalid_option(
                "routes.layout_stem",
                "must be a bare file stem",
            ));
        }
        if self.executor.code_extensions.is_empty() {
            return Err(ConfigError::invalid_option(
                "executor.code_extensions",
                "at least one extension is required",
            ));
        }
        if let Some(bad) = self
            .executor
            .code_extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(ConfigError::invalid_option(
                "executor.code_extensions",
                format!("'{bad}' must start with '.'"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_executor_code_extensions() {
        let config = ExecutorConfig::default();
        assert!(config.is_code_file("pages/index.tsx"));
        assert!(config.is_code_file("lib/api.JS"));
        assert!(!config.is_code_file("package.json"));
        assert!(!config.is_code_file("styles/globals.scss"));
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let json = r#"{"options": {"update_dependencies": false}}"#;
        let config: Config = serde_json::from_str(json).expect("valid config");
        assert!(!config.options.update_dependencies);
        assert!(config.options.use_react_router);
        assert_eq!(config.routes.pages_root, "pages");
        assert_eq!(config.executor.parse_timeout_micros, 0);
    }

    #[test]
    fn test_validate_rejects_empty_root() {
        let mut config = Config::default();
        config.routes.pages_root = "/".to_owned();
        let err = config.validate().expect_err("empty root must fail");
        assert!(err.to_string().contains("routes.pages_root"));
    }

    #[test]
    fn test_validate_rejects_bare_extension() {
        let mut config = Config::default();
        config.executor.code_extensions = vec!["tsx".to_owned()];
        let err = config.validate().expect_err("extension without dot must fail");
        assert!(err.to_string().contains("'tsx'"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nv-migrate.json");
        std::fs::write(&path, r#"{"executor": {"collect_outputs": true}}"#).expect("write");

        let utf8 = camino::Utf8PathBuf::from_path_buf(path).expect("utf-8 temp path");
        let config = Config::load(&utf8).expect("config loads");
        assert!(config.executor.collect_outputs);
        assert_eq!(config.scan, ScanConfig::default());
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");

        let utf8 = camino::Utf8PathBuf::from_path_buf(path).expect("utf-8 temp path");
        assert!(matches!(
            Config::load(&utf8),
            Err(ConfigError::Parse { .. })
        ));
    }
}
