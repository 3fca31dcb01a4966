//! File classification for the analysis stage.

use std::collections::BTreeMap;

use camino::Utf8Path;
use nv_core::{Config, FileKind};
use nv_routes::{is_api_file, is_layout_file, is_page_file};
use serde::Serialize;

const STYLESHEET_EXTENSIONS: [&str; 4] = ["css", "scss", "sass", "less"];

/// Classifies one file by name.
///
/// # Examples
///
/// ```
/// use nv_core::{Config, FileKind};
/// use nv_executor::classify;
///
/// let config = Config::default();
/// assert_eq!(classify("pages/api/posts.ts", &config), FileKind::ApiRoute);
/// assert_eq!(classify("middleware.ts", &config), FileKind::Middleware);
/// assert_eq!(classify("styles/globals.css", &config), FileKind::Stylesheet);
/// assert_eq!(classify("public/logo.png", &config), FileKind::Asset);
/// ```
#[must_use]
pub fn classify(name: &str, config: &Config) -> FileKind {
    let path = Utf8Path::new(name);
    let file_name = path.file_name().unwrap_or(name);
    let extension = path.extension().unwrap_or_default();

    if file_name == "package.json" {
        FileKind::Manifest
    } else if STYLESHEET_EXTENSIONS
        .iter()
        .any(|ext| extension.eq_ignore_ascii_case(ext))
    {
        FileKind::Stylesheet
    } else if !config.executor.is_code_file(name) {
        FileKind::Asset
    } else if is_middleware(path) {
        FileKind::Middleware
    } else if is_api_file(name, &config.routes) {
        FileKind::ApiRoute
    } else if is_layout_file(name, &config.routes) {
        FileKind::Layout
    } else if is_page_file(name, &config.routes) {
        FileKind::Page
    } else {
        FileKind::Code
    }
}

/// `middleware.*` at the project root or directly under `src/`.
fn is_middleware(path: &Utf8Path) -> bool {
    path.file_stem() == Some("middleware")
        && path
            .parent()
            .is_some_and(|dir| matches!(dir.as_str(), "" | "src"))
}

/// Every file of a run with its role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectAnalysis {
    /// `(name, kind)` in input order.
    pub files: Vec<(String, FileKind)>,
    /// Files per kind.
    pub counts: BTreeMap<FileKind, usize>,
}

impl ProjectAnalysis {
    /// Classifies every file.
    pub fn new<S: AsRef<str>>(file_names: &[S], config: &Config) -> Self {
        let mut analysis = Self::default();
        for name in file_names.iter().map(AsRef::as_ref) {
            let kind = classify(name, config);
            *analysis.counts.entry(kind).or_default() += 1;
            analysis.files.push((name.to_owned(), kind));
        }
        analysis
    }

    /// Number of files of `kind`.
    #[must_use]
    pub fn count(&self, kind: FileKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or_default()
    }

    /// Files of `kind`, in input order.
    pub fn of_kind(&self, kind: FileKind) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter(move |(_, k)| *k == kind)
            .map(|(name, _)| name.as_str())
    }

    /// Number of files that go through the rewriter.
    #[must_use]
    pub fn code_files(&self) -> usize {
        self.counts
            .iter()
            .filter(|(kind, _)| kind.is_code())
            .map(|(_, count)| count)
            .sum()
    }

    /// The `package.json` closest to the project root, if any.
    #[must_use]
    pub fn manifest(&self) -> Option<&str> {
        self.of_kind(FileKind::Manifest)
            .min_by_key(|name| name.matches('/').count())
    }

    /// One line per kind, e.g. `3 page files`.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        self.counts
            .iter()
            .map(|(kind, count)| {
                let plural = if *count == 1 { "" } else { "s" };
                format!("{count} {kind} file{plural}")
            })
            .collect()
    }
}
