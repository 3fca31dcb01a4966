//! Diagnostics snapshot types.
//!
//! The collector itself lives in `nv-executor`; these are the plain data it
//! produces, so results can carry a report without depending on the executor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The area of the pipeline a diagnostic entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCategory {
    /// Run-level messages and unexpected failures.
    General,
    /// File classification.
    Analysis,
    /// Per-file rewriting.
    Transformation,
    /// Manifest planning.
    Dependencies,
    /// Route conversion.
    Routes,
    /// API route handling.
    Api,
    /// Middleware handling.
    Middleware,
}

impl DiagnosticCategory {
    /// Returns the kebab-case label for this category.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Analysis => "analysis",
            Self::Transformation => "transformation",
            Self::Dependencies => "dependencies",
            Self::Routes => "routes",
            Self::Api => "api",
            Self::Middleware => "middleware",
        }
    }
}

impl std::fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The entries recorded for one category, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntries {
    /// Informational entries.
    pub info: Vec<String>,
    /// Warning entries.
    pub warnings: Vec<String>,
    /// Error entries.
    pub errors: Vec<String>,
}

/// A finished step and the time elapsed since the reporter was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedStep {
    /// Step name.
    pub name: String,
    /// Milliseconds since the start of the run. Non-decreasing across steps.
    pub elapsed_ms: u64,
}

/// A snapshot of everything a diagnostics reporter collected.
///
/// # Examples
///
/// ```
/// use nv_core::{DiagnosticCategory, DiagnosticsReport};
///
/// let mut report = DiagnosticsReport::default();
/// report
///     .entries
///     .entry(DiagnosticCategory::Routes)
///     .or_default()
///     .warnings
///     .push("duplicate route".to_owned());
/// assert_eq!(report.warning_count(), 1);
/// assert_eq!(report.error_count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    /// Name of the project the run converted.
    pub project: String,

    /// Entries keyed by category.
    pub entries: BTreeMap<DiagnosticCategory, CategoryEntries>,

    /// Completed steps in completion order.
    pub completed_steps: Vec<CompletedStep>,
}

impl DiagnosticsReport {
    /// Total number of info entries.
    #[must_use]
    pub fn info_count(&self) -> usize {
        self.entries.values().map(|e| e.info.len()).sum()
    }

    /// Total number of warning entries.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.entries.values().map(|e| e.warnings.len()).sum()
    }

    /// Total number of error entries.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries.values().map(|e| e.errors.len()).sum()
    }

    /// The entries of one category, if any were recorded.
    #[must_use]
    pub fn category(&self, category: DiagnosticCategory) -> Option<&CategoryEntries> {
        self.entries.get(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_across_categories() {
        let mut report = DiagnosticsReport::default();
        report
            .entries
            .entry(DiagnosticCategory::General)
            .or_default()
            .info
            .push("start".to_owned());
        let transformation = report
            .entries
            .entry(DiagnosticCategory::Transformation)
            .or_default();
        transformation.errors.push("a".to_owned());
        transformation.errors.push("b".to_owned());

        assert_eq!(report.info_count(), 1);
        assert_eq!(report.error_count(), 2);
        assert!(report.category(DiagnosticCategory::Api).is_none());
    }

    #[test]
    fn test_category_serde_keys() {
        let mut report = DiagnosticsReport::default();
        report
            .entries
            .entry(DiagnosticCategory::Dependencies)
            .or_default();
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"dependencies\""));
    }
}
