//! Result types produced by the rewriting stages and the executor.

use serde::{Deserialize, Serialize};

use super::diagnostics::DiagnosticsReport;
use super::route::RouteObject;

/// Output of one Rule Engine pass.
///
/// `applied_transformations` holds one description per rule that matched,
/// in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResult {
    /// The rewritten source text.
    pub transformed_code: String,

    /// Descriptions of the rules that matched.
    pub applied_transformations: Vec<String>,
}

impl TransformResult {
    /// Returns `true` if at least one rule matched.
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.applied_transformations.is_empty()
    }
}

/// Output of the Structural Transformer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralTransformResult {
    /// The partially rewritten source text.
    pub code: String,

    /// One entry per construct that was rewritten.
    pub changes: Vec<String>,

    /// Constructs that were recognized but left for manual migration.
    pub warnings: Vec<String>,
}

impl StructuralTransformResult {
    /// Returns `true` if any construct was rewritten.
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// What a [`DependencyChange`] does to the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyAction {
    /// Add a new package.
    Add,
    /// Remove an existing package.
    Remove,
    /// Change the version of an existing package.
    Update,
}

/// A planned `package.json` change.
///
/// # Examples
///
/// ```
/// use nv_core::{DependencyAction, DependencyChange};
///
/// let change = DependencyChange {
///     name: "next".to_owned(),
///     old_version: Some("14.1.0".to_owned()),
///     new_version: None,
///     action: DependencyAction::Remove,
/// };
/// assert_eq!(change.to_string(), "Removed next@14.1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChange {
    /// Package name.
    pub name: String,

    /// Version currently declared, if any.
    pub old_version: Option<String>,

    /// Version to declare, if any.
    pub new_version: Option<String>,

    /// The kind of change.
    pub action: DependencyAction,
}

impl std::fmt::Display for DependencyChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.action {
            DependencyAction::Add => {
                write!(f, "Added {}", self.name)?;
                if let Some(version) = &self.new_version {
                    write!(f, "@{version}")?;
                }
                Ok(())
            }
            DependencyAction::Remove => {
                write!(f, "Removed {}", self.name)?;
                if let Some(version) = &self.old_version {
                    write!(f, "@{version}")?;
                }
                Ok(())
            }
            DependencyAction::Update => write!(
                f,
                "Updated {} from {} to {}",
                self.name,
                self.old_version.as_deref().unwrap_or("?"),
                self.new_version.as_deref().unwrap_or("?"),
            ),
        }
    }
}

/// Aggregate counters of a conversion run.
///
/// # Examples
///
/// ```
/// use nv_core::ConversionStats;
///
/// let mut stats = ConversionStats { total_files: 4, modified_files: 1, ..Default::default() };
/// stats.recompute_rate();
/// assert!((stats.transformation_rate - 0.25).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of files in the input set.
    pub total_files: usize,

    /// Number of code files the rewriter changed.
    pub modified_files: usize,

    /// Number of planned dependency changes.
    pub dependency_changes: usize,

    /// Number of route objects emitted.
    pub route_changes: usize,

    /// `modified_files / total_files`, `0.0` when there are no files.
    pub transformation_rate: f64,
}

impl ConversionStats {
    /// Recomputes [`transformation_rate`](Self::transformation_rate).
    #[allow(clippy::cast_precision_loss)]
    pub fn recompute_rate(&mut self) {
        self.transformation_rate = if self.total_files == 0 {
            0.0
        } else {
            self.modified_files as f64 / self.total_files as f64
        };
    }
}

/// The rewritten text of one modified file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedFile {
    /// The file name as given in the input set.
    pub name: String,

    /// The rewritten text.
    pub code: String,
}

/// The single result of a conversion run.
///
/// `success` is `true` exactly when `errors` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// `true` if no errors were recorded.
    pub success: bool,

    /// Error messages, in the order they occurred.
    pub errors: Vec<String>,

    /// Warning messages, file-prefixed where they concern a file.
    pub warnings: Vec<String>,

    /// Informational messages, ending with the run summary.
    pub info: Vec<String>,

    /// Aggregate counters.
    pub stats: ConversionStats,

    /// Original text of the first modified code file.
    pub original_code: String,

    /// Rewritten text of the first modified code file.
    pub transformed_code: String,

    /// Rule descriptions applied, across all files, in processing order.
    pub applied_transformations: Vec<String>,

    /// Structural changes, across all files, in processing order.
    pub changes: Vec<String>,

    /// The converted route tree, empty when routing is disabled.
    pub routes: Vec<RouteObject>,

    /// Planned manifest changes, empty when dependency updates are disabled.
    pub dependency_plan: Vec<DependencyChange>,

    /// Rewritten files, filled only when output collection is enabled.
    pub outputs: Vec<ConvertedFile>,

    /// The diagnostics snapshot taken while finalizing.
    pub report: DiagnosticsReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_zero_when_no_files() {
        let mut stats = ConversionStats {
            modified_files: 3,
            ..ConversionStats::default()
        };
        stats.recompute_rate();
        assert!(stats.transformation_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_dependency_change_display() {
        let add = DependencyChange {
            name: "vite".to_owned(),
            old_version: None,
            new_version: Some("^5.4.0".to_owned()),
            action: DependencyAction::Add,
        };
        assert_eq!(add.to_string(), "Added vite@^5.4.0");

        let update = DependencyChange {
            name: "react".to_owned(),
            old_version: Some("17.0.2".to_owned()),
            new_version: Some("^18.3.1".to_owned()),
            action: DependencyAction::Update,
        };
        assert_eq!(update.to_string(), "Updated react from 17.0.2 to ^18.3.1");
    }

    #[test]
    fn test_transform_result_changed() {
        assert!(!TransformResult::default().changed());
        let result = TransformResult {
            transformed_code: String::new(),
            applied_transformations: vec!["Replace Link import".to_owned()],
        };
        assert!(result.changed());
    }
}
