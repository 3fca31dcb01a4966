//! Per-run diagnostics collection.
//!
//! A [`DiagnosticsReporter`] is created at the start of a run, written to by
//! every stage, and read once at the end through
//! [`generate_report`](DiagnosticsReporter::generate_report). Entries are
//! append-only and never deduplicated. Each entry is also emitted as a
//! `tracing` event at the matching level.
//!
//! # Examples
//!
//! ```
//! use nv_core::DiagnosticCategory;
//! use nv_executor::DiagnosticsReporter;
//!
//! let mut reporter = DiagnosticsReporter::new("shop");
//! reporter.add_info(DiagnosticCategory::General, "Starting Next.js to Vite conversion");
//! reporter.add_warning(DiagnosticCategory::Routes, "catch-all route");
//! reporter.complete_step("File analysis");
//!
//! let report = reporter.generate_report();
//! assert_eq!(report.project, "shop");
//! assert_eq!(report.warning_count(), 1);
//! assert_eq!(report.completed_steps[0].name, "File analysis");
//! ```

use std::collections::BTreeMap;
use std::time::Instant;

use nv_core::{CategoryEntries, CompletedStep, DiagnosticCategory, DiagnosticsReport};
use tracing::{error, info, warn};

/// Collector of info, warning and error entries for one run.
#[derive(Debug)]
pub struct DiagnosticsReporter {
    project: String,
    entries: BTreeMap<DiagnosticCategory, CategoryEntries>,
    steps: Vec<CompletedStep>,
    started: Instant,
}

impl DiagnosticsReporter {
    /// Creates an empty reporter; elapsed markers count from here.
    #[must_use]
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            entries: BTreeMap::new(),
            steps: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Appends an info entry.
    pub fn add_info(&mut self, category: DiagnosticCategory, message: impl Into<String>) {
        let message = message.into();
        info!(category = %category, "{message}");
        self.entries.entry(category).or_default().info.push(message);
    }

    /// Appends a warning entry.
    pub fn add_warning(&mut self, category: DiagnosticCategory, message: impl Into<String>) {
        let message = message.into();
        warn!(category = %category, "{message}");
        self.entries.entry(category).or_default().warnings.push(message);
    }

    /// Appends an error entry.
    pub fn add_error(&mut self, category: DiagnosticCategory, message: impl Into<String>) {
        let message = message.into();
        error!(category = %category, "{message}");
        self.entries.entry(category).or_default().errors.push(message);
    }

    /// Records a finished step with the time since the reporter was created.
    ///
    /// Markers never decrease, since [`Instant`] is monotonic.
    pub fn complete_step(&mut self, name: impl Into<String>) {
        let elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let name = name.into();
        info!(step = %name, elapsed_ms, "step completed");
        self.steps.push(CompletedStep { name, elapsed_ms });
    }

    /// Returns `true` if any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.values().any(|entries| !entries.errors.is_empty())
    }

    /// Snapshot of everything recorded so far. Can be called repeatedly.
    #[must_use]
    pub fn generate_report(&self) -> DiagnosticsReport {
        DiagnosticsReport {
            project: self.project.clone(),
            entries: self.entries.clone(),
            completed_steps: self.steps.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_append_only() {
        let mut reporter = DiagnosticsReporter::new("app");
        reporter.add_info(DiagnosticCategory::Analysis, "same");
        reporter.add_info(DiagnosticCategory::Analysis, "same");
        reporter.add_error(DiagnosticCategory::Transformation, "broken");

        let report = reporter.generate_report();
        let analysis = report.category(DiagnosticCategory::Analysis).expect("analysis");
        assert_eq!(analysis.info, ["same", "same"]);
        assert_eq!(report.error_count(), 1);
        assert!(reporter.has_errors());
    }

    #[test]
    fn test_report_is_a_snapshot() {
        let mut reporter = DiagnosticsReporter::new("app");
        reporter.add_info(DiagnosticCategory::General, "one");
        let first = reporter.generate_report();
        reporter.add_info(DiagnosticCategory::General, "two");

        assert_eq!(first.info_count(), 1);
        assert_eq!(reporter.generate_report().info_count(), 2);
        assert_eq!(reporter.generate_report(), reporter.generate_report());
    }

    #[test]
    fn test_step_markers_are_monotonic() {
        let mut reporter = DiagnosticsReporter::new("app");
        reporter.complete_step("File analysis");
        reporter.complete_step("File transformation");
        reporter.complete_step("Dependency updates");

        let steps = reporter.generate_report().completed_steps;
        let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["File analysis", "File transformation", "Dependency updates"]);
        assert!(steps.windows(2).all(|w| w[0].elapsed_ms <= w[1].elapsed_ms));
    }
}
