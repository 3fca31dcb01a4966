//! The executor's stage machine.

use serde::{Deserialize, Serialize};

/// A stage of a conversion run.
///
/// Stages advance strictly in declaration order; [`Failed`](Self::Failed)
/// may be entered from any non-terminal stage.
///
/// # Examples
///
/// ```
/// use nv_core::ExecutionStage;
///
/// let mut stage = ExecutionStage::Idle;
/// while let Some(next) = stage.next() {
///     stage = next;
/// }
/// assert_eq!(stage, ExecutionStage::Succeeded);
/// assert!(stage.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStage {
    /// Not started.
    #[default]
    Idle,
    /// Classifying the input files.
    Analyzing,
    /// Rewriting code files.
    Transforming,
    /// Planning manifest changes.
    UpdatingDependencies,
    /// Building the route tree.
    ConvertingRoutes,
    /// Writing the summary and taking the diagnostics snapshot.
    Finalizing,
    /// Finished with no errors.
    Succeeded,
    /// Finished with errors.
    Failed,
}

impl ExecutionStage {
    /// The stage that follows on the success path, `None` when terminal.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Analyzing),
            Self::Analyzing => Some(Self::Transforming),
            Self::Transforming => Some(Self::UpdatingDependencies),
            Self::UpdatingDependencies => Some(Self::ConvertingRoutes),
            Self::ConvertingRoutes => Some(Self::Finalizing),
            Self::Finalizing => Some(Self::Succeeded),
            Self::Succeeded | Self::Failed => None,
        }
    }

    /// Returns `true` once the run is over.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// The step name recorded in diagnostics when this stage completes.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Analyzing => "File analysis",
            Self::Transforming => "File transformation",
            Self::UpdatingDependencies => "Dependency updates",
            Self::ConvertingRoutes => "Route conversion",
            Self::Finalizing => "Conversion finalization",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for ExecutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_sequence() {
        let mut seen = vec![ExecutionStage::Idle];
        let mut stage = ExecutionStage::Idle;
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen.len(), 7);
        assert_eq!(seen[3], ExecutionStage::UpdatingDependencies);
    }

    #[test]
    fn test_failed_is_terminal() {
        assert!(ExecutionStage::Failed.is_terminal());
        assert_eq!(ExecutionStage::Failed.next(), None);
        assert!(!ExecutionStage::Finalizing.is_terminal());
    }
}
