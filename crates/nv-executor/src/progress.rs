//! Run progress in percent.

use std::fmt;

/// Called with the new percentage and a message after every increment.
pub type ProgressCallback = Box<dyn FnMut(f64, &str) + Send>;

/// Fixed increments of the executor's stages. They sum to 100.
pub mod increments {
    /// Run started.
    pub const START: f64 = 5.0;
    /// Analysis stage entered.
    pub const ANALYZING: f64 = 10.0;
    /// Transformation stage entered.
    pub const TRANSFORMING: f64 = 20.0;
    /// Shared by all files of the transformation stage.
    pub const FILES: f64 = 40.0;
    /// Dependency stage entered.
    pub const DEPENDENCIES: f64 = 10.0;
    /// Route stage entered.
    pub const ROUTES: f64 = 10.0;
    /// Finalization entered.
    pub const FINALIZING: f64 = 5.0;
}

/// Monotonically non-decreasing progress, clamped to `[0, 100]`.
///
/// # Examples
///
/// ```
/// use nv_executor::ProgressTracker;
///
/// let mut progress = ProgressTracker::new();
/// progress.advance(60.0, "half");
/// progress.advance(60.0, "over");
/// assert!((progress.value() - 100.0).abs() < f64::EPSILON);
/// progress.advance(-10.0, "back");
/// assert!((progress.value() - 100.0).abs() < f64::EPSILON);
/// ```
#[derive(Default)]
pub struct ProgressTracker {
    value: f64,
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    /// Starts at zero with no callback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callback invoked after every increment.
    pub fn set_callback(&mut self, callback: ProgressCallback) {
        self.callback = Some(callback);
    }

    /// Current percentage.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Adds `increment` (negative values are ignored), clamps, and notifies.
    pub fn advance(&mut self, increment: f64, message: &str) {
        self.value = (self.value + increment.max(0.0)).min(100.0);
        if let Some(callback) = self.callback.as_mut() {
            callback(self.value, message);
        }
    }

    /// Jumps to 100 and notifies.
    pub fn complete(&mut self, message: &str) {
        self.advance(100.0, message);
    }
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("value", &self.value)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
