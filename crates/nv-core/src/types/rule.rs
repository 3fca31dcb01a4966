//! Rule metadata: categories and complexity.

use serde::{Deserialize, Serialize};

/// The concern a transformation rule addresses.
///
/// Serialized in kebab-case (`data-fetching`), which is also the label used
/// on the command line.
///
/// # Examples
///
/// ```
/// use nv_core::RuleCategory;
///
/// assert_eq!(RuleCategory::DataFetching.label(), "data-fetching");
/// assert_eq!(RuleCategory::from_label("api"), Some(RuleCategory::Api));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    /// Framework components (`Link`, `Image`, `Head`, `Script`, `dynamic`).
    Component,

    /// Router hooks and navigation calls.
    Routing,

    /// Server-side data-fetching exports and their types.
    DataFetching,

    /// API route handler types.
    Api,

    /// Build-time and runtime configuration (environment variables, config).
    Config,

    /// Type annotations and other framework-neutral cleanups.
    General,
}

impl RuleCategory {
    /// All categories in display order.
    pub const ALL: [Self; 6] = [
        Self::Component,
        Self::Routing,
        Self::DataFetching,
        Self::Api,
        Self::Config,
        Self::General,
    ];

    /// Returns the kebab-case label for this category.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Routing => "routing",
            Self::DataFetching => "data-fetching",
            Self::Api => "api",
            Self::Config => "config",
            Self::General => "general",
        }
    }

    /// Parses a category from its label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How involved a rule's rewrite is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleComplexity {
    /// A one-to-one token or import swap.
    Simple,

    /// A rewrite that reshapes a call or an element.
    Medium,

    /// A rewrite whose output usually needs manual review.
    Complex,
}

impl RuleComplexity {
    /// All complexity levels, simplest first.
    pub const ALL: [Self; 3] = [Self::Simple, Self::Medium, Self::Complex];

    /// Returns the kebab-case label for this level.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }

    /// Parses a complexity level from its label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for RuleComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_round_trip() {
        for category in RuleCategory::ALL {
            assert_eq!(RuleCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(RuleCategory::from_label("styling"), None);
    }

    #[test]
    fn test_category_serde_matches_label() {
        let json = serde_json::to_string(&RuleCategory::DataFetching).expect("serialize");
        assert_eq!(json, "\"data-fetching\"");
    }

    #[test]
    fn test_complexity_order() {
        assert!(RuleComplexity::Simple < RuleComplexity::Complex);
        assert_eq!(RuleComplexity::from_label("medium"), Some(RuleComplexity::Medium));
    }
}
