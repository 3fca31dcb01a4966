//! The Rule Registry: an ordered, immutable catalogue of rewrite rules.
//!
//! Rules are declared as static [`RuleSpec`] tables (see [`crate::rules`]) and
//! compiled once into [`TransformationRule`]s. Registry order is the order the
//! tables are declared in and is never re-sorted: the engine applies rules
//! first-registered, first-applied.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use nv_core::{ConversionOptions, RuleCategory, RuleComplexity};
use regex::{Captures, Regex};

use crate::error::RuleError;

/// How a rule produces its replacement text.
#[derive(Clone, Copy)]
pub enum Replacement {
    /// A template with `$1` / `${name}` capture references.
    Template(&'static str),
    /// A function computing the replacement from the captures.
    Function(fn(&Captures<'_>) -> String),
}

impl std::fmt::Debug for Replacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// The static declaration of a rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    /// Regular expression matched against the whole source text.
    pub pattern: &'static str,
    /// Replacement for every match.
    pub replacement: Replacement,
    /// Human-readable description, logged once per file when the rule fires.
    pub description: &'static str,
    /// How involved the rewrite is.
    pub complexity: RuleComplexity,
    /// The concern the rule belongs to.
    pub category: RuleCategory,
}

/// A compiled rule.
#[derive(Debug)]
pub struct TransformationRule {
    pattern: Regex,
    replacement: Replacement,
    description: &'static str,
    complexity: RuleComplexity,
    category: RuleCategory,
}

impl TransformationRule {
    /// Compiles a rule from its declaration.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if the pattern does not compile.
    pub fn compile(spec: &RuleSpec) -> Result<Self, RuleError> {
        let pattern = Regex::new(spec.pattern).map_err(|source| RuleError::InvalidPattern {
            description: spec.description,
            source,
        })?;
        Ok(Self {
            pattern,
            replacement: spec.replacement,
            description: spec.description,
            complexity: spec.complexity,
            category: spec.category,
        })
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    #[inline]
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Replaces every match in `text` in a single pass.
    #[must_use]
    pub fn rewrite<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self.replacement {
            Replacement::Template(template) => self.pattern.replace_all(text, template),
            Replacement::Function(f) => self.pattern.replace_all(text, |caps: &Captures<'_>| f(caps)),
        }
    }

    /// The rule's pattern source.
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The rule's description.
    #[inline]
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// The rule's complexity.
    #[inline]
    #[must_use]
    pub const fn complexity(&self) -> RuleComplexity {
        self.complexity
    }

    /// The rule's category.
    #[inline]
    #[must_use]
    pub const fn category(&self) -> RuleCategory {
        self.category
    }
}

/// An ordered collection of compiled rules.
///
/// # Examples
///
/// ```
/// use nv_core::RuleCategory;
/// use nv_rewriter::RuleRegistry;
///
/// let registry = RuleRegistry::builtin()?;
/// assert!(registry.by_category(RuleCategory::Routing).count() > 0);
/// # Ok::<(), nv_rewriter::RuleError>(())
/// ```
#[derive(Debug)]
pub struct RuleRegistry {
    rules: Vec<TransformationRule>,
}

static BUILTIN: OnceLock<RuleRegistry> = OnceLock::new();

impl RuleRegistry {
    /// Compiles a registry from rule declarations, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleError`] encountered.
    pub fn compile<'s>(specs: impl IntoIterator<Item = &'s RuleSpec>) -> Result<Self, RuleError> {
        let rules = specs
            .into_iter()
            .map(TransformationRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Returns the process-wide registry of built-in rules.
    ///
    /// Compiled on first use and cached.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if a built-in pattern fails to
    /// compile.
    pub fn builtin() -> Result<&'static Self, RuleError> {
        if let Some(registry) = BUILTIN.get() {
            return Ok(registry);
        }
        let registry = Self::compile(crate::rules::builtin_specs())?;
        tracing::debug!(rules = registry.len(), "compiled built-in rule registry");
        Ok(BUILTIN.get_or_init(|| registry))
    }

    /// Number of rules.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the registry holds no rules.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &TransformationRule> {
        self.rules.iter()
    }

    /// Rules of one category, in registry order.
    pub fn by_category(&self, category: RuleCategory) -> impl Iterator<Item = &TransformationRule> {
        self.rules.iter().filter(move |r| r.category == category)
    }

    /// Rules of one complexity level, in registry order.
    pub fn by_complexity(
        &self,
        complexity: RuleComplexity,
    ) -> impl Iterator<Item = &TransformationRule> {
        self.rules.iter().filter(move |r| r.complexity == complexity)
    }

    /// Rules whose category is enabled by `options`, in registry order.
    pub fn allowed_by(
        &self,
        options: &ConversionOptions,
    ) -> impl Iterator<Item = &TransformationRule> + use<'_> {
        let options = *options;
        self.rules.iter().filter(move |r| options.allows(r.category))
    }

    /// Looks a rule up by its description.
    #[must_use]
    pub fn find(&self, description: &str) -> Option<&TransformationRule> {
        self.rules.iter().find(|r| r.description == description)
    }

    /// Tallies a list of applied rule descriptions per category.
    ///
    /// Descriptions that name no registered rule are ignored.
    #[must_use]
    pub fn category_counts<S: AsRef<str>>(&self, applied: &[S]) -> BTreeMap<RuleCategory, usize> {
        let mut counts = BTreeMap::new();
        for description in applied {
            if let Some(rule) = self.find(description.as_ref()) {
                *counts.entry(rule.category).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px_to_rem(caps: &Captures<'_>) -> String {
        format!("{}rem", &caps[1])
    }

    const SPECS: &[RuleSpec] = &[
        RuleSpec {
            pattern: r"\bfoo\b",
            replacement: Replacement::Template("bar"),
            description: "Rename foo",
            complexity: RuleComplexity::Simple,
            category: RuleCategory::General,
        },
        RuleSpec {
            pattern: r"(\d+)px",
            replacement: Replacement::Function(px_to_rem),
            description: "Convert px",
            complexity: RuleComplexity::Medium,
            category: RuleCategory::Component,
        },
    ];

    #[test]
    fn test_compile_keeps_order() {
        let registry = RuleRegistry::compile(SPECS).expect("specs compile");
        let descriptions: Vec<_> = registry.iter().map(TransformationRule::description).collect();
        assert_eq!(descriptions, ["Rename foo", "Convert px"]);
    }

    #[test]
    fn test_template_and_function_replacements() {
        let registry = RuleRegistry::compile(SPECS).expect("specs compile");
        let rename = registry.find("Rename foo").expect("rule exists");
        assert_eq!(rename.rewrite("foo + food"), "bar + food");

        let px = registry.find("Convert px").expect("rule exists");
        assert_eq!(px.rewrite("12px 4px"), "12rem 4rem");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let bad = [RuleSpec {
            pattern: "(",
            replacement: Replacement::Template(""),
            description: "Broken",
            complexity: RuleComplexity::Simple,
            category: RuleCategory::General,
        }];
        let err = RuleRegistry::compile(&bad).expect_err("must fail");
        assert!(matches!(err, RuleError::InvalidPattern { description: "Broken", .. }));
    }

    #[test]
    fn test_builtin_registry_compiles() {
        let registry = RuleRegistry::builtin().expect("built-in rules compile");
        assert!(!registry.is_empty());
        for category in RuleCategory::ALL {
            assert!(
                registry.by_category(category).count() > 0,
                "no rules for {category}"
            );
        }
    }

    #[test]
    fn test_builtin_descriptions_are_unique() {
        let registry = RuleRegistry::builtin().expect("built-in rules compile");
        let mut seen = nv_core::fx_hash_set();
        for rule in registry.iter() {
            assert!(seen.insert(rule.description()), "{}", rule.description());
        }
    }

    #[test]
    fn test_category_counts() {
        let registry = RuleRegistry::compile(SPECS).expect("specs compile");
        let counts = registry.category_counts(&["Rename foo", "Convert px", "Rename foo", "unknown"]);
        assert_eq!(counts.get(&RuleCategory::General), Some(&2));
        assert_eq!(counts.get(&RuleCategory::Component), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_filters() {
        let registry = RuleRegistry::compile(SPECS).expect("specs compile");
        assert_eq!(registry.by_complexity(RuleComplexity::Medium).count(), 1);

        let options = ConversionOptions {
            preserve_typescript: false,
            ..ConversionOptions::all()
        };
        let allowed: Vec<_> = registry.allowed_by(&options).map(|r| r.description()).collect();
        assert_eq!(allowed, ["Convert px"]);
    }
}
