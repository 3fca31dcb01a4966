//! The Rule Engine: applies registry rules to a source text.

use nv_core::{ConversionOptions, TransformResult};
use tracing::trace;

use crate::registry::{RuleRegistry, TransformationRule};

/// Applies an ordered selection of rules to source text.
///
/// For each rule in order, if its pattern matches the current text, every
/// occurrence is replaced in one pass and the rule's description is logged
/// once. Later rules see the output of earlier ones. The engine holds no
/// state between calls.
///
/// # Examples
///
/// ```
/// use nv_rewriter::{RuleEngine, RuleRegistry};
///
/// let registry = RuleRegistry::builtin()?;
/// let engine = RuleEngine::new(registry);
///
/// let result = engine.apply("const api = process.env.NEXT_PUBLIC_API;");
/// assert_eq!(result.transformed_code, "const api = import.meta.env.VITE_API;");
/// assert_eq!(result.applied_transformations.len(), 1);
/// # Ok::<(), nv_rewriter::RuleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RuleEngine<'r> {
    rules: Vec<&'r TransformationRule>,
}

impl<'r> RuleEngine<'r> {
    /// An engine running every rule of `registry`.
    #[must_use]
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            rules: registry.iter().collect(),
        }
    }

    /// An engine running the rules whose category `options` allows.
    #[must_use]
    pub fn for_options(registry: &'r RuleRegistry, options: &ConversionOptions) -> Self {
        Self {
            rules: registry.allowed_by(options).collect(),
        }
    }

    /// An engine running an explicit selection, in the order given.
    #[must_use]
    pub fn with_rules(rules: impl IntoIterator<Item = &'r TransformationRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Number of rules this engine runs.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the engine runs no rules.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrites `source`.
    pub fn apply(&self, source: &str) -> TransformResult {
        let mut code = source.to_owned();
        let mut applied = Vec::new();

        for rule in &self.rules {
            if !rule.is_match(&code) {
                continue;
            }
            code = rule.rewrite(&code).into_owned();
            trace!(rule = rule.description(), "rule applied");
            applied.push(rule.description().to_owned());
        }

        TransformResult {
            transformed_code: code,
            applied_transformations: applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nv_core::RuleCategory;

    fn registry() -> &'static RuleRegistry {
        RuleRegistry::builtin().expect("built-in rules compile")
    }

    const PAGE: &str = r#"import Link from 'next/link';
import { useRouter } from 'next/router';
import type { NextPage } from 'next';

const Home: NextPage = () => {
  const router = useRouter();
  return <Link href="/a" onClick={() => router.push('/b')}>{process.env.NEXT_PUBLIC_NAME}</Link>;
};

export default Home;
"#;

    #[test]
    fn test_full_registry_rewrites_page() {
        let result = RuleEngine::new(registry()).apply(PAGE);
        let code = &result.transformed_code;
        assert!(code.contains("import { Link } from 'react-router-dom';"));
        assert!(code.contains("<Link to=\"/a\""));
        assert!(code.contains("navigate('/b')"));
        assert!(code.contains("import.meta.env.VITE_NAME"));
        assert!(code.contains("const Home: FC = () => {"));
    }

    #[test]
    fn test_log_is_bounded_by_registry_and_ordered() {
        let registry = registry();
        let result = RuleEngine::new(registry).apply(PAGE);
        assert!(result.applied_transformations.len() <= registry.len());

        let positions: Vec<usize> = result
            .applied_transformations
            .iter()
            .map(|d| {
                registry
                    .iter()
                    .position(|r| r.description() == d)
                    .expect("logged rule is registered")
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_second_pass_logs_nothing() {
        let engine = RuleEngine::new(registry());
        let first = engine.apply(PAGE);
        let second = engine.apply(&first.transformed_code);
        assert!(second.applied_transformations.is_empty());
        assert_eq!(second.transformed_code, first.transformed_code);
    }

    #[test]
    fn test_deterministic() {
        let engine = RuleEngine::new(registry());
        assert_eq!(engine.apply(PAGE), engine.apply(PAGE));
    }

    #[test]
    fn test_options_gate_categories() {
        let options = ConversionOptions {
            replace_components: false,
            ..ConversionOptions::all()
        };
        let engine = RuleEngine::for_options(registry(), &options);
        let result = engine.apply(PAGE);
        assert!(result.transformed_code.contains("from 'next/link'"));
        assert!(result.transformed_code.contains("navigate('/b')"));
        assert!(engine.len() < registry().len());
    }

    #[test]
    fn test_engine_outlives_options() {
        let engine = {
            let options = ConversionOptions {
                use_react_router: false,
                ..ConversionOptions::all()
            };
            RuleEngine::for_options(registry(), &options)
        };
        let result = engine.apply(PAGE);
        assert!(result.transformed_code.contains("<Link to=\"/a\""));
        assert!(!result.transformed_code.contains("navigate('/b')"));
    }

    #[test]
    fn test_unmatched_source_is_unchanged() {
        let source = "export const sum = (a, b) => a + b;\n";
        let result = RuleEngine::new(registry()).apply(source);
        assert_eq!(result.transformed_code, source);
        assert!(!result.changed());
    }

    #[test]
    fn test_with_rules_selection() {
        let registry = registry();
        let engine = RuleEngine::with_rules(registry.by_category(RuleCategory::Config));
        let result = engine.apply(PAGE);
        assert_eq!(result.applied_transformations.len(), 1);
    }
}
