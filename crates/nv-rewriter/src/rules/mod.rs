//! Built-in rule tables, one module per category.
//!
//! Tables are chained in a fixed order: routing, component, data-fetching,
//! api, config, general. Within a table, import rules come before the rules
//! that rewrite usages, so usage rules never see a framework import.

use crate::registry::RuleSpec;

pub mod api;
pub mod component;
pub mod config;
pub mod data_fetching;
pub mod general;
pub mod routing;

/// All built-in rule declarations in registry order.
pub fn builtin_specs() -> impl Iterator<Item = &'static RuleSpec> {
    routing::RULES
        .iter()
        .chain(component::RULES)
        .chain(data_fetching::RULES)
        .chain(api::RULES)
        .chain(config::RULES)
        .chain(general::RULES)
}

#[cfg(test)]
pub(crate) mod testing {
    use nv_core::TransformResult;

    use crate::engine::RuleEngine;
    use crate::registry::{RuleRegistry, RuleSpec};

    /// Runs one rule table over `source`.
    pub fn run(specs: &[RuleSpec], source: &str) -> TransformResult {
        let registry = RuleRegistry::compile(specs).expect("rules compile");
        RuleEngine::new(&registry).apply(source)
    }

    /// Asserts that a second pass over the table's own output logs nothing.
    pub fn assert_idempotent(specs: &[RuleSpec], source: &str) {
        let first = run(specs, source);
        let second = run(specs, &first.transformed_code);
        assert!(
            second.applied_transformations.is_empty(),
            "second pass applied {:?} to:\n{}",
            second.applied_transformations,
            first.transformed_code
        );
    }
}
