//! Environment and runtime configuration rules.

use nv_core::{RuleCategory, RuleComplexity};

use crate::registry::{Replacement, RuleSpec};

/// Config rules in application order.
pub const RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r"\bprocess\.env\.NEXT_PUBLIC_(\w+)",
        replacement: Replacement::Template("import.meta.env.VITE_${1}"),
        description: "Convert NEXT_PUBLIC_ environment variables to import.meta.env.VITE_",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Config,
    },
    RuleSpec {
        pattern: r"\bprocess\.env\.NODE_ENV\b",
        replacement: Replacement::Template("import.meta.env.MODE"),
        description: "Convert process.env.NODE_ENV to import.meta.env.MODE",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Config,
    },
    RuleSpec {
        pattern: r#"import\s+getConfig\s+from\s*['"]next/config['"];?[ \t]*\r?\n?"#,
        replacement: Replacement::Template(""),
        description: "Remove next/config import",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Config,
    },
    RuleSpec {
        pattern: r"const\s*\{\s*publicRuntimeConfig\s*\}\s*=\s*getConfig\(\s*\)",
        replacement: Replacement::Template("const publicRuntimeConfig = import.meta.env"),
        description: "Convert publicRuntimeConfig to import.meta.env",
        complexity: RuleComplexity::Medium,
        category: RuleCategory::Config,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{assert_idempotent, run};

    const SOURCE: &str = r"import getConfig from 'next/config';
const { publicRuntimeConfig } = getConfig();
const api = process.env.NEXT_PUBLIC_API_URL;
const secret = process.env.SECRET_KEY;
if (process.env.NODE_ENV === 'development') {}
";

    #[test]
    fn test_env_conversion() {
        let code = run(RULES, SOURCE).transformed_code;
        assert!(code.starts_with("const publicRuntimeConfig = import.meta.env;"));
        assert!(code.contains("const api = import.meta.env.VITE_API_URL;"));
        assert!(code.contains("const secret = process.env.SECRET_KEY;"));
        assert!(code.contains("if (import.meta.env.MODE === 'development')"));
    }

    #[test]
    fn test_idempotent() {
        assert_idempotent(RULES, SOURCE);
    }
}
