//! Router hook and navigation rules.

use nv_core::{RuleCategory, RuleComplexity};
use regex::Captures;

use crate::registry::{Replacement, RuleSpec};

fn router_location(caps: &Captures<'_>) -> String {
    match &caps[1] {
        "asPath" => "(location.pathname + location.search)".to_owned(),
        _ => "location.pathname".to_owned(),
    }
}

/// Routing rules in application order.
pub const RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r#"import\s*\{\s*useRouter\s*\}\s*from\s*['"]next/router['"];?"#,
        replacement: Replacement::Template(
            "import { useNavigate, useParams, useLocation } from 'react-router-dom';",
        ),
        description: "Replace useRouter import from next/router with React Router hooks",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r#"import\s*\{[^}]*\}\s*from\s*['"]next/navigation['"];?"#,
        replacement: Replacement::Template(
            "import { useNavigate, useParams, useLocation, useSearchParams } from 'react-router-dom';",
        ),
        description: "Replace next/navigation import with React Router hooks",
        complexity: RuleComplexity::Medium,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r"(?m)^([ \t]*)const\s+router\s*=\s*useRouter\(\s*\)\s*;?",
        replacement: Replacement::Template(
            "${1}const navigate = useNavigate();\n${1}const location = useLocation();",
        ),
        description: "Convert useRouter() binding to useNavigate() and useLocation()",
        complexity: RuleComplexity::Medium,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r"\brouter\.push\(",
        replacement: Replacement::Template("navigate("),
        description: "Convert router.push() to navigate()",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r"\brouter\.replace\(([^()]*)\)",
        replacement: Replacement::Template("navigate(${1}, { replace: true })"),
        description: "Convert router.replace() to navigate() with replace",
        complexity: RuleComplexity::Medium,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r"\brouter\.back\(\s*\)",
        replacement: Replacement::Template("navigate(-1)"),
        description: "Convert router.back() to navigate(-1)",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r"\brouter\.reload\(\s*\)",
        replacement: Replacement::Template("window.location.reload()"),
        description: "Convert router.reload() to window.location.reload()",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r"\brouter\.(pathname|asPath)\b",
        replacement: Replacement::Function(router_location),
        description: "Convert router.pathname and router.asPath to location",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r"\brouter\.prefetch\([^()]*\)\s*;?",
        replacement: Replacement::Template(""),
        description: "Remove router.prefetch() calls",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r"\busePathname\(\s*\)",
        replacement: Replacement::Template("useLocation().pathname"),
        description: "Convert usePathname() to useLocation().pathname",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Routing,
    },
    RuleSpec {
        pattern: r"const\s+(\w+)\s*=\s*useSearchParams\(\s*\)",
        replacement: Replacement::Template("const [${1}] = useSearchParams()"),
        description: "Destructure useSearchParams() result",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Routing,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{assert_idempotent, run};

    const PAGE: &str = r"import { useRouter } from 'next/router';

export default function Nav() {
  const router = useRouter();
  const go = () => router.push('/posts');
  const swap = () => router.replace('/login');
  return <p onClick={() => router.back()}>{router.pathname}</p>;
}
";

    #[test]
    fn test_router_page_conversion() {
        let result = run(RULES, PAGE);
        let code = &result.transformed_code;
        assert!(code.contains("import { useNavigate, useParams, useLocation } from 'react-router-dom';"));
        assert!(code.contains("  const navigate = useNavigate();\n  const location = useLocation();"));
        assert!(code.contains("navigate('/posts')"));
        assert!(code.contains("navigate('/login', { replace: true })"));
        assert!(code.contains("navigate(-1)"));
        assert!(code.contains("{location.pathname}"));
        assert!(!code.contains("router."));
        assert!(!code.contains("useRouter"));
    }

    #[test]
    fn test_one_entry_per_matching_rule() {
        let source = "router.push('/a');\nrouter.push('/b');";
        let result = run(RULES, source);
        assert_eq!(result.applied_transformations, ["Convert router.push() to navigate()"]);
        assert_eq!(result.transformed_code, "navigate('/a');\nnavigate('/b');");
    }

    #[test]
    fn test_as_path_uses_search() {
        let result = run(RULES, "const here = router.asPath;");
        assert_eq!(
            result.transformed_code,
            "const here = (location.pathname + location.search);"
        );
    }

    #[test]
    fn test_app_router_hooks() {
        let source = "import { usePathname, useSearchParams } from 'next/navigation';\nconst path = usePathname();\nconst search = useSearchParams();";
        let result = run(RULES, source);
        let code = &result.transformed_code;
        assert!(code.contains("from 'react-router-dom'"));
        assert!(code.contains("const path = useLocation().pathname;"));
        assert!(code.contains("const [search] = useSearchParams();"));
    }

    #[test]
    fn test_idempotent() {
        assert_idempotent(RULES, PAGE);
        assert_idempotent(
            RULES,
            "import { useSearchParams } from 'next/navigation';\nconst q = useSearchParams();\nrouter.prefetch('/x');",
        );
    }
}
