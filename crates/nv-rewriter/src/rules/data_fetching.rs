//! Data-fetching type and export rules.
//!
//! The structural pass turns `getServerSideProps` / `getStaticProps` into a
//! `loader`; these rules clean up the Next.js types and exports around it.

use nv_core::{RuleCategory, RuleComplexity};

use crate::registry::{Replacement, RuleSpec};

/// Data-fetching rules in application order.
pub const RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r#"import\s+(?:type\s+)?\{\s*(?:GetServerSideProps|GetStaticProps|GetStaticPaths|GetServerSidePropsContext|GetStaticPropsContext|InferGetServerSidePropsType|InferGetStaticPropsType)\s*\}\s*from\s*['"]next['"];?[ \t]*\r?\n?"#,
        replacement: Replacement::Template(""),
        description: "Remove Next.js data-fetching type imports",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::DataFetching,
    },
    RuleSpec {
        pattern: r":\s*(?:GetServerSideProps|GetStaticProps|GetStaticPaths)\b(?:<[^=]*?>)?(\s*=)",
        replacement: Replacement::Template("${1}"),
        description: "Remove data-fetching function type annotations",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::DataFetching,
    },
    RuleSpec {
        pattern: r"\bInfer(?:GetServerSideProps|GetStaticProps)Type<\s*typeof\s+\w+\s*>",
        replacement: Replacement::Template("Awaited<ReturnType<typeof loader>>"),
        description: "Convert inferred page props types to loader return types",
        complexity: RuleComplexity::Medium,
        category: RuleCategory::DataFetching,
    },
    RuleSpec {
        pattern: r"\b(?:GetServerSidePropsContext|GetStaticPropsContext)\b(?:<[^<>]*>)?",
        replacement: Replacement::Template("LoaderFunctionArgs"),
        description: "Convert data-fetching context types to LoaderFunctionArgs",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::DataFetching,
    },
    RuleSpec {
        pattern: r"(?m)^export\s+const\s+revalidate\s*=\s*(\d+)\s*;?",
        replacement: Replacement::Template(
            "// revalidate every ${1}s: move caching into the loader",
        ),
        description: "Comment out ISR revalidate export",
        complexity: RuleComplexity::Medium,
        category: RuleCategory::DataFetching,
    },
];
