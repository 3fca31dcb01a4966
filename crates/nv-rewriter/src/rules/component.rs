//! Framework component rules: `Link`, `Image`, `Head`, `Script`, `dynamic`.
//!
//! Import rules expect the canonical local names; the structural pass renames
//! aliased default imports (`import NextLink from 'next/link'`) first.

use nv_core::{RuleCategory, RuleComplexity};

use crate::registry::{Replacement, RuleSpec};

/// Component rules in application order.
pub const RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r#"import\s+Link\s+from\s*['"]next/link['"];?"#,
        replacement: Replacement::Template("import { Link } from 'react-router-dom';"),
        description: "Replace next/link import with React Router Link",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Component,
    },
    RuleSpec {
        pattern: r"<Link(\s+(?:[^>]*?\s)?)href=",
        replacement: Replacement::Template("<Link${1}to="),
        description: "Convert Link href prop to to",
        complexity: RuleComplexity::Medium,
        category: RuleCategory::Component,
    },
    RuleSpec {
        pattern: r#"import\s+Image\s+from\s*['"]next/(?:legacy/)?image['"];?"#,
        replacement: Replacement::Template("import { Image } from '@unpic/react';"),
        description: "Replace next/image import with @unpic/react Image",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Component,
    },
    RuleSpec {
        pattern: r#"import\s+Head\s+from\s*['"]next/head['"];?"#,
        replacement: Replacement::Template("import { Helmet } from 'react-helmet-async';"),
        description: "Replace next/head import with react-helmet-async",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Component,
    },
    RuleSpec {
        pattern: r"<(/?)Head(\s*)>",
        replacement: Replacement::Template("<${1}Helmet${2}>"),
        description: "Convert Head elements to Helmet",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Component,
    },
    RuleSpec {
        pattern: r#"import\s+Script\s+from\s*['"]next/script['"];?[ \t]*\r?\n?"#,
        replacement: Replacement::Template(""),
        description: "Remove next/script import",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Component,
    },
    RuleSpec {
        pattern: r"<(/?)Script\b",
        replacement: Replacement::Template("<${1}script"),
        description: "Convert Script elements to plain script tags",
        complexity: RuleComplexity::Medium,
        category: RuleCategory::Component,
    },
    RuleSpec {
        pattern: r#"import\s+dynamic\s+from\s*['"]next/dynamic['"];?"#,
        replacement: Replacement::Template("import { lazy } from 'react';"),
        description: "Replace next/dynamic import with React lazy",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Component,
    },
    RuleSpec {
        pattern: r#"\bdynamic\(\s*\(\)\s*=>\s*(import\(\s*['"][^'"]+['"]\s*\))\s*(?:,\s*\{[^{}]*\}\s*)?\)"#,
        replacement: Replacement::Template("lazy(() => ${1})"),
        description: "Convert dynamic() imports to lazy()",
        complexity: RuleComplexity::Complex,
        category: RuleCategory::Component,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{assert_idempotent, run};

    const PAGE: &str = r#"import Link from 'next/link';
import Image from 'next/image';
import Head from 'next/head';
import Script from 'next/script';
import dynamic from 'next/dynamic';

const Chart = dynamic(() => import('../components/Chart'), { ssr: false });

export default function Home() {
  return (
    <>
      <Head>
        <title>Home</title>
      </Head>
      <Link href="/about">About</Link>
      <Link className="nav" href={`/posts/${id}`}>Post</Link>
      <Image src="/logo.png" width={64} height={64} alt="" />
      <Script src="https://example.com/a.js" />
    </>
  );
}
"#;

    #[test]
    fn test_component_imports() {
        let code = run(RULES, PAGE).transformed_code;
        assert!(code.contains("import { Link } from 'react-router-dom';"));
        assert!(code.contains("import { Image } from '@unpic/react';"));
        assert!(code.contains("import { Helmet } from 'react-helmet-async';"));
        assert!(code.contains("import { lazy } from 'react';"));
        assert!(!code.contains("next/script"));
    }

    #[test]
    fn test_component_usages() {
        let code = run(RULES, PAGE).transformed_code;
        assert!(code.contains(r#"<Link to="/about">About</Link>"#));
        assert!(code.contains(r#"<Link className="nav" to={`/posts/${id}`}>Post</Link>"#));
        assert!(code.contains("<Helmet>"));
        assert!(code.contains("</Helmet>"));
        assert!(code.contains(r#"<script src="https://example.com/a.js" />"#));
        assert!(code.contains("const Chart = lazy(() => import('../components/Chart'));"));
    }

    #[test]
    fn test_header_component_untouched() {
        let result = run(RULES, "<Header>x</Header><ScriptLoader />");
        assert!(result.applied_transformations.is_empty());
    }

    #[test]
    fn test_idempotent() {
        assert_idempotent(RULES, PAGE);
    }
}
