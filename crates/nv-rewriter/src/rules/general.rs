//! Framework-neutral cleanups and type annotations.

use nv_core::{RuleCategory, RuleComplexity};

use crate::registry::{Replacement, RuleSpec};

/// General rules in application order.
pub const RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r#"(?m)^///\s*<reference\s+types=["']next[^"']*["']\s*/>[ \t]*\r?\n?"#,
        replacement: Replacement::Template(""),
        description: "Remove Next.js type references",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::General,
    },
    RuleSpec {
        pattern: r#"(?m)^[ \t]*['"]use (?:client|server)['"];?[ \t]*\r?\n?"#,
        replacement: Replacement::Template(""),
        description: "Remove use client and use server directives",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::General,
    },
    RuleSpec {
        pattern: r#"import\s+(?:type\s+)?\{\s*NextPage\s*\}\s*from\s*['"]next['"];?"#,
        replacement: Replacement::Template("import type { FC } from 'react';"),
        description: "Replace NextPage import with React FC",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::General,
    },
    RuleSpec {
        pattern: r":\s*NextPage\b(<[^=]*?>)?(\s*=)",
        replacement: Replacement::Template(": FC${1}${2}"),
        description: "Convert NextPage annotations to FC",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::General,
    },
];
