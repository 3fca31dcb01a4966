//! API handler type rules.

use nv_core::{RuleCategory, RuleComplexity};
use regex::Captures;

use crate::registry::{Replacement, RuleSpec};

fn express_type(next_type: &str) -> &'static str {
    match next_type {
        "NextApiRequest" => "Request",
        "NextApiResponse" => "Response",
        _ => "RequestHandler",
    }
}

fn express_import(caps: &Captures<'_>) -> String {
    format!("import type {{ {} }} from 'express';", express_type(&caps[1]))
}

fn express_usage(caps: &Captures<'_>) -> String {
    express_type(&caps[1]).to_owned()
}

/// API rules in application order.
pub const RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r#"import\s+(?:type\s+)?\{\s*(NextApiRequest|NextApiResponse|NextApiHandler)\s*\}\s*from\s*['"]next['"];?"#,
        replacement: Replacement::Function(express_import),
        description: "Replace Next.js API type imports with Express types",
        complexity: RuleComplexity::Simple,
        category: RuleCategory::Api,
    },
    RuleSpec {
        pattern: r"\b(NextApiRequest|NextApiResponse|NextApiHandler)\b(?:<[^<>]*>)?",
        replacement: Replacement::Function(express_usage),
        description: "Convert Next.js API handler types to Express types",
        complexity: RuleComplexity::Medium,
        category: RuleCategory::Api,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{assert_idempotent, run};

    const HANDLER: &str = r"import type { NextApiRequest } from 'next';
import type { NextApiResponse } from 'next';

export default function handler(req: NextApiRequest, res: NextApiResponse<Data>) {
  res.status(200).json({ ok: true });
}
";

    #[test]
    fn test_handler_types() {
        let result = run(RULES, HANDLER);
        let code = &result.transformed_code;
        assert!(code.contains("import type { Request } from 'express';"));
        assert!(code.contains("import type { Response } from 'express';"));
        assert!(code.contains("handler(req: Request, res: Response)"));
        assert_eq!(result.applied_transformations.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        assert_idempotent(RULES, HANDLER);
    }
}
