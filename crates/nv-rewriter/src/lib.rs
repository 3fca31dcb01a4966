//! Source rewriting for nv-migrate.
//!
//! Two passes run over each code file, strictly in this order:
//!
//! 1. The [`StructuralTransformer`] parses the file and rewrites constructs
//!    whose conversion needs the syntax tree (data-fetching exports, router
//!    bindings, aliased imports). It records changes and warnings.
//! 2. The [`RuleEngine`] applies the [`RuleRegistry`]'s pattern rules to the
//!    structural pass's output.
//!
//! # Example
//!
//! ```
//! use nv_core::{ConversionOptions, FileKind};
//! use nv_rewriter::{RuleEngine, RuleRegistry, StructuralTransformer};
//!
//! let options = ConversionOptions::all();
//! let source = "import NextLink from 'next/link';\n\
//!               export const Nav = () => <NextLink href=\"/\">Home</NextLink>;\n";
//!
//! let structural = StructuralTransformer::new(options).apply_to_file(
//!     "components/nav.tsx",
//!     source,
//!     FileKind::Code,
//! )?;
//! let engine = RuleEngine::for_options(RuleRegistry::builtin()?, &options);
//! let result = engine.apply(&structural.code);
//!
//! assert!(result.transformed_code.contains("import { Link } from 'react-router-dom';"));
//! assert!(result.transformed_code.contains("<Link to=\"/\">Home</Link>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Rule Categories
//!
//! | Category | Option | Examples |
//! |----------|--------|----------|
//! | routing | `use_react_router` | `useRouter` to `useNavigate`, `router.push` |
//! | component | `replace_components` | `next/link`, `next/image`, `next/head`, `next/dynamic` |
//! | data-fetching | `transform_data_fetching` | Next.js data types, `revalidate` |
//! | api | `convert_api_routes` | `NextApiRequest` to Express types |
//! | config | `handle_middleware` | `NEXT_PUBLIC_*` env vars, `next/config` |
//! | general | `preserve_typescript` | `NextPage`, directives, type references |

#![deny(clippy::all)]
#![warn(missing_docs)]

mod engine;
pub mod error;
mod registry;
pub mod rules;
mod structural;

pub use engine::RuleEngine;
pub use error::{RuleError, TransformError};
pub use registry::{Replacement, RuleRegistry, RuleSpec, TransformationRule};
pub use structural::{Applied, Edit, EditSet, StructuralTransformer};

#[cfg(test)]
mod tests {
    use nv_core::{ConversionOptions, FileKind};

    use super::*;

    /// Both passes over one page, the way the executor runs them.
    fn convert(file_name: &str, kind: FileKind, source: &str) -> (String, Vec<String>) {
        let options = ConversionOptions::all();
        let structural = StructuralTransformer::new(options)
            .apply_to_file(file_name, source, kind)
            .expect("structural pass succeeds");
        let registry = RuleRegistry::builtin().expect("built-in rules compile");
        let result = RuleEngine::for_options(registry, &options).apply(&structural.code);
        (result.transformed_code, result.applied_transformations)
    }

    #[test]
    fn test_data_fetching_page_end_to_end() {
        let source = r"import type { GetServerSideProps, InferGetServerSidePropsType } from 'next';
import Head from 'next/head';

export const getServerSideProps: GetServerSideProps = async (context) => {
  const res = await fetch(`${process.env.NEXT_PUBLIC_API}/posts/${context.params.id}`);
  return { props: { post: await res.json() } };
};

export default function Post({ post }: InferGetServerSidePropsType<typeof getServerSideProps>) {
  return (
    <>
      <Head><title>{post.title}</title></Head>
      <h1>{post.title}</h1>
    </>
  );
}
";
        let (code, applied) = convert("pages/posts/[id].tsx", FileKind::Page, source);

        assert!(!code.contains("from 'next'"));
        assert!(code.contains("export const loader = async ({ params, request }: LoaderFunctionArgs) => {"));
        assert!(code.contains("${import.meta.env.VITE_API}/posts/${params.id}"));
        assert!(code.contains("return { post: await res.json() };"));
        assert!(code.contains(
            "const { post } = useLoaderData() as Awaited<ReturnType<typeof loader>>;"
        ));
        assert!(code.contains("export default function Post() {"));
        assert!(code.contains("<Helmet><title>{post.title}</title></Helmet>"));
        assert!(code.contains("import { useLoaderData } from 'react-router-dom';"));
        assert!(!applied.is_empty());
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let source = r"import { useRouter } from 'next/router';
import Link from 'next/link';

export default function Nav() {
  const router = useRouter();
  return <Link href={`/posts/${router.query.id}`}>Post</Link>;
}
";
        let (first, _) = convert("components/nav.tsx", FileKind::Code, source);
        let (second, applied) = convert("components/nav.tsx", FileKind::Code, &first);
        assert_eq!(first, second);
        assert!(applied.is_empty(), "second run applied {applied:?}");
    }
}
