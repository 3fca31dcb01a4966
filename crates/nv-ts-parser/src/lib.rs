//! tree-sitter based TypeScript/TSX parsing for nv-migrate.
//!
//! This crate parses page, component and handler sources to:
//!
//! - Extract static import statements and classify their framework module
//! - Extract top-level exports (default exports, data-fetching functions,
//!   API handlers, middleware)
//! - Hand the syntax tree to the structural rewriter
//!
//! # Overview
//!
//! ```
//! use nv_core::FrameworkModule;
//! use nv_ts_parser::{Dialect, TsParser};
//!
//! let mut parser = TsParser::new(Dialect::for_file("pages/about.tsx"))?;
//! let source = r#"
//!     import Link from 'next/link';
//!     export default function About() { return <Link href="/">Home</Link>; }
//! "#;
//!
//! let result = parser.parse(source)?;
//! assert_eq!(result.imports[0].module, Some(FrameworkModule::NextLink));
//! # Ok::<(), nv_ts_parser::ParseError>(())
//! ```
//!
//! # Import Detection
//!
//! | Pattern | Example | Kind |
//! |---------|---------|------|
//! | Named | `import { useRouter } from 'next/router'` | `Named` |
//! | Default | `import Link from 'next/link'` | `Default` |
//! | Namespace | `import * as fs from 'fs'` | `Namespace` |
//! | Side-effect | `import './globals.css'` | `SideEffect` |
//! | Type-only | `import type { NextPage } from 'next'` | `TypeOnly` |
//!
//! # Thread Safety
//!
//! [`TsParser`] is `Send` but not `Sync`; create one per task. Compiled
//! queries are shared process-wide.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod exports;
mod import;
pub mod node;
mod parser;
pub mod queries;
pub mod source;

pub use error::ParseError;
pub use exports::{ExportInfo, ExportKind, extract_exports};
pub use import::extract_imports;
pub use node::{find_ancestor, has_token, node_location, node_text};
pub use parser::{Dialect, ParseResult, TsParser};
pub use source::{detect_framework_module, strip_quotes};

pub use tree_sitter::{Node, Tree};
