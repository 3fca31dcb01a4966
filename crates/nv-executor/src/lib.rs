//! Conversion executor for nv-migrate.
//!
//! This crate runs the whole migration over a project's file set. It owns
//! project I/O (walking and reading files), file classification, the
//! `package.json` dependency plan, run diagnostics and progress reporting.
//!
//! # Overview
//!
//! - [`ProjectWalker`]: directory traversal respecting `.gitignore`
//! - [`SourceReader`]: where file contents come from ([`DiskReader`],
//!   [`MemoryReader`])
//! - [`ConversionExecutor`]: the staged run producing a
//!   [`ConversionResult`](nv_core::ConversionResult)
//! - [`DiagnosticsReporter`]: categorized info/warning/error entries plus
//!   step timings
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use nv_core::Config;
//! use nv_executor::ConversionExecutor;
//!
//! # async fn run() -> Result<(), nv_executor::WalkError> {
//! let executor = ConversionExecutor::from_disk(Utf8Path::new("./shop"), Config::default()).await?;
//! let result = executor
//!     .on_progress(|percent, message| eprintln!("[{percent:>5.1}%] {message}"))
//!     .execute()
//!     .await;
//! assert_eq!(result.success, result.errors.is_empty());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod analysis;
mod dependencies;
mod diagnostics;
mod error;
mod executor;
mod progress;
mod reader;
mod walker;

pub use analysis::{ProjectAnalysis, classify};
pub use dependencies::{
    FrameworkUsage, Replacement, apply_plan, default_plan, is_next_package, plan_for_manifest,
};
pub use diagnostics::DiagnosticsReporter;
pub use error::{ExecutionError, FileError, ReadError, WalkError};
pub use executor::{ConversionExecutor, ROUTER_MODULE};
pub use progress::{ProgressCallback, ProgressTracker, increments};
pub use reader::{DiskReader, MemoryReader, SourceReader};
pub use walker::ProjectWalker;
