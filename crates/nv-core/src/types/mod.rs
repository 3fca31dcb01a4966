//! Domain types for nv-migrate.
//!
//! # Module Organization
//!
//! - [`options`](ConversionOptions) - conversion feature flags
//! - [`rule`](RuleCategory) - rule categories and complexity
//! - [`route`](SourceRoute) - source routes and target route objects
//! - [`result`](ConversionResult) - transform and conversion results
//! - [`diagnostics`](DiagnosticsReport) - diagnostics snapshots
//! - [`stage`](ExecutionStage) - executor state machine
//! - [`file`](FileKind) - file roles inside a project
//! - [`import`](ImportInfo) - import statements and framework modules
//! - [`location`](SourceLocation) - positions in source text
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use nv_core::{ConversionOptions, RuleCategory, SourceRoute};
//! ```

mod diagnostics;
mod file;
mod import;
mod location;
mod options;
mod result;
mod route;
mod rule;
mod stage;

pub use diagnostics::{CategoryEntries, CompletedStep, DiagnosticCategory, DiagnosticsReport};
pub use file::FileKind;
pub use import::{FrameworkModule, ImportInfo, ImportKind};
pub use location::SourceLocation;
pub use options::ConversionOptions;
pub use result::{
    ConversionResult, ConversionStats, ConvertedFile, DependencyAction, DependencyChange,
    StructuralTransformResult, TransformResult,
};
pub use route::{RouteObject, SourceRoute};
pub use rule::{RuleCategory, RuleComplexity};
pub use stage::ExecutionStage;
