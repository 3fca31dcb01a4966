//! Core types, options, configuration, and errors for nv-migrate.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - [`ConversionOptions`] and the option-to-category gate
//! - Rule metadata ([`RuleCategory`], [`RuleComplexity`])
//! - Route records ([`SourceRoute`], [`RouteObject`])
//! - Pipeline results ([`TransformResult`], [`StructuralTransformResult`],
//!   [`ConversionResult`], [`ConversionStats`])
//! - Diagnostics snapshots ([`DiagnosticsReport`])
//! - Configuration ([`Config`]) and its error type ([`ConfigError`])
//! - Fx hash aliases ([`FxHashMap`], [`FxHashSet`])

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{Config, ExecutorConfig, RouteConfig, ScanConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
pub use types::{
    CategoryEntries, CompletedStep, ConversionOptions, ConversionResult, ConversionStats,
    ConvertedFile, DependencyAction, DependencyChange, DiagnosticCategory, DiagnosticsReport,
    ExecutionStage, FileKind, FrameworkModule, ImportInfo, ImportKind, RouteObject, RuleCategory,
    RuleComplexity, SourceLocation, SourceRoute, StructuralTransformResult, TransformResult,
};
