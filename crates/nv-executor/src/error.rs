//! Error types for the nv-executor crate.
//!
//! # Error Recovery Strategy
//!
//! - Per-file [`ReadError`]s and recoverable [`FileError`]s: recorded
//!   against the file, the run continues with the next file.
//! - [`ReadError::RootMissing`] and transform failures not tied to one file:
//!   escape the stage as an [`ExecutionError`].
//! - [`ExecutionError`]: escapes a stage; [`execute`] records it as a
//!   `general` error and returns a failed result.
//! - [`WalkError`]: raised before a run starts, while collecting files.
//!
//! [`execute`]: crate::ConversionExecutor::execute

use camino::Utf8PathBuf;
use nv_rewriter::{RuleError, TransformError};

/// A file's content could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The underlying read failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File name as given to the reader.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The reader has no file by that name.
    #[error("file not found: {path}")]
    NotFound {
        /// File name as given to the reader.
        path: String,
    },

    /// The project root disappeared after the files were collected.
    #[error("project root {root} is no longer available (reading {path})")]
    RootMissing {
        /// File name as given to the reader.
        path: String,
        /// The root the reader was created for.
        root: Utf8PathBuf,
    },
}

impl ReadError {
    /// Creates a new [`ReadError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ReadError::NotFound`] error.
    #[inline]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a new [`ReadError::RootMissing`] error.
    #[inline]
    pub fn root_missing(path: impl Into<String>, root: impl Into<Utf8PathBuf>) -> Self {
        Self::RootMissing {
            path: path.into(),
            root: root.into(),
        }
    }

    /// The file name this error is about.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Io { path, .. } | Self::NotFound { path } | Self::RootMissing { path, .. } => {
                path
            }
        }
    }

    /// Returns `true` if only this file is affected; a missing root fails
    /// every read that follows.
    #[inline]
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        !matches!(self, Self::RootMissing { .. })
    }
}

/// A failure while processing one file.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// The content could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// A rewriting pass failed.
    #[error("{source}")]
    Transform {
        /// File being transformed.
        file: String,
        /// The underlying failure.
        #[source]
        source: TransformError,
    },

    /// `package.json` is not valid JSON.
    #[error("invalid manifest {file}: {source}")]
    Manifest {
        /// Manifest file name.
        file: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl FileError {
    /// Creates a new [`FileError::Transform`] error.
    #[inline]
    pub fn transform(file: impl Into<String>, source: TransformError) -> Self {
        Self::Transform {
            file: file.into(),
            source,
        }
    }

    /// Creates a new [`FileError::Manifest`] error.
    #[inline]
    pub fn manifest(file: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Manifest {
            file: file.into(),
            source,
        }
    }

    /// Returns `true` if the run can continue with the next file.
    ///
    /// Failures that are not tied to the file, such as a grammar that fails
    /// to load or a project root that is gone, would fail every file and are
    /// not recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Read(source) => source.is_per_file(),
            Self::Manifest { .. } => true,
            Self::Transform { source, .. } => source.is_per_file(),
        }
    }
}

/// An error that escaped a stage.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The rule registry could not be built.
    #[error(transparent)]
    Rules(#[from] RuleError),

    /// A file failure that affects every file.
    #[error(transparent)]
    File(#[from] FileError),
}

/// Failure collecting a project's files from disk.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// Directory traversal failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// The project root is missing or not a directory.
    #[error("invalid project root: {0}")]
    Root(Utf8PathBuf),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The blocking walk task did not complete.
    #[error("walk task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
