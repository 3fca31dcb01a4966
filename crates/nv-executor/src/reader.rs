//! File content sources.
//!
//! The executor only knows file names; a [`SourceReader`] turns a name into
//! text. [`DiskReader`] reads below a project root, [`MemoryReader`] serves
//! an in-memory file set.

use std::future::Future;

use camino::{Utf8Path, Utf8PathBuf};
use nv_core::FxHashMap;

use crate::error::ReadError;

/// Reads the content of a file by name.
///
/// Every read is a suspension point; the handle behind it is released when
/// the returned future completes.
pub trait SourceReader {
    /// Reads `name` as UTF-8 text.
    fn read_to_string(&self, name: &str) -> impl Future<Output = Result<String, ReadError>> + Send;
}

/// Reads files relative to a project root with `tokio::fs`.
///
/// A failed read reports [`ReadError::RootMissing`] when the root itself is
/// gone.
#[derive(Debug, Clone)]
pub struct DiskReader {
    root: Utf8PathBuf,
}

impl DiskReader {
    /// Creates a reader for files below `root`.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the project root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl SourceReader for DiskReader {
    fn read_to_string(&self, name: &str) -> impl Future<Output = Result<String, ReadError>> + Send {
        let root = self.root.clone();
        let path = self.root.join(name);
        let name = name.to_owned();
        async move {
            let source = match tokio::fs::read_to_string(&path).await {
                Ok(text) => return Ok(text),
                Err(source) => source,
            };
            if tokio::fs::metadata(&root).await.is_ok_and(|m| m.is_dir()) {
                Err(ReadError::io(name, source))
            } else {
                Err(ReadError::root_missing(name, root))
            }
        }
    }
}

/// An in-memory file set.
///
/// # Examples
///
/// ```
/// use nv_executor::{MemoryReader, SourceReader};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), nv_executor::ReadError> {
/// let reader = MemoryReader::from_iter([("pages/index.tsx", "export default () => null;")]);
/// let text = reader.read_to_string("pages/index.tsx").await?;
/// assert!(text.starts_with("export default"));
/// assert!(reader.read_to_string("missing.tsx").await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: FxHashMap<String, String>,
}

impl MemoryReader {
    /// Creates an empty reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }

    /// Number of files held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no file is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<N: Into<String>, C: Into<String>> FromIterator<(N, C)> for MemoryReader {
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        let mut reader = Self::new();
        for (name, content) in iter {
            reader.insert(name, content);
        }
        reader
    }
}

impl SourceReader for MemoryReader {
    fn read_to_string(&self, name: &str) -> impl Future<Output = Result<String, ReadError>> + Send {
        let result = self
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| ReadError::not_found(name));
        async move { result }
    }
}

impl<R: SourceReader + Sync> SourceReader for &R {
    fn read_to_string(&self, name: &str) -> impl Future<Output = Result<String, ReadError>> + Send {
        (**self).read_to_string(name)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_disk_reader_reads_relative_names() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::create_dir_all(dir.path().join("pages")).expect("mkdir");
        std::fs::write(dir.path().join("pages/index.tsx"), "export default 1;").expect("write");

        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        let reader = DiskReader::new(root);

        let text = reader.read_to_string("pages/index.tsx").await.expect("read");
        assert_eq!(text, "export default 1;");

        let err = reader.read_to_string("pages/missing.tsx").await.expect_err("missing file");
        assert_eq!(err.path(), "pages/missing.tsx");
        assert!(err.is_per_file());
    }

    #[tokio::test]
    async fn test_disk_reader_detects_removed_root() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("a.ts"), "1").expect("write");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        let reader = DiskReader::new(root.clone());
        dir.close().expect("remove root");

        let err = reader.read_to_string("a.ts").await.expect_err("root removed");
        assert!(matches!(err, ReadError::RootMissing { root: ref gone, .. } if *gone == root));
        assert!(!err.is_per_file());
    }

    #[tokio::test]
    async fn test_memory_reader() {
        let mut reader = MemoryReader::new();
        assert!(reader.is_empty());
        reader.insert("a.ts", "1");
        reader.insert("a.ts", "2");
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.read_to_string("a.ts").await.expect("read"), "2");

        let err = reader.read_to_string("b.ts").await.expect_err("not held");
        assert!(matches!(err, ReadError::NotFound { .. }));
    }

    async fn read_with<R: SourceReader>(reader: R, name: &str) -> Result<String, ReadError> {
        reader.read_to_string(name).await
    }

    #[tokio::test]
    async fn test_reader_by_reference() {
        let reader = MemoryReader::from_iter([("x.js", "x")]);
        assert_eq!(read_with(&reader, "x.js").await.expect("read"), "x");
        assert_eq!(reader.len(), 1);
    }
}
