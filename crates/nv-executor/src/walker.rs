//! Project file discovery on disk.
//!
//! [`ProjectWalker`] uses the `ignore` crate, so `.gitignore` and `.ignore`
//! patterns and hidden files are honoured. Names come back relative to the
//! project root with `/` separators, sorted, which is the form the executor
//! and the route converter expect.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use nv_core::ScanConfig;
use tracing::debug;

use crate::error::WalkError;

/// Collects the files of a project directory.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use nv_core::ScanConfig;
/// use nv_executor::ProjectWalker;
///
/// let walker = ProjectWalker::new(Utf8Path::new("./my-app"), &ScanConfig::default())?;
/// for name in walker.collect()? {
///     tracing::info!(%name, "found");
/// }
/// # Ok::<(), nv_executor::WalkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProjectWalker {
    root: Utf8PathBuf,
    skip_dirs: Vec<String>,
    follow_links: bool,
}

impl ProjectWalker {
    /// Creates a walker for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::Root`] if `root` is not an existing directory.
    pub fn new(root: &Utf8Path, config: &ScanConfig) -> Result<Self, WalkError> {
        if !root.is_dir() {
            return Err(WalkError::Root(root.to_owned()));
        }
        Ok(Self {
            root: root.to_owned(),
            skip_dirs: config.skip_dirs.clone(),
            follow_links: config.follow_links,
        })
    }

    /// Returns the project root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Walks the tree and returns every file's relative name, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::Walk`] if traversal fails and
    /// [`WalkError::NonUtf8Path`] for a name that is not UTF-8.
    pub fn collect(&self) -> Result<Vec<String>, WalkError> {
        let skip_dirs = self.skip_dirs.clone();
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(true)
            .follow_links(self.follow_links)
            .require_git(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| skip_dirs.iter().any(|skip| skip == name)))
            })
            .build();

        let mut names = Vec::new();
        for result in walker {
            let entry = result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            let utf8 =
                Utf8Path::from_path(path).ok_or_else(|| WalkError::NonUtf8Path(path.to_owned()))?;
            let relative = utf8.strip_prefix(&self.root).unwrap_or(utf8);
            names.push(relative_name(relative));
        }
        names.sort_unstable();

        debug!(root = %self.root, files = names.len(), "project walked");
        Ok(names)
    }

    /// Runs [`collect`](Self::collect) on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Same as [`collect`](Self::collect), plus [`WalkError::Join`] if the
    /// blocking task panics or is cancelled.
    pub async fn collect_async(self) -> Result<Vec<String>, WalkError> {
        tokio::task::spawn_blocking(move || self.collect()).await?
    }
}

/// Joins path components with `/` regardless of platform.
fn relative_name(path: &Utf8Path) -> String {
    path.components()
        .map(|component| component.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn project() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        for (name, content) in [
            ("package.json", "{}"),
            ("pages/index.tsx", ""),
            ("pages/admin/_layout.tsx", ""),
            ("node_modules/next/index.js", ""),
            ("dist/bundle.js", ""),
            ("generated/skip.ts", ""),
        ] {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("mkdir");
            }
            fs::write(&path, content).expect("write");
        }
        fs::write(root.join(".gitignore"), "generated/\n").expect("write gitignore");
        (dir, root)
    }

    #[test]
    fn test_collect_sorted_relative_names() {
        let (_dir, root) = project();
        let names = ProjectWalker::new(&root, &ScanConfig::default())
            .expect("walker")
            .collect()
            .expect("walk");
        assert_eq!(
            names,
            ["package.json", "pages/admin/_layout.tsx", "pages/index.tsx"]
        );
    }

    #[test]
    fn test_missing_root() {
        let err = ProjectWalker::new(Utf8Path::new("/definitely/not/here"), &ScanConfig::default())
            .expect_err("missing root");
        assert!(matches!(err, WalkError::Root(_)));
    }

    #[tokio::test]
    async fn test_collect_async_matches_sync() {
        let (_dir, root) = project();
        let walker = ProjectWalker::new(&root, &ScanConfig::default()).expect("walker");
        let sync = walker.collect().expect("walk");
        let async_names = walker.collect_async().await.expect("walk");
        assert_eq!(sync, async_names);
    }

    #[test]
    fn test_relative_name_uses_forward_slashes() {
        assert_eq!(relative_name(Utf8Path::new("pages/posts/[id].tsx")), "pages/posts/[id].tsx");
    }
}
