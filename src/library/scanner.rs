//! Filesystem enumeration for reconciliation
//!
//! Directory walks run on the blocking pool; callers get plain snapshots.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, FilesystemError, Result};

/// One filesystem object found under a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiskObject {
    pub(crate) path: PathBuf,
    pub(crate) is_dir: bool,
}

fn walk_error(root: &Path, e: walkdir::Error) -> Error {
    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
    let source = match e.into_io_error() {
        Some(io) => io,
        None => std::io::Error::other("filesystem loop detected"),
    };
    Error::Filesystem(FilesystemError::from_io(path, source))
}

/// Catalog keys are UTF-8 text, so objects whose path is not valid UTF-8
/// are left out of every walk (directories with their whole subtree).
fn has_utf8_path(entry: &DirEntry) -> bool {
    if entry.path().to_str().is_some() {
        return true;
    }
    warn!(path = %entry.path().display(), "Skipping object with non-UTF-8 path");
    false
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(f)
        .await
        .map_err(|e| Error::Other(format!("filesystem scan panicked: {}", e)))?
}

/// Every object below `root` (the root itself excluded), parents before children
///
/// Siblings are visited in file-name order so repeated walks are stable.
pub(crate) async fn walk(root: &Path) -> Result<Vec<DiskObject>> {
    let root = root.to_path_buf();
    blocking(move || {
        let mut objects = Vec::new();
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(has_utf8_path);
        for entry in walker {
            let entry = entry.map_err(|e| walk_error(&root, e))?;
            objects.push(DiskObject {
                is_dir: entry.file_type().is_dir(),
                path: entry.into_path(),
            });
        }
        Ok(objects)
    })
    .await
}

/// Every regular file in the recursive tree below `dir`
pub(crate) async fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = dir.to_path_buf();
    blocking(move || {
        let mut files = Vec::new();
        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(has_utf8_path);
        for entry in walker {
            let entry = entry.map_err(|e| walk_error(&dir, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    })
    .await
}

/// The subset of `paths` that no longer exist on disk
pub(crate) async fn vanished(paths: Vec<PathBuf>) -> Result<HashSet<PathBuf>> {
    blocking(move || {
        Ok(paths
            .into_iter()
            .filter(|path| std::fs::symlink_metadata(path).is_err())
            .collect())
    })
    .await
}
