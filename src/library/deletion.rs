//! Recursive two-phase deletion
//!
//! A deletion is planned first (the entry and all of its transitive
//! descendants, children before parents), then applied to the filesystem and
//! only then to the catalog. Filesystem removals are not reversible: when one
//! fails the catalog is left untouched and the outcome lists what was already
//! removed from disk.

use std::collections::HashSet;
use std::path::PathBuf;
use tokio::task::spawn_blocking;
use tracing::{info, warn};

use super::MediaLibrary;
use crate::db::{EntryRow, entries};
use crate::error::{Error, FilesystemError, Result, query_failed};
use crate::types::{DeleteOutcome, EntryId};

/// One planned removal
#[derive(Debug, Clone)]
struct PlannedRemoval {
    id: EntryId,
    path: PathBuf,
    is_dir: bool,
}

impl From<&EntryRow> for PlannedRemoval {
    fn from(row: &EntryRow) -> Self {
        Self {
            id: row.id,
            path: row.fs_path().to_path_buf(),
            is_dir: row.is_directory(),
        }
    }
}

/// Filesystem phase failure, carrying the paths removed before it
struct PartialRemoval {
    error: Error,
    removed: Vec<PathBuf>,
}

impl MediaLibrary {
    /// Delete an entry, its descendants and their filesystem objects
    ///
    /// Never returns `Err`: failures are reported through
    /// [`DeleteOutcome::success`] and [`DeleteOutcome::error`].
    pub async fn delete_entry(&self, id: EntryId) -> DeleteOutcome {
        let plan = match self.plan_deletion(id).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(entry_id = id.0, error = %e, "deletion could not be planned");
                return DeleteOutcome::failed(e, Vec::new());
            }
        };

        let removed_paths = match remove_from_disk(plan.clone()).await {
            Ok(removed) => removed,
            Err(PartialRemoval { error, removed }) => {
                warn!(
                    entry_id = id.0,
                    error = %error,
                    removed = removed.len(),
                    "filesystem removal failed, catalog left unchanged"
                );
                return DeleteOutcome::failed(error, removed);
            }
        };

        if let Err(e) = self.remove_from_catalog(&plan).await {
            warn!(
                entry_id = id.0,
                error = %e,
                removed = removed_paths.len(),
                "catalog removal failed after filesystem removal"
            );
            return DeleteOutcome::failed(e, removed_paths);
        }

        info!(
            entry_id = id.0,
            entries = plan.len(),
            removed = removed_paths.len(),
            "entry deleted"
        );
        DeleteOutcome {
            success: true,
            error: None,
            removed_paths,
        }
    }

    /// Post-order plan: every descendant before its parent, the entry last
    async fn plan_deletion(&self, id: EntryId) -> Result<Vec<PlannedRemoval>> {
        let root = self
            .db
            .get_entry(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("entry {}", id)))?;

        let mut plan = Vec::new();
        let mut visited = HashSet::from([root.id]);
        // (entry, children already expanded)
        let mut stack = vec![(PlannedRemoval::from(&root), false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded || !node.is_dir {
                plan.push(node);
                continue;
            }

            let children = self.db.children_of(node.id).await?;
            stack.push((node, true));
            // Reverse so the first child is handled first; files sort ahead of subdirectories
            let (files, dirs): (Vec<_>, Vec<_>) =
                children.iter().partition(|child| !child.is_directory());
            for child in dirs.into_iter().rev().chain(files.into_iter().rev()) {
                if visited.insert(child.id) {
                    stack.push((PlannedRemoval::from(child), false));
                }
            }
        }

        Ok(plan)
    }

    async fn remove_from_catalog(&self, plan: &[PlannedRemoval]) -> Result<()> {
        let mut tx = self.db.begin().await?;
        for step in plan {
            entries::delete_entry(&mut tx, step.id).await?;
        }
        tx.commit()
            .await
            .map_err(|e| query_failed("Failed to commit deletion", e))
    }
}

/// Apply the plan to disk in order, stopping at the first failure
async fn remove_from_disk(
    plan: Vec<PlannedRemoval>,
) -> std::result::Result<Vec<PathBuf>, PartialRemoval> {
    let joined = spawn_blocking(move || {
        let mut removed = Vec::new();
        for step in plan {
            let result = if step.is_dir {
                std::fs::remove_dir(&step.path)
            } else {
                std::fs::remove_file(&step.path)
            };
            match result {
                Ok(()) => removed.push(step.path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(PartialRemoval {
                        error: FilesystemError::from_io(step.path, e).into(),
                        removed,
                    });
                }
            }
        }
        Ok(removed)
    })
    .await;

    match joined {
        Ok(result) => result,
        Err(e) => Err(PartialRemoval {
            error: Error::Other(format!("filesystem removal panicked: {}", e)),
            removed: Vec::new(),
        }),
    }
}
