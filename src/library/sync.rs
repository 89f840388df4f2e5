//! Full catalog ↔ filesystem reconciliation

use sqlx::SqliteConnection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::MediaLibrary;
use super::scanner::{self, DiskObject};
use crate::db::{NewEntry, entries};
use crate::error::{FilesystemError, Result, query_failed};
use crate::types::{Category, CategorySyncReport, EntryId, EntryKind, SyncReport};
use crate::utils::{file_display_name, file_stem_name};

impl MediaLibrary {
    /// Reconcile every configured category root with the catalog
    ///
    /// For each category an add pass creates entries for uncataloged objects
    /// (one transaction), then a removal pass deletes every entry, of any
    /// category, whose path no longer exists (a second transaction). A second
    /// run without disk changes adds and removes nothing.
    pub async fn full_sync(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for category in self.config.library.sync_categories.clone() {
            let added = self.add_new_objects(category).await?;
            let removed = self.remove_vanished_entries().await?;

            info!(category = %category, added, removed, "category synced");

            report.added += added;
            report.removed += removed;
            report.categories.push(CategorySyncReport {
                category: Some(category),
                added,
                removed,
            });
        }

        info!(
            added = report.added,
            removed = report.removed,
            "full sync complete"
        );
        Ok(report)
    }

    /// Add pass: catalog every object under the category root that is not yet known
    async fn add_new_objects(&self, category: Category) -> Result<usize> {
        let root = self.config.category_root(category);
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| FilesystemError::from_io(&root, e))?;

        let objects = scanner::walk(&root).await?;

        // Metadata extraction runs before the write transaction opens
        let mut candidates = Vec::new();
        for object in objects {
            if self.db.find_by_path(&object.path).await?.is_some() {
                continue;
            }
            candidates.push(self.describe_object(category, &object).await);
        }

        if candidates.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.begin().await?;
        let mut added = 0;
        for mut entry in candidates {
            // Re-check inside the transaction; parents come first, so their rows are visible
            if entries::find_by_path(&mut tx, &entry.path).await?.is_some() {
                continue;
            }
            entry.parent_id = resolve_parent(&mut tx, &root, &entry.path).await?;
            entries::insert_entry(&mut tx, &entry).await?;
            debug!(path = %entry.path.display(), kind = entry.kind.as_str(), "entry added");
            added += 1;
        }
        tx.commit()
            .await
            .map_err(|e| query_failed("Failed to commit sync additions", e))?;

        Ok(added)
    }

    /// Removal pass: delete every entry whose path is gone from disk
    async fn remove_vanished_entries(&self) -> Result<usize> {
        let mut tx = self.db.begin().await?;

        let rows = entries::list_entries(&mut tx).await?;
        let missing =
            scanner::vanished(rows.iter().map(|row| PathBuf::from(&row.path)).collect()).await?;

        let mut removed = 0;
        for row in rows.iter().filter(|row| missing.contains(row.fs_path())) {
            if entries::delete_entry(&mut tx, row.id).await? {
                debug!(entry_id = row.id.0, path = %row.path, "entry removed");
                removed += 1;
            }
        }

        tx.commit()
            .await
            .map_err(|e| query_failed("Failed to commit sync removals", e))?;

        Ok(removed)
    }

    /// Build the entry for a newly discovered object (parent left unset)
    async fn describe_object(&self, category: Category, object: &DiskObject) -> NewEntry {
        if object.is_dir {
            let mut entry = NewEntry::new(EntryKind::Directory, category, &object.path);
            entry.display_name = file_display_name(&object.path);
            return entry;
        }
        self.describe_file(category, &object.path).await
    }

    /// Build the entry for a file, enriched by the extractor
    ///
    /// Extraction failures degrade to a name-only entry.
    pub(super) async fn describe_file(&self, category: Category, path: &Path) -> NewEntry {
        let mut entry = NewEntry::new(EntryKind::File, category, path);
        entry.display_name = file_stem_name(path);

        match category {
            Category::Music => match self.extractor.extract_audio(path).await {
                Ok(meta) => {
                    if meta.title.is_some() {
                        entry.display_name = meta.title;
                    }
                    entry.artist = meta.artist;
                    entry.album = meta.album;
                    entry.artwork = meta.artwork;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "audio metadata unavailable, cataloging by name");
                }
            },
            Category::Photo => match self.extractor.extract_image(path).await {
                Ok(artwork) => entry.artwork = artwork,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "thumbnail unavailable, cataloging by name");
                }
            },
            Category::Podcast => {}
        }

        entry
    }
}

/// Parent entry for `path`: the directory entry at its filesystem parent, if any
///
/// Objects directly under the category root have no parent. A parent row that
/// is not a directory is ignored.
async fn resolve_parent(
    conn: &mut SqliteConnection,
    root: &Path,
    path: &Path,
) -> Result<Option<EntryId>> {
    let Some(parent) = path.parent() else {
        return Ok(None);
    };
    if parent == root {
        return Ok(None);
    }
    Ok(entries::find_by_path(conn, parent)
        .await?
        .filter(|row| row.is_directory())
        .map(|row| row.id))
}
