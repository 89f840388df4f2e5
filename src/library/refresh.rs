//! Scoped refresh of a single catalog directory

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::MediaLibrary;
use super::scanner;
use crate::db::{EntryRow, entries};
use crate::error::{Error, FilesystemError, Result, query_failed};
use crate::types::{Category, EntryId, EntryKind, RefreshOutcome};

impl MediaLibrary {
    /// Refresh one directory entry against its source
    ///
    /// Podcast shows are compared against their feed (nothing is added, the
    /// caller gets the candidates). Music and photo directories are rescanned
    /// on disk: vanished child files are removed and new files anywhere below
    /// the directory are attached directly to it.
    pub async fn refresh_directory(&self, id: EntryId) -> Result<RefreshOutcome> {
        let dir = self
            .db
            .get_entry(id)
            .await?
            .filter(EntryRow::is_directory)
            .ok_or_else(|| Error::NotFound(format!("directory {}", id)))?;

        match dir.category {
            Category::Podcast => self.refresh_show(&dir).await,
            Category::Music | Category::Photo => self.rescan_directory(&dir).await,
        }
    }

    async fn refresh_show(&self, dir: &EntryRow) -> Result<RefreshOutcome> {
        let feed_url = dir.source_url.clone().ok_or_else(|| {
            Error::UnsupportedCategory(format!(
                "podcast directory {} has no feed to refresh from",
                dir.id
            ))
        })?;

        let episodes = self.feeds.list_episodes(&feed_url).await?;
        let existing = self.db.child_names(dir.id).await?;
        let known: HashSet<&str> = existing.iter().map(String::as_str).collect();

        let candidates: Vec<_> = episodes
            .into_iter()
            .filter(|episode| !known.contains(episode.title.as_str()))
            .collect();

        info!(
            entry_id = dir.id.0,
            new_episodes = candidates.len(),
            "show refreshed"
        );

        if candidates.is_empty() {
            return Ok(RefreshOutcome::NoNewEpisodes);
        }
        Ok(RefreshOutcome::NewEpisodes {
            feed_url,
            candidates,
            existing,
        })
    }

    async fn rescan_directory(&self, dir: &EntryRow) -> Result<RefreshOutcome> {
        let root = dir.fs_path().to_path_buf();
        let is_dir = tokio::fs::metadata(&root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(FilesystemError::Missing { path: root }.into());
        }

        let on_disk = scanner::collect_files(&root).await?;
        let on_disk_set: HashSet<&Path> = on_disk.iter().map(PathBuf::as_path).collect();

        // Extraction for new files happens before the transaction opens
        let mut new_files = Vec::new();
        for path in &on_disk {
            if self.db.find_by_path(path).await?.is_none() {
                let entry = self.describe_file(dir.category, path).await;
                new_files.push(entry.with_parent(Some(dir.id)));
            }
        }

        let mut tx = self.db.begin().await?;

        let mut removed = 0;
        for child in entries::children_of(&mut tx, dir.id).await? {
            if child.kind != EntryKind::File || on_disk_set.contains(child.fs_path()) {
                continue;
            }
            if entries::delete_entry(&mut tx, child.id).await? {
                debug!(entry_id = child.id.0, path = %child.path, "stale child removed");
                removed += 1;
            }
        }

        let mut added = 0;
        for entry in new_files {
            if entries::find_by_path(&mut tx, &entry.path).await?.is_some() {
                continue;
            }
            entries::insert_entry(&mut tx, &entry).await?;
            debug!(path = %entry.path.display(), "child added");
            added += 1;
        }

        tx.commit()
            .await
            .map_err(|e| query_failed("Failed to commit refresh", e))?;

        info!(entry_id = dir.id.0, added, removed, "directory rescanned");
        Ok(RefreshOutcome::Rescanned { added, removed })
    }
}
