//! Database layer for media-catalog
//!
//! Handles SQLite persistence for the hierarchical catalog of media entries.
//!
//! ## Submodules
//!
//! - [`migrations`] - Database lifecycle, schema migrations
//! - [`entries`] - Entry queries, usable on the pool or inside an open transaction
//!
//! Every query in [`entries`] takes a `&mut SqliteConnection`, so the same
//! statement runs against a pooled connection or a transaction (`&mut *tx`).
//! [`Database`] wraps each one for callers that do not need atomicity.

use crate::types::{CatalogEntry, Category, EntryId, EntryKind};
use sqlx::{FromRow, sqlite::SqlitePool};
use std::path::{Path, PathBuf};

pub mod entries;
mod migrations;

/// New entry to be inserted into the catalog
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// File or directory
    pub kind: EntryKind,
    /// Media category (immutable once stored)
    pub category: Category,
    /// Absolute filesystem path (unique across the catalog)
    pub path: PathBuf,
    /// Display name
    pub display_name: Option<String>,
    /// Base64-encoded JPEG thumbnail
    pub artwork: Option<String>,
    /// Artist (music)
    pub artist: Option<String>,
    /// Album (music)
    pub album: Option<String>,
    /// Feed URL (show) or audio URL (episode)
    pub source_url: Option<String>,
    /// Show or episode description
    pub description: Option<String>,
    /// Containing directory entry
    pub parent_id: Option<EntryId>,
}

impl NewEntry {
    /// Bare entry with only the required columns set
    pub fn new(kind: EntryKind, category: Category, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            category,
            path: path.into(),
            display_name: None,
            artwork: None,
            artist: None,
            album: None,
            source_url: None,
            description: None,
            parent_id: None,
        }
    }

    /// Set the display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the parent directory entry
    pub fn with_parent(mut self, parent_id: Option<EntryId>) -> Self {
        self.parent_id = parent_id;
        self
    }
}

/// Entry record from database
#[derive(Debug, Clone, FromRow)]
pub struct EntryRow {
    /// Unique database ID
    pub id: EntryId,
    /// File or directory
    pub kind: EntryKind,
    /// Media category
    pub category: Category,
    /// Absolute filesystem path
    pub path: String,
    /// Display name
    pub display_name: Option<String>,
    /// Base64-encoded JPEG thumbnail
    pub artwork: Option<String>,
    /// Artist (music)
    pub artist: Option<String>,
    /// Album (music)
    pub album: Option<String>,
    /// Feed URL (show) or audio URL (episode)
    pub source_url: Option<String>,
    /// Show or episode description
    pub description: Option<String>,
    /// Containing directory entry
    pub parent_id: Option<EntryId>,
    /// Unix timestamp when the entry was created
    pub created_at: i64,
}

impl EntryRow {
    /// Path as a filesystem path
    pub fn fs_path(&self) -> &Path {
        Path::new(&self.path)
    }

    /// Whether this entry is a directory
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

impl From<EntryRow> for CatalogEntry {
    fn from(row: EntryRow) -> Self {
        use chrono::{TimeZone, Utc};

        CatalogEntry {
            id: row.id,
            kind: row.kind,
            category: row.category,
            path: PathBuf::from(row.path),
            display_name: row.display_name,
            artwork: row.artwork,
            artist: row.artist,
            album: row.album,
            source_url: row.source_url,
            description: row.description,
            parent_id: row.parent_id,
            created_at: Utc
                .timestamp_opt(row.created_at, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Database handle for media-catalog
#[derive(Debug)]
pub struct Database {
    pool: SqlitePool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
