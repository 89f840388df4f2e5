//! Catalog entry queries.
//!
//! The free functions run on any `&mut SqliteConnection`, which covers both a
//! pooled connection and an open transaction (`&mut *tx`). Lookups issued
//! through a transaction see rows inserted earlier in the same transaction.

use crate::error::{DatabaseError, query_failed};
use crate::types::{Category, EntryId};
use crate::{Error, Result};
use sqlx::SqliteConnection;
use sqlx::pool::PoolConnection;
use sqlx::Sqlite;
use std::path::Path;

use super::{Database, EntryRow, NewEntry};

const ENTRY_COLUMNS: &str = "id, kind, category, path, display_name, artwork, artist, album, \
     source_url, description, parent_id, created_at";

/// Text form of a path as stored in the `path` column
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Insert a new entry and return its id
pub async fn insert_entry(conn: &mut SqliteConnection, entry: &NewEntry) -> Result<EntryId> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO entries (
            kind, category, path, display_name, artwork, artist, album,
            source_url, description, parent_id, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.kind)
    .bind(entry.category)
    .bind(path_key(&entry.path))
    .bind(&entry.display_name)
    .bind(&entry.artwork)
    .bind(&entry.artist)
    .bind(&entry.album)
    .bind(&entry.source_url)
    .bind(&entry.description)
    .bind(entry.parent_id)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| query_failed("Failed to insert entry", e))?;

    Ok(EntryId(result.last_insert_rowid()))
}

/// Find the entry stored for an exact path
pub async fn find_by_path(conn: &mut SqliteConnection, path: &Path) -> Result<Option<EntryRow>> {
    let sql = format!("SELECT {} FROM entries WHERE path = ?", ENTRY_COLUMNS);
    sqlx::query_as::<_, EntryRow>(&sql)
        .bind(path_key(path))
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to find entry by path", e))
}

/// Children of `parent` (or top-level entries when `None`) within a category, in insertion order
pub async fn find_children(
    conn: &mut SqliteConnection,
    parent: Option<EntryId>,
    category: Category,
) -> Result<Vec<EntryRow>> {
    let sql = format!(
        "SELECT {} FROM entries WHERE parent_id IS ? AND category = ? ORDER BY id",
        ENTRY_COLUMNS
    );
    sqlx::query_as::<_, EntryRow>(&sql)
        .bind(parent)
        .bind(category)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to list children", e))
}

/// Direct children of a directory regardless of category, in insertion order
pub async fn children_of(conn: &mut SqliteConnection, parent: EntryId) -> Result<Vec<EntryRow>> {
    let sql = format!(
        "SELECT {} FROM entries WHERE parent_id = ? ORDER BY id",
        ENTRY_COLUMNS
    );
    sqlx::query_as::<_, EntryRow>(&sql)
        .bind(parent)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to list children", e))
}

/// Get an entry by id
pub async fn get_entry(conn: &mut SqliteConnection, id: EntryId) -> Result<Option<EntryRow>> {
    let sql = format!("SELECT {} FROM entries WHERE id = ?", ENTRY_COLUMNS);
    sqlx::query_as::<_, EntryRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to get entry", e))
}

/// Delete an entry by id, returning whether a row was removed
///
/// Children are not touched; callers delete descendants explicitly.
pub async fn delete_entry(conn: &mut SqliteConnection, id: EntryId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM entries WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to delete entry", e))?;

    Ok(result.rows_affected() > 0)
}

/// Every entry in the catalog, in insertion order
pub async fn list_entries(conn: &mut SqliteConnection) -> Result<Vec<EntryRow>> {
    let sql = format!("SELECT {} FROM entries ORDER BY id", ENTRY_COLUMNS);
    sqlx::query_as::<_, EntryRow>(&sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to list entries", e))
}

/// Display names of a directory's children, in insertion order
pub async fn child_names(conn: &mut SqliteConnection, parent: EntryId) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT display_name FROM entries WHERE parent_id = ? AND display_name IS NOT NULL ORDER BY id",
    )
    .bind(parent)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| query_failed("Failed to list child names", e))
}

/// Find the directory entry subscribed to a feed URL
pub async fn find_directory_by_source_url(
    conn: &mut SqliteConnection,
    url: &str,
) -> Result<Option<EntryRow>> {
    let sql = format!(
        "SELECT {} FROM entries WHERE kind = 'dir' AND source_url = ? ORDER BY id LIMIT 1",
        ENTRY_COLUMNS
    );
    sqlx::query_as::<_, EntryRow>(&sql)
        .bind(url)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to find directory by source url", e))
}

/// Total number of entries
pub async fn count_entries(conn: &mut SqliteConnection) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM entries")
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to count entries", e))
}

impl Database {
    async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool.acquire().await.map_err(|e| {
            Error::Database(DatabaseError::ConnectionFailed(format!(
                "Failed to acquire connection: {}",
                e
            )))
        })
    }

    /// Insert a new entry
    pub async fn insert_entry(&self, entry: &NewEntry) -> Result<EntryId> {
        let mut conn = self.acquire().await?;
        insert_entry(&mut conn, entry).await
    }

    /// Find an entry by exact path
    pub async fn find_by_path(&self, path: &Path) -> Result<Option<EntryRow>> {
        let mut conn = self.acquire().await?;
        find_by_path(&mut conn, path).await
    }

    /// Children of a directory (or top-level entries) within a category
    pub async fn find_children(
        &self,
        parent: Option<EntryId>,
        category: Category,
    ) -> Result<Vec<EntryRow>> {
        let mut conn = self.acquire().await?;
        find_children(&mut conn, parent, category).await
    }

    /// Direct children of a directory regardless of category
    pub async fn children_of(&self, parent: EntryId) -> Result<Vec<EntryRow>> {
        let mut conn = self.acquire().await?;
        children_of(&mut conn, parent).await
    }

    /// Get an entry by ID
    pub async fn get_entry(&self, id: EntryId) -> Result<Option<EntryRow>> {
        let mut conn = self.acquire().await?;
        get_entry(&mut conn, id).await
    }

    /// Delete a single entry
    pub async fn delete_entry(&self, id: EntryId) -> Result<bool> {
        let mut conn = self.acquire().await?;
        delete_entry(&mut conn, id).await
    }

    /// List all entries
    pub async fn list_entries(&self) -> Result<Vec<EntryRow>> {
        let mut conn = self.acquire().await?;
        list_entries(&mut conn).await
    }

    /// Display names of a directory's children
    pub async fn child_names(&self, parent: EntryId) -> Result<Vec<String>> {
        let mut conn = self.acquire().await?;
        child_names(&mut conn, parent).await
    }

    /// Find the directory subscribed to a feed URL
    pub async fn find_directory_by_source_url(&self, url: &str) -> Result<Option<EntryRow>> {
        let mut conn = self.acquire().await?;
        find_directory_by_source_url(&mut conn, url).await
    }

    /// Count all entries
    pub async fn count_entries(&self) -> Result<i64> {
        let mut conn = self.acquire().await?;
        count_entries(&mut conn).await
    }
}
