//! Database lifecycle and schema migrations.

use crate::error::{DatabaseError, query_failed};
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use sqlx::{Sqlite, SqliteConnection, Transaction};
use std::path::Path;
use std::str::FromStr;

use super::Database;

/// Secondary indexes on `entries`, created by migration v1
const ENTRY_INDEXES: [(&str, &str); 3] = [
    (
        "parent",
        "CREATE INDEX idx_entries_parent ON entries(parent_id)",
    ),
    (
        "category",
        "CREATE INDEX idx_entries_category ON entries(category, parent_id)",
    ),
    (
        "source_url",
        "CREATE INDEX idx_entries_source_url ON entries(source_url)",
    ),
];

fn connection_failed(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Database(DatabaseError::ConnectionFailed(format!("{}: {}", context, e)))
}

fn migration_failed(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Database(DatabaseError::MigrationFailed(format!("{}: {}", context, e)))
}

impl Database {
    /// Open (or create) the catalog database at `path` and bring its schema up to date
    ///
    /// Missing parent directories are created. Connections use WAL journaling.
    pub async fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| connection_failed("Failed to create database directory", e))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .map_err(|e| connection_failed("Failed to parse database path", e))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| connection_failed("Failed to connect to database", e))?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| connection_failed("Failed to acquire connection", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut *conn)
        .await
        .map_err(|e| migration_failed("Failed to create schema_version table", e))?;

        let current_version: i64 =
            sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(version) FROM schema_version")
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| query_failed("Failed to query schema version", e))?
                .unwrap_or(0);

        if current_version < 1 {
            Self::begin_migration(&mut conn, 1).await?;
            let step = Self::create_entries_schema(&mut conn).await;
            Self::finish_migration(&mut conn, 1, step).await?;
        }

        Ok(())
    }

    /// Open the transaction a migration step runs in
    async fn begin_migration(conn: &mut SqliteConnection, version: i64) -> Result<()> {
        tracing::info!(version, "Applying database migration");
        sqlx::query("BEGIN")
            .execute(&mut *conn)
            .await
            .map_err(|e| migration_failed("Failed to begin migration", e))?;
        Ok(())
    }

    /// Record `version` and commit, or roll back when the step failed
    ///
    /// A failed step leaves the previous schema intact.
    async fn finish_migration(
        conn: &mut SqliteConnection,
        version: i64,
        step: Result<()>,
    ) -> Result<()> {
        let recorded = match step {
            Ok(()) => sqlx::query("INSERT INTO schema_version (version, applied_at) VALUES (?, ?)")
                .bind(version)
                .bind(chrono::Utc::now().timestamp())
                .execute(&mut *conn)
                .await
                .map(|_| ())
                .map_err(|e| migration_failed("Failed to record migration", e)),
            Err(e) => Err(e),
        };

        if let Err(e) = recorded {
            let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
            return Err(e);
        }

        sqlx::query("COMMIT")
            .execute(&mut *conn)
            .await
            .map_err(|e| migration_failed(&format!("Failed to commit migration v{}", version), e))?;

        tracing::info!(version, "Database migration complete");
        Ok(())
    }

    /// v1: the entries table and its lookup indexes
    async fn create_entries_schema(conn: &mut SqliteConnection) -> Result<()> {
        // AUTOINCREMENT keeps ids from ever being reused after deletion
        sqlx::query(
            r#"
            CREATE TABLE entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL CHECK (kind IN ('file', 'dir')),
                category TEXT NOT NULL CHECK (category IN ('music', 'photo', 'podcast')),
                path TEXT NOT NULL UNIQUE,
                display_name TEXT,
                artwork TEXT,
                artist TEXT,
                album TEXT,
                source_url TEXT,
                description TEXT,
                parent_id INTEGER,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut *conn)
        .await
        .map_err(|e| migration_failed("Failed to create entries table", e))?;

        for (name, ddl) in ENTRY_INDEXES {
            sqlx::query(ddl)
                .execute(&mut *conn)
                .await
                .map_err(|e| migration_failed(&format!("Failed to create {} index", name), e))?;
        }

        Ok(())
    }

    /// Begin a transaction for multi-statement catalog work
    ///
    /// Dropping the transaction without calling `commit` rolls it back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| query_failed("Failed to begin transaction", e))
    }

    /// Close the database connection
    ///
    /// Waits for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
