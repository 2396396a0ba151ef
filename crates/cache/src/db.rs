//! The SQLite file backing [`SqliteCache`](crate::SqliteCache).

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Pooled connections to the passage cache, migrated on open.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the cache file at `path`, creating it when missing.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            // Renders read while another one stores a freshly fetched passage.
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(2));
        Self::open(options, 4).await
    }

    /// A throwaway cache database, gone once the pool closes.
    ///
    /// Not test-only: other crates' tests build caches with it.
    pub async fn connect_in_memory() -> Result<Self> {
        // Every connection to ":memory:" is a separate database.
        Self::open(SqliteConnectOptions::new().filename(":memory:"), 1).await
    }

    async fn open(options: SqliteConnectOptions, connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(connections)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        MIGRATOR.run(&pool).await.or_raise(|| ErrorKind::Migration)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_memory_migrates() {
        let db = Database::connect_in_memory().await.unwrap();
        let tables: Vec<(String,)> = sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(db.pool())
            .await
            .unwrap();
        assert!(tables.iter().any(|(name,)| name == "passages"), "{tables:?}");
        db.close().await;
        assert!(db.pool().is_closed());
    }

    #[tokio::test]
    async fn test_reopening_file_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passages.db");
        Database::connect(&path).await.unwrap().close().await;
        let db = Database::connect(&path).await.unwrap();
        let mode: (String,) = sqlx::query_as("PRAGMA journal_mode").fetch_one(db.pool()).await.unwrap();
        assert_eq!(mode.0, "wal");
        db.close().await;
    }
}
