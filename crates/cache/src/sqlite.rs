//! SQLite-backed passage cache.

use crate::error::{ErrorKind, Result};
use crate::{CacheKey, Database, ItemId, PassageCache};
use async_trait::async_trait;
use exn::ResultExt;
use pericope_extract::SanitizedPassage;
use sqlx::SqlitePool;
use time::UtcDateTime;
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct PassageRow {
    fragments: String,
}
impl TryFrom<PassageRow> for SanitizedPassage {
    type Error = crate::error::Error;
    fn try_from(row: PassageRow) -> std::result::Result<Self, Self::Error> {
        serde_json::from_str(&row.fragments).or_raise(|| ErrorKind::InvalidData("passage fragments"))
    }
}

/// Passage cache persisted in the SQLite cache database.
///
/// Survives restarts; entries only disappear when their item is purged.
#[derive(Debug, Clone)]
pub struct SqliteCache {
    pool: SqlitePool,
}
impl From<&Database> for SqliteCache {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl SqliteCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total number of cached passages across all items.
    pub async fn count(&self) -> Result<u64> {
        let row: (i64,) = sqlx::query_as(include_str!("../queries/count_passages.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(row.0).or_raise(|| ErrorKind::InvalidData("passage count"))
    }
}

#[async_trait]
impl PassageCache for SqliteCache {
    #[instrument(level = "debug", skip(self, item, key), fields(item = %item, key = %key))]
    async fn get(&self, item: &ItemId, key: &CacheKey) -> Result<Option<SanitizedPassage>> {
        let row: Option<PassageRow> = sqlx::query_as(include_str!("../queries/get_passage.sql"))
            .bind(item.as_str())
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(SanitizedPassage::try_from).transpose()
    }

    #[instrument(level = "debug", skip_all, fields(item = %item, key = %key, fragments = passage.len()))]
    async fn put(&self, item: &ItemId, key: &CacheKey, passage: &SanitizedPassage) -> Result<()> {
        let fragments = serde_json::to_string(passage).or_raise(|| ErrorKind::InvalidData("passage fragments"))?;
        sqlx::query(include_str!("../queries/put_passage.sql"))
            .bind(item.as_str())
            .bind(key.as_str())
            .bind(fragments)
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    #[instrument(skip(self, item), fields(item = %item))]
    async fn purge(&self, item: &ItemId) -> Result<u64> {
        let result = sqlx::query(include_str!("../queries/purge_item.sql"))
            .bind(item.as_str())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn cache() -> SqliteCache {
        let db = Database::connect_in_memory().await.unwrap();
        SqliteCache::from(&db)
    }

    fn passage(fragments: &[&str]) -> SanitizedPassage {
        fragments.iter().copied().collect()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = cache().await;
        let item = ItemId::from(1u64);
        let key = CacheKey::new("Gen 1:1-3; 2:4", "NIV");
        let value = passage(&["In the beginning", "This is the account"]);
        assert_eq!(cache.get(&item, &key).await.unwrap(), None);
        cache.put(&item, &key, &value).await.unwrap();
        assert_eq!(cache.get(&item, &key).await.unwrap(), Some(value));
    }

    #[tokio::test]
    async fn test_entries_are_per_item() {
        let cache = cache().await;
        let key = CacheKey::new("John 1:1", "NIV");
        cache.put(&ItemId::from(1u64), &key, &passage(&["one"])).await.unwrap();
        assert_eq!(cache.get(&ItemId::from(2u64), &key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = cache().await;
        let item = ItemId::from("post");
        let key = CacheKey::new("John 1:1", "NIV");
        cache.put(&item, &key, &passage(&["first"])).await.unwrap();
        cache.put(&item, &key, &passage(&["second"])).await.unwrap();
        assert_eq!(cache.get(&item, &key).await.unwrap(), Some(passage(&["second"])));
        assert_eq!(cache.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purge_only_touches_one_item() {
        let cache = cache().await;
        let (one, two) = (ItemId::from(1u64), ItemId::from(2u64));
        cache.put(&one, &CacheKey::new("John 1:1", "NIV"), &passage(&["a"])).await.unwrap();
        cache.put(&one, &CacheKey::new("John 1:2", "NIV"), &passage(&["b"])).await.unwrap();
        cache.put(&two, &CacheKey::new("John 1:1", "NIV"), &passage(&["c"])).await.unwrap();
        assert_eq!(cache.purge(&one).await.unwrap(), 2);
        assert_eq!(cache.count().await.unwrap(), 1);
        assert!(cache.get(&two, &CacheKey::new("John 1:1", "NIV")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passages.db");
        let item = ItemId::from(9u64);
        let key = CacheKey::new("Psalm 23", "KJV");
        let db = Database::connect(&path).await.unwrap();
        SqliteCache::from(&db).put(&item, &key, &passage(&["The LORD is my shepherd"])).await.unwrap();
        db.close().await;

        let db = Database::connect(&path).await.unwrap();
        let cached = SqliteCache::from(&db).get(&item, &key).await.unwrap();
        assert_eq!(cached, Some(passage(&["The LORD is my shepherd"])));
        db.close().await;
    }

    #[tokio::test]
    async fn test_corrupt_row_is_invalid_data() {
        let cache = cache().await;
        let key = CacheKey::new("John 1:1", "NIV");
        sqlx::query("INSERT INTO passages (item_id, cache_key, fragments, cached_at) VALUES ('1', ?, 'not json', 0)")
            .bind(key.as_str())
            .execute(&cache.pool)
            .await
            .unwrap();
        let err = cache.get(&ItemId::from("1"), &key).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData(_)));
    }
}
