//! Process-local passage cache.

use crate::error::Result;
use crate::{CacheKey, ItemId, PassageCache};
use async_trait::async_trait;
use pericope_extract::SanitizedPassage;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory passage cache.
///
/// Entries live in a `HashMap` behind a [`RwLock`], so all trait methods
/// operate on `&self` and the cache can be shared between concurrent renders.
/// Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<(ItemId, CacheKey), SanitizedPassage>>,
}
impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl PassageCache for MemoryCache {
    async fn get(&self, item: &ItemId, key: &CacheKey) -> Result<Option<SanitizedPassage>> {
        Ok(self.entries.read().await.get(&(item.clone(), key.clone())).cloned())
    }

    async fn put(&self, item: &ItemId, key: &CacheKey, passage: &SanitizedPassage) -> Result<()> {
        self.entries.write().await.insert((item.clone(), key.clone()), passage.clone());
        Ok(())
    }

    async fn purge(&self, item: &ItemId) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(owner, _), _| owner != item);
        Ok((before - entries.len()) as u64)
    }
}
