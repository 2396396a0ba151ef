//! Per-content-item passage cache.
//!
//! Sanitized passages are remembered under `(item, key)`, where the key is a
//! hash of the citation text and translation code. Entries never expire and
//! are never invalidated: the value for a key only depends on what the remote
//! source returned, so they live until their content item is purged.
//!
//! Two stores are provided:
//! - [`MemoryCache`]: process-local, gone on restart.
//! - [`SqliteCache`]: persisted in the SQLite cache [`Database`].

mod db;
pub mod error;
mod key;
mod memory;
mod sqlite;

pub use crate::db::Database;
pub use crate::key::{CacheKey, ItemId};
pub use crate::memory::MemoryCache;
pub use crate::sqlite::SqliteCache;
use crate::error::Result;
use async_trait::async_trait;
use pericope_extract::SanitizedPassage;
use std::sync::Arc;

pub type CacheHandle = Arc<dyn PassageCache + Send + Sync>;

/// Storage for sanitized passages, keyed per content item.
///
/// Writers are not synchronized against each other; when two renders of the
/// same item race to fill the same key, the last write wins.
#[async_trait]
pub trait PassageCache: Send + Sync {
    async fn get(&self, item: &ItemId, key: &CacheKey) -> Result<Option<SanitizedPassage>>;

    async fn put(&self, item: &ItemId, key: &CacheKey, passage: &SanitizedPassage) -> Result<()>;

    /// Removes every entry owned by `item`, returning how many were removed.
    async fn purge(&self, item: &ItemId) -> Result<u64>;
}
