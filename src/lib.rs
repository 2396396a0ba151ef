//! Scripture passages for web content.
//!
//! [`Pericope`] ties the pipeline together: a citation is parsed, looked up
//! in the per-item cache, fetched from the passage source on a miss, then
//! extracted, sanitized and formatted as HTML. It also turns citations
//! written in prose into links, and renders `[bible]` [`Shortcode`]s.

pub mod error;
mod shortcode;

pub use crate::shortcode::{DEFAULT_VERSE, SHORTCODE_TAG, Shortcode, ShortcodeType};
pub use pericope_cache::{CacheHandle, CacheKey, ItemId, MemoryCache, PassageCache, SqliteCache};
pub use pericope_config::Config;
pub use pericope_extract::SanitizedPassage;
pub use pericope_fetch::{HttpSource, PassageSource, SourceHandle};
pub use pericope_reference::{CitationList, Translation};
pub use pericope_render::{Formatter, LinkOptions};

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use pericope_cache::Database;
use std::sync::Arc;
use tracing::instrument;

pub struct Pericope {
    config: Config,
    source: SourceHandle,
    cache: CacheHandle,
    formatter: Formatter,
}
impl Pericope {
    pub fn new(config: Config, source: SourceHandle, cache: CacheHandle) -> Result<Self> {
        let formatter = Formatter::new(config.source.base_url.as_str(), config.render.attribution.as_deref())
            .or_raise(|| ErrorKind::Config)?;
        Ok(Self { config, source, cache, formatter })
    }

    /// Builds the HTTP source and cache described by `config`.
    ///
    /// With `in_memory`, or when the platform has no cache directory, passages
    /// are only cached for the lifetime of the process.
    #[instrument(skip(config))]
    pub async fn from_config(config: Config, in_memory: bool) -> Result<Self> {
        let source = HttpSource::with_options(
            config.source.base_url.as_str(),
            config.source.user_agent.as_deref(),
            config.source.timeout(),
        )
        .or_raise(|| ErrorKind::Config)?;
        let cache: CacheHandle = match config.cache.path() {
            Some(path) if !in_memory => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Cache)?;
                }
                tracing::debug!(path = %path.display(), "Using SQLite passage cache");
                let db = Database::connect(&path).await.or_raise(|| ErrorKind::Cache)?;
                Arc::new(SqliteCache::from(&db))
            },
            Some(_) => Arc::new(MemoryCache::new()),
            None => {
                tracing::warn!("No cache directory available; passages will only be cached in memory");
                Arc::new(MemoryCache::new())
            },
        };
        Self::new(config, Arc::new(source), cache)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The translation to use: `version` when given, otherwise the one
    /// configured for `locale`.
    pub fn translation(&self, version: Option<&str>, locale: Option<&str>) -> Result<Translation> {
        let code = version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.config.translation_for(locale));
        Translation::new(code).or_raise(|| ErrorKind::Reference)
    }

    /// The sanitized passage for a citation list, served from the cache of
    /// `item` when possible.
    ///
    /// A passage the source does not have comes back empty and is not cached,
    /// so a later render can pick it up once it appears.
    #[instrument(skip(self, citations, translation), fields(item = %item, citations = %citations, translation = %translation))]
    pub async fn passage(
        &self,
        item: &ItemId,
        citations: &CitationList,
        translation: &Translation,
    ) -> Result<SanitizedPassage> {
        let key = CacheKey::new(citations.raw(), translation.as_str());
        if let Some(passage) = self.cache.get(item, &key).await.or_raise(|| ErrorKind::Cache)? {
            tracing::debug!(key = %key, "Passage cache hit");
            return Ok(passage);
        }
        tracing::debug!(key = %key, source = self.source.name(), "Passage cache miss");
        let document = self.source.fetch(citations, translation).await.or_raise(|| ErrorKind::Source)?;
        let passage = pericope_extract::passage(&document.html, translation).or_raise(|| ErrorKind::Markup)?;
        // Unlike a fetched passage, a miss is not stored: an entry for it would
        // keep serving nothing until the item is purged.
        if passage.is_empty() {
            tracing::warn!(url = %document.url, "Source has no passage for citation; not caching");
        } else {
            self.cache.put(item, &key, &passage).await.or_raise(|| ErrorKind::Cache)?;
        }
        Ok(passage)
    }

    /// Renders the passage text for `verse` as quote blocks with attribution.
    pub async fn quote(&self, item: &ItemId, verse: &str, translation: &Translation) -> Result<String> {
        let citations = CitationList::parse(verse).or_raise(|| ErrorKind::Reference)?;
        let passage = self.passage(item, &citations, translation).await?;
        self.formatter.quote(&passage, &citations, translation).or_raise(|| ErrorKind::Render)
    }

    /// Renders a link to `verse`. Never touches the source or the cache.
    pub fn link(&self, verse: &str, translation: &Translation, options: &LinkOptions) -> Result<String> {
        let citations = CitationList::parse(verse).or_raise(|| ErrorKind::Reference)?;
        Ok(self.formatter.link(citations.raw(), translation, options))
    }

    /// Renders a `[bible]` shortcode found in the content of `item`.
    #[instrument(skip(self, shortcode), fields(item = %item, verse = %shortcode.verse, kind = ?shortcode.kind))]
    pub async fn shortcode(&self, item: &ItemId, shortcode: &Shortcode, locale: Option<&str>) -> Result<String> {
        let translation = self.translation(shortcode.version.as_deref(), locale)?;
        match shortcode.kind {
            ShortcodeType::Quote => self.quote(item, &shortcode.verse, &translation).await,
            ShortcodeType::Link => {
                let show_version = shortcode.show_version.unwrap_or(self.config.render.show_version);
                let options = LinkOptions::new(show_version).with_anchor_text(shortcode.text.clone());
                self.link(&shortcode.verse, &translation, &options)
            },
        }
    }

    /// Turns every citation written in `prose` into a link.
    ///
    /// Citations without a translation code next to them link to the
    /// translation configured for `locale`.
    #[instrument(skip(self, prose), fields(prose_size = prose.len()))]
    pub fn autolink(&self, prose: &str, locale: Option<&str>) -> Result<String> {
        let default = self.translation(None, locale)?;
        let options = LinkOptions::new(self.config.render.show_version);
        Ok(pericope_reference::autolink(prose, &default, |found| {
            self.formatter.link(found.citation.as_str(), &found.translation, &options)
        }))
    }

    /// Forgets every passage cached for `item`.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn purge(&self, item: &ItemId) -> Result<u64> {
        let removed = self.cache.purge(item).await.or_raise(|| ErrorKind::Cache)?;
        tracing::info!(removed, "Purged cached passages");
        Ok(removed)
    }
}
