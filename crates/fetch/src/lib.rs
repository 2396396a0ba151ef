//! Remote passage lookup.
//!
//! One [`PassageSource::fetch`] call issues exactly one request for a whole
//! citation list. Nothing here retries, caches, or interprets the markup; the
//! document is handed back raw for extraction.

pub mod error;
mod http;
#[cfg(feature = "mock")]
mod mock;
mod url;

pub use crate::http::HttpSource;
#[cfg(feature = "mock")]
pub use crate::mock::StaticSource;
pub use crate::url::{DEFAULT_BASE_URL, encode, passage_url};
use crate::error::Result;
use async_trait::async_trait;
use pericope_reference::{CitationList, Translation};
use std::sync::Arc;

pub type SourceHandle = Arc<dyn PassageSource + Send + Sync>;

/// The unparsed markup returned by the remote source for one request.
///
/// Transient: it is only kept long enough to be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPassageDocument {
    /// The URL the document was requested from.
    pub url: String,
    pub html: String,
}
impl AsRef<str> for RawPassageDocument {
    fn as_ref(&self) -> &str {
        &self.html
    }
}

/// Somewhere passage documents can be looked up.
///
/// # Examples
///
/// ```
/// use pericope_fetch::{PassageSource, error::Result};
/// use pericope_reference::{CitationList, Translation};
///
/// async fn document_size(source: &dyn PassageSource) -> Result<usize> {
///     let citations = CitationList::parse("John 1:1").unwrap();
///     let translation = Translation::new("NIV").unwrap();
///     Ok(source.fetch(&citations, &translation).await?.html.len())
/// }
/// ```
#[async_trait]
pub trait PassageSource: Send + Sync {
    /// Human-readable source name, used in attributions and logs.
    fn name(&self) -> &str;

    /// The link a reader can follow to see the passage at the source.
    fn link(&self, search: &str, translation: &Translation) -> String;

    /// Retrieves the whole citation list in a single request.
    async fn fetch(&self, citations: &CitationList, translation: &Translation) -> Result<RawPassageDocument>;
}
