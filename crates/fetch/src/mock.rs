//! In-memory passage source for testing.

use crate::error::{ErrorKind, Result};
use crate::{DEFAULT_BASE_URL, PassageSource, RawPassageDocument, passage_url};
use async_trait::async_trait;
use pericope_reference::{CitationList, Translation};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory passage source for testing.
///
/// Serves canned documents keyed by `(reference, translation)`, with an
/// optional fallback document for everything else, and counts how many
/// times it was asked. Requests with no document fail as
/// [`ErrorKind::UnavailableSource`], just like an unreachable site.
///
/// # Examples
///
/// ```
/// use pericope_fetch::{PassageSource, StaticSource};
/// use pericope_reference::{CitationList, Translation};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = StaticSource::with_documents([(("John 1:1", "NIV"), "<html>...</html>")]);
/// let citations = CitationList::parse("John 1:1").unwrap();
/// let niv = Translation::new("NIV").unwrap();
/// assert!(source.fetch(&citations, &niv).await.is_ok());
/// assert_eq!(source.calls(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct StaticSource {
    documents: HashMap<(String, String), String>,
    fallback: Option<String>,
    calls: AtomicUsize,
}
impl StaticSource {
    /// A source answering every request with the same document.
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            fallback: Some(html.into()),
            ..Self::default()
        }
    }

    pub fn with_documents<R, T, H>(documents: impl IntoIterator<Item = ((R, T), H)>) -> Self
    where
        R: Into<String>,
        T: Into<String>,
        H: Into<String>,
    {
        let documents = documents
            .into_iter()
            .map(|((reference, translation), html)| ((reference.into(), translation.into()), html.into()))
            .collect();
        Self { documents, ..Self::default() }
    }

    /// A source that is never reachable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Number of fetches attempted so far, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PassageSource for StaticSource {
    fn name(&self) -> &str {
        "BibleGateway"
    }

    fn link(&self, search: &str, translation: &Translation) -> String {
        passage_url(DEFAULT_BASE_URL, search, translation.as_str())
    }

    async fn fetch(&self, citations: &CitationList, translation: &Translation) -> Result<RawPassageDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let url = self.link(citations.raw(), translation);
        let key = (citations.raw().to_string(), translation.to_string());
        match self.documents.get(&key).or(self.fallback.as_ref()) {
            Some(html) => Ok(RawPassageDocument { url, html: html.clone() }),
            None => exn::bail!(ErrorKind::UnavailableSource(url)),
        }
    }
}
