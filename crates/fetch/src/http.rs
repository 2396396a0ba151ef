//! HTTP passage source.

use crate::error::{ErrorKind, Result};
use crate::{PassageSource, RawPassageDocument, passage_url};
use async_trait::async_trait;
use exn::ResultExt;
use pericope_reference::{CitationList, Translation};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::instrument;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches passages from the BibleGateway passage lookup endpoint.
///
/// A hung endpoint stalls the call for as long as the transport allows; pass a
/// timeout to [`with_options`](Self::with_options) if that matters.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}
impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), None, None)
    }

    pub fn with_options(
        base_url: impl Into<String>,
        user_agent: Option<&str>,
        timeout: impl Into<Option<Duration>>,
    ) -> Result<Self> {
        Self::build(base_url.into(), user_agent, timeout.into())
    }

    fn build(base_url: String, user_agent: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let parsed = Url::parse(&base_url).or_raise(|| ErrorKind::InvalidUrl(base_url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            exn::bail!(ErrorKind::InvalidUrl(base_url));
        }
        let mut builder = Client::builder().user_agent(user_agent.unwrap_or(USER_AGENT));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().or_raise(|| ErrorKind::Client)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PassageSource for HttpSource {
    fn name(&self) -> &str {
        "BibleGateway"
    }

    fn link(&self, search: &str, translation: &Translation) -> String {
        passage_url(&self.base_url, search, translation.as_str())
    }

    #[instrument(skip(self), fields(citations = citations.len(), status))]
    async fn fetch(&self, citations: &CitationList, translation: &Translation) -> Result<RawPassageDocument> {
        let url = self.link(citations.raw(), translation);
        let response = self.client.get(&url).send().await.or_raise(|| ErrorKind::UnavailableSource(url.clone()))?;
        tracing::Span::current().record("status", response.status().as_u16());
        let response = response.error_for_status().or_raise(|| ErrorKind::UnavailableSource(url.clone()))?;
        let html = response.text().await.or_raise(|| ErrorKind::UnavailableSource(url.clone()))?;
        tracing::debug!(html_size = html.len(), "Passage document fetched");
        Ok(RawPassageDocument { url, html })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("not a url")]
    #[case("ftp://example.com")]
    #[case("")]
    fn test_rejects_unusable_base_url(#[case] base_url: &str) {
        let err = HttpSource::new(base_url).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidUrl(_)));
    }

    #[test]
    fn test_link_uses_base_url() {
        let source = HttpSource::new("https://www.biblegateway.com").unwrap();
        let translation = Translation::new("NIV").unwrap();
        assert_eq!(
            source.link("John 1:1", &translation),
            "https://www.biblegateway.com/passage/?search=John%201%3A1&version=NIV"
        );
    }

    #[tokio::test]
    async fn test_unreachable_source_is_unavailable() {
        // Port 9 (discard) on localhost is closed on any sane test machine.
        let source = HttpSource::with_options("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
        let citations = CitationList::parse("John 1:1").unwrap();
        let translation = Translation::new("NIV").unwrap();
        let err = source.fetch(&citations, &translation).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnavailableSource(_)));
        assert!(err.is_retryable());
    }
}
