//! Locating passage markup inside a BibleGateway passage page.

use memchr::memchr;
use pericope_reference::Translation;
use scraper::{ElementRef, Html};
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::models::ExtractedFragment;

#[derive(Debug)]
pub struct Extractor {
    document: Html,
}
impl Extractor {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    /// Parses a source document.
    ///
    /// The HTML parser recovers from nearly anything, so the only documents
    /// rejected here are ones with no markup in them at all.
    pub fn from_html(html: &str) -> Result<Self> {
        if memchr(b'<', html.as_bytes()).is_none() {
            exn::bail!(ErrorKind::MalformedMarkup(format!("no markup in {} byte document", html.len())));
        }
        Ok(Self::from_document(Html::parse_document(html)))
    }

    /// Pulls out the passage paragraphs for `translation`.
    ///
    /// A passage container is a `div` whose class attribute (whitespace
    /// collapsed) contains both `passage` and `version-<translation>`. Each
    /// container contributes its paragraph children as one sub-fragment, one
    /// paragraph per line, so their text stays apart once unwrapped. When a
    /// container has no paragraph children, the paragraphs one level further
    /// down are used instead, since the page layout differs between
    /// translations. Containers with no paragraphs at either level are skipped.
    #[instrument(skip(self, translation), fields(translation = %translation, fragments))]
    pub fn passages(&self, translation: &Translation) -> ExtractedFragment {
        let marker = format!("{}{}", consts::VERSION_MARKER_PREFIX, translation);
        let fragment: ExtractedFragment = self
            .document
            .select(&consts::CONTAINER_SELECTOR)
            .filter(|container| is_container(container, &marker))
            // A container nested in another container is already covered by its parent.
            .filter(|container| !container.ancestors().filter_map(ElementRef::wrap).any(|a| is_container(&a, &marker)))
            .map(|container| {
                paragraphs(container)
                    .iter()
                    .map(ElementRef::html)
                    .collect::<Vec<_>>()
                    .join(consts::PARAGRAPH_SEPARATOR)
            })
            .filter(|part| !part.is_empty())
            .collect();
        tracing::Span::current().record("fragments", fragment.len());
        if fragment.is_empty() {
            tracing::warn!("No passage found in source document");
        }
        fragment
    }
}

fn is_container(element: &ElementRef, marker: &str) -> bool {
    if element.value().name() != "div" {
        return false;
    }
    let Some(class) = element.value().attr("class") else {
        return false;
    };
    let class = class.split_whitespace().collect::<Vec<_>>().join(" ");
    class.contains(consts::PASSAGE_MARKER) && class.contains(marker)
}

fn is_paragraph(element: &ElementRef) -> bool {
    element.value().name() == "p"
}

fn paragraphs(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let direct: Vec<_> = container.children().filter_map(ElementRef::wrap).filter(is_paragraph).collect();
    if !direct.is_empty() {
        return direct;
    }
    container
        .children()
        .filter_map(ElementRef::wrap)
        .flat_map(|group| group.children().filter_map(ElementRef::wrap).filter(is_paragraph))
        .collect()
}

/// Extracts the passage fragments for `translation` from a source document.
///
/// # Examples
///
/// ```rust
/// use pericope_extract::extract;
/// use pericope_reference::Translation;
///
/// let html = r#"<div class="passage-text version-NIV"><p>In the beginning...</p></div>"#;
/// let niv = Translation::new("NIV").unwrap();
/// let fragment = extract(html, &niv).unwrap();
/// assert_eq!(fragment.parts(), ["<p>In the beginning...</p>"]);
/// ```
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn extract(html: &str, translation: &Translation) -> Result<ExtractedFragment> {
    Ok(Extractor::from_html(html)?.passages(translation))
}
