//! HTML presentation of passages and citation links.
//!
//! A [`Formatter`] turns a citation into a link to the passage lookup page,
//! or a [`SanitizedPassage`] into quote blocks followed by attribution lines.
//!
//! # Attribution
//!
//! The line after each quote block is rendered from an [upon] template. The
//! only variable is `link`, the citation link (already HTML, always showing
//! the translation). The default template is [`DEFAULT_ATTRIBUTION`].
//!
//! ```
//! use pericope_fetch::DEFAULT_BASE_URL;
//! use pericope_reference::Translation;
//! use pericope_render::{Formatter, LinkOptions};
//!
//! let formatter = Formatter::new(DEFAULT_BASE_URL, None).unwrap();
//! let niv = Translation::new("NIV").unwrap();
//! assert_eq!(
//!     formatter.link("John 1:1", &niv, &LinkOptions::default()),
//!     r#"<a href="https://www.biblegateway.com/passage/?search=John%201%3A1&version=NIV">John 1:1 (NIV)</a>"#,
//! );
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use pericope_extract::SanitizedPassage;
use pericope_fetch::passage_url;
use pericope_reference::{CitationList, Translation};
use tracing::instrument;
use upon::{Engine, Template};

pub const DEFAULT_ATTRIBUTION: &str =
    r#"<p class="attribution">&mdash; {{ link }} &bull; Extracted from BibleGateway.</p>"#;
/// Placed between per-citation quote blocks.
pub const BLOCK_SEPARATOR: &str = "<hr />";

/// How a citation link is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOptions {
    /// Suffix the visible text with ` (TRANSLATION)`.
    pub show_version: bool,
    /// Visible text replacing the citation.
    pub anchor_text: Option<String>,
}
impl Default for LinkOptions {
    fn default() -> Self {
        Self { show_version: true, anchor_text: None }
    }
}
impl LinkOptions {
    pub fn new(show_version: bool) -> Self {
        Self { show_version, anchor_text: None }
    }

    pub fn with_anchor_text(mut self, text: impl Into<Option<String>>) -> Self {
        self.anchor_text = text.into().filter(|t| !t.is_empty());
        self
    }
}

pub struct Formatter {
    base_url: String,
    engine: Engine<'static>,
    attribution: Template<'static>,
}
impl Formatter {
    /// Compiles the attribution template up front so that syntax errors
    /// surface at construction rather than on the first quote.
    pub fn new(base_url: impl Into<String>, attribution: Option<&str>) -> Result<Self> {
        let engine = Engine::new();
        let source = attribution.unwrap_or(DEFAULT_ATTRIBUTION).to_string();
        let attribution = engine.compile(source).or_raise(|| ErrorKind::Template)?;
        Ok(Self { base_url: base_url.into(), engine, attribution })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Renders `<a href="{lookup url}">{text}</a>` for a raw citation.
    pub fn link(&self, citation: &str, translation: &Translation, options: &LinkOptions) -> String {
        let text = match &options.anchor_text {
            Some(text) => escape(text),
            None if options.show_version => format!("{} ({})", escape(citation), escape(translation.as_str())),
            None => escape(citation),
        };
        format!(
            r#"<a href="{}">{text}</a>"#,
            passage_url(&self.base_url, citation, translation.as_str())
        )
    }

    /// Renders a passage as quote blocks with attribution.
    ///
    /// When the passage has one sub-fragment per sub-citation, every block is
    /// attributed to its own sub-citation, qualified with the book it
    /// inherits. Otherwise the fragments cannot be paired up, and a single
    /// block is attributed to the whole list.
    #[instrument(skip_all, fields(citations = citations.len(), fragments = passage.len(), translation = %translation))]
    pub fn quote(&self, passage: &SanitizedPassage, citations: &CitationList, translation: &Translation) -> Result<String> {
        if passage.len() == citations.len() {
            let blocks = passage
                .fragments()
                .iter()
                .zip(citations.iter())
                .map(|(fragment, citation)| {
                    let attribution = self.attribution(&citation.qualified(), translation)?;
                    Ok(format!("<blockquote>{fragment}</blockquote>{attribution}"))
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(blocks.join(BLOCK_SEPARATOR));
        }
        tracing::debug!("Fragments do not line up with citations; attributing the whole passage");
        Ok(format!(
            "<blockquote>{}</blockquote>{}",
            passage.html(),
            self.attribution(citations.raw(), translation)?
        ))
    }

    fn attribution(&self, citation: &str, translation: &Translation) -> Result<String> {
        let link = self.link(citation, translation, &LinkOptions::new(true));
        self.attribution
            .render(&self.engine, upon::value! { link: link })
            .to_string()
            .or_raise(|| ErrorKind::Template)
    }
}

/// Escapes text for use as HTML element content.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pericope_fetch::DEFAULT_BASE_URL;
    use rstest::rstest;

    fn formatter() -> Formatter {
        Formatter::new(DEFAULT_BASE_URL, None).unwrap()
    }

    fn translation(code: &str) -> Translation {
        Translation::new(code).unwrap()
    }

    fn passage(fragments: &[&str]) -> SanitizedPassage {
        fragments.iter().copied().collect()
    }

    #[rstest]
    #[case("John 1:1", "NIV")]
    #[case("Gen 1:1-3; 2:4", "KJV")]
    #[case("1 Cor 13:4,5", "NIVUK")]
    fn test_link_shows_citation_and_translation(#[case] citation: &str, #[case] code: &str) {
        let link = formatter().link(citation, &translation(code), &LinkOptions::new(true));
        assert!(link.contains(&format!(">{citation} ({code})</a>")), "{link}");
    }

    #[test]
    fn test_link_without_version() {
        let link = formatter().link("John 1:1", &translation("NIV"), &LinkOptions::new(false));
        assert_eq!(
            link,
            r#"<a href="https://www.biblegateway.com/passage/?search=John%201%3A1&version=NIV">John 1:1</a>"#
        );
    }

    #[test]
    fn test_link_anchor_text_replaces_citation() {
        let options = LinkOptions::new(true).with_anchor_text("in the <beginning>".to_string());
        let link = formatter().link("John 1:1", &translation("NIV"), &options);
        assert!(link.ends_with(">in the &lt;beginning&gt;</a>"), "{link}");
    }

    #[test]
    fn test_empty_anchor_text_is_ignored() {
        let options = LinkOptions::new(false).with_anchor_text(String::new());
        assert!(formatter().link("Ps 23", &translation("KJV"), &options).ends_with(">Ps 23</a>"));
    }

    #[test]
    fn test_quote_one_attribution_per_matching_fragment() {
        let citations = CitationList::parse("Gen 1:1; Gen 2:4").unwrap();
        let html = formatter()
            .quote(&passage(&["<p>one</p>", "<p>two</p>"]), &citations, &translation("NIV"))
            .unwrap();
        assert_eq!(html.matches("<a href=").count(), 2);
        assert_eq!(html.matches("<blockquote>").count(), 2);
        assert_eq!(html.matches(BLOCK_SEPARATOR).count(), 1);
        assert!(html.contains(">Gen 1:1 (NIV)</a>"));
        assert!(html.contains(">Gen 2:4 (NIV)</a>"));
    }

    #[test]
    fn test_quote_attribution_carries_inherited_book() {
        let citations = CitationList::parse("Gen 1:1-3; 2:4").unwrap();
        let html = formatter().quote(&passage(&["a", "b"]), &citations, &translation("KJV")).unwrap();
        assert!(html.contains(r#"search=Gen%202%3A4&version=KJV">Gen 2:4 (KJV)</a>"#), "{html}");
    }

    #[test]
    fn test_quote_single_attribution_when_counts_differ() {
        let citations = CitationList::parse("Gen 1:1; Gen 2:4").unwrap();
        let html = formatter().quote(&passage(&["<p>both</p>"]), &citations, &translation("NIV")).unwrap();
        assert_eq!(html.matches("<a href=").count(), 1);
        assert_eq!(html.matches("<blockquote>").count(), 1);
        assert!(html.contains(">Gen 1:1; Gen 2:4 (NIV)</a>"));
    }

    #[test]
    fn test_quote_of_empty_passage_is_an_empty_block() {
        let citations = CitationList::parse("Nowhere 99:99").unwrap();
        let html = formatter().quote(&SanitizedPassage::default(), &citations, &translation("NIV")).unwrap();
        assert!(html.starts_with("<blockquote></blockquote><p class=\"attribution\">"), "{html}");
    }

    #[test]
    fn test_default_attribution() {
        let citations = CitationList::parse("John 1:1").unwrap();
        let html = formatter().quote(&passage(&["<p>Word</p>"]), &citations, &translation("NIV")).unwrap();
        assert_eq!(
            html,
            concat!(
                "<blockquote><p>Word</p></blockquote>",
                r#"<p class="attribution">&mdash; <a href="https://www.biblegateway.com/passage/?search=John%201%3A1&version=NIV">John 1:1 (NIV)</a> &bull; Extracted from BibleGateway.</p>"#,
            )
        );
    }

    #[test]
    fn test_custom_attribution_template() {
        let formatter = Formatter::new("http://localhost", Some("<cite>{{ link }}</cite>")).unwrap();
        let citations = CitationList::parse("Ps 23").unwrap();
        let html = formatter.quote(&passage(&["x"]), &citations, &translation("KJV")).unwrap();
        assert_eq!(
            html,
            r#"<blockquote>x</blockquote><cite><a href="http://localhost/passage/?search=Ps%2023&version=KJV">Ps 23 (KJV)</a></cite>"#
        );
    }

    #[test]
    fn test_invalid_template() {
        let err = Formatter::new(DEFAULT_BASE_URL, Some("{{ link")).err().unwrap();
        assert!(matches!(&*err, ErrorKind::Template));
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("a & b", "a &amp; b")]
    #[case("<b>", "&lt;b&gt;")]
    #[case("\"q\" 'q'", "&quot;q&quot; &#39;q&#39;")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }
}
