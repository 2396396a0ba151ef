use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

/// Marker every passage container carries in its class attribute.
pub(crate) const PASSAGE_MARKER: &str = "passage";
/// Prefix of the translation-specific container marker, e.g. `version-NIV`.
pub(crate) const VERSION_MARKER_PREFIX: &str = "version-";
/// Placed between the paragraphs of one container.
pub(crate) const PARAGRAPH_SEPARATOR: &str = "\n";

// Candidate passage containers; the class attribute is filtered in code.
selector!(CONTAINER_SELECTOR, "div[class]");
// Endnote text collected at the bottom of a passage.
selector!(FOOTNOTE_BLOCK_SELECTOR, "div.footnotes");
// Inline superscript links into the endnote block.
selector!(FOOTNOTE_MARKER_SELECTOR, "sup.footnote");
// Superscript verse numbers.
selector!(VERSE_NUMBER_SELECTOR, "sup.versenum");

/// Elements kept by the sanitizer; everything else is unwrapped.
pub(crate) const ALLOWED_TAGS: &[&str] = &["blockquote", "a", "br", "hr"];
/// Allowed elements that never have content or a closing tag.
pub(crate) const VOID_TAGS: &[&str] = &["br", "hr"];
/// The only attributes kept on allowed elements, per tag.
pub(crate) const ALLOWED_ATTRIBUTES: &[(&str, &str)] = &[("a", "href")];
/// URL schemes a kept link may use; scheme-less links are always kept.
pub(crate) const ALLOWED_SCHEMES: &[&str] = &["http", "https"];
