//! Finding citations embedded in prose.

use std::ops::Range;

use tracing::instrument;

use crate::citation::Citation;
use crate::consts;
use crate::translation::Translation;

/// A citation found in prose, and the byte span it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoLink {
    /// Byte range in the scanned text covering the citation and, when present,
    /// its translation code.
    pub span: Range<usize>,
    pub citation: Citation,
    pub translation: Translation,
    /// `true` when the translation was written next to the citation rather
    /// than falling back to the default.
    pub explicit: bool,
}

/// Scans prose for citation-shaped text, left to right, without overlaps.
///
/// A word written directly after the citation counts as its translation only
/// when it is at least two characters of upper-case letters and digits
/// (`NIV`, `NASB1995`). Anything else, including a lone trailing character
/// such as `.`, stays outside the span and the citation uses `default`.
///
/// # Examples
///
/// ```rust
/// use pericope_reference::{Translation, scan};
///
/// let niv = Translation::new("NIV").unwrap();
/// let found = scan("See Romans 12:2 KJV for details", &niv);
/// assert_eq!(found[0].citation.raw, "Romans 12:2");
/// assert_eq!(found[0].translation.as_str(), "KJV");
/// ```
#[instrument(level = "trace", skip(prose), fields(prose_size = prose.len()))]
pub fn scan(prose: &str, default: &Translation) -> Vec<AutoLink> {
    consts::AUTOLINK_REGEX
        .captures_iter(prose)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let citation = Citation::parse(captures.name("citation")?.as_str(), None);
            let explicit = captures.name("translation").and_then(|m| Translation::new(m.as_str()).ok());
            Some(AutoLink {
                span: whole.range(),
                citation,
                explicit: explicit.is_some(),
                translation: explicit.unwrap_or_else(|| default.clone()),
            })
        })
        .collect()
}

/// Rewrites every citation found by [`scan`] with the output of `link`.
///
/// Text between citations is copied through untouched.
pub fn autolink(prose: &str, default: &Translation, mut link: impl FnMut(&AutoLink) -> String) -> String {
    let found = scan(prose, default);
    if found.is_empty() {
        return prose.to_string();
    }
    let mut output = String::with_capacity(prose.len() + found.len() * 64);
    let mut cursor = 0;
    for autolink in &found {
        output.push_str(&prose[cursor..autolink.span.start]);
        output.push_str(&link(autolink));
        cursor = autolink.span.end;
    }
    output.push_str(&prose[cursor..]);
    tracing::debug!(links = found.len(), "Citations linked in prose");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn nivuk() -> Translation {
        Translation::new("NIVUK").unwrap()
    }

    #[test]
    fn test_explicit_translation_is_part_of_span() {
        let prose = "See Romans 12:2 NIV for details";
        let found = scan(prose, &nivuk());
        assert_eq!(found.len(), 1);
        assert_eq!(&prose[found[0].span.clone()], "Romans 12:2 NIV");
        assert_eq!(found[0].citation.raw, "Romans 12:2");
        assert_eq!(found[0].translation.as_str(), "NIV");
        assert!(found[0].explicit);
    }

    #[test]
    fn test_trailing_punctuation_is_excluded() {
        let prose = "See Romans 12:2.";
        let found = scan(prose, &nivuk());
        assert_eq!(found.len(), 1);
        assert_eq!(&prose[found[0].span.clone()], "Romans 12:2");
        assert_eq!(found[0].translation, nivuk());
        assert!(!found[0].explicit);
    }

    #[rstest]
    #[case("Read 1 Corinthians 13:4-7 today", "1 Corinthians 13:4-7")]
    #[case("Read 1Corinthians 13:4 today", "1Corinthians 13:4")]
    #[case("as in Romans 12:1,2 and", "Romans 12:1,2")]
    #[case("compare Genesis 3:4,5:6 here", "Genesis 3:4,5:6")]
    #[case("compare Genesis 1:1-2:3 here", "Genesis 1:1-2:3")]
    #[case("John 3:16 I think", "John 3:16")]
    #[case("John 3:16 for everyone", "John 3:16")]
    fn test_citation_spans(#[case] prose: &str, #[case] expected: &str) {
        let found = scan(prose, &nivuk());
        assert_eq!(found.len(), 1);
        assert_eq!(&prose[found[0].span.clone()], expected);
    }

    #[rstest]
    #[case("Nothing to see here.")]
    #[case("Meet me at 10:30 on Friday")]
    #[case("Chapter 12 was long")]
    fn test_no_citations(#[case] prose: &str) {
        assert!(scan(prose, &nivuk()).is_empty());
    }

    #[test]
    fn test_multiple_citations_left_to_right() {
        let prose = "John 1:1 KJV and then Mark 2:3, then Luke 4:5 ESV.";
        let found = scan(prose, &nivuk());
        let pairs: Vec<_> = found.iter().map(|a| (a.citation.raw.as_str(), a.translation.as_str())).collect();
        assert_eq!(pairs, [("John 1:1", "KJV"), ("Mark 2:3", "NIVUK"), ("Luke 4:5", "ESV")]);
    }

    #[test]
    fn test_autolink_preserves_surrounding_text() {
        let prose = "See Romans 12:2. Also John 1:1 NIV!";
        let linked = autolink(prose, &nivuk(), |a| format!("[{}|{}]", a.citation, a.translation));
        assert_eq!(linked, "See [Romans 12:2|NIVUK]. Also [John 1:1|NIV]!");
    }

    #[test]
    fn test_autolink_without_matches_is_identity() {
        let prose = "No references at all.";
        assert_eq!(autolink(prose, &nivuk(), |_| unreachable!()), prose);
    }
}
