//! Citation parsing.
//!
//! The remote source is the final arbiter of what a valid reference is, so
//! parsing here never rejects a non-empty reference. The structured fields
//! (`book`, `ranges`) are best-effort; `raw` is what gets sent to the source.

use std::borrow::Cow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::consts;
use crate::error::{Error, ErrorKind, Result};

/// Separator between sub-citations in a single reference.
pub const CITATION_SEPARATOR: char = ';';

/// A chapter, optionally narrowed to one verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verse {
    pub chapter: u32,
    pub verse: Option<u32>,
}
impl Verse {
    pub fn chapter(chapter: u32) -> Self {
        Self { chapter, verse: None }
    }

    pub fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse: Some(verse) }
    }
}

/// An inclusive range of verses (or whole chapters).
///
/// A range without an `end` covers only its `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerseRange {
    pub start: Verse,
    pub end: Option<Verse>,
}
impl VerseRange {
    pub fn chapter(&self) -> u32 {
        self.start.chapter
    }
}

/// One sub-citation, e.g. `Gen 1:1-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Citation {
    /// Book name as written (or inherited from the previous sub-citation).
    pub book: String,
    /// Chapter/verse ranges; empty when the text doesn't look like `Book C:V`.
    pub ranges: Vec<VerseRange>,
    /// The sub-citation exactly as written (trimmed).
    pub raw: String,
}
impl Citation {
    /// Parses a single sub-citation. A citation that starts with a number and
    /// has no book name of its own borrows `inherited_book`.
    pub(crate) fn parse(raw: &str, inherited_book: Option<&str>) -> Self {
        let raw = raw.trim();
        let (book, ranges) = if let Some(captures) = consts::BOOK_AND_RANGES_REGEX.captures(raw) {
            (captures["book"].to_string(), parse_ranges(&captures["ranges"]))
        } else if let Some(captures) = consts::RANGES_ONLY_REGEX.captures(raw) {
            (inherited_book.unwrap_or_default().to_string(), parse_ranges(&captures["ranges"]))
        } else {
            (raw.to_string(), None)
        };
        Self {
            book,
            ranges: ranges.unwrap_or_default(),
            raw: raw.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The sub-citation as a reference that stands on its own: `2:4` written
    /// after `Gen 1:1` becomes `Gen 2:4`.
    pub fn qualified(&self) -> Cow<'_, str> {
        if self.book.is_empty() || self.raw.starts_with(&self.book) {
            Cow::Borrowed(&self.raw)
        } else {
            Cow::Owned(format!("{} {}", self.book, self.raw))
        }
    }
}
impl Display for Citation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.raw)
    }
}
impl AsRef<str> for Citation {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

/// Parses `1:1-3,5`, `13`, `3:4,5:6`, `1:1-2:3`.
///
/// A bare number following a chapter:verse point is a verse in that chapter,
/// otherwise it's a whole chapter. Returns `None` if any piece isn't numeric.
fn parse_ranges(text: &str) -> Option<Vec<VerseRange>> {
    let mut ranges = Vec::new();
    let mut context: Option<Verse> = None;
    for segment in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (start, end) = match segment.split_once(['-', '\u{2013}']) {
            Some((start, end)) => (start.trim(), Some(end.trim())),
            None => (segment, None),
        };
        let start = parse_point(start, context)?;
        let end = match end {
            Some(end) => Some(parse_point(end, Some(start))?),
            None => None,
        };
        context = Some(end.unwrap_or(start));
        ranges.push(VerseRange { start, end });
    }
    Some(ranges)
}

fn parse_point(text: &str, context: Option<Verse>) -> Option<Verse> {
    if let Some((chapter, verse)) = text.split_once(':') {
        return Some(Verse::new(chapter.trim().parse().ok()?, verse.trim().parse().ok()?));
    }
    let number = text.parse().ok()?;
    Some(match context {
        Some(Verse { chapter, verse: Some(_) }) => Verse::new(chapter, number),
        _ => Verse::chapter(number),
    })
}

/// An ordered list of sub-citations sharing one request, e.g. `Gen 1:1-3; 2:4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CitationList {
    raw: String,
    citations: Vec<Citation>,
}
impl CitationList {
    /// Splits a reference on `;` into its sub-citations.
    ///
    /// Only fails when there is nothing left to look up.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pericope_reference::CitationList;
    ///
    /// let list = CitationList::parse("Gen 1:1-3; 2:4").unwrap();
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(list.citations()[1].raw, "2:4");
    /// assert_eq!(list.citations()[1].book, "Gen");
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let raw = text.trim();
        let mut citations: Vec<Citation> = Vec::new();
        for piece in raw.split(CITATION_SEPARATOR).map(str::trim).filter(|s| !s.is_empty()) {
            let inherited = citations.last().map(|c| c.book.as_str());
            citations.push(Citation::parse(piece, inherited));
        }
        if citations.is_empty() {
            exn::bail!(ErrorKind::EmptyReference);
        }
        Ok(Self { raw: raw.to_string(), citations })
    }

    /// The whole reference as written; this is what the remote source is queried with.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Citation> {
        self.citations.iter()
    }
}
impl FromStr for CitationList {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}
impl From<Citation> for CitationList {
    fn from(citation: Citation) -> Self {
        Self {
            raw: citation.raw.clone(),
            citations: vec![citation],
        }
    }
}
impl Display for CitationList {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.raw)
    }
}
