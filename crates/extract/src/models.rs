//! Passage fragments before and after sanitization.

/// Passage markup pulled out of a source document, one sub-fragment per
/// passage container, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFragment {
    parts: Vec<String>,
}
impl ExtractedFragment {
    pub fn new(parts: Vec<String>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
impl<S: Into<String>> FromIterator<S> for ExtractedFragment {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A passage ready for display.
///
/// Sub-fragments stay separate so attribution can still be given per
/// sub-citation; [`html`](Self::html) is the passage as one string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SanitizedPassage {
    fragments: Vec<String>,
}
impl SanitizedPassage {
    pub fn new(fragments: Vec<String>) -> Self {
        Self { fragments }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// `true` when the source had nothing matching the request.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn html(&self) -> String {
        self.fragments.concat()
    }
}
impl<S: Into<String>> FromIterator<S> for SanitizedPassage {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_concatenates_fragments() {
        let passage: SanitizedPassage = ["In the beginning", " was the Word"].into_iter().collect();
        assert_eq!(passage.len(), 2);
        assert_eq!(passage.html(), "In the beginning was the Word");
    }

    #[test]
    fn test_default_is_empty() {
        assert!(SanitizedPassage::default().is_empty());
        assert!(ExtractedFragment::default().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_as_plain_list() {
        let passage = SanitizedPassage::new(vec!["<br>one".to_string(), "two".to_string()]);
        let json = serde_json::to_string(&passage).unwrap();
        assert_eq!(json, r#"["<br>one","two"]"#);
        assert_eq!(serde_json::from_str::<SanitizedPassage>(&json).unwrap(), passage);
    }
}
