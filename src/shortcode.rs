//! The `[bible]` shortcode.
//!
//! ```text
//! [bible verse="Gen 1:1-3; 2:4" version="KJV" type="quote"]
//! [bible verse="Ps 23" type="link" text="the shepherd psalm" show_version="false"]
//! ```

use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{Error, ErrorKind};

/// Citation rendered by a shortcode without a `verse` attribute.
pub const DEFAULT_VERSE: &str = "John 1:1";
pub const SHORTCODE_TAG: &str = "bible";

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*\[\s*(?P<tag>[A-Za-z][\w-]*)(?P<attrs>[^\]]*?)\s*/?\s*\]\s*$").unwrap()
});
static ATTRIBUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<key>[A-Za-z_][\w-]*)\s*=\s*(?:"(?P<double>[^"]*)"|'(?P<single>[^']*)'|(?P<bare>[^\s"'\]]+))"#)
        .unwrap()
});

/// How the shortcode is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShortcodeType {
    /// The passage text in quote blocks, with attribution.
    #[default]
    Quote,
    /// A link to the passage.
    Link,
}
impl From<&str> for ShortcodeType {
    /// `quote` selects [`ShortcodeType::Quote`]; every other value is a link.
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("quote") { Self::Quote } else { Self::Link }
    }
}

/// Attributes of one `[bible]` shortcode.
///
/// Attributes that are left out are resolved when rendering: the translation
/// from the reader's locale, and `show_version` from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcode {
    pub verse: String,
    pub version: Option<String>,
    pub kind: ShortcodeType,
    pub show_version: Option<bool>,
    /// Anchor text for links.
    pub text: Option<String>,
}
impl Default for Shortcode {
    fn default() -> Self {
        Self {
            verse: DEFAULT_VERSE.to_string(),
            version: None,
            kind: ShortcodeType::Quote,
            show_version: None,
            text: None,
        }
    }
}
impl Shortcode {
    pub fn quote(verse: impl Into<String>) -> Self {
        Self { verse: verse.into(), ..Self::default() }
    }

    pub fn link(verse: impl Into<String>) -> Self {
        Self { verse: verse.into(), kind: ShortcodeType::Link, ..Self::default() }
    }

    /// Applies one attribute. Unknown attributes are ignored, and empty
    /// values leave the default in place.
    pub fn set(&mut self, key: &str, value: &str) {
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "verse" if !value.is_empty() => self.verse = value.to_string(),
            "version" if !value.is_empty() => self.version = Some(value.to_string()),
            "type" if !value.is_empty() => self.kind = ShortcodeType::from(value),
            "show_version" if !value.is_empty() => self.show_version = Some(parse_flag(value)),
            "text" if !value.is_empty() => self.text = Some(value.to_string()),
            _ => {},
        }
    }
}
impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Shortcode {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut shortcode = Self::default();
        for (key, value) in iter {
            shortcode.set(key.as_ref(), value.as_ref());
        }
        shortcode
    }
}
impl FromStr for Shortcode {
    type Err = Error;

    /// Parses a whole `[bible ...]` tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(captures) = TAG_REGEX.captures(s).filter(|c| c["tag"].eq_ignore_ascii_case(SHORTCODE_TAG)) else {
            exn::bail!(ErrorKind::Shortcode(s.trim().to_string()));
        };
        let attributes = ATTRIBUTE_REGEX.captures_iter(&captures["attrs"]).filter_map(|attribute| {
            let value = attribute.name("double").or(attribute.name("single")).or(attribute.name("bare"))?;
            Some((attribute["key"].to_string(), value.as_str().to_string()))
        });
        Ok(attributes.collect())
    }
}

/// Shortcode flags are strings; these spellings mean "off".
fn parse_flag(value: &str) -> bool {
    !["false", "0", "no", "off"].iter().any(|off| value.eq_ignore_ascii_case(off))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let shortcode: Shortcode = "[bible]".parse().unwrap();
        assert_eq!(shortcode, Shortcode::default());
        assert_eq!(shortcode.verse, "John 1:1");
        assert_eq!(shortcode.kind, ShortcodeType::Quote);
        assert_eq!(shortcode.version, None);
        assert_eq!(shortcode.show_version, None);
    }

    #[test]
    fn test_all_attributes() {
        let shortcode: Shortcode =
            r#"[bible verse="Gen 1:1-3; 2:4" version='KJV' type=link show_version="false" text="In the beginning"]"#
                .parse()
                .unwrap();
        assert_eq!(shortcode.verse, "Gen 1:1-3; 2:4");
        assert_eq!(shortcode.version.as_deref(), Some("KJV"));
        assert_eq!(shortcode.kind, ShortcodeType::Link);
        assert_eq!(shortcode.show_version, Some(false));
        assert_eq!(shortcode.text.as_deref(), Some("In the beginning"));
    }

    #[rstest]
    #[case("quote", ShortcodeType::Quote)]
    #[case("QUOTE", ShortcodeType::Quote)]
    #[case("link", ShortcodeType::Link)]
    #[case("embed", ShortcodeType::Link)]
    fn test_type_attribute(#[case] value: &str, #[case] expected: ShortcodeType) {
        let shortcode: Shortcode = [("type", value)].into_iter().collect();
        assert_eq!(shortcode.kind, expected);
    }

    #[rstest]
    #[case("true", true)]
    #[case("1", true)]
    #[case("yes", true)]
    #[case("false", false)]
    #[case("0", false)]
    #[case("Off", false)]
    fn test_show_version_flag(#[case] value: &str, #[case] expected: bool) {
        let shortcode: Shortcode = [("show_version", value)].into_iter().collect();
        assert_eq!(shortcode.show_version, Some(expected));
    }

    #[test]
    fn test_empty_and_unknown_attributes_are_ignored() {
        let shortcode: Shortcode = r#"[bible verse="" colour="red" /]"#.parse().unwrap();
        assert_eq!(shortcode, Shortcode::default());
    }

    #[rstest]
    #[case("bible verse=\"John 1:1\"")]
    #[case("[quote verse=\"John 1:1\"]")]
    #[case("")]
    fn test_malformed(#[case] tag: &str) {
        let err = tag.parse::<Shortcode>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Shortcode(_)));
    }
}
