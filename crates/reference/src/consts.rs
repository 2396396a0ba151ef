use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// A single chapter or chapter:verse point, e.g. `12` or `12:3`.
const POINT: &str = r"\d+(?::\d+)?";
/// Range separators; the source site accepts both hyphens and en-dashes.
const DASH: &str = "[-\u{2013}]";

// "Book 1:2-3,4" with an optional ordinal ("1 Corinthians") and multi-word names ("Song of Songs").
regex!(
    BOOK_AND_RANGES_REGEX,
    r"^(?P<book>(?:[1-3]\s*)?\p{L}[\p{L}.]*(?:\s+\p{L}[\p{L}.]*)*)\s+(?P<ranges>\d.*)$"
);
// A sub-citation without a book name, e.g. the "2:4" in "Gen 1:1-3; 2:4".
regex!(RANGES_ONLY_REGEX, r"^(?P<ranges>\d.*)$");
regex!(
    AUTOLINK_REGEX,
    format!(
        r"(?P<citation>(?:\b[1-3]\s?|\b)[A-Z][a-z]+\s+\d+:\d+(?:{dash}{point})?(?:,\s?{point}(?:{dash}{point})?)*)(?:\s+(?P<translation>[A-Z][A-Z0-9]+)\b)?",
        dash = DASH,
        point = POINT,
    )
    .as_str()
);
