//! Passage lookup URLs.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except the RFC 3986 unreserved characters gets encoded, so
/// `John 1:1` becomes `John%201%3A1`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// The site hosting the passage lookup endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.biblegateway.com";

/// Percent-encodes a single query parameter value.
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Builds the passage lookup URL for a reference and translation code.
///
/// # Examples
///
/// ```rust
/// use pericope_fetch::passage_url;
///
/// assert_eq!(
///     passage_url("https://www.biblegateway.com", "John 1:1", "NIV"),
///     "https://www.biblegateway.com/passage/?search=John%201%3A1&version=NIV",
/// );
/// ```
pub fn passage_url(base_url: &str, search: &str, translation: &str) -> String {
    format!(
        "{}/passage/?search={}&version={}",
        base_url.trim_end_matches('/'),
        encode(search),
        encode(translation)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("John 1:1", "John%201%3A1")]
    #[case("Gen 1:1-3; 2:4", "Gen%201%3A1-3%3B%202%3A4")]
    #[case("1 Cor 13:4,5", "1%20Cor%2013%3A4%2C5")]
    #[case("Gen 1:1\u{2013}3", "Gen%201%3A1%E2%80%933")]
    fn test_encode(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(encode(raw), expected);
    }

    #[test]
    fn test_trailing_slash_on_base_is_ignored() {
        assert_eq!(
            passage_url("http://localhost:8080/", "Ps 23", "KJV"),
            "http://localhost:8080/passage/?search=Ps%2023&version=KJV"
        );
    }
}
