//! Cleaning extracted passage markup for display.
//!
//! Footnote blocks, inline footnote markers and verse numbers are removed
//! together with everything inside them. What remains is restricted to a
//! small set of structural tags: any other element is unwrapped, keeping its
//! text. The tree is walked once and re-serialized, so removals never depend
//! on how the markup happened to be formatted.

use scraper::{ElementRef, Html, Node};
use scraper::node::Element;
use tracing::instrument;

use crate::consts;
use crate::models::{ExtractedFragment, SanitizedPassage};

/// Sanitizes every sub-fragment of an extracted passage, keeping their order.
///
/// Idempotent on its own output.
///
/// # Examples
///
/// ```rust
/// use pericope_extract::{ExtractedFragment, sanitize};
///
/// let fragment = ExtractedFragment::new(vec![
///     r#"<p><sup class="versenum">16 </sup>For God so loved the world<sup class="footnote">[a]</sup></p>"#.to_string(),
/// ]);
/// assert_eq!(sanitize(&fragment).html(), "For God so loved the world");
/// ```
#[instrument(skip_all, fields(fragments = fragment.len()))]
pub fn sanitize(fragment: &ExtractedFragment) -> SanitizedPassage {
    fragment.parts().iter().map(|part| sanitize_html(part)).collect()
}

/// Sanitizes a single piece of markup.
pub fn sanitize_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut output = String::with_capacity(html.len());
    write_children(fragment.root_element(), &mut output);
    output
}

fn is_removed(element: &ElementRef) -> bool {
    consts::FOOTNOTE_BLOCK_SELECTOR.matches(element)
        || consts::FOOTNOTE_MARKER_SELECTOR.matches(element)
        || consts::VERSE_NUMBER_SELECTOR.matches(element)
}

fn write_children(parent: ElementRef, output: &mut String) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => escape_text(text, output),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    write_element(element, output);
                }
            },
            // Comments, doctypes and processing instructions never survive.
            _ => {},
        }
    }
}

fn write_element(element: ElementRef, output: &mut String) {
    if is_removed(&element) {
        return;
    }
    let value = element.value();
    let name = value.name();
    if !consts::ALLOWED_TAGS.contains(&name) || (name == "a" && !value.attr("href").is_some_and(is_safe_href)) {
        write_children(element, output);
        return;
    }
    output.push('<');
    output.push_str(name);
    write_attributes(value, output);
    output.push('>');
    if consts::VOID_TAGS.contains(&name) {
        return;
    }
    write_children(element, output);
    output.push_str("</");
    output.push_str(name);
    output.push('>');
}

fn write_attributes(element: &Element, output: &mut String) {
    for (tag, attribute) in consts::ALLOWED_ATTRIBUTES {
        if *tag != element.name() {
            continue;
        }
        if let Some(value) = element.attr(attribute) {
            output.push(' ');
            output.push_str(attribute);
            output.push_str("=\"");
            escape_attribute(value, output);
            output.push('"');
        }
    }
}

/// Whether a link target is an http(s) URL or relative to the page.
///
/// Browsers ignore leading whitespace and control characters, and tabs or
/// newlines anywhere in the URL, so those don't count towards the scheme.
fn is_safe_href(href: &str) -> bool {
    let href: String = href
        .trim_start_matches(|c: char| c.is_ascii_whitespace() || c.is_ascii_control())
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let end = href.find([':', '/', '?', '#']).unwrap_or(href.len());
    if !href[end..].starts_with(':') {
        return true;
    }
    let scheme = &href[..end];
    consts::ALLOWED_SCHEMES.iter().any(|allowed| scheme.eq_ignore_ascii_case(allowed))
}

// Same escaping rules as the html5ever serializer, so sanitized markup looks
// exactly like markup serialized by the extractor.
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
}

fn escape_attribute(value: &str, output: &mut String) {
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '"' => output.push_str("&quot;"),
            c => output.push(c),
        }
    }
}
