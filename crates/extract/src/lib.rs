mod consts;
pub mod error;
mod extract;
mod models;
mod sanitize;

use pericope_reference::Translation;
use tracing::instrument;

use crate::error::Result;
pub use crate::extract::{Extractor, extract};
pub use crate::models::{ExtractedFragment, SanitizedPassage};
pub use crate::sanitize::{sanitize, sanitize_html};

/// Easy, top-level entrypoint: extracts the passage for `translation` from a
/// source document and sanitizes it for display.
///
/// A document without a matching passage gives an empty [`SanitizedPassage`];
/// only a document with no markup at all is an error.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn passage(html: &str, translation: &Translation) -> Result<SanitizedPassage> {
    let fragment = extract(html, translation)?;
    Ok(sanitize(&fragment))
}
