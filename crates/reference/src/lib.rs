//! Scripture references: parsing citation strings into sub-citations, and
//! finding citations embedded in ordinary prose.

mod citation;
mod consts;
pub mod error;
mod scan;
mod translation;

pub use crate::citation::{CITATION_SEPARATOR, Citation, CitationList, Verse, VerseRange};
pub use crate::scan::{AutoLink, autolink, scan};
pub use crate::translation::Translation;
