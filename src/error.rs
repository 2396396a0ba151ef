//! Pericope Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Failures from the component crates
//! are raised into one of these kinds, keeping the lower frame in the tree.

use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The remote source could not be reached or answered badly.
    #[display("passage source unavailable")]
    Source,
    /// The remote source answered with something that is not markup.
    #[display("passage source returned malformed markup")]
    Markup,
    #[display("passage cache failure")]
    Cache,
    /// A citation or translation code was empty.
    #[display("invalid scripture reference")]
    Reference,
    #[display("could not render passage")]
    Render,
    #[display("configuration error")]
    Config,
    /// Prose to autolink could not be read.
    #[display("could not read input")]
    Input,
    /// A shortcode tag could not be read.
    #[display("malformed shortcode: {_0}")]
    Shortcode(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Source | Self::Cache)
    }
}
