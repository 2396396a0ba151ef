//! Reference Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A reference error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for reference operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The citation text was empty (or only whitespace and separators).
    #[display("empty scripture reference")]
    EmptyReference,
    /// The translation code was empty.
    #[display("empty translation code")]
    EmptyTranslation,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Parsing is pure; the same input always fails the same way.
        false
    }
}
