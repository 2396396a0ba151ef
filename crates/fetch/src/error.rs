//! Fetch Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote source could not be reached, answered with a failure
    /// status, or sent a body that could not be read.
    #[display("passage source unavailable: {_0}")]
    UnavailableSource(#[error(not(source))] String),
    /// The configured base URL is not usable.
    #[display("invalid source URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// The HTTP client could not be constructed.
    #[display("HTTP client could not be built")]
    Client,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Nothing in this crate retries; that decision belongs to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UnavailableSource(_))
    }
}
