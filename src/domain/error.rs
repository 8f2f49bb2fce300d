//! Error types for the movie catalog browser.
//!
//! This module defines the centralized error type [`MovieMatchError`], the
//! locally detected [`ValidationError`], the clonable [`FetchError`] carried
//! back from worker threads, and a [`Result`] alias. All errors are
//! implemented using the `thiserror` crate.
//!
//! # Taxonomy
//!
//! - [`FetchError::Network`]: the API could not be reached (connection
//!   refused, timeout, undecodable body). Reported; displayed results are
//!   preserved.
//! - [`FetchError::Api`]: the API answered with `success: false`. The message
//!   is reported verbatim; displayed results are preserved.
//! - [`ValidationError`]: rejected before any network call (page out of
//!   range, unknown filter field). No state changes.
//!
//! Fetch failures travel as data inside worker responses and end up in a
//! view's error banner; none of them is fatal to a query coordinator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for moviematch operations.
///
/// # Examples
///
/// ```
/// use moviematch::domain::{MovieMatchError, ValidationError};
///
/// let err = MovieMatchError::from(ValidationError::NoAppliedSearch);
/// assert!(err.to_string().contains("no search"));
/// ```
#[derive(Debug, Error)]
pub enum MovieMatchError {
    /// A request was rejected locally before reaching the network.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Communication with the background worker pool failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors detected locally, before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The requested page lies outside `[1, total_pages]`.
    #[error("page {requested} is out of range (1..={total_pages})")]
    PageOutOfRange {
        /// Page the caller asked for.
        requested: u32,
        /// Upper bound derived from the last committed result page.
        total_pages: u32,
    },

    /// Paging was requested in explicit mode before any search was applied.
    #[error("no search has been applied yet")]
    NoAppliedSearch,

    /// The filter field is not declared by the coordinator's schema.
    #[error("unknown filter field: {0}")]
    UnknownField(String),

    /// Filter and paging commands were sent to a view without a list.
    #[error("the {0} view has no filters or pages")]
    NotAListView(String),
}

/// Failure of a single fetch, as reported by the transport.
///
/// Unlike [`MovieMatchError`] this type is `Clone` and serializable so it can
/// travel inside worker responses and events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum FetchError {
    /// Transport unreachable, timed out, or returned an unreadable body.
    #[error("{0}")]
    Network(String),

    /// The API reported `success: false` with this message.
    #[error("{0}")]
    Api(String),
}

impl FetchError {
    /// Message shown to the user in the error banner.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network(message) | Self::Api(message) => message,
        }
    }
}

/// A specialized `Result` type for moviematch operations.
pub type Result<T> = std::result::Result<T, MovieMatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_message_is_shown_verbatim() {
        assert_eq!(FetchError::Api("Search failed".into()).to_string(), "Search failed");
        assert_eq!(FetchError::Network("down".into()).message(), "down");
    }

    #[test]
    fn page_out_of_range_message_names_bounds() {
        let err = ValidationError::PageOutOfRange { requested: 4, total_pages: 3 };
        assert_eq!(err.to_string(), "page 4 is out of range (1..=3)");
    }
}
