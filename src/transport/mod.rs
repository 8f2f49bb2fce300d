//! Access to the movie REST API.
//!
//! This module defines the [`Transport`] trait that abstracts over how the API
//! is reached. The worker pool talks to the API exclusively through it, so the
//! HTTP client can be swapped for an in-memory fake in tests.
//!
//! # Organization
//!
//! - [`envelope`]: wire envelope and its mapping onto results and errors
//! - [`http`]: blocking `reqwest` implementation

pub mod envelope;
pub mod http;

pub use envelope::{Envelope, Pagination, NETWORK_ERROR};
pub use http::HttpTransport;

use crate::domain::{DashboardStats, FetchError, Genre, Movie, MovieDetail, NewMovie, NewReview, Review};
use serde::{Deserialize, Serialize};

/// Outcome of one API call: a decoded envelope, or a transport failure.
pub type Reply<D> = std::result::Result<Envelope<D>, FetchError>;

/// List endpoint backing a query coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListEndpoint {
    /// `GET /movies`: the catalog with simple filters.
    Catalog,
    /// `GET /movies/search`: the advanced search form.
    Search,
}

impl ListEndpoint {
    /// Path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Catalog => "/movies",
            Self::Search => "/movies/search",
        }
    }

    /// [`ListEndpoint::path`] split into segments.
    #[must_use]
    pub const fn segments(self) -> &'static [&'static str] {
        match self {
            Self::Catalog => &["movies"],
            Self::Search => &["movies", "search"],
        }
    }

    /// Error shown when the API fails without a message.
    #[must_use]
    pub const fn default_error(self) -> &'static str {
        match self {
            Self::Catalog => "Failed to load movies",
            Self::Search => "Search failed",
        }
    }
}

/// Abstraction over the movie API.
///
/// Implementations must be shareable across worker threads. Every method maps
/// an unreachable API, a timeout or an undecodable body to
/// [`FetchError::Network`]; an envelope with `success: false` is returned as
/// is and interpreted by the caller.
pub trait Transport: Send + Sync {
    /// Fetches one page from a list endpoint. `params` already include
    /// `page` and `limit`.
    fn list(&self, endpoint: ListEndpoint, params: &[(String, String)]) -> Reply<Vec<Movie>>;

    /// `GET /movies/genres`
    fn genres(&self) -> Reply<Vec<Genre>>;

    /// `GET /movies/{id}`
    fn movie(&self, id: &str) -> Reply<MovieDetail>;

    /// `POST /movies`
    fn create_movie(&self, movie: &NewMovie) -> Reply<Movie>;

    /// `PUT /movies/{id}`
    fn update_movie(&self, id: &str, movie: &NewMovie) -> Reply<Movie>;

    /// `DELETE /movies/{id}`
    fn delete_movie(&self, id: &str) -> Reply<serde_json::Value>;

    /// `POST /movies/{id}/reviews`
    fn create_review(&self, movie_id: &str, review: &NewReview) -> Reply<Review>;

    /// `GET /dashboard`
    fn dashboard(&self) -> Reply<DashboardStats>;
}
