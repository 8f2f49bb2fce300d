//! Domain layer for the catalog browser.
//!
//! Core types independent of the transport, the worker pool and the terminal
//! front end.
//!
//! # Organization
//!
//! - [`dashboard`]: Catalog statistics for the dashboard view
//! - [`error`]: Error types and result aliases
//! - [`movie`]: Movie, review and genre models

pub mod dashboard;
pub mod error;
pub mod movie;

pub use dashboard::{DashboardStats, GenreCount, RecentReview};
pub use error::{FetchError, MovieMatchError, Result, ValidationError};
pub use movie::{genre_label, Genre, Movie, MovieDetail, NewMovie, NewReview, Review};
