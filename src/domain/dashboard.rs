//! Catalog statistics shown by the dashboard view.
//!
//! The aggregates are computed by the API (`GET /dashboard`); the client only
//! decodes and displays them.

use crate::domain::movie::{Movie, Review};
use serde::{Deserialize, Deserializer, Serialize};

/// Everything the dashboard shows, as returned in one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_movies: u64,
    #[serde(default)]
    pub total_reviews: u64,
    /// Average review rating. Some backends send it pre-formatted as a string.
    #[serde(default, deserialize_with = "opt_number_from_any")]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub movies_by_genre: Vec<GenreCount>,
    #[serde(default)]
    pub top_rated: Vec<Movie>,
    #[serde(default)]
    pub most_reviewed: Vec<Movie>,
    #[serde(default)]
    pub recent_reviews: Vec<RecentReview>,
}

/// Number of movies in one genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreCount {
    pub genre: String,
    /// Display label; the genre options are used when absent.
    #[serde(default)]
    pub label: Option<String>,
    pub count: u64,
    #[serde(default, deserialize_with = "opt_number_from_any")]
    pub avg_rating: Option<f64>,
}

/// A review together with the title of the movie it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentReview {
    #[serde(flatten)]
    pub review: Review,
    #[serde(default)]
    pub movie_title: String,
}

fn opt_number_from_any<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => Ok(n.as_f64()),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid number: {s:?}"))),
        other => Err(D::Error::custom(format!("invalid number: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_payload() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "totalMovies": 12,
            "totalReviews": 30,
            "avgRating": "7.4",
            "moviesByGenre": [
                { "genre": "scifi", "label": "Science Fiction", "count": 4, "avgRating": 8.1 },
                { "genre": "drama", "count": 2, "avgRating": 0 }
            ],
            "topRated": [{ "id": 1, "title": "Alien", "year": 1979, "rating": 8.5, "reviewCount": 3 }],
            "mostReviewed": [{ "id": 2, "title": "Heat", "rating": 8.3, "reviewCount": 9 }],
            "recentReviews": [{
                "id": 5, "movieId": 2, "author": "ana", "rating": 4, "comment": "tense",
                "createdAt": "2024-03-01T10:00:00Z", "movieTitle": "Heat"
            }]
        }))
        .unwrap();

        assert_eq!(stats.total_movies, 12);
        assert_eq!(stats.avg_rating, Some(7.4));
        assert_eq!(stats.movies_by_genre[1].label, None);
        assert_eq!(stats.top_rated[0].review_count, 3);
        assert_eq!(stats.recent_reviews[0].movie_title, "Heat");
        assert_eq!(stats.recent_reviews[0].review.movie_id.as_deref(), Some("2"));
    }

    #[test]
    fn empty_catalog_decodes_with_defaults() {
        let stats: DashboardStats = serde_json::from_value(json!({ "totalMovies": 0, "avgRating": null })).unwrap();
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.avg_rating, None);
        assert!(stats.movies_by_genre.is_empty());
        assert!(stats.recent_reviews.is_empty());
    }
}
