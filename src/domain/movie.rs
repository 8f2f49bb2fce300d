//! Catalog domain models: movies, reviews and genre options.
//!
//! These types are the frontend's view of the API payloads. Deserialization
//! acts as the adapter between the wire format (camelCase, loosely typed ids,
//! optional counters) and the rest of the crate, so a backend rename only has
//! to be absorbed here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A movie as listed by the catalog and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub review_count: u32,
}

impl Movie {
    /// One-line summary used by list rows: `Title (1999) · Director · 8.7/10`.
    #[must_use]
    pub fn summary(&self) -> String {
        let year = self.year.map_or_else(String::new, |y| format!(" ({y})"));
        let rating = self.rating.map_or_else(|| "-".to_string(), |r| format!("{r}/10"));
        format!("{}{year} · {} · {rating}", self.title, self.director)
    }
}

/// A review attached to a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_id_from_any")]
    pub movie_id: Option<String>,
    pub author: String,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A movie together with its reviews, as returned by `GET /movies/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// A selectable genre: wire value plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub value: String,
    pub label: String,
}

/// Resolves a genre's display label, falling back to the raw value.
#[must_use]
pub fn genre_label<'a>(genres: &'a [Genre], value: &'a str) -> &'a str {
    genres
        .iter()
        .find(|g| g.value == value)
        .map_or(value, |g| g.label.as_str())
}

/// Payload for creating or updating a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub rating: f64,
    pub director: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for posting a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub author: String,
    pub rating: f64,
    pub comment: String,
}

fn id_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid id: {other}"))),
    }
}

fn opt_id_from_any<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!("invalid id: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_accepts_numeric_id_and_missing_review_count() {
        let raw = r#"{"id": 7, "title": "Heat", "year": 1995, "genre": "crime",
                      "rating": 8.3, "director": "Michael Mann"}"#;
        let movie: Movie = serde_json::from_str(raw).unwrap();
        assert_eq!(movie.id, "7");
        assert_eq!(movie.review_count, 0);
        assert_eq!(movie.summary(), "Heat (1995) · Michael Mann · 8.3/10");
    }

    #[test]
    fn detail_flattens_movie_fields() {
        let raw = r#"{"id": "m1", "title": "Alien", "reviewCount": 1,
                      "reviews": [{"id": 3, "movieId": "m1", "author": "ana",
                                   "rating": 9, "comment": "tense",
                                   "createdAt": "2024-03-01T10:00:00Z"}]}"#;
        let detail: MovieDetail = serde_json::from_str(raw).unwrap();
        assert_eq!(detail.movie.title, "Alien");
        assert_eq!(detail.reviews.len(), 1);
        assert_eq!(detail.reviews[0].movie_id.as_deref(), Some("m1"));
        assert!(detail.reviews[0].created_at.is_some());
    }

    #[test]
    fn genre_label_falls_back_to_value() {
        let genres = vec![Genre { value: "scifi".into(), label: "Science Fiction".into() }];
        assert_eq!(genre_label(&genres, "scifi"), "Science Fiction");
        assert_eq!(genre_label(&genres, "drama"), "drama");
    }
}
