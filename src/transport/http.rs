//! Blocking HTTP implementation of [`Transport`].
//!
//! Calls run on worker threads, never on the event loop, so the blocking
//! `reqwest` client is used. Non-2xx responses are still decoded: the API
//! reports failures inside the envelope.
//!
//! URLs are built segment by segment, so an id typed by the user is always a
//! single percent-encoded path segment and cannot reach another route.

use crate::domain::{
    DashboardStats, FetchError, Genre, Movie, MovieDetail, MovieMatchError, NewMovie, NewReview, Result, Review,
};
use crate::transport::{Envelope, ListEndpoint, Reply, Transport, NETWORK_ERROR};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// `reqwest`-backed API client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Builds a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`MovieMatchError::Config`] if the URL is not absolute HTTP(S)
    /// or the client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let invalid = || MovieMatchError::Config(format!("api_url must be an http(s) URL, got {base_url:?}"));

        let mut base_url = Url::parse(base_url).map_err(|_| invalid())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        base_url.path_segments_mut().map_err(|()| invalid())?.pop_if_empty();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MovieMatchError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(base_url = %base_url, timeout_ms = timeout.as_millis(), "http transport ready");
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // The base was checked to be hierarchical in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn send<D: DeserializeOwned>(&self, route: &str, request: RequestBuilder) -> Reply<D> {
        let span = tracing::debug_span!("http_request", route);
        let _guard = span.entered();

        let response = request.send().map_err(|e| {
            tracing::warn!(route, error = %e, timeout = e.is_timeout(), "request failed");
            FetchError::Network(NETWORK_ERROR.to_string())
        })?;

        let status = response.status();
        tracing::debug!(route, status = status.as_u16(), "response received");

        response.json::<Envelope<D>>().map_err(|e| {
            tracing::warn!(route, status = status.as_u16(), error = %e, "undecodable response body");
            FetchError::Network(NETWORK_ERROR.to_string())
        })
    }
}

impl Transport for HttpTransport {
    fn list(&self, endpoint: ListEndpoint, params: &[(String, String)]) -> Reply<Vec<Movie>> {
        let request = self.client.get(self.url(endpoint.segments())).query(params);
        self.send(endpoint.path(), request)
    }

    fn genres(&self) -> Reply<Vec<Genre>> {
        self.send("/movies/genres", self.client.get(self.url(&["movies", "genres"])))
    }

    fn movie(&self, id: &str) -> Reply<MovieDetail> {
        let request = self.client.get(self.url(&["movies", id]));
        self.send("/movies/{id}", request)
    }

    fn create_movie(&self, movie: &NewMovie) -> Reply<Movie> {
        let request = self.client.post(self.url(&["movies"])).json(movie);
        self.send("/movies", request)
    }

    fn update_movie(&self, id: &str, movie: &NewMovie) -> Reply<Movie> {
        let request = self.client.put(self.url(&["movies", id])).json(movie);
        self.send("/movies/{id}", request)
    }

    fn delete_movie(&self, id: &str) -> Reply<serde_json::Value> {
        let request = self.client.delete(self.url(&["movies", id]));
        self.send("/movies/{id}", request)
    }

    fn create_review(&self, movie_id: &str, review: &NewReview) -> Reply<Review> {
        let request = self.client.post(self.url(&["movies", movie_id, "reviews"])).json(review);
        self.send("/movies/{id}/reviews", request)
    }

    fn dashboard(&self) -> Reply<DashboardStats> {
        self.send("/dashboard", self.client.get(self.url(&["dashboard"])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:3000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3000/api");
        assert_eq!(
            transport.url(ListEndpoint::Search.segments()).as_str(),
            "http://localhost:3000/api/movies/search"
        );
    }

    #[test]
    fn ids_stay_inside_their_segment() {
        let transport = HttpTransport::new("http://localhost:3000/api", Duration::from_secs(1)).unwrap();
        assert_eq!(
            transport.url(&["movies", "1/reviews"]).as_str(),
            "http://localhost:3000/api/movies/1%2Freviews"
        );
        assert_eq!(
            transport.url(&["movies", "a b?c#d"]).as_str(),
            "http://localhost:3000/api/movies/a%20b%3Fc%23d"
        );
    }

    #[test]
    fn base_without_path_gets_segments_appended() {
        let transport = HttpTransport::new("https://movies.test", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.url(&["dashboard"]).as_str(), "https://movies.test/dashboard");
    }

    #[test]
    fn rejects_non_http_urls() {
        let err = HttpTransport::new("localhost:3000", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, MovieMatchError::Config(_)));
        let err = HttpTransport::new("ftp://localhost/api", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, MovieMatchError::Config(_)));
    }

    #[test]
    fn unreachable_api_is_a_network_error() {
        // Port 9 (discard) on loopback is not expected to run an HTTP server.
        let transport = HttpTransport::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap();
        let reply = transport.genres();
        assert_eq!(reply, Err(FetchError::Network(NETWORK_ERROR.to_string())));
    }
}
