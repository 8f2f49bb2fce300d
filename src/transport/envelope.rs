//! Response envelope shared by every API endpoint.
//!
//! The API wraps every payload as
//! `{ success, data, total?, error?, pagination?: { total, pages, page } }`.
//! This module turns that wire shape into either the payload or a
//! [`FetchError`], and list payloads into a [`ResultPage`].

use crate::domain::FetchError;
use crate::query::ResultPage;
use serde::{Deserialize, Serialize};

/// Message shown whenever the API cannot be reached or read.
pub const NETWORK_ERROR: &str = "Could not connect to the API";

/// Pagination block some list endpoints attach.
///
/// `pages` is informational only; the page count is always recomputed from
/// `total` and the page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub pages: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
}

/// Raw API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<D> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<D>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<D> Envelope<D> {
    /// Successful envelope carrying `data`.
    #[must_use]
    pub const fn ok(data: D) -> Self {
        Self { success: true, data: Some(data), total: None, error: None, pagination: None }
    }

    /// Failed envelope carrying an API error message.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, total: None, error: Some(error.into()), pagination: None }
    }

    /// Attaches a `total` count.
    #[must_use]
    pub const fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Extracts the payload.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Api`] with the server message (or `default_error`)
    ///   when `success` is false.
    /// - [`FetchError::Network`] when a successful envelope has no `data`.
    pub fn into_data(self, default_error: &str) -> std::result::Result<D, FetchError> {
        if !self.success {
            let message = self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| default_error.to_string());
            return Err(FetchError::Api(message));
        }
        self.data.ok_or_else(|| {
            tracing::warn!("successful envelope without data");
            FetchError::Network(NETWORK_ERROR.to_string())
        })
    }
}

impl<T> Envelope<Vec<T>> {
    /// Maps a list envelope onto one page of results.
    ///
    /// The total count is `total`, else `pagination.total`, else the number
    /// of items returned.
    ///
    /// # Errors
    ///
    /// See [`Envelope::into_data`].
    pub fn into_page(
        self,
        page_number: u32,
        page_size: u32,
        default_error: &str,
    ) -> std::result::Result<ResultPage<T>, FetchError> {
        let declared_total = self
            .total
            .or_else(|| self.pagination.as_ref().and_then(|p| p.total));
        let items = self.into_data(default_error)?;
        let total_count = declared_total.unwrap_or(items.len() as u64);

        Ok(ResultPage { items, total_count, page_size, page_number })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Envelope<Vec<u32>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn total_takes_precedence() {
        let env = decode(json!({
            "success": true, "data": [1, 2], "total": 21,
            "pagination": { "total": 99, "pages": 10, "page": 1 }
        }));
        let page = env.into_page(1, 10, "Search failed").unwrap();
        assert_eq!(page.total_count, 21);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn pagination_total_is_second_choice() {
        let env = decode(json!({
            "success": true, "data": [1], "pagination": { "total": 12, "pages": 7, "page": 2 }
        }));
        let page = env.into_page(2, 10, "Search failed").unwrap();
        assert_eq!(page.total_count, 12);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.page_number, 2);
    }

    #[test]
    fn falls_back_to_item_count() {
        let env = decode(json!({ "success": true, "data": [4, 5, 6] }));
        assert_eq!(env.into_page(1, 10, "x").unwrap().total_count, 3);
    }

    #[test]
    fn failure_uses_server_message() {
        let env = decode(json!({ "success": false, "error": "Invalid yearMin" }));
        assert_eq!(
            env.into_page(1, 10, "Search failed"),
            Err(FetchError::Api("Invalid yearMin".into()))
        );
    }

    #[test]
    fn failure_without_message_uses_default() {
        let env = decode(json!({ "success": false }));
        assert_eq!(
            env.into_data("Search failed"),
            Err(FetchError::Api("Search failed".into()))
        );
    }

    #[test]
    fn success_without_data_is_a_network_error() {
        let env = decode(json!({ "success": true }));
        assert!(matches!(env.into_data("x"), Err(FetchError::Network(_))));
    }
}
