//! Filter drafts, schemas and request parameter normalization.
//!
//! A [`FilterDraft`] is whatever the user has typed or selected so far. It is
//! never sent to the network directly: [`FilterSchema::build_params`] maps it
//! to an ordered [`QueryParams`] sequence, dropping empty and "no selection"
//! values and emitting fields in schema declaration order. Because the order
//! comes from the schema and not from the draft, two drafts holding the same
//! logical filters normalize identically regardless of how they were built,
//! which is what makes [`QueryFingerprint`] comparisons meaningful.
//!
//! # Example
//!
//! ```
//! use moviematch::query::{FilterDraft, FilterSchema};
//!
//! let schema = FilterSchema::search();
//! let mut draft = FilterDraft::defaults(&schema);
//! draft.set("title", "matrix");
//! draft.set("yearMin", "1999");
//!
//! let params = schema.build_params(&draft);
//! assert_eq!(params.pairs(), &[
//!     ("title".to_string(), "matrix".to_string()),
//!     ("yearMin".to_string(), "1999".to_string()),
//! ]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a filter field is edited and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text typed by the user (debounced in reactive mode).
    Text,
    /// A number entered as text; range bounds are independent of each other.
    Number,
    /// A small enumeration; `no_selection` is the sentinel meaning "any".
    Choice {
        /// Value that is treated as absent.
        no_selection: String,
    },
}

/// Declaration of one filter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: String,
    pub kind: FieldKind,
    /// Value the field takes after a reset.
    pub default: String,
}

impl FieldSpec {
    /// Returns `true` if `value` carries no filter for this field.
    fn is_blank(&self, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }
        matches!(&self.kind, FieldKind::Choice { no_selection } if value == no_selection)
    }
}

/// Ordered set of filter fields accepted by one coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSchema {
    fields: Vec<FieldSpec>,
}

impl FilterSchema {
    /// Creates an empty schema. Use the builder methods to declare fields.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declares a free-text field.
    #[must_use]
    pub fn text(self, key: &str) -> Self {
        self.field(key, FieldKind::Text, "")
    }

    /// Declares a numeric field (numbers travel as strings).
    #[must_use]
    pub fn number(self, key: &str) -> Self {
        self.field(key, FieldKind::Number, "")
    }

    /// Declares an enumerated field with an explicit "no selection" sentinel.
    #[must_use]
    pub fn choice(self, key: &str, no_selection: &str, default: &str) -> Self {
        self.field(
            key,
            FieldKind::Choice { no_selection: no_selection.to_string() },
            default,
        )
    }

    fn field(mut self, key: &str, kind: FieldKind, default: &str) -> Self {
        self.fields.retain(|f| f.key != key);
        self.fields.push(FieldSpec {
            key: key.to_string(),
            kind,
            default: default.to_string(),
        });
        self
    }

    /// Filters of the catalog list (`GET /movies`).
    #[must_use]
    pub fn catalog() -> Self {
        Self::new()
            .choice("genre", "", "")
            .number("minRating")
            .text("director")
            .choice("sortBy", "", "")
            .choice("order", "", "desc")
    }

    /// Filters of the advanced search form (`GET /movies/search`).
    #[must_use]
    pub fn search() -> Self {
        Self::new()
            .text("title")
            .text("director")
            .choice("genre", "", "")
            .number("yearMin")
            .number("yearMax")
            .number("ratingMin")
            .number("ratingMax")
    }

    /// Looks up a field declaration by key.
    #[must_use]
    pub fn spec(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Declared fields in order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Normalizes a draft into request parameters.
    ///
    /// Fields are emitted in declaration order. A field is omitted when it is
    /// absent from the draft, empty, or equal to its "no selection" sentinel.
    /// Keys the schema does not declare are ignored.
    #[must_use]
    pub fn build_params(&self, draft: &FilterDraft) -> QueryParams {
        let pairs = self
            .fields
            .iter()
            .filter_map(|spec| {
                let value = draft.get(&spec.key)?;
                if spec.is_blank(value) {
                    None
                } else {
                    Some((spec.key.clone(), value.to_string()))
                }
            })
            .collect();
        QueryParams(pairs)
    }
}

/// Mutable filter state edited by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterDraft {
    values: HashMap<String, String>,
}

impl FilterDraft {
    /// Creates a draft holding every schema field at its default value.
    #[must_use]
    pub fn defaults(schema: &FilterSchema) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| (f.key.clone(), f.default.clone()))
            .collect();
        Self { values }
    }

    /// Current value of a field, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Sets a field, returning `true` if the stored value changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        if self.get(key) == Some(value) {
            return false;
        }
        self.values.insert(key.to_string(), value.to_string());
        true
    }

    /// Removes a field, returning `true` if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Iterates over the raw key/value pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Normalized, ordered filter parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Ordered `(key, value)` pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Value of a parameter, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Full request parameters: filters followed by `page` and `limit`.
    #[must_use]
    pub fn with_paging(&self, page: u32, page_size: u32) -> Vec<(String, String)> {
        let mut pairs = self.0.clone();
        pairs.push(("page".to_string(), page.to_string()));
        pairs.push(("limit".to_string(), page_size.to_string()));
        pairs
    }
}

/// Identity of a request: normalized filters plus paging.
///
/// Two fingerprints are equal iff they would produce the same request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryFingerprint {
    params: QueryParams,
    page: u32,
    page_size: u32,
}

impl QueryFingerprint {
    #[must_use]
    pub const fn new(params: QueryParams, page: u32, page_size: u32) -> Self {
        Self { params, page, page_size }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Parameters to put on the wire for this request.
    #[must_use]
    pub fn request_params(&self) -> Vec<(String, String)> {
        self.params.with_paging(self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_empty_and_no_selection_values() {
        let schema = FilterSchema::catalog();
        let mut draft = FilterDraft::defaults(&schema);
        draft.set("director", "");
        draft.set("genre", "");

        let params = schema.build_params(&draft);
        assert_eq!(params.pairs(), &[("order".to_string(), "desc".to_string())]);
    }

    #[test]
    fn custom_sentinel_is_dropped() {
        let schema = FilterSchema::new().choice("genre", "all", "all");
        let mut draft = FilterDraft::defaults(&schema);
        assert!(schema.build_params(&draft).is_empty());

        draft.set("genre", "drama");
        assert_eq!(schema.build_params(&draft).get("genre"), Some("drama"));
    }

    #[test]
    fn range_bounds_are_independent() {
        let schema = FilterSchema::search();
        let mut only_min = FilterDraft::default();
        only_min.set("ratingMin", "7");
        assert_eq!(
            schema.build_params(&only_min).pairs(),
            &[("ratingMin".to_string(), "7".to_string())]
        );

        let mut only_max = FilterDraft::default();
        only_max.set("yearMax", "1980");
        assert_eq!(
            schema.build_params(&only_max).pairs(),
            &[("yearMax".to_string(), "1980".to_string())]
        );
    }

    #[test]
    fn declaration_order_wins_over_insertion_order() {
        let schema = FilterSchema::search();
        let mut a = FilterDraft::default();
        a.set("ratingMax", "9");
        a.set("title", "alien");
        a.set("genre", "scifi");

        let mut b = FilterDraft::default();
        b.set("genre", "scifi");
        b.set("title", "alien");
        b.set("ratingMax", "9");

        assert_eq!(schema.build_params(&a), schema.build_params(&b));
        let built = schema.build_params(&a);
        let keys: Vec<&str> = built.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["title", "genre", "ratingMax"]);
    }

    #[test]
    fn undeclared_keys_are_ignored() {
        let schema = FilterSchema::search();
        let mut draft = FilterDraft::default();
        draft.set("colour", "red");
        assert!(schema.build_params(&draft).is_empty());
    }

    #[test]
    fn whitespace_is_preserved() {
        let schema = FilterSchema::catalog();
        let mut draft = FilterDraft::default();
        draft.set("director", "Nolan ");
        assert_eq!(schema.build_params(&draft).get("director"), Some("Nolan "));
    }

    #[test]
    fn fingerprint_includes_paging() {
        let schema = FilterSchema::search();
        let mut draft = FilterDraft::default();
        draft.set("title", "heat");
        let params = schema.build_params(&draft);

        let p1 = QueryFingerprint::new(params.clone(), 1, 10);
        let p2 = QueryFingerprint::new(params.clone(), 2, 10);
        assert_ne!(p1, p2);
        assert_eq!(p1, QueryFingerprint::new(params, 1, 10));
        assert_eq!(
            p2.request_params(),
            vec![
                ("title".to_string(), "heat".to_string()),
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    mod ordering {
        use super::*;
        use proptest::prelude::*;

        const SEARCH_KEYS: [&str; 7] =
            ["title", "director", "genre", "yearMin", "yearMax", "ratingMin", "ratingMax"];

        proptest! {
            #[test]
            fn params_ignore_insertion_order(
                entries in prop::collection::btree_map(
                    prop::sample::select(SEARCH_KEYS.to_vec()),
                    "[a-z0-9]{0,6}",
                    0..7,
                )
                .prop_flat_map(|map| {
                    let pairs: Vec<_> = map.into_iter().collect();
                    (Just(pairs.clone()), Just(pairs).prop_shuffle())
                }),
            ) {
                let (sorted, shuffled) = entries;
                let schema = FilterSchema::search();

                let mut a = FilterDraft::default();
                for (k, v) in &sorted {
                    a.set(k, v);
                }
                let mut b = FilterDraft::default();
                for (k, v) in &shuffled {
                    b.set(k, v);
                }

                let params = schema.build_params(&a);
                prop_assert_eq!(&params, &schema.build_params(&b));

                let positions: Vec<usize> = params
                    .pairs()
                    .iter()
                    .filter_map(|(k, _)| SEARCH_KEYS.iter().position(|s| s == k))
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn set_reports_changes_only() {
        let mut draft = FilterDraft::default();
        assert!(draft.set("title", "x"));
        assert!(!draft.set("title", "x"));
        assert!(draft.remove("title"));
        assert!(!draft.remove("title"));
    }
}
