//! View selection for the application.
//!
//! The browser has two list views, each backed by its own query coordinator,
//! plus the dashboard:
//! - **Catalog**: the movie list with simple filters, refreshed reactively
//! - **Search**: the advanced search form, applied on explicit submit
//! - **Dashboard**: catalog statistics, loaded on every visit

use crate::transport::ListEndpoint;
use std::fmt;
use std::str::FromStr;

/// Which view is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    /// Catalog list (`GET /movies`), reactive filters.
    Catalog,

    /// Advanced search (`GET /movies/search`), explicit submit.
    Search,

    /// Statistics (`GET /dashboard`). No filters, no pages.
    Dashboard,
}

impl ViewMode {
    /// Views backed by a query coordinator.
    pub const LISTS: [Self; 2] = [Self::Catalog, Self::Search];

    /// List endpoint behind the view; `None` for the dashboard.
    #[must_use]
    pub const fn endpoint(self) -> Option<ListEndpoint> {
        match self {
            Self::Catalog => Some(ListEndpoint::Catalog),
            Self::Search => Some(ListEndpoint::Search),
            Self::Dashboard => None,
        }
    }

    #[must_use]
    pub const fn from_endpoint(endpoint: ListEndpoint) -> Self {
        match endpoint {
            ListEndpoint::Catalog => Self::Catalog,
            ListEndpoint::Search => Self::Search,
        }
    }

    #[must_use]
    pub const fn is_list(self) -> bool {
        self.endpoint().is_some()
    }

    /// Header title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Catalog => "Movie Catalog",
            Self::Search => "Advanced Search",
            Self::Dashboard => "Dashboard",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => f.write_str("catalog"),
            Self::Search => f.write_str("search"),
            Self::Dashboard => f.write_str("dashboard"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "catalog" => Ok(Self::Catalog),
            "search" => Ok(Self::Search),
            "dashboard" => Ok(Self::Dashboard),
            other => Err(format!("unknown view {other:?} (expected catalog, search or dashboard)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_display() {
        for view in [ViewMode::Catalog, ViewMode::Search, ViewMode::Dashboard] {
            assert_eq!(view.to_string().parse::<ViewMode>(), Ok(view));
        }
    }

    #[test]
    fn only_list_views_have_endpoints() {
        assert!(ViewMode::LISTS.iter().all(|v| v.is_list()));
        assert_eq!(ViewMode::Dashboard.endpoint(), None);
        assert_eq!(ViewMode::from_endpoint(ListEndpoint::Search), ViewMode::Search);
    }
}
