//! Application state management and view model computation.
//!
//! [`AppState`] is the single source of truth for the running browser. It owns
//! one [`QueryCoordinator`] per list view, the dashboard panel, and the shared
//! state: genre options, the open movie detail and the last notice.
//!
//! # State Components
//!
//! - **Catalog**: reactive coordinator over `GET /movies`
//! - **Search**: explicit coordinator over `GET /movies/search`
//! - **Dashboard**: statistics from `GET /dashboard`
//! - **View**: which of the three is on screen
//! - **Genres**: options used to label genre values, loaded once
//! - **Detail**: the movie opened with `show <id>`, if any
//! - **Notice**: one-off feedback, cleared by the next command
//!
//! Both coordinators stay alive while another view is on screen, so
//! switching views keeps filters, page and results.

use super::dashboard::DashboardPanel;
use super::modes::ViewMode;
use crate::domain::{Genre, Movie, MovieDetail};
use crate::query::{CoordinatorOptions, FilterSchema, QueryCoordinator, SearchMode};
use crate::ui::viewmodel::{
    active_filter_tags, draft_fields, pagination_info, DashboardInfo, DetailInfo, HeaderInfo, MovieRow, StatusLine,
    UIViewModel,
};
use std::time::Duration;

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// View currently on screen.
    pub view: ViewMode,

    pub catalog: QueryCoordinator<Movie>,

    pub search: QueryCoordinator<Movie>,

    pub dashboard: DashboardPanel,

    /// Genre options from `GET /movies/genres`. Empty until loaded; genre
    /// values are shown raw meanwhile.
    pub genres: Vec<Genre>,

    /// Movie detail opened by the user.
    pub detail: Option<MovieDetail>,

    /// Id of the movie whose detail was requested, kept while it loads.
    pub detail_id: Option<String>,

    /// Feedback for the last command (validation rejections, mutation results).
    pub notice: Option<String>,
}

impl AppState {
    /// Creates the state with both coordinators at their defaults.
    ///
    /// # Parameters
    ///
    /// * `page_size` - Items requested per page by both views
    /// * `debounce` - Quiet period before catalog text filters apply
    ///
    /// # Example
    ///
    /// ```rust
    /// use moviematch::app::{AppState, ViewMode};
    /// use std::time::Duration;
    ///
    /// let state = AppState::new(10, Duration::from_millis(300));
    /// assert_eq!(state.view, ViewMode::Catalog);
    /// assert_eq!(state.search.page(), 1);
    /// ```
    #[must_use]
    pub fn new(page_size: u32, debounce: Duration) -> Self {
        let options = |mode: SearchMode| CoordinatorOptions { mode, page_size, debounce };
        Self {
            view: ViewMode::Catalog,
            catalog: QueryCoordinator::new(FilterSchema::catalog(), &options(SearchMode::Reactive)),
            search: QueryCoordinator::new(FilterSchema::search(), &options(SearchMode::Explicit)),
            dashboard: DashboardPanel::new(),
            genres: Vec::new(),
            detail: None,
            detail_id: None,
            notice: None,
        }
    }

    /// Coordinator behind `view`; `None` for the dashboard.
    #[must_use]
    pub const fn coordinator(&self, view: ViewMode) -> Option<&QueryCoordinator<Movie>> {
        match view {
            ViewMode::Catalog => Some(&self.catalog),
            ViewMode::Search => Some(&self.search),
            ViewMode::Dashboard => None,
        }
    }

    pub fn coordinator_mut(&mut self, view: ViewMode) -> Option<&mut QueryCoordinator<Movie>> {
        match view {
            ViewMode::Catalog => Some(&mut self.catalog),
            ViewMode::Search => Some(&mut self.search),
            ViewMode::Dashboard => None,
        }
    }

    /// Coordinator of the view on screen, if it is a list view.
    #[must_use]
    pub const fn active(&self) -> Option<&QueryCoordinator<Movie>> {
        self.coordinator(self.view)
    }

    /// Computes the view model for the view on screen.
    ///
    /// Rows always come from the last committed page, so they remain visible
    /// while a new request loads or after it fails.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let Some(coordinator) = self.active() else {
            return self.dashboard_viewmodel();
        };
        let snapshot = coordinator.snapshot();

        let subtitle = match coordinator.mode() {
            SearchMode::Reactive => "Filters apply as you type.",
            SearchMode::Explicit => "Filters apply when you run `search`.",
        };

        let rows = snapshot
            .results
            .as_ref()
            .map(|page| page.items.iter().map(|m| MovieRow::from_movie(m, &self.genres)).collect())
            .unwrap_or_default();

        let tags = snapshot
            .applied
            .as_ref()
            .map(|applied| active_filter_tags(applied, &self.genres))
            .unwrap_or_default();

        UIViewModel {
            header: HeaderInfo {
                title: self.view.title().to_string(),
                subtitle: subtitle.to_string(),
            },
            draft: draft_fields(coordinator.schema(), &snapshot.draft),
            tags,
            rows,
            pagination: pagination_info(snapshot.page, coordinator.total_pages()),
            status: StatusLine::from_state(&snapshot),
            dashboard: None,
            detail: self.detail.as_ref().map(DetailInfo::from_detail),
            notice: self.notice.clone(),
        }
    }

    /// Statistics are only shown once a load succeeded and nothing is
    /// pending or failed.
    fn dashboard_viewmodel(&self) -> UIViewModel {
        let panel = &self.dashboard;
        let (status, dashboard) = if panel.loading() {
            (StatusLine::Loading, None)
        } else if let Some(error) = panel.error() {
            (StatusLine::Failed(error.to_string()), None)
        } else {
            let info = panel.stats().map(|stats| DashboardInfo::from_stats(stats, &self.genres));
            (StatusLine::Blank, info)
        };

        UIViewModel {
            header: HeaderInfo {
                title: self.view.title().to_string(),
                subtitle: "Catalog statistics, reloaded on every visit.".to_string(),
            },
            draft: Vec::new(),
            tags: Vec::new(),
            rows: Vec::new(),
            pagination: None,
            status,
            dashboard,
            detail: self.detail.as_ref().map(DetailInfo::from_detail),
            notice: self.notice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Effect, ResultPage};

    fn movie(id: &str, genre: &str) -> Movie {
        serde_json::from_value(serde_json::json!({
            "id": id, "title": format!("Movie {id}"), "genre": genre, "year": 2001, "rating": 7.5
        }))
        .unwrap()
    }

    fn settle_search(state: &mut AppState, total: u64) {
        let effects = state.search.search();
        let Some(Effect::Fetch(req)) = effects.first() else {
            panic!("expected fetch, got {effects:?}");
        };
        let page = ResultPage { items: vec![movie("1", "scifi")], total_count: total, page_size: 10, page_number: 1 };
        state.search.on_settled(req.sequence, Ok(page));
    }

    #[test]
    fn idle_search_view_has_no_rows_or_tags() {
        let mut state = AppState::new(10, Duration::from_millis(300));
        state.view = ViewMode::Search;
        let vm = state.compute_viewmodel();
        assert!(vm.rows.is_empty());
        assert!(vm.tags.is_empty());
        assert_eq!(vm.status, StatusLine::Idle);
        assert_eq!(vm.pagination, None);
    }

    #[test]
    fn committed_search_shows_rows_tags_and_pages() {
        let mut state = AppState::new(10, Duration::from_millis(300));
        state.view = ViewMode::Search;
        state.genres = vec![Genre { value: "scifi".into(), label: "Sci-Fi".into() }];
        state.search.update_draft("genre", Some("scifi")).unwrap();
        settle_search(&mut state, 25);

        let vm = state.compute_viewmodel();
        assert_eq!(vm.rows.len(), 1);
        assert_eq!(vm.rows[0].genre, "Sci-Fi");
        assert_eq!(vm.rows[0].rating, "7.5");
        assert_eq!(vm.tags.len(), 1);
        assert_eq!(vm.pagination.map(|p| p.total_pages), Some(3));
        assert_eq!(vm.status, StatusLine::Results { total: 25 });
    }

    #[test]
    fn views_keep_independent_state() {
        let mut state = AppState::new(10, Duration::from_millis(300));
        state.search.update_draft("title", Some("heat")).unwrap();
        assert_eq!(state.catalog.draft().get("title"), None);
        assert_eq!(state.active().map(QueryCoordinator::mode), Some(SearchMode::Reactive));
    }

    #[test]
    fn dashboard_shows_status_until_stats_arrive() {
        let mut state = AppState::new(10, Duration::from_millis(300));
        state.view = ViewMode::Dashboard;
        assert!(state.active().is_none());

        let seq = state.dashboard.begin_load();
        let vm = state.compute_viewmodel();
        assert_eq!(vm.status, StatusLine::Loading);
        assert_eq!(vm.dashboard, None);
        assert_eq!(vm.header.title, "Dashboard");

        let stats = serde_json::from_value(serde_json::json!({
            "totalMovies": 3, "totalReviews": 1, "avgRating": 4,
            "moviesByGenre": [{ "genre": "scifi", "count": 3, "avgRating": 4 }]
        }))
        .unwrap();
        state.genres = vec![Genre { value: "scifi".into(), label: "Sci-Fi".into() }];
        state.dashboard.settle(seq, Ok(stats));

        let vm = state.compute_viewmodel();
        assert_eq!(vm.status, StatusLine::Blank);
        let info = vm.dashboard.unwrap();
        assert_eq!(info.total_movies, 3);
        assert_eq!(info.genres[0].label, "Sci-Fi");
        assert!(vm.rows.is_empty() && vm.draft.is_empty());
    }
}
