//! View model types representing renderable UI state.
//!
//! View models are computed from application state via
//! `AppState::compute_viewmodel()` and consumed by the renderer. They hold no
//! business logic, only display-ready data: formatted rows, the pagination
//! indicator, active filter tags, dashboard sections and the status line.

use crate::domain::{genre_label, DashboardStats, Genre, Movie, MovieDetail};
use crate::query::{CoordinatorState, FilterDraft, FilterSchema};

/// Complete view model for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Draft filter values, in schema order.
    pub draft: Vec<DraftField>,

    /// Tags describing the applied filters. Empty before the first apply.
    pub tags: Vec<FilterTag>,

    pub rows: Vec<MovieRow>,

    /// Absent when there is at most one page.
    pub pagination: Option<PaginationInfo>,

    pub status: StatusLine,

    /// Statistics, on the dashboard view once loaded.
    pub dashboard: Option<DashboardInfo>,

    /// Open movie detail, shown above the list.
    pub detail: Option<DetailInfo>,

    /// One-off message such as a rejected command or a completed mutation.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Hint on how filters are applied in this view.
    pub subtitle: String,
}

/// One editable filter and its current draft value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftField {
    pub key: String,
    pub value: String,
}

/// Human-readable description of one applied filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTag {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieRow {
    pub id: String,
    pub title: String,
    pub year: String,
    pub genre: String,
    pub rating: String,
    pub director: String,
}

/// "Page p of n" with navigation availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    pub page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Loading, error and empty-state line under the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// Nothing has been searched yet.
    Idle,
    Loading,
    /// The error banner; previous rows stay visible.
    Failed(String),
    /// The applied filters matched nothing.
    NoResults,
    /// `total` matches across all pages.
    Results { total: u64 },
    /// Nothing to report.
    Blank,
}

/// Width of the longest genre bar, in characters.
const BAR_WIDTH: u64 = 20;

/// Display-ready dashboard sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardInfo {
    pub total_movies: u64,
    pub total_reviews: u64,
    /// `-` when there are no reviews.
    pub avg_rating: String,
    pub genres: Vec<GenreBar>,
    pub top_rated: Vec<String>,
    pub most_reviewed: Vec<String>,
    pub recent_reviews: Vec<String>,
}

/// One row of the movies-by-genre chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreBar {
    pub label: String,
    pub count: u64,
    /// Bar proportional to the largest genre.
    pub bar: String,
    pub avg_rating: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailInfo {
    pub heading: String,
    pub description: Option<String>,
    pub reviews: Vec<String>,
}

/// Describes the applied filters as tags.
///
/// Text filters are quoted, genres use their display label, and range bounds
/// render as `a–b`, `a+` or `up to b` depending on which bounds are set.
#[must_use]
pub fn active_filter_tags(applied: &FilterDraft, genres: &[Genre]) -> Vec<FilterTag> {
    let present = |key: &str| applied.get(key).filter(|v| !v.is_empty());
    let mut tags = Vec::new();

    if let Some(title) = present("title") {
        tags.push(tag("Title", format!("\"{title}\"")));
    }
    if let Some(director) = present("director") {
        tags.push(tag("Director", format!("\"{director}\"")));
    }
    if let Some(genre) = present("genre") {
        tags.push(tag("Genre", genre_label(genres, genre).to_string()));
    }
    if let Some(range) = range_text(present("yearMin"), present("yearMax")) {
        tags.push(tag("Year", range));
    }
    let rating_min = present("ratingMin").or_else(|| present("minRating"));
    if let Some(range) = range_text(rating_min, present("ratingMax")) {
        tags.push(tag("Rating", range));
    }
    tags
}

fn tag(label: &str, value: String) -> FilterTag {
    FilterTag { label: label.to_string(), value }
}

fn range_text(min: Option<&str>, max: Option<&str>) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) => Some(format!("{min}–{max}")),
        (Some(min), None) => Some(format!("{min}+")),
        (None, Some(max)) => Some(format!("up to {max}")),
        (None, None) => None,
    }
}

/// Pagination indicator for the committed page, if there is more than one.
#[must_use]
pub fn pagination_info(page: u32, total_pages: u32) -> Option<PaginationInfo> {
    (total_pages > 1).then(|| PaginationInfo {
        page,
        total_pages,
        has_previous: page > 1,
        has_next: page < total_pages,
    })
}

impl MovieRow {
    #[must_use]
    pub fn from_movie(movie: &Movie, genres: &[Genre]) -> Self {
        Self {
            id: movie.id.clone(),
            title: movie.title.clone(),
            year: movie.year.map(|y| y.to_string()).unwrap_or_default(),
            genre: genre_label(genres, &movie.genre).to_string(),
            rating: movie.rating.map(|r| format!("{r:.1}")).unwrap_or_default(),
            director: movie.director.clone(),
        }
    }
}

impl DetailInfo {
    #[must_use]
    pub fn from_detail(detail: &MovieDetail) -> Self {
        let reviews = detail
            .reviews
            .iter()
            .map(|r| {
                let date = r
                    .created_at
                    .map(|d| format!(" ({})", d.format("%Y-%m-%d")))
                    .unwrap_or_default();
                format!("{} {}/10{date}: {}", r.author, r.rating, r.comment)
            })
            .collect();
        Self {
            heading: detail.movie.summary(),
            description: detail.movie.description.clone(),
            reviews,
        }
    }
}

impl DashboardInfo {
    /// Formats `stats`. Genres without a server label use the genre options.
    #[must_use]
    pub fn from_stats(stats: &DashboardStats, genres: &[Genre]) -> Self {
        let widest = stats.movies_by_genre.iter().map(|g| g.count).max().unwrap_or(0).max(1);
        let bars = stats
            .movies_by_genre
            .iter()
            .map(|g| GenreBar {
                label: g.label.clone().unwrap_or_else(|| genre_label(genres, &g.genre).to_string()),
                count: g.count,
                bar: "█".repeat(usize::try_from(g.count.saturating_mul(BAR_WIDTH) / widest).unwrap_or(0)),
                avg_rating: g
                    .avg_rating
                    .filter(|r| *r > 0.0)
                    .map_or_else(|| "-".to_string(), |r| format!("★ {r:.1}")),
            })
            .collect();

        let top_rated = stats
            .top_rated
            .iter()
            .zip(1..)
            .map(|(m, rank)| {
                let year = m.year.map_or_else(String::new, |y| format!("{y} · "));
                format!("#{rank} {}  {year}{}  {}", m.title, reviews(m.review_count), rating(m.rating))
            })
            .collect();

        let most_reviewed = stats
            .most_reviewed
            .iter()
            .zip(1..)
            .map(|(m, rank)| format!("#{rank} {}  Rating: {}  {}", m.title, rating(m.rating), reviews(m.review_count)))
            .collect();

        let recent_reviews = stats
            .recent_reviews
            .iter()
            .map(|r| {
                let date = r
                    .review
                    .created_at
                    .map(|d| format!(" ({})", d.format("%Y-%m-%d")))
                    .unwrap_or_default();
                format!(
                    "{} {} on {}{date}: {}",
                    r.review.author,
                    stars(r.review.rating),
                    r.movie_title,
                    r.review.comment
                )
            })
            .collect();

        Self {
            total_movies: stats.total_movies,
            total_reviews: stats.total_reviews,
            avg_rating: stats.avg_rating.map_or_else(|| "-".to_string(), |r| format!("{r:.1}")),
            genres: bars,
            top_rated,
            most_reviewed,
            recent_reviews,
        }
    }
}

fn reviews(count: u32) -> String {
    if count == 1 {
        "1 review".to_string()
    } else {
        format!("{count} reviews")
    }
}

fn rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| "-".to_string(), |r| format!("{r:.1}"))
}

/// Five-star rendering of a 1-5 review rating.
fn stars(rating: f64) -> String {
    let filled = (0..5).filter(|i| f64::from(*i) < rating.round()).count();
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

impl StatusLine {
    /// Derives the status line from a coordinator snapshot.
    ///
    /// Loading wins over everything, then the error banner, then result counts.
    #[must_use]
    pub fn from_state(state: &CoordinatorState<Movie>) -> Self {
        if state.loading {
            return Self::Loading;
        }
        if let Some(error) = &state.error {
            return Self::Failed(error.clone());
        }
        match &state.results {
            None => Self::Idle,
            Some(page) if page.total_count == 0 && page.is_empty() => Self::NoResults,
            Some(page) => Self::Results { total: page.total_count },
        }
    }
}

/// Draft values listed in schema order, blanks included.
#[must_use]
pub fn draft_fields(schema: &FilterSchema, draft: &FilterDraft) -> Vec<DraftField> {
    schema
        .fields()
        .iter()
        .map(|f| DraftField {
            key: f.key.clone(),
            value: draft.get(&f.key).unwrap_or_default().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres() -> Vec<Genre> {
        vec![Genre { value: "scifi".into(), label: "Science Fiction".into() }]
    }

    fn draft(pairs: &[(&str, &str)]) -> FilterDraft {
        let mut d = FilterDraft::default();
        for (k, v) in pairs {
            d.set(k, v);
        }
        d
    }

    #[test]
    fn tags_quote_text_and_label_genres() {
        let tags = active_filter_tags(&draft(&[("title", "alien"), ("genre", "scifi")]), &genres());
        assert_eq!(tags, vec![tag("Title", "\"alien\"".into()), tag("Genre", "Science Fiction".into())]);
    }

    #[test]
    fn unknown_genre_falls_back_to_value() {
        let tags = active_filter_tags(&draft(&[("genre", "western")]), &genres());
        assert_eq!(tags, vec![tag("Genre", "western".into())]);
    }

    #[test]
    fn ranges_render_by_bounds_present() {
        let both = active_filter_tags(&draft(&[("yearMin", "1990"), ("yearMax", "1999")]), &[]);
        assert_eq!(both[0].value, "1990–1999");

        let min = active_filter_tags(&draft(&[("ratingMin", "7")]), &[]);
        assert_eq!(min, vec![tag("Rating", "7+".into())]);

        let max = active_filter_tags(&draft(&[("yearMax", "1980")]), &[]);
        assert_eq!(max, vec![tag("Year", "up to 1980".into())]);
    }

    #[test]
    fn empty_values_produce_no_tags() {
        assert!(active_filter_tags(&draft(&[("title", ""), ("genre", "")]), &genres()).is_empty());
    }

    #[test]
    fn dashboard_bars_scale_to_largest_genre() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "totalMovies": 6,
            "totalReviews": 1,
            "avgRating": 4.5,
            "moviesByGenre": [
                { "genre": "scifi", "count": 4, "avgRating": 8.3 },
                { "genre": "drama", "label": "Drama", "count": 2, "avgRating": 0 }
            ],
            "topRated": [{ "id": 1, "title": "Alien", "year": 1979, "rating": 8.5, "reviewCount": 1 }],
            "recentReviews": [{
                "id": 9, "author": "ana", "rating": 4, "comment": "tense",
                "createdAt": "2024-03-01T10:00:00Z", "movieTitle": "Alien"
            }]
        }))
        .unwrap();

        let info = DashboardInfo::from_stats(&stats, &genres());
        assert_eq!(info.avg_rating, "4.5");
        assert_eq!(info.genres[0].label, "Science Fiction");
        assert_eq!(info.genres[0].bar.chars().count(), 20);
        assert_eq!(info.genres[1].bar.chars().count(), 10);
        assert_eq!(info.genres[0].avg_rating, "★ 8.3");
        assert_eq!(info.genres[1].avg_rating, "-");
        assert_eq!(info.top_rated, vec!["#1 Alien  1979 · 1 review  8.5"]);
        assert!(info.most_reviewed.is_empty());
        assert_eq!(info.recent_reviews, vec!["ana ★★★★☆ on Alien (2024-03-01): tense"]);
    }

    #[test]
    fn pagination_hidden_for_single_page() {
        assert_eq!(pagination_info(1, 1), None);
        assert_eq!(pagination_info(1, 0), None);
        assert_eq!(
            pagination_info(3, 3),
            Some(PaginationInfo { page: 3, total_pages: 3, has_previous: true, has_next: false })
        );
    }
}
