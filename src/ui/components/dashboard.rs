//! Dashboard sections: totals, genre chart and movie/review lists.

use crate::ui::viewmodel::DashboardInfo;
use std::fmt::{self, Write};

pub fn render_dashboard<W: Write>(out: &mut W, info: &DashboardInfo) -> fmt::Result {
    writeln!(
        out,
        "Total movies: {}   Total reviews: {}   Avg review rating: {}",
        info.total_movies, info.total_reviews, info.avg_rating
    )?;

    writeln!(out, "\nMovies by Genre")?;
    let label_width = info.genres.iter().map(|g| g.label.chars().count()).max().unwrap_or(0);
    for g in &info.genres {
        writeln!(out, "  {:<label_width$} {:<20} {:>3}  {}", g.label, g.bar, g.count, g.avg_rating)?;
    }

    render_list(out, "Top 5 Highest Rated", &info.top_rated, "No movies yet")?;
    render_list(out, "Most Reviewed", &info.most_reviewed, "No reviews yet")?;
    render_list(out, "Recent Reviews", &info.recent_reviews, "No reviews yet")
}

fn render_list<W: Write>(out: &mut W, title: &str, lines: &[String], empty: &str) -> fmt::Result {
    writeln!(out, "\n{title}")?;
    if lines.is_empty() {
        return writeln!(out, "  {empty}");
    }
    for line in lines {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::GenreBar;

    #[test]
    fn empty_sections_say_so() {
        let info = DashboardInfo {
            total_movies: 1,
            total_reviews: 0,
            avg_rating: "-".into(),
            genres: vec![GenreBar { label: "Drama".into(), count: 1, bar: "██".into(), avg_rating: "-".into() }],
            top_rated: vec!["#1 Heat  1995 · 0 reviews  8.3".into()],
            most_reviewed: vec![],
            recent_reviews: vec![],
        };
        let mut out = String::new();
        render_dashboard(&mut out, &info).unwrap();

        assert!(out.starts_with("Total movies: 1   Total reviews: 0   Avg review rating: -\n"));
        assert!(out.contains("  Drama ██"));
        assert!(out.contains("Top 5 Highest Rated\n  #1 Heat"));
        assert!(out.contains("Most Reviewed\n  No reviews yet"));
        assert!(out.ends_with("Recent Reviews\n  No reviews yet\n"));
    }
}
