//! Table component renderer.
//!
//! Renders result rows under fixed-width column headers. Long titles are
//! truncated to keep columns aligned.

use crate::ui::viewmodel::MovieRow;
use std::fmt::{self, Write};

const ID_WIDTH: usize = 6;
const TITLE_WIDTH: usize = 32;
const YEAR_WIDTH: usize = 5;
const GENRE_WIDTH: usize = 16;
const RATING_WIDTH: usize = 6;

pub fn render_table_headers<W: Write>(out: &mut W) -> fmt::Result {
    writeln!(
        out,
        "{:<ID_WIDTH$} {:<TITLE_WIDTH$} {:<YEAR_WIDTH$} {:<GENRE_WIDTH$} {:<RATING_WIDTH$} DIRECTOR",
        "ID", "TITLE", "YEAR", "GENRE", "RATING"
    )
}

pub fn render_table_rows<W: Write>(out: &mut W, rows: &[MovieRow]) -> fmt::Result {
    for row in rows {
        writeln!(
            out,
            "{:<ID_WIDTH$} {:<TITLE_WIDTH$} {:<YEAR_WIDTH$} {:<GENRE_WIDTH$} {:<RATING_WIDTH$} {}",
            truncate(&row.id, ID_WIDTH),
            truncate(&row.title, TITLE_WIDTH),
            row.year,
            truncate(&row.genre, GENRE_WIDTH),
            row.rating,
            row.director
        )?;
    }
    Ok(())
}

/// Cuts `text` to `width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("Amélie", 10), "Amélie");
        assert_eq!(truncate("Amélie Poulain", 5), "Amél…");
    }

    #[test]
    fn one_line_per_row() {
        let row = MovieRow {
            id: "7".into(),
            title: "Heat".into(),
            year: "1995".into(),
            genre: "Crime".into(),
            rating: "8.3".into(),
            director: "Michael Mann".into(),
        };
        let mut out = String::new();
        render_table_rows(&mut out, &[row.clone(), row]).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with("7      Heat"));
    }
}
