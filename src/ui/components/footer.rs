//! Footer component renderer: status, pagination and notices.

use crate::ui::viewmodel::{PaginationInfo, StatusLine};
use std::fmt::{self, Write};

pub fn render_status<W: Write>(out: &mut W, status: &StatusLine) -> fmt::Result {
    match status {
        StatusLine::Idle => writeln!(out, "Set filters and run `search`."),
        StatusLine::Loading => writeln!(out, "Loading..."),
        StatusLine::Failed(message) => writeln!(out, "Error: {message}"),
        StatusLine::NoResults => writeln!(out, "No movies match these filters."),
        StatusLine::Results { total: 1 } => writeln!(out, "1 movie found"),
        StatusLine::Results { total } => writeln!(out, "{total} movies found"),
        StatusLine::Blank => Ok(()),
    }
}

/// Renders `« prev  Page p of n  next »`, greying out unavailable moves.
pub fn render_pagination<W: Write>(out: &mut W, pagination: Option<&PaginationInfo>) -> fmt::Result {
    let Some(p) = pagination else {
        return Ok(());
    };
    let prev = if p.has_previous { "« prev" } else { "      " };
    let next = if p.has_next { "next »" } else { "" };
    writeln!(out, "{prev}  Page {} of {}  {next}", p.page, p.total_pages)
}

pub fn render_notice<W: Write>(out: &mut W, notice: Option<&str>) -> fmt::Result {
    match notice {
        Some(message) => writeln!(out, "> {message}"),
        None => Ok(()),
    }
}
