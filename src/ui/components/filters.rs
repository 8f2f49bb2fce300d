//! Filter form and active filter tags.

use crate::ui::viewmodel::{DraftField, FilterTag};
use std::fmt::{self, Write};

/// Renders draft values as `key=value` pairs; blank fields show as `-`.
pub fn render_draft<W: Write>(out: &mut W, fields: &[DraftField]) -> fmt::Result {
    let line = fields
        .iter()
        .map(|f| {
            let value = if f.value.is_empty() { "-" } else { f.value.as_str() };
            format!("{}={value}", f.key)
        })
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "Filters: {line}")
}

/// Renders applied filter tags; nothing when no filter is active.
pub fn render_tags<W: Write>(out: &mut W, tags: &[FilterTag]) -> fmt::Result {
    if tags.is_empty() {
        return Ok(());
    }
    let line = tags
        .iter()
        .map(|t| format!("[{}: {}]", t.label, t.value))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "Active: {line}")
}
