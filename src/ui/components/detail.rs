//! Movie detail panel.

use crate::ui::viewmodel::DetailInfo;
use std::fmt::{self, Write};

pub fn render_detail<W: Write>(out: &mut W, detail: &DetailInfo) -> fmt::Result {
    writeln!(out, "{}", detail.heading)?;
    if let Some(description) = &detail.description {
        writeln!(out, "  {description}")?;
    }
    if detail.reviews.is_empty() {
        return writeln!(out, "  No reviews yet.");
    }
    writeln!(out, "  Reviews ({}):", detail.reviews.len())?;
    for review in &detail.reviews {
        writeln!(out, "  - {review}")?;
    }
    Ok(())
}
