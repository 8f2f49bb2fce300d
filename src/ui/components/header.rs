//! Header component renderer.

use crate::ui::viewmodel::HeaderInfo;
use std::fmt::{self, Write};

/// Renders the title centered over `cols` columns, then the subtitle.
pub fn render_header<W: Write>(out: &mut W, header: &HeaderInfo, cols: usize) -> fmt::Result {
    let title_len = header.title.chars().count();
    let padding = cols.saturating_sub(title_len) / 2;
    writeln!(out, "{}{}", " ".repeat(padding), header.title)?;
    writeln!(out, "{}", header.subtitle)
}
