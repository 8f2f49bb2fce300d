//! Composable UI component renderers.
//!
//! Each component writes one section of the frame into any
//! [`std::fmt::Write`] sink and knows nothing about the others.
//!
//! # Components
//!
//! - [`header`]: View title and how filters apply
//! - [`filters`]: Draft values and applied filter tags
//! - [`table`]: Result rows
//! - [`footer`]: Status line, pagination indicator and notices
//! - [`detail`]: Open movie with its reviews
//! - [`dashboard`]: Catalog statistics

pub mod dashboard;
pub mod detail;
pub mod filters;
pub mod footer;
pub mod header;
pub mod table;

use std::fmt::{self, Write};

/// Horizontal rule separating sections.
pub fn render_border<W: Write>(out: &mut W, cols: usize) -> fmt::Result {
    writeln!(out, "{}", "─".repeat(cols))
}
