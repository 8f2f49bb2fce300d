//! Terminal rendering layer with component-based architecture.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → text frame
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types and the formatting rules behind them
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Section renderers (header, filters, table, footer, detail,
//!   dashboard)

pub mod components;
pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use viewmodel::{
    active_filter_tags, pagination_info, DashboardInfo, DetailInfo, DraftField, FilterTag, GenreBar, HeaderInfo,
    MovieRow, PaginationInfo, StatusLine, UIViewModel,
};
