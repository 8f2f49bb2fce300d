//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process:
//!
//! 1. **View Model Computation**: `AppState` → [`UIViewModel`]
//! 2. **Component Rendering**: each section delegates to a component
//!
//! The frame is produced as a `String`; the runtime decides where to print it.

use crate::app::AppState;
use crate::ui::components::{dashboard, detail, filters, footer, header, render_border, table};
use crate::ui::viewmodel::UIViewModel;
use std::fmt::{self, Write};

/// Renders the current state into a frame `cols` columns wide.
#[must_use]
pub fn render(state: &AppState, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel();
    render_viewmodel(&viewmodel, cols)
}

/// Renders a precomputed view model.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, cols: usize) -> String {
    let mut out = String::new();
    if let Err(e) = write_frame(&mut out, vm, cols) {
        tracing::warn!(error = %e, "frame rendering failed");
    }
    out
}

/// Layout:
/// ```text
/// [Header]
/// [Border]
/// [Detail + Border]   (when open)
/// [Draft filters]     (list views)
/// [Active tags]
/// [Table]
/// [Dashboard]         (dashboard view)
/// [Border]
/// [Status]
/// [Pagination]
/// [Notice]
/// ```
fn write_frame<W: Write>(out: &mut W, vm: &UIViewModel, cols: usize) -> fmt::Result {
    header::render_header(out, &vm.header, cols)?;
    render_border(out, cols)?;

    if let Some(open) = &vm.detail {
        detail::render_detail(out, open)?;
        render_border(out, cols)?;
    }

    if !vm.draft.is_empty() {
        filters::render_draft(out, &vm.draft)?;
    }
    filters::render_tags(out, &vm.tags)?;

    if !vm.rows.is_empty() {
        table::render_table_headers(out)?;
        table::render_table_rows(out, &vm.rows)?;
    }
    if let Some(info) = &vm.dashboard {
        dashboard::render_dashboard(out, info)?;
    }

    render_border(out, cols)?;
    footer::render_status(out, &vm.status)?;
    footer::render_pagination(out, vm.pagination.as_ref())?;
    footer::render_notice(out, vm.notice.as_deref())
}
