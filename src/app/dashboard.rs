//! Dashboard view state.
//!
//! The statistics are fetched each time the view is entered. Loads are
//! numbered like list requests: only the latest one may commit, so a slow
//! response from an earlier visit cannot replace a newer one.

use crate::domain::{DashboardStats, FetchError};

/// Loading, error and statistics of the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardPanel {
    latest_issued: u64,
    loading: bool,
    error: Option<String>,
    stats: Option<DashboardStats>,
}

impl DashboardPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load and returns the sequence number to request it with.
    pub fn begin_load(&mut self) -> u64 {
        self.latest_issued += 1;
        self.loading = true;
        self.error = None;
        tracing::debug!(sequence = self.latest_issued, "dashboard load issued");
        self.latest_issued
    }

    /// Applies the outcome of load `sequence`. Returns `false` when it was
    /// superseded and nothing changed.
    pub fn settle(&mut self, sequence: u64, outcome: std::result::Result<DashboardStats, FetchError>) -> bool {
        if !self.loading || sequence != self.latest_issued {
            tracing::debug!(sequence, latest = self.latest_issued, "stale dashboard load discarded");
            return false;
        }
        self.loading = false;
        match outcome {
            Ok(stats) => {
                self.error = None;
                self.stats = Some(stats);
            }
            Err(e) => self.error = Some(e.message().to_string()),
        }
        true
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }
}
