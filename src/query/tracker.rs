//! Request lifecycle tracking with sequence-number staleness checks.
//!
//! Every request gets a monotonically increasing sequence number when it is
//! issued. When a request settles, its outcome may touch visible state only if
//! its sequence number is still the latest one issued; anything older is
//! discarded without a trace, including its errors. Superseded requests are not
//! aborted at the transport level, they simply lose the right to commit.
//!
//! ```text
//! issue #1 ──────────────────────────────┐ (slow)
//! issue #2 ─────────┐ (fast)             │
//!                   ▼                    ▼
//!              settle #2: commit    settle #1: discard
//! ```

use crate::domain::FetchError;
use crate::query::page::ResultPage;
use crate::query::params::QueryFingerprint;

/// Handle for one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub sequence: u64,
    pub fingerprint: QueryFingerprint,
}

/// What a settlement did to the tracked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Live request succeeded; results replaced, error cleared.
    Committed,
    /// Live request failed; error set, previous results kept.
    Failed,
    /// Request was stale (or the tracker torn down); nothing changed.
    Discarded,
}

/// Loading/error/results state guarded by the latest-issued rule.
#[derive(Debug, Clone)]
pub struct RequestTracker<T> {
    latest_issued: u64,
    live: bool,
    loading: bool,
    error: Option<String>,
    results: Option<ResultPage<T>>,
    torn_down: bool,
}

impl<T> Default for RequestTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestTracker<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest_issued: 0,
            live: false,
            loading: false,
            error: None,
            results: None,
            torn_down: false,
        }
    }

    /// Issues a new request, superseding every earlier one.
    ///
    /// Returns `None` once the tracker has been torn down.
    pub fn issue(&mut self, fingerprint: QueryFingerprint) -> Option<RequestTicket> {
        if self.torn_down {
            return None;
        }
        self.latest_issued += 1;
        self.live = true;
        self.loading = true;

        tracing::debug!(
            sequence = self.latest_issued,
            page = fingerprint.page(),
            "request issued"
        );

        Some(RequestTicket {
            sequence: self.latest_issued,
            fingerprint,
        })
    }

    /// Applies the outcome of request `sequence`.
    ///
    /// Only the latest issued, still-live request may mutate state. A failure
    /// keeps the last committed results so they stay visible under the error.
    pub fn settle(
        &mut self,
        sequence: u64,
        outcome: std::result::Result<ResultPage<T>, FetchError>,
    ) -> Settlement {
        if !self.is_live(sequence) {
            tracing::debug!(
                sequence,
                latest = self.latest_issued,
                "stale settlement discarded"
            );
            return Settlement::Discarded;
        }

        self.live = false;
        self.loading = false;

        match outcome {
            Ok(page) => {
                tracing::debug!(
                    sequence,
                    items = page.items.len(),
                    total_count = page.total_count,
                    "results committed"
                );
                self.error = None;
                self.results = Some(page);
                Settlement::Committed
            }
            Err(err) => {
                tracing::debug!(sequence, error = %err, "request failed");
                self.error = Some(err.message().to_string());
                Settlement::Failed
            }
        }
    }

    /// Logically cancels whatever is in flight without issuing anything new.
    pub fn supersede(&mut self) {
        if self.live {
            tracing::debug!(sequence = self.latest_issued, "in-flight request superseded");
        }
        self.live = false;
        self.loading = false;
    }

    /// Drops results and error, e.g. when the view is cleared.
    pub fn reset(&mut self) {
        self.supersede();
        self.error = None;
        self.results = None;
    }

    /// Supersedes everything; no settlement can mutate state afterwards.
    pub fn teardown(&mut self) {
        self.supersede();
        self.torn_down = true;
    }

    /// Whether a settlement for `sequence` would be allowed to commit.
    #[must_use]
    pub const fn is_live(&self, sequence: u64) -> bool {
        !self.torn_down && self.live && sequence == self.latest_issued
    }

    #[must_use]
    pub const fn latest_issued(&self) -> u64 {
        self.latest_issued
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
    pub fn results(&self) -> Option<&ResultPage<T>> {
        self.results.as_ref()
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::params::QueryParams;

    fn fp(page: u32) -> QueryFingerprint {
        QueryFingerprint::new(QueryParams::default(), page, 10)
    }

    fn page_of(items: Vec<u32>, total_count: u64) -> ResultPage<u32> {
        ResultPage { items, total_count, page_size: 10, page_number: 1 }
    }

    #[test]
    fn issue_sets_loading_and_increments_sequence() {
        let mut t = RequestTracker::<u32>::new();
        let a = t.issue(fp(1)).unwrap();
        let b = t.issue(fp(2)).unwrap();
        assert_eq!(a.sequence + 1, b.sequence);
        assert!(t.loading());
    }

    #[test]
    fn late_older_response_is_discarded() {
        let mut t = RequestTracker::new();
        let r1 = t.issue(fp(1)).unwrap();
        let r2 = t.issue(fp(1)).unwrap();

        assert_eq!(t.settle(r2.sequence, Ok(page_of(vec![2], 1))), Settlement::Committed);
        assert_eq!(t.settle(r1.sequence, Ok(page_of(vec![1], 1))), Settlement::Discarded);
        assert_eq!(t.results().unwrap().items, vec![2]);
        assert!(!t.loading());
    }

    #[test]
    fn stale_failure_does_not_touch_error_or_loading() {
        let mut t = RequestTracker::<u32>::new();
        let r1 = t.issue(fp(1)).unwrap();
        let _r2 = t.issue(fp(1)).unwrap();

        let outcome = Err(FetchError::Network("Could not connect to the API".into()));
        assert_eq!(t.settle(r1.sequence, outcome), Settlement::Discarded);
        assert!(t.error().is_none());
        assert!(t.loading());
    }

    #[test]
    fn failure_keeps_last_good_results() {
        let mut t = RequestTracker::new();
        let r1 = t.issue(fp(1)).unwrap();
        t.settle(r1.sequence, Ok(page_of(vec![1, 2], 2)));

        let r2 = t.issue(fp(2)).unwrap();
        let settled = t.settle(r2.sequence, Err(FetchError::Api("Search failed".into())));
        assert_eq!(settled, Settlement::Failed);
        assert_eq!(t.error(), Some("Search failed"));
        assert_eq!(t.results().unwrap().items, vec![1, 2]);
        assert!(!t.loading());
    }

    #[test]
    fn success_clears_previous_error() {
        let mut t = RequestTracker::new();
        let r1 = t.issue(fp(1)).unwrap();
        t.settle(r1.sequence, Err(FetchError::Api("boom".into())));
        let r2 = t.issue(fp(1)).unwrap();
        t.settle(r2.sequence, Ok(page_of(vec![], 0)));
        assert!(t.error().is_none());
    }

    #[test]
    fn duplicate_settlement_is_discarded() {
        let mut t = RequestTracker::new();
        let r = t.issue(fp(1)).unwrap();
        assert_eq!(t.settle(r.sequence, Ok(page_of(vec![1], 1))), Settlement::Committed);
        assert_eq!(t.settle(r.sequence, Ok(page_of(vec![9], 1))), Settlement::Discarded);
        assert_eq!(t.results().unwrap().items, vec![1]);
    }

    #[test]
    fn supersede_discards_in_flight() {
        let mut t = RequestTracker::new();
        let r = t.issue(fp(1)).unwrap();
        t.supersede();
        assert!(!t.loading());
        assert_eq!(t.settle(r.sequence, Ok(page_of(vec![1], 1))), Settlement::Discarded);
        assert!(t.results().is_none());
    }

    #[test]
    fn teardown_blocks_issue_and_settle() {
        let mut t = RequestTracker::new();
        let r = t.issue(fp(1)).unwrap();
        t.teardown();
        assert_eq!(t.settle(r.sequence, Ok(page_of(vec![1], 1))), Settlement::Discarded);
        assert!(t.issue(fp(1)).is_none());
    }
}
