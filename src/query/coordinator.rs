//! Query coordinator: filter draft, applied snapshot, pagination and results.
//!
//! One [`QueryCoordinator`] backs one list or search view. It composes the
//! [`Debouncer`], the [`FilterSchema`] normalization and the
//! [`RequestTracker`] and runs in one of two modes:
//!
//! - **Reactive**: every draft change re-arms a debounce; when it fires the
//!   draft is applied at page 1. Paging and invalidation work against the
//!   filters of the latest issued request, committed or not.
//! - **Explicit**: draft changes only edit the form. [`QueryCoordinator::search`]
//!   applies it; paging re-applies the last applied snapshot.
//!
//! The coordinator performs no I/O. Each operation returns [`Effect`]s that the
//! caller executes (arm a timer, send a fetch) and later feeds back through
//! [`QueryCoordinator::on_timer`] and [`QueryCoordinator::on_settled`].
//!
//! # State machine
//!
//! ```text
//! Idle ──apply──▶ Loading ──ok──▶ Ready ──apply──▶ Loading ...
//!                    └──err──▶ Failed ──apply──▶ Loading ...
//! ```
//!
//! `Idle` only exists in explicit mode; a reactive coordinator fetches as soon
//! as it is mounted.

use crate::domain::{FetchError, ValidationError};
use crate::query::debounce::{Debouncer, TimerRequest, TimerToken};
use crate::query::page::ResultPage;
use crate::query::params::{FieldKind, FilterDraft, FilterSchema, QueryFingerprint};
use crate::query::tracker::{RequestTracker, Settlement};
use std::time::Duration;

/// When the draft gets applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Filter changes auto-apply after the debounce quiet period.
    Reactive,
    /// Filters apply only on an explicit search action.
    Explicit,
}

/// Coarse lifecycle phase derived from the coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Side effect requested by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call [`QueryCoordinator::on_timer`] with `token` after `delay`.
    ScheduleTimer(TimerRequest),
    /// Perform a fetch and report it through [`QueryCoordinator::on_settled`].
    Fetch(FetchRequest),
}

/// A fetch to perform on behalf of the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Sequence number to hand back on settlement.
    pub sequence: u64,
    pub page: u32,
    /// Filter parameters followed by `page` and `limit`.
    pub params: Vec<(String, String)>,
}

/// Construction parameters for a coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    pub mode: SearchMode,
    pub page_size: u32,
    /// Quiet period for text and number fields in reactive mode.
    pub debounce: Duration,
}

/// Read-only copy of the coordinator state for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorState<T> {
    pub draft: FilterDraft,
    pub applied: Option<FilterDraft>,
    pub page: u32,
    pub loading: bool,
    pub error: Option<String>,
    pub results: Option<ResultPage<T>>,
}

#[derive(Debug, Clone)]
struct PendingApply {
    sequence: u64,
    fingerprint: QueryFingerprint,
    snapshot: FilterDraft,
    page: u32,
}

/// Debounced, race-safe query state for one view.
#[derive(Debug, Clone)]
pub struct QueryCoordinator<T> {
    mode: SearchMode,
    schema: FilterSchema,
    page_size: u32,
    draft: FilterDraft,
    applied: Option<FilterDraft>,
    page: u32,
    debouncer: Debouncer<FilterDraft>,
    tracker: RequestTracker<T>,
    pending: Option<PendingApply>,
    /// Filters of the most recently issued request.
    issued: FilterDraft,
}

impl<T: Clone> QueryCoordinator<T> {
    /// Creates a coordinator with the draft at schema defaults and no results.
    #[must_use]
    pub fn new(schema: FilterSchema, options: &CoordinatorOptions) -> Self {
        let draft = FilterDraft::defaults(&schema);
        Self {
            mode: options.mode,
            page_size: options.page_size.max(1),
            debouncer: Debouncer::new(draft.clone(), options.debounce),
            issued: draft.clone(),
            draft,
            schema,
            applied: None,
            page: 1,
            tracker: RequestTracker::new(),
            pending: None,
        }
    }

    /// Effects to run when the owning view appears.
    ///
    /// Reactive coordinators fetch the default listing immediately; explicit
    /// ones stay idle until the first search.
    pub fn mount(&mut self) -> Vec<Effect> {
        match self.mode {
            SearchMode::Reactive => {
                let filters = self.draft.clone();
                self.issue(filters, 1, false)
            }
            SearchMode::Explicit => vec![],
        }
    }

    /// Edits one draft field. `None` removes the field.
    ///
    /// In reactive mode this re-arms the debounce; the eventual apply always
    /// targets page 1.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownField`] if the schema does not declare
    /// `field`. The draft is left untouched.
    pub fn update_draft(
        &mut self,
        field: &str,
        value: Option<&str>,
    ) -> std::result::Result<Vec<Effect>, ValidationError> {
        let Some(spec) = self.schema.spec(field) else {
            tracing::debug!(field, "rejected unknown filter field");
            return Err(ValidationError::UnknownField(field.to_string()));
        };
        if self.tracker.is_torn_down() {
            return Ok(vec![]);
        }

        let changed = match value {
            Some(v) => self.draft.set(field, v),
            None => self.draft.remove(field),
        };
        if !changed || self.mode == SearchMode::Explicit {
            return Ok(vec![]);
        }

        let delay = match spec.kind {
            FieldKind::Choice { .. } => Duration::ZERO,
            FieldKind::Text | FieldKind::Number => self.debouncer.delay(),
        };
        Ok(self
            .debouncer
            .push_with_delay(self.draft.clone(), delay)
            .map(Effect::ScheduleTimer)
            .into_iter()
            .collect())
    }

    /// Handles an expired debounce timer.
    pub fn on_timer(&mut self, token: TimerToken) -> Vec<Effect> {
        if self.tracker.is_torn_down() {
            return vec![];
        }
        match self.debouncer.fire(token) {
            Some(filters) => {
                tracing::debug!(token = token.0, "debounce fired");
                self.issue(filters, 1, false)
            }
            None => vec![],
        }
    }

    /// Explicit search action: applies the current draft at page 1.
    pub fn search(&mut self) -> Vec<Effect> {
        let filters = self.draft.clone();
        self.debouncer.reset(filters.clone());
        self.apply(filters, 1)
    }

    /// Normalizes `filters` and issues a request for `page`.
    ///
    /// A request identical to the one already in flight is not sent again.
    /// On success the coordinator adopts `filters` as its applied snapshot and
    /// `page` as its current page.
    pub fn apply(&mut self, filters: FilterDraft, page: u32) -> Vec<Effect> {
        self.issue(filters, page.max(1), false)
    }

    /// Moves to another page of the applied filters.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NoAppliedSearch`] in explicit mode before any
    ///   search succeeded.
    /// - [`ValidationError::PageOutOfRange`] if `new_page` is outside
    ///   `[1, total_pages]`.
    ///
    /// Rejections issue no request and change nothing.
    pub fn change_page(&mut self, new_page: u32) -> std::result::Result<Vec<Effect>, ValidationError> {
        let Some(snapshot) = self.paging_filters() else {
            tracing::debug!(new_page, "page change rejected, nothing applied");
            return Err(ValidationError::NoAppliedSearch);
        };

        let bound = self.page_bound();
        if new_page < 1 || new_page > bound {
            tracing::debug!(new_page, total_pages = bound, "page change rejected");
            return Err(ValidationError::PageOutOfRange {
                requested: new_page,
                total_pages: bound,
            });
        }
        if self.tracker.is_torn_down() {
            return Ok(vec![]);
        }
        Ok(self.issue(snapshot, new_page, false))
    }

    /// Resets filters, snapshot, page, results and error.
    ///
    /// Anything in flight is superseded. Reactive coordinators immediately
    /// refetch the default listing; explicit ones return to `Idle`.
    pub fn clear(&mut self) -> Vec<Effect> {
        if self.tracker.is_torn_down() {
            return vec![];
        }
        let _span = tracing::debug_span!("coordinator_clear", mode = ?self.mode).entered();

        self.draft = FilterDraft::defaults(&self.schema);
        self.debouncer.reset(self.draft.clone());
        self.applied = None;
        self.page = 1;
        self.pending = None;
        self.tracker.reset();

        match self.mode {
            SearchMode::Reactive => {
                let filters = self.draft.clone();
                self.issue(filters, 1, false)
            }
            SearchMode::Explicit => vec![],
        }
    }

    /// Refetches the current page after an external mutation.
    ///
    /// Filters and position are preserved. An explicit coordinator that has
    /// never searched has nothing on screen to refresh and does nothing.
    pub fn invalidate(&mut self) -> Vec<Effect> {
        if self.tracker.is_torn_down() {
            return vec![];
        }
        let Some(snapshot) = self.paging_filters() else {
            return vec![];
        };
        tracing::debug!(page = self.page, "invalidating current page");
        self.issue(snapshot, self.page, true)
    }

    /// Applies the outcome of request `sequence`.
    pub fn on_settled(
        &mut self,
        sequence: u64,
        outcome: std::result::Result<ResultPage<T>, FetchError>,
    ) -> Settlement {
        let settlement = self.tracker.settle(sequence, outcome);
        match settlement {
            Settlement::Committed => {
                if let Some(pending) = self.pending.take() {
                    self.applied = Some(pending.snapshot);
                    self.page = pending.page;
                }
            }
            Settlement::Failed => self.pending = None,
            Settlement::Discarded => {}
        }
        settlement
    }

    /// Page to fall back to when the committed page lies past the end.
    ///
    /// After an invalidation removes the last items of the last page, the
    /// refreshed result reports fewer pages than the current page. The caller
    /// re-issues with [`QueryCoordinator::change_page`] at the returned page.
    #[must_use]
    pub fn page_backoff(&self) -> Option<u32> {
        if self.tracker.loading() {
            return None;
        }
        let results = self.tracker.results()?;
        let total = results.total_pages();
        (self.page > 1 && total < self.page).then_some(total.max(1))
    }

    /// Cancels pending debounce and supersedes in-flight requests for good.
    pub fn teardown(&mut self) {
        tracing::debug!(mode = ?self.mode, "coordinator torn down");
        self.debouncer.teardown();
        self.tracker.teardown();
        self.pending = None;
    }

    fn issue(&mut self, filters: FilterDraft, page: u32, force: bool) -> Vec<Effect> {
        let params = self.schema.build_params(&filters);
        let fingerprint = QueryFingerprint::new(params, page, self.page_size);

        if !force {
            if let Some(pending) = &self.pending {
                if self.tracker.is_live(pending.sequence) && pending.fingerprint == fingerprint {
                    tracing::debug!(sequence = pending.sequence, "identical request in flight, not reissued");
                    return vec![];
                }
            }
        }

        let Some(ticket) = self.tracker.issue(fingerprint) else {
            return vec![];
        };
        let request = FetchRequest {
            sequence: ticket.sequence,
            page,
            params: ticket.fingerprint.request_params(),
        };
        self.issued = filters.clone();
        self.pending = Some(PendingApply {
            sequence: ticket.sequence,
            fingerprint: ticket.fingerprint,
            snapshot: filters,
            page,
        });
        vec![Effect::Fetch(request)]
    }

    /// Filters that paging and invalidation re-issue.
    ///
    /// A reactive view has already applied whatever it last sent, even while
    /// that request is in flight. An explicit view only pages through a
    /// search that succeeded.
    fn paging_filters(&self) -> Option<FilterDraft> {
        match self.mode {
            SearchMode::Reactive => Some(self.issued.clone()),
            SearchMode::Explicit => self.applied.clone(),
        }
    }

    fn page_bound(&self) -> u32 {
        self.tracker
            .results()
            .map_or(1, ResultPage::total_pages)
            .max(1)
    }

    #[must_use]
    pub const fn mode(&self) -> SearchMode {
        self.mode
    }

    #[must_use]
    pub const fn schema(&self) -> &FilterSchema {
        &self.schema
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub const fn draft(&self) -> &FilterDraft {
        &self.draft
    }

    #[must_use]
    pub const fn applied(&self) -> Option<&FilterDraft> {
        self.applied.as_ref()
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.tracker.loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.tracker.error()
    }

    #[must_use]
    pub fn results(&self) -> Option<&ResultPage<T>> {
        self.tracker.results()
    }

    /// Total pages of the committed results, zero before any result.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.results().map_or(0, ResultPage::total_pages)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.tracker.loading() {
            Phase::Loading
        } else if self.tracker.error().is_some() {
            Phase::Failed
        } else if self.tracker.results().is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    /// Owned copy of the presentation-relevant state.
    #[must_use]
    pub fn snapshot(&self) -> CoordinatorState<T> {
        CoordinatorState {
            draft: self.draft.clone(),
            applied: self.applied.clone(),
            page: self.page,
            loading: self.tracker.loading(),
            error: self.tracker.error().map(str::to_string),
            results: self.tracker.results().cloned(),
        }
    }
}
