//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user commands,
//! timer expiries and worker responses, translating them into state changes
//! and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the input thread, the timer queue or the worker pool
//! 2. [`handle_event`] pattern-matches the event type
//! 3. Coordinators and `AppState` are mutated; coordinators return effects
//! 4. Effects are translated into [`Action`]s and returned for execution
//!
//! # Event Types
//!
//! - **Navigation**: `ShowView` (catalog, search, dashboard), `GoToPage`,
//!   `NextPage`, `PrevPage`
//! - **Filters**: `SetFilter`, `UnsetFilter`, `Search`, `Clear`, `Refresh`
//! - **Catalog edits**: `AddMovie`, `EditMovie`, `DeleteMovie`, `AddReview`
//! - **Detail**: `ShowMovie`, `CloseDetail`
//! - **System**: `Startup`, `TimerFired`, `WorkerResponse`, `Quit`

use crate::app::commands::HELP;
use crate::app::{Action, AppState, ViewMode};
use crate::domain::error::Result;
use crate::domain::{Movie, NewMovie, NewReview, ValidationError};
use crate::query::{Effect, QueryCoordinator, Settlement, TimerToken};
use crate::worker::{Mutation, WorkerMessage, WorkerResponse};

/// Events triggered by user commands, timers, or worker responses.
///
/// The event loop processes these one at a time, so every state transition
/// observes the effects of the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// First event of the session: loads genres and mounts both list views.
    Startup,

    /// Switches the view on screen. List views keep their state; entering
    /// the dashboard reloads it.
    ShowView(ViewMode),

    /// Sets one filter of the active view's draft.
    SetFilter {
        field: String,
        value: String,
    },

    /// Removes one filter from the active view's draft.
    UnsetFilter {
        field: String,
    },

    /// Applies the active view's draft at page 1.
    Search,

    GoToPage(u32),
    NextPage,
    PrevPage,

    /// Resets the active view's filters and results.
    Clear,

    /// Refetches the active view's current page, or reloads the dashboard.
    Refresh,

    /// Loads a movie with its reviews.
    ShowMovie {
        id: String,
    },
    CloseDetail,

    AddMovie(NewMovie),
    EditMovie {
        id: String,
        movie: NewMovie,
    },
    DeleteMovie {
        id: String,
    },
    AddReview {
        movie_id: String,
        review: NewReview,
    },

    Help,

    /// Tears both list coordinators down and leaves the event loop.
    Quit,

    /// A timer armed by [`Action::ScheduleTimer`] expired.
    TimerFired {
        view: ViewMode,
        token: TimerToken,
    },

    /// Wraps a response from the worker pool.
    WorkerResponse(WorkerResponse),
}

impl Event {
    /// Whether the event comes from the user, as opposed to timers or workers.
    #[must_use]
    pub const fn is_command(&self) -> bool {
        !matches!(self, Self::Startup | Self::TimerFired { .. } | Self::WorkerResponse(_))
    }

    /// Short name used as a span field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::ShowView(_) => "show_view",
            Self::SetFilter { .. } => "set_filter",
            Self::UnsetFilter { .. } => "unset_filter",
            Self::Search => "search",
            Self::GoToPage(_) => "go_to_page",
            Self::NextPage => "next_page",
            Self::PrevPage => "prev_page",
            Self::Clear => "clear",
            Self::Refresh => "refresh",
            Self::ShowMovie { .. } => "show_movie",
            Self::CloseDetail => "close_detail",
            Self::AddMovie(_) => "add_movie",
            Self::EditMovie { .. } => "edit_movie",
            Self::DeleteMovie { .. } => "delete_movie",
            Self::AddReview { .. } => "add_review",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::TimerFired { .. } => "timer_fired",
            Self::WorkerResponse(_) => "worker_response",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Returns
///
/// `(render, actions)`: whether the frame changed, and the side effects to
/// run in order.
///
/// # Errors
///
/// Returns [`crate::MovieMatchError::Validation`] when a filter field is
/// unknown, a page is out of range, or a filter or paging command reaches the
/// dashboard. The state is left untouched and no request is issued.
///
/// # Example
///
/// ```rust
/// use moviematch::app::{handle_event, Action, AppState, Event};
/// use std::time::Duration;
///
/// let mut state = AppState::new(10, Duration::from_millis(300));
/// let (render, actions) = handle_event(&mut state, &Event::Startup)?;
/// assert!(render);
/// // genres + the catalog's first page; the search view waits for a submit
/// assert_eq!(actions.len(), 2);
/// # Ok::<(), moviematch::MovieMatchError>(())
/// ```
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name(), view = %state.view).entered();

    if event.is_command() {
        state.notice = None;
    }

    match event {
        Event::Startup => {
            let mut actions = vec![Action::PostToWorker(WorkerMessage::load_genres())];
            for view in ViewMode::LISTS {
                actions.extend(on_list(state, view, QueryCoordinator::mount));
            }
            Ok((true, actions))
        }

        Event::ShowView(view) => {
            tracing::debug!(from = %state.view, to = %view, "switching view");
            let entering_dashboard = *view == ViewMode::Dashboard && state.view != ViewMode::Dashboard;
            state.view = *view;
            let actions = if entering_dashboard { vec![load_dashboard(state)] } else { vec![] };
            Ok((true, actions))
        }

        Event::SetFilter { field, value } => update_filter(state, field, Some(value)),
        Event::UnsetFilter { field } => update_filter(state, field, None),

        Event::Search => {
            let view = active_list(state)?;
            Ok((true, on_list(state, view, QueryCoordinator::search)))
        }

        Event::GoToPage(page) => change_page(state, |_| *page),
        Event::NextPage => change_page(state, |current| current.saturating_add(1)),
        Event::PrevPage => change_page(state, |current| current.saturating_sub(1)),

        Event::Clear => {
            let view = active_list(state)?;
            Ok((true, on_list(state, view, QueryCoordinator::clear)))
        }

        Event::Refresh => {
            if state.view == ViewMode::Dashboard {
                return Ok((true, vec![load_dashboard(state)]));
            }
            let view = state.view;
            Ok((true, on_list(state, view, QueryCoordinator::invalidate)))
        }

        Event::ShowMovie { id } => {
            state.detail = None;
            state.detail_id = Some(id.clone());
            Ok((true, vec![Action::PostToWorker(WorkerMessage::load_movie(id.clone()))]))
        }

        Event::CloseDetail => {
            state.detail = None;
            state.detail_id = None;
            Ok((true, vec![]))
        }

        Event::AddMovie(movie) => Ok((false, vec![Action::PostToWorker(WorkerMessage::create_movie(movie.clone()))])),
        Event::EditMovie { id, movie } => Ok((
            false,
            vec![Action::PostToWorker(WorkerMessage::update_movie(id.clone(), movie.clone()))],
        )),
        Event::DeleteMovie { id } => Ok((false, vec![Action::PostToWorker(WorkerMessage::delete_movie(id.clone()))])),
        Event::AddReview { movie_id, review } => Ok((
            false,
            vec![Action::PostToWorker(WorkerMessage::create_review(movie_id.clone(), review.clone()))],
        )),

        Event::Help => {
            state.notice = Some(HELP.to_string());
            Ok((true, vec![]))
        }

        Event::Quit => {
            for view in ViewMode::LISTS {
                if let Some(coordinator) = state.coordinator_mut(view) {
                    coordinator.teardown();
                }
            }
            Ok((false, vec![Action::Quit]))
        }

        Event::TimerFired { view, token } => {
            let actions = on_list(state, *view, |c| c.on_timer(*token));
            Ok((!actions.is_empty() && *view == state.view, actions))
        }

        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
    }
}

/// The view on screen, if it has a list to filter and page through.
fn active_list(state: &AppState) -> Result<ViewMode> {
    if state.view.is_list() {
        Ok(state.view)
    } else {
        Err(ValidationError::NotAListView(state.view.to_string()).into())
    }
}

/// Runs `operation` on the coordinator behind `view` and maps its effects.
/// Does nothing for views without one.
fn on_list<F>(state: &mut AppState, view: ViewMode, operation: F) -> Vec<Action>
where
    F: FnOnce(&mut QueryCoordinator<Movie>) -> Vec<Effect>,
{
    let Some(coordinator) = state.coordinator_mut(view) else {
        return vec![];
    };
    let effects = operation(coordinator);
    effects_to_actions(state, view, effects)
}

fn update_filter(state: &mut AppState, field: &str, value: Option<&String>) -> Result<(bool, Vec<Action>)> {
    let view = active_list(state)?;
    let Some(coordinator) = state.coordinator_mut(view) else {
        return Ok((false, vec![]));
    };
    let effects = coordinator.update_draft(field, value.map(String::as_str))?;
    Ok((true, effects_to_actions(state, view, effects)))
}

/// Moves the active list to `target(current_page)`.
fn change_page(state: &mut AppState, target: impl FnOnce(u32) -> u32) -> Result<(bool, Vec<Action>)> {
    let view = active_list(state)?;
    let Some(coordinator) = state.coordinator_mut(view) else {
        return Ok((false, vec![]));
    };
    let page = target(coordinator.page());
    let effects = coordinator.change_page(page)?;
    Ok((true, effects_to_actions(state, view, effects)))
}

/// Starts a dashboard load, superseding any earlier one.
fn load_dashboard(state: &mut AppState) -> Action {
    let sequence = state.dashboard.begin_load();
    Action::PostToWorker(WorkerMessage::load_dashboard(sequence))
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::PageSettled { endpoint, sequence, outcome } => {
            let view = ViewMode::from_endpoint(*endpoint);
            let Some(coordinator) = state.coordinator_mut(view) else {
                return (false, vec![]);
            };
            match coordinator.on_settled(*sequence, outcome.clone()) {
                Settlement::Discarded => (false, vec![]),
                Settlement::Failed => (view == state.view, vec![]),
                Settlement::Committed => {
                    let actions = page_backoff(state, view);
                    (view == state.view, actions)
                }
            }
        }

        WorkerResponse::DashboardSettled { sequence, outcome } => {
            let applied = state.dashboard.settle(*sequence, outcome.clone());
            (applied && state.view == ViewMode::Dashboard, vec![])
        }

        WorkerResponse::GenresLoaded { genres } => {
            tracing::debug!(genre_count = genres.len(), "genre options loaded");
            state.genres.clone_from(genres);
            (true, vec![])
        }

        WorkerResponse::MovieLoaded { detail } => {
            if state.detail_id.as_deref() != Some(detail.movie.id.as_str()) {
                tracing::debug!(movie_id = %detail.movie.id, "detail no longer requested, dropped");
                return (false, vec![]);
            }
            state.detail = Some(detail.clone());
            (true, vec![])
        }

        WorkerResponse::MutationApplied { mutation, movie_id } => {
            let _span = tracing::debug_span!("mutation_applied", ?mutation, movie_id = %movie_id).entered();
            state.notice = Some(mutation_notice(*mutation, movie_id));

            let mut actions = Vec::new();
            for view in ViewMode::LISTS {
                actions.extend(on_list(state, view, QueryCoordinator::invalidate));
            }
            if state.view == ViewMode::Dashboard {
                actions.push(load_dashboard(state));
            }

            if state.detail_id.as_deref() == Some(movie_id.as_str()) {
                if *mutation == Mutation::MovieDeleted {
                    state.detail = None;
                    state.detail_id = None;
                } else {
                    actions.push(Action::PostToWorker(WorkerMessage::load_movie(movie_id.clone())));
                }
            }
            (true, actions)
        }

        WorkerResponse::Error { message } => {
            tracing::debug!(error = %message, "worker reported an error");
            state.notice = Some(message.clone());
            (true, vec![])
        }
    }
}

/// Moves back to the last valid page when the committed page lies past the
/// end, e.g. after the only item on the last page was deleted.
fn page_backoff(state: &mut AppState, view: ViewMode) -> Vec<Action> {
    let Some(coordinator) = state.coordinator_mut(view) else {
        return vec![];
    };
    let Some(target) = coordinator.page_backoff() else {
        return vec![];
    };
    tracing::debug!(from = coordinator.page(), to = target, "page past the end, backing off");
    match coordinator.change_page(target) {
        Ok(effects) => effects_to_actions(state, view, effects),
        Err(e) => {
            tracing::debug!(error = %e, "page backoff rejected");
            vec![]
        }
    }
}

fn mutation_notice(mutation: Mutation, movie_id: &str) -> String {
    match mutation {
        Mutation::MovieCreated => format!("Movie {movie_id} added"),
        Mutation::MovieUpdated => format!("Movie {movie_id} updated"),
        Mutation::MovieDeleted => format!("Movie {movie_id} deleted"),
        Mutation::ReviewCreated => format!("Review added to movie {movie_id}"),
    }
}

fn effects_to_actions(state: &AppState, view: ViewMode, effects: Vec<Effect>) -> Vec<Action> {
    let (Some(coordinator), Some(endpoint)) = (state.coordinator(view), view.endpoint()) else {
        return vec![];
    };
    let page_size = coordinator.page_size();
    effects
        .into_iter()
        .map(|effect| match effect {
            Effect::ScheduleTimer(timer) => Action::ScheduleTimer { view, token: timer.token, delay: timer.delay },
            Effect::Fetch(request) => Action::PostToWorker(WorkerMessage::fetch_page(
                endpoint,
                request.sequence,
                request.page,
                page_size,
                request.params,
            )),
        })
        .collect()
}
