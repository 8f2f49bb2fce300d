//! Worker implementation for API calls.
//!
//! A [`MovieWorker`] turns one [`WorkerMessage`] into one [`WorkerResponse`]
//! by calling the [`Transport`]. It holds no mutable state, so a single
//! instance is shared by every thread of the pool.

use crate::domain::FetchError;
use crate::transport::{Reply, Transport};
use crate::worker::messages::Mutation;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::Arc;

/// Executes worker messages against the API.
#[derive(Clone)]
pub struct MovieWorker {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for MovieWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieWorker").finish_non_exhaustive()
    }
}

impl MovieWorker {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Helper for handling API replies with consistent logging.
    ///
    /// Unwraps the envelope, falling back to `default_error` when the API
    /// fails without a message, and maps any failure to
    /// [`WorkerResponse::Error`].
    fn handle_reply<D, F>(operation: &str, default_error: &str, reply: Reply<D>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(D) -> WorkerResponse,
    {
        match reply.and_then(|envelope| envelope.into_data(default_error)) {
            Ok(value) => {
                tracing::debug!(operation, "api operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation, error = %e, "api operation failed");
                WorkerResponse::Error { message: e.message().to_string() }
            }
        }
    }

    fn handle_fetch_page(
        &self,
        endpoint: crate::transport::ListEndpoint,
        sequence: u64,
        page: u32,
        page_size: u32,
        params: &[(String, String)],
    ) -> WorkerResponse {
        let outcome: std::result::Result<_, FetchError> = self
            .transport
            .list(endpoint, params)
            .and_then(|envelope| envelope.into_page(page, page_size, endpoint.default_error()));

        match &outcome {
            Ok(result) => tracing::debug!(
                ?endpoint,
                sequence,
                items = result.items.len(),
                total_count = result.total_count,
                "page fetched"
            ),
            Err(e) => tracing::debug!(?endpoint, sequence, error = %e, "page fetch failed"),
        }

        WorkerResponse::PageSettled { endpoint, sequence, outcome }
    }

    fn handle_mutation<D>(operation: &str, default_error: &str, reply: Reply<D>, mutation: Mutation, movie_id: String) -> WorkerResponse {
        Self::handle_reply(operation, default_error, reply, |_| {
            tracing::debug!(?mutation, movie_id = %movie_id, "mutation applied");
            WorkerResponse::MutationApplied { mutation, movie_id }
        })
    }

    /// Attaches the parent trace context carried by `message` to this thread.
    ///
    /// Spans created while the returned guard is held become children of the
    /// span that built the message.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response to post back.
    pub fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = message.kind());
        let _guard = span.entered();

        match message {
            WorkerMessage::FetchPage { endpoint, sequence, page, page_size, params, .. } => {
                self.handle_fetch_page(endpoint, sequence, page, page_size, &params)
            }

            WorkerMessage::LoadGenres { .. } => Self::handle_reply(
                "load genres",
                "Failed to load genres",
                self.transport.genres(),
                |genres| {
                    tracing::debug!(genre_count = genres.len(), "genres loaded");
                    WorkerResponse::GenresLoaded { genres }
                },
            ),

            WorkerMessage::LoadMovie { id, .. } => {
                Self::handle_reply("load movie", "Movie not found", self.transport.movie(&id), |detail| {
                    WorkerResponse::MovieLoaded { detail }
                })
            }

            WorkerMessage::CreateMovie { movie, .. } => {
                Self::handle_reply("create movie", "Failed to create movie", self.transport.create_movie(&movie), |created| {
                    tracing::debug!(movie_id = %created.id, "mutation applied");
                    WorkerResponse::MutationApplied { mutation: Mutation::MovieCreated, movie_id: created.id }
                })
            }

            WorkerMessage::UpdateMovie { id, movie, .. } => Self::handle_mutation(
                "update movie",
                "Failed to update movie",
                self.transport.update_movie(&id, &movie),
                Mutation::MovieUpdated,
                id,
            ),

            WorkerMessage::DeleteMovie { id, .. } => Self::handle_mutation(
                "delete movie",
                "Failed to delete movie",
                self.transport.delete_movie(&id),
                Mutation::MovieDeleted,
                id,
            ),

            WorkerMessage::CreateReview { movie_id, review, .. } => Self::handle_mutation(
                "create review",
                "Failed to create review",
                self.transport.create_review(&movie_id, &review),
                Mutation::ReviewCreated,
                movie_id,
            ),

            WorkerMessage::LoadDashboard { sequence, .. } => {
                let outcome = self
                    .transport
                    .dashboard()
                    .and_then(|envelope| envelope.into_data("Failed to load dashboard"));
                match &outcome {
                    Ok(stats) => tracing::debug!(sequence, total_movies = stats.total_movies, "dashboard loaded"),
                    Err(e) => tracing::debug!(sequence, error = %e, "dashboard load failed"),
                }
                WorkerResponse::DashboardSettled { sequence, outcome }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DashboardStats, Genre, Movie, MovieDetail, NewMovie, NewReview, Review};
    use crate::transport::{Envelope, ListEndpoint, NETWORK_ERROR};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CannedTransport {
        list_calls: Mutex<Vec<Vec<(String, String)>>>,
        fail_network: bool,
    }

    fn movie(id: &str) -> Movie {
        serde_json::from_value(serde_json::json!({ "id": id, "title": format!("Movie {id}") })).unwrap()
    }

    impl Transport for CannedTransport {
        fn list(&self, _endpoint: ListEndpoint, params: &[(String, String)]) -> Reply<Vec<Movie>> {
            self.list_calls.lock().unwrap().push(params.to_vec());
            if self.fail_network {
                return Err(FetchError::Network(NETWORK_ERROR.into()));
            }
            Ok(Envelope::ok(vec![movie("1"), movie("2")]).with_total(12))
        }

        fn genres(&self) -> Reply<Vec<Genre>> {
            Ok(Envelope::ok(vec![Genre { value: "scifi".into(), label: "Science Fiction".into() }]))
        }

        fn movie(&self, _id: &str) -> Reply<MovieDetail> {
            Ok(Envelope::failure(""))
        }

        fn create_movie(&self, _movie: &NewMovie) -> Reply<Movie> {
            Ok(Envelope::ok(movie("99")))
        }

        fn update_movie(&self, _id: &str, _movie: &NewMovie) -> Reply<Movie> {
            Ok(Envelope::failure("Title is required"))
        }

        fn delete_movie(&self, _id: &str) -> Reply<serde_json::Value> {
            Ok(Envelope::ok(serde_json::Value::Null))
        }

        fn create_review(&self, _movie_id: &str, _review: &NewReview) -> Reply<Review> {
            Err(FetchError::Network(NETWORK_ERROR.into()))
        }

        fn dashboard(&self) -> Reply<DashboardStats> {
            if self.fail_network {
                return Err(FetchError::Network(NETWORK_ERROR.into()));
            }
            Ok(Envelope::failure(""))
        }
    }

    fn worker(transport: CannedTransport) -> MovieWorker {
        MovieWorker::new(Arc::new(transport))
    }

    #[test]
    fn fetch_page_echoes_sequence_and_maps_total() {
        let w = worker(CannedTransport::default());
        let params = vec![("page".to_string(), "2".to_string()), ("limit".to_string(), "10".to_string())];
        let response = w.handle_message(WorkerMessage::fetch_page(ListEndpoint::Catalog, 5, 2, 10, params));

        match response {
            WorkerResponse::PageSettled { endpoint, sequence, outcome } => {
                assert_eq!(endpoint, ListEndpoint::Catalog);
                assert_eq!(sequence, 5);
                let page = outcome.unwrap();
                assert_eq!(page.total_count, 12);
                assert_eq!(page.page_number, 2);
                assert_eq!(page.total_pages(), 2);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn fetch_page_network_failure_is_settled_not_dropped() {
        let w = worker(CannedTransport { fail_network: true, ..Default::default() });
        let response = w.handle_message(WorkerMessage::fetch_page(ListEndpoint::Search, 1, 1, 10, vec![]));
        assert_eq!(
            response,
            WorkerResponse::PageSettled {
                endpoint: ListEndpoint::Search,
                sequence: 1,
                outcome: Err(FetchError::Network(NETWORK_ERROR.into())),
            }
        );
    }

    #[test]
    fn api_failure_without_message_uses_default() {
        let w = worker(CannedTransport::default());
        let response = w.handle_message(WorkerMessage::load_movie("3".into()));
        assert_eq!(response, WorkerResponse::Error { message: "Movie not found".into() });
    }

    #[test]
    fn mutations_report_affected_movie() {
        let w = worker(CannedTransport::default());
        assert_eq!(
            w.handle_message(WorkerMessage::delete_movie("8".into())),
            WorkerResponse::MutationApplied { mutation: Mutation::MovieDeleted, movie_id: "8".into() }
        );

        let new_movie = NewMovie {
            title: "Heat".into(),
            year: 1995,
            genre: "crime".into(),
            rating: 8.3,
            director: "Michael Mann".into(),
            description: None,
        };
        assert_eq!(
            w.handle_message(WorkerMessage::create_movie(new_movie.clone())),
            WorkerResponse::MutationApplied { mutation: Mutation::MovieCreated, movie_id: "99".into() }
        );
        assert_eq!(
            w.handle_message(WorkerMessage::update_movie("8".into(), new_movie)),
            WorkerResponse::Error { message: "Title is required".into() }
        );
    }

    #[test]
    fn review_network_failure_maps_to_error_response() {
        let w = worker(CannedTransport::default());
        let review = NewReview { author: "ana".into(), rating: 9.0, comment: "great".into() };
        assert_eq!(
            w.handle_message(WorkerMessage::create_review("1".into(), review)),
            WorkerResponse::Error { message: NETWORK_ERROR.into() }
        );
    }

    #[test]
    fn dashboard_outcome_is_settled_with_its_sequence() {
        let w = worker(CannedTransport::default());
        assert_eq!(
            w.handle_message(WorkerMessage::load_dashboard(4)),
            WorkerResponse::DashboardSettled {
                sequence: 4,
                outcome: Err(FetchError::Api("Failed to load dashboard".into())),
            }
        );

        let offline = worker(CannedTransport { fail_network: true, ..Default::default() });
        assert_eq!(
            offline.handle_message(WorkerMessage::load_dashboard(5)),
            WorkerResponse::DashboardSettled { sequence: 5, outcome: Err(FetchError::Network(NETWORK_ERROR.into())) }
        );
    }
}
