//! Worker pool message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the event
//! loop thread and the worker threads that talk to the API. It also carries
//! tracing context across the thread boundary so worker spans link to the
//! event that issued them.

use crate::domain::{DashboardStats, FetchError, Genre, Movie, MovieDetail, NewMovie, NewReview};
use crate::query::ResultPage;
use crate::transport::ListEndpoint;
use serde::{Deserialize, Serialize};

/// Trace and parent span ids of the span that built a message.
///
/// The worker re-attaches them so its spans join the same trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// 32 hex digits.
    pub trace_id: String,

    /// 16 hex digits.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the current span, or `None` when it has no valid
    /// OpenTelemetry context (no layer installed, or outside any span).
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let context = tracing::Span::current().context();
        let span = context.span();
        let ids = span.span_context();

        ids.is_valid().then(|| Self {
            trace_id: format!("{:032x}", ids.trace_id()),
            parent_span_id: format!("{:016x}", ids.span_id()),
        })
    }
}

/// Generates constructors for `WorkerMessage` variants that attach the
/// current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Builds a `", stringify!($variant), "` carrying the current trace context.")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_page(FetchPage {
        endpoint: ListEndpoint,
        sequence: u64,
        page: u32,
        page_size: u32,
        params: Vec<(String, String)>,
    }),
    load_genres(LoadGenres {}),
    load_movie(LoadMovie { id: String }),
    create_movie(CreateMovie { movie: NewMovie }),
    update_movie(UpdateMovie { id: String, movie: NewMovie }),
    delete_movie(DeleteMovie { id: String }),
    create_review(CreateReview { movie_id: String, review: NewReview }),
    load_dashboard(LoadDashboard { sequence: u64 }),
}

/// Requests sent from the event loop to the worker pool.
///
/// Every variant carries an optional trace context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch one page for the coordinator behind `endpoint`.
    FetchPage {
        endpoint: ListEndpoint,
        /// Ticket sequence to echo back so stale replies can be discarded.
        sequence: u64,
        page: u32,
        page_size: u32,
        /// Filters followed by `page` and `limit`.
        params: Vec<(String, String)>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load the genre options used for filter labels.
    LoadGenres {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load a movie with its reviews.
    LoadMovie {
        id: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    CreateMovie {
        movie: NewMovie,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    UpdateMovie {
        id: String,
        movie: NewMovie,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    DeleteMovie {
        id: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    CreateReview {
        movie_id: String,
        review: NewReview,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load the dashboard statistics for one dashboard visit.
    LoadDashboard {
        sequence: u64,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context attached when the message was built.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchPage { trace_context, .. }
            | Self::LoadGenres { trace_context }
            | Self::LoadMovie { trace_context, .. }
            | Self::CreateMovie { trace_context, .. }
            | Self::UpdateMovie { trace_context, .. }
            | Self::DeleteMovie { trace_context, .. }
            | Self::CreateReview { trace_context, .. }
            | Self::LoadDashboard { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short name used as a span field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FetchPage { .. } => "fetch_page",
            Self::LoadGenres { .. } => "load_genres",
            Self::LoadMovie { .. } => "load_movie",
            Self::CreateMovie { .. } => "create_movie",
            Self::UpdateMovie { .. } => "update_movie",
            Self::DeleteMovie { .. } => "delete_movie",
            Self::CreateReview { .. } => "create_review",
            Self::LoadDashboard { .. } => "load_dashboard",
        }
    }
}

/// Which mutation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    MovieCreated,
    MovieUpdated,
    MovieDeleted,
    ReviewCreated,
}

/// Responses sent from the worker pool back to the event loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A page fetch settled, successfully or not.
    PageSettled {
        endpoint: ListEndpoint,
        sequence: u64,
        outcome: std::result::Result<ResultPage<Movie>, FetchError>,
    },

    GenresLoaded {
        genres: Vec<Genre>,
    },

    MovieLoaded {
        detail: MovieDetail,
    },

    /// A dashboard load settled, successfully or not.
    DashboardSettled {
        sequence: u64,
        outcome: std::result::Result<DashboardStats, FetchError>,
    },

    /// A mutation succeeded; live coordinators should refresh.
    MutationApplied {
        mutation: Mutation,
        /// Id of the affected movie.
        movie_id: String,
    },

    /// A non-page operation failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_fill_fields() {
        let msg = WorkerMessage::fetch_page(
            ListEndpoint::Search,
            7,
            2,
            10,
            vec![("page".into(), "2".into())],
        );
        match msg {
            WorkerMessage::FetchPage { endpoint, sequence, page, .. } => {
                assert_eq!(endpoint, ListEndpoint::Search);
                assert_eq!(sequence, 7);
                assert_eq!(page, 2);
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn no_trace_context_without_otel_layer() {
        let msg = WorkerMessage::load_genres();
        assert_eq!(msg.trace_context(), None);
        assert_eq!(msg.kind(), "load_genres");
    }

    #[test]
    fn trace_context_is_omitted_from_json_when_absent() {
        let msg = WorkerMessage::delete_movie("42".into());
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("trace_context"));
    }
}
