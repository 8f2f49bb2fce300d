pub mod coordinator;
pub mod debounce;
pub mod page;
pub mod params;
pub mod tracker;

pub use coordinator::{
    CoordinatorOptions, CoordinatorState, Effect, FetchRequest, Phase, QueryCoordinator, SearchMode,
};
pub use debounce::{Debouncer, TimerRequest, TimerToken};
pub use page::{total_pages, ResultPage};
pub use params::{FieldKind, FieldSpec, FilterDraft, FilterSchema, QueryFingerprint, QueryParams};
pub use tracker::{RequestTicket, RequestTracker, Settlement};
