//! Background worker threads for API calls.
//!
//! All HTTP traffic runs on a small pool of threads so the event loop never
//! blocks. Requests and responses cross the thread boundary as messages that
//! carry tracing context.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Message processing against the [`crate::transport::Transport`]
//! - `pool`: Thread pool and response delivery

pub mod handler;
pub mod messages;
pub mod pool;

pub use handler::MovieWorker;
pub use messages::{Mutation, TraceContext, WorkerMessage, WorkerResponse};
pub use pool::WorkerPool;
