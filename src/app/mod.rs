//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the runtime (`main.rs`) and the query, worker and
//! UI layers.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Input line → Event → handle_event → coordinator effects → Actions → runtime
//!                 ↑                                              │
//!                 └──── TimerFired / WorkerResponse ◄────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`commands`]: Parsing of terminal input lines into events
//! - [`dashboard`]: Dashboard load state
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: The catalog, search and dashboard views
//! - [`state`]: Central application state container and view model computation
//! - [`timers`]: Deadline queue the runtime uses for scheduled timers

pub mod actions;
pub mod commands;
pub mod dashboard;
pub mod handler;
pub mod modes;
pub mod state;
pub mod timers;

pub use actions::Action;
pub use commands::{parse_command, CommandError, HELP};
pub use dashboard::DashboardPanel;
pub use handler::{handle_event, Event};
pub use modes::ViewMode;
pub use state::AppState;
pub use timers::TimerQueue;
