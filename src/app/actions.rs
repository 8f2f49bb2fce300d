//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! runtime in `main.rs` executes them in order: arming timers, posting to the
//! worker pool, or leaving the event loop.

use crate::app::ViewMode;
use crate::query::TimerToken;
use crate::worker::WorkerMessage;
use std::time::Duration;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Deliver `Event::TimerFired { view, token }` after `delay`.
    ///
    /// A zero delay still goes through the event queue, never inline.
    ScheduleTimer {
        view: ViewMode,
        token: TimerToken,
        delay: Duration,
    },

    /// Posts a message to the worker pool.
    PostToWorker(WorkerMessage),

    /// Leaves the event loop.
    Quit,
}
