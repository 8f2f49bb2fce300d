//! Deadline queue backing [`Action::ScheduleTimer`](crate::app::Action).
//!
//! The runtime pushes every scheduled timer here and turns each due entry into
//! an `Event::TimerFired`. Entries with equal deadlines come out in the order
//! they were scheduled, so a zero-delay timer still fires after the event that
//! armed it has been fully handled.

use crate::app::{Event, ViewMode};
use crate::query::TimerToken;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry {
    deadline: Instant,
    order: u64,
    view: ViewMode,
    token: TimerToken,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.order).cmp(&(other.deadline, other.order))
    }
}

/// Min-heap of pending timers.
///
/// Superseded timers are not removed; the debouncer ignores their tokens when
/// they fire.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_order: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, view: ViewMode, token: TimerToken, delay: Duration) {
        let order = self.next_order;
        self.next_order += 1;
        self.heap.push(Reverse(Entry { deadline: now + delay, order, view, token }));
    }

    /// Time left until the earliest deadline, zero if already due.
    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.heap
            .peek()
            .map(|Reverse(entry)| entry.deadline.saturating_duration_since(now))
    }

    /// Removes and returns the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Event> {
        if self.heap.peek().is_some_and(|Reverse(entry)| entry.deadline <= now) {
            self.heap
                .pop()
                .map(|Reverse(entry)| Event::TimerFired { view: entry.view, token: entry.token })
        } else {
            None
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
