//! Timer-token debouncing for rapidly changing inputs.
//!
//! [`Debouncer`] holds a debounced value and at most one pending emission.
//! It never owns a clock: [`Debouncer::push`] hands back a [`TimerRequest`]
//! that the event loop turns into a real timer, and the timer later comes back
//! through [`Debouncer::fire`] carrying its [`TimerToken`]. Only the token of
//! the most recent arm can emit; every earlier token is stale and ignored.
//!
//! Emission is therefore never synchronous, even with a zero delay: the new
//! value becomes visible on the next `fire`, not on the `push` that armed it.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use moviematch::query::Debouncer;
//!
//! let mut d = Debouncer::new(String::new(), Duration::from_millis(300));
//! let first = d.push("N".to_string()).unwrap();
//! let second = d.push("No".to_string()).unwrap();
//!
//! assert_eq!(d.fire(first.token), None);
//! assert_eq!(d.fire(second.token).as_deref(), Some("No"));
//! assert_eq!(d.value(), "No");
//! ```

use std::time::Duration;

/// Identifies one armed emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Request to call [`Debouncer::fire`] with `token` after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    token: TimerToken,
    value: T,
}

/// Debounced value with a single pending emission.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    value: T,
    delay: Duration,
    pending: Option<Pending<T>>,
    next_token: u64,
    torn_down: bool,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Creates a debouncer whose initial emission is `initial`.
    #[must_use]
    pub const fn new(initial: T, delay: Duration) -> Self {
        Self {
            value: initial,
            delay,
            pending: None,
            next_token: 0,
            torn_down: false,
        }
    }

    /// The last emitted value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Configured quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Feeds a new input using the configured quiet period.
    ///
    /// See [`Debouncer::push_with_delay`].
    pub fn push(&mut self, input: T) -> Option<TimerRequest> {
        self.push_with_delay(input, self.delay)
    }

    /// Feeds a new input, cancelling any pending emission and arming a new one.
    ///
    /// Returns `None` without arming when the input equals the latest input
    /// (pending value, or the emitted value if nothing is pending), or after
    /// teardown.
    pub fn push_with_delay(&mut self, input: T, delay: Duration) -> Option<TimerRequest> {
        if self.torn_down {
            return None;
        }
        let latest = self.pending.as_ref().map_or(&self.value, |p| &p.value);
        if *latest == input {
            return None;
        }

        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending = Some(Pending { token, value: input });
        tracing::trace!(token = token.0, delay_ms = delay.as_millis(), "debounce armed");
        Some(TimerRequest { token, delay })
    }

    /// Handles an expired timer.
    ///
    /// Emits the pending value if `token` belongs to the latest arm and the
    /// value differs from the one already emitted. Stale tokens, repeated
    /// tokens and fires after teardown return `None`.
    pub fn fire(&mut self, token: TimerToken) -> Option<T> {
        if self.torn_down {
            return None;
        }
        match &self.pending {
            Some(p) if p.token == token => {}
            _ => {
                tracing::trace!(token = token.0, "stale debounce timer ignored");
                return None;
            }
        }
        let pending = self.pending.take()?;
        if pending.value == self.value {
            return None;
        }
        self.value = pending.value;
        Some(self.value.clone())
    }

    /// Replaces the emitted value immediately and drops any pending emission.
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.value = value;
    }

    /// Cancels any pending emission; no emission happens afterwards.
    pub fn teardown(&mut self) {
        self.pending = None;
        self.torn_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn initial_value_is_first_input() {
        let d = Debouncer::new(5, QUIET);
        assert_eq!(*d.value(), 5);
        assert!(!d.is_pending());
    }

    #[test]
    fn rapid_inputs_coalesce_into_last_value() {
        let mut d = Debouncer::new(0, QUIET);
        let tokens: Vec<_> = (1..=5).filter_map(|v| d.push(v)).map(|r| r.token).collect();
        assert_eq!(tokens.len(), 5);

        for stale in &tokens[..4] {
            assert_eq!(d.fire(*stale), None);
        }
        assert_eq!(d.fire(tokens[4]), Some(5));
        assert_eq!(d.fire(tokens[4]), None);
    }

    #[test]
    fn zero_delay_is_not_synchronous() {
        let mut d = Debouncer::new("a", QUIET);
        let req = d.push_with_delay("b", Duration::ZERO).unwrap();
        assert_eq!(req.delay, Duration::ZERO);
        assert_eq!(*d.value(), "a");
        assert_eq!(d.fire(req.token), Some("b"));
    }

    #[test]
    fn unchanged_input_does_not_rearm() {
        let mut d = Debouncer::new("a", QUIET);
        assert!(d.push("a").is_none());
        let req = d.push("b").unwrap();
        assert!(d.push("b").is_none());
        assert_eq!(d.fire(req.token), Some("b"));
    }

    #[test]
    fn reverting_to_emitted_value_emits_nothing() {
        let mut d = Debouncer::new("a", QUIET);
        d.push("ab").unwrap();
        let back = d.push("a").unwrap();
        assert_eq!(d.fire(back.token), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn teardown_cancels_pending_and_blocks_future_arms() {
        let mut d = Debouncer::new(1, QUIET);
        let req = d.push(2).unwrap();
        d.teardown();
        assert_eq!(d.fire(req.token), None);
        assert!(d.push(3).is_none());
        assert_eq!(*d.value(), 1);
    }

    #[test]
    fn reset_drops_pending_emission() {
        let mut d = Debouncer::new(1, QUIET);
        let req = d.push(2).unwrap();
        d.reset(0);
        assert_eq!(d.fire(req.token), None);
        assert_eq!(*d.value(), 0);
    }
}
