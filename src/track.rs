use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::state::StateId;
use crate::timer::Instant;

/// Keeps track of how long the machine has been in each (potentially
/// nested) state.
///
/// Hook it into the host's entry and exit actions. Like the rest of the
/// engine it never reads a clock: the caller passes `now` to
/// [`enter`](Self::enter) and [`time_in_state`](Self::time_in_state).
#[derive(Clone, Debug)]
pub struct TimeTracker<S, T> {
    // Entry time per state index, `Some` while the state is occupied.
    entries: Vec<Option<T>>,
    marker: PhantomData<S>,
}

impl<S: StateId, T: Instant> TimeTracker<S, T> {
    pub fn new() -> Self {
        Self {
            entries: vec![None; S::COUNT],
            marker: PhantomData,
        }
    }

    /// Record entry into a state.
    pub fn enter(&mut self, state: S, now: T) {
        self.entries[state.index()] = Some(now);
    }

    /// Record exit from a state, so that stale durations are never
    /// reported for states the machine has left.
    pub fn exit(&mut self, state: S) {
        self.entries[state.index()] = None;
    }

    /// How long the machine has been in `state`, `None` if it is not
    /// currently in it.
    pub fn time_in_state(&self, state: S, now: T) -> Option<T::Duration> {
        self.entries[state.index()].map(|entered| now.duration_since(entered))
    }
}

impl<S: StateId, T: Instant> Default for TimeTracker<S, T> {
    fn default() -> Self {
        Self::new()
    }
}
