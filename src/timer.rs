use alloc::vec::Vec;

use crate::event::EventId;
use crate::queue::EventQueue;
use crate::state::StateId;

/// A point on a monotonic timeline.
///
/// The engine never reads a clock; every `now` is injected by the caller.
/// Any totally ordered, copyable representation works: `u64` tick counters
/// (handy in tests and on bare metal) and `std::time::Instant` (with the
/// `std` feature) are provided.
pub trait Instant: Copy + Ord {
    type Duration: Copy + PartialOrd;

    /// This instant shifted `duration` into the future.
    fn advanced_by(self, duration: Self::Duration) -> Self;

    /// Time elapsed since `earlier`, zero if `earlier` is not earlier.
    fn duration_since(self, earlier: Self) -> Self::Duration;
}

impl Instant for u64 {
    type Duration = u64;

    fn advanced_by(self, duration: u64) -> u64 {
        self.saturating_add(duration)
    }

    fn duration_since(self, earlier: u64) -> u64 {
        self.saturating_sub(earlier)
    }
}

#[cfg(feature = "std")]
impl Instant for std::time::Instant {
    type Duration = core::time::Duration;

    fn advanced_by(self, duration: core::time::Duration) -> Self {
        self + duration
    }

    fn duration_since(self, earlier: Self) -> core::time::Duration {
        self.saturating_duration_since(earlier)
    }
}

/// A pending event scheduled to fire at a deadline.
///
/// Timers are registered under a *group* (the state that armed them, so
/// that leaving the state can clear them) and an optional *unique* tag
/// that lets several timers share the same event and group.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Timer<E, G, T, U = ()> {
    event: E,
    group: G,
    deadline: T,
    unique: U,
}

impl<E, G, T, U> Timer<E, G, T, U> {
    pub fn new(event: E, group: G, deadline: T, unique: U) -> Self {
        Self {
            event,
            group,
            deadline,
            unique,
        }
    }

    pub fn event(&self) -> E
    where
        E: Copy,
    {
        self.event
    }

    pub fn group(&self) -> G
    where
        G: Copy,
    {
        self.group
    }

    pub fn deadline(&self) -> T
    where
        T: Copy,
    {
        self.deadline
    }

    pub fn unique(&self) -> U
    where
        U: Copy,
    {
        self.unique
    }

    /// A timer fires once `now` reaches its deadline.
    pub fn is_expired(&self, now: T) -> bool
    where
        T: Instant,
    {
        self.deadline <= now
    }
}

/// A collection of pending timers owned by a state machine.
///
/// Arming a timer with the same `(event, group, unique)` triple as an
/// existing one replaces it. Clearing a timer that does not exist is not
/// an error. [`check_timers`](Self::check_timers) moves every expired
/// timer's event into the given queue, removes those timers, and records
/// `now` as the base for duration-relative arming with
/// [`add_timer_in`](Self::add_timer_in).
pub trait TimerBank: Default {
    type Event: EventId;
    type Group: Copy + PartialEq;
    type Time: Instant;
    type Unique: Copy + PartialEq + Default;

    fn is_empty(&self) -> bool;

    /// Arm a timer that emits `event` once `now` reaches `deadline`.
    fn add_timer(
        &mut self,
        event: Self::Event,
        group: Self::Group,
        deadline: Self::Time,
        unique: Self::Unique,
    );

    /// Arm a timer `delay` after the latest time seen by
    /// [`check_timers`](Self::check_timers). Arming before any time has
    /// been seen is a host error: it aborts in debug builds and does
    /// nothing in release builds.
    fn add_timer_in(
        &mut self,
        event: Self::Event,
        group: Self::Group,
        delay: <Self::Time as Instant>::Duration,
        unique: Self::Unique,
    );

    /// Remove every timer matching the `(event, group, unique)` triple.
    fn clear_timer(&mut self, event: Self::Event, group: Self::Group, unique: Self::Unique);

    /// Remove every timer registered under `group`.
    fn clear_group(&mut self, group: Self::Group);

    /// Move every expired timer's event into `queue` and record `now`.
    fn check_timers<Q: EventQueue<Self::Event>>(&mut self, now: Self::Time, queue: &mut Q);
}

/// A timer bank backed by a deadline-ordered list.
///
/// Any number of timers may share a group. A single
/// [`check_timers`](TimerBank::check_timers) call emits expired events in
/// non-decreasing deadline order; timers sharing a deadline fire in an
/// unspecified relative order, each exactly once.
#[derive(Clone, Debug)]
pub struct DynamicTimerBank<E, G, T, U = ()> {
    // Sorted by deadline, earliest first.
    timers: Vec<Timer<E, G, T, U>>,
    last_seen: Option<T>,
}

impl<E, G, T, U> DynamicTimerBank<E, G, T, U> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            last_seen: None,
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }
}

impl<E, G, T, U> Default for DynamicTimerBank<E, G, T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, G, T, U> TimerBank for DynamicTimerBank<E, G, T, U>
where
    E: EventId,
    G: Copy + PartialEq,
    T: Instant,
    U: Copy + PartialEq + Default,
{
    type Event = E;
    type Group = G;
    type Time = T;
    type Unique = U;

    fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    fn add_timer(&mut self, event: E, group: G, deadline: T, unique: U) {
        self.clear_timer(event, group, unique);
        let position = self.timers.partition_point(|timer| timer.deadline <= deadline);
        self.timers
            .insert(position, Timer::new(event, group, deadline, unique));
    }

    fn add_timer_in(&mut self, event: E, group: G, delay: T::Duration, unique: U) {
        match self.last_seen {
            Some(now) => self.add_timer(event, group, now.advanced_by(delay), unique),
            None => debug_assert!(false, "timer armed by duration before any time was seen"),
        }
    }

    fn clear_timer(&mut self, event: E, group: G, unique: U) {
        self.timers.retain(|timer| {
            timer.event != event || timer.group != group || timer.unique != unique
        });
    }

    fn clear_group(&mut self, group: G) {
        self.timers.retain(|timer| timer.group != group);
    }

    fn check_timers<Q: EventQueue<E>>(&mut self, now: T, queue: &mut Q) {
        self.last_seen = Some(now);
        let expired = self.timers.partition_point(|timer| timer.deadline <= now);
        for timer in self.timers.drain(..expired) {
            queue.add(timer.event);
        }
    }
}

/// A timer bank backed by a fixed array with one slot per state.
///
/// `N` must equal [`StateId::COUNT`] of the group enum. At most one timer
/// can be armed per group; arming a slot that is already armed overwrites
/// it (diagnosed through the `log` feature). Expired slots fire in group
/// declaration order, not deadline order. Nothing is allocated, which
/// suits controllers with strict real-time requirements.
#[derive(Clone, Debug)]
pub struct StaticTimerBank<E, G, T, const N: usize> {
    slots: [Option<Timer<E, G, T>>; N],
    last_seen: Option<T>,
}

impl<E: Copy, G: StateId, T: Copy, const N: usize> StaticTimerBank<E, G, T, N> {
    pub fn new() -> Self {
        debug_assert_eq!(
            N,
            G::COUNT,
            "StaticTimerBank size {} does not match state count {}",
            N,
            G::COUNT
        );
        Self {
            slots: [None; N],
            last_seen: None,
        }
    }
}

impl<E: Copy, G: StateId, T: Copy, const N: usize> Default for StaticTimerBank<E, G, T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, G, T, const N: usize> TimerBank for StaticTimerBank<E, G, T, N>
where
    E: EventId,
    G: StateId,
    T: Instant,
{
    type Event = E;
    type Group = G;
    type Time = T;
    type Unique = ();

    fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn add_timer(&mut self, event: E, group: G, deadline: T, _unique: ()) {
        let slot = &mut self.slots[group.index()];
        #[cfg(feature = "log")]
        if slot.is_some() {
            log::warn!("overwriting armed timer for group {:?}", group);
        }
        *slot = Some(Timer::new(event, group, deadline, ()));
    }

    fn add_timer_in(&mut self, event: E, group: G, delay: T::Duration, _unique: ()) {
        match self.last_seen {
            Some(now) => self.add_timer(event, group, now.advanced_by(delay), ()),
            None => debug_assert!(false, "timer armed by duration before any time was seen"),
        }
    }

    fn clear_timer(&mut self, event: E, group: G, _unique: ()) {
        let slot = &mut self.slots[group.index()];
        if slot.map_or(false, |timer| timer.event == event) {
            *slot = None;
        }
    }

    fn clear_group(&mut self, group: G) {
        self.slots[group.index()] = None;
    }

    fn check_timers<Q: EventQueue<E>>(&mut self, now: T, queue: &mut Q) {
        self.last_seen = Some(now);
        for slot in self.slots.iter_mut() {
            if slot.map_or(false, |timer| timer.is_expired(now)) {
                if let Some(timer) = slot.take() {
                    queue.add(timer.event);
                }
            }
        }
    }
}
