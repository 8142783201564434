use crate::hsm::Hsm;
use crate::queue::EventQueue;
use crate::timer::{Instant, TimerBank};

/// Handle on the machine-owned event queue and timer bank, passed to
/// every host hook.
///
/// Events posted during a dispatch are not observed by the running
/// handler; they are picked up on subsequent driver cycles in queue
/// order.
pub struct Scheduler<'a, M: Hsm> {
    pub(crate) events: &'a mut M::Queue,
    pub(crate) timers: &'a mut M::Timers,
}

impl<'a, M: Hsm> Scheduler<'a, M> {
    /// Enqueue an event for a later driver cycle.
    pub fn post(&mut self, event: M::Event) {
        self.events.add(event);
    }

    /// Arm a timer that fires `event` at `deadline`, registered under
    /// `group`.
    pub fn start_timer(&mut self, event: M::Event, group: M::State, deadline: M::Time) {
        self.timers.add_timer(event, group, deadline, Default::default());
    }

    /// Arm a timer `delay` after the latest time the machine has seen.
    pub fn start_timer_in(
        &mut self,
        event: M::Event,
        group: M::State,
        delay: <M::Time as Instant>::Duration,
    ) {
        self.timers.add_timer_in(event, group, delay, Default::default());
    }

    /// Arm a tagged timer, letting several timers share an event/group
    /// pair.
    pub fn start_timer_tagged(
        &mut self,
        event: M::Event,
        group: M::State,
        deadline: M::Time,
        tag: <M::Timers as TimerBank>::Unique,
    ) {
        self.timers.add_timer(event, group, deadline, tag);
    }

    /// Clear the untagged timer matching `event` and `group`, if any.
    pub fn clear_timer(&mut self, event: M::Event, group: M::State) {
        self.timers.clear_timer(event, group, Default::default());
    }

    /// Clear the tagged timer matching the full triple, if any.
    pub fn clear_timer_tagged(
        &mut self,
        event: M::Event,
        group: M::State,
        tag: <M::Timers as TimerBank>::Unique,
    ) {
        self.timers.clear_timer(event, group, tag);
    }

    /// Clear every timer registered under `group`.
    pub fn clear_group(&mut self, group: M::State) {
        self.timers.clear_group(group);
    }

    /// Direct access to the event queue.
    pub fn events(&mut self) -> &mut M::Queue {
        &mut *self.events
    }

    /// Direct access to the timer bank.
    pub fn timers(&mut self) -> &mut M::Timers {
        &mut *self.timers
    }
}
