use crate::event::EventId;
use crate::queue::EventQueue;
use crate::response::Response;
use crate::scheduler::Scheduler;
use crate::state::StateId;
use crate::timer::{Instant, TimerBank};

/// What the engine does for states that don't override their hooks.
///
/// The policy drives the *default implementations* of
/// [`Hsm::on_entry`], [`Hsm::on_exit`] and [`Hsm::on_tick`]: they forward
/// to the generic [`Hsm::entry`], [`Hsm::exit`] and [`Hsm::state_update`]
/// sinks. A host that overrides a hook takes over that decision and can
/// still fall back to the sink for states it doesn't match.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DefaultActions {
    /// Do nothing for states without explicit actions.
    Nothing,
    /// Synthesize `entry(state)` and `exit(state)` calls.
    EntryExitOnly,
    /// As above, plus `state_update(state, input)` on every tick.
    ControlUpdate,
}

impl DefaultActions {
    pub const fn synthesizes_entry_exit(self) -> bool {
        matches!(self, Self::EntryExitOnly | Self::ControlUpdate)
    }

    pub const fn synthesizes_update(self) -> bool {
        matches!(self, Self::ControlUpdate)
    }
}

/// Trait implemented by the host of a hierarchical state machine.
///
/// The host supplies the state and event enums, the queue and timer-bank
/// variants the machine should own, and the per-state behavior. Wrap a
/// host into a runnable machine with
/// [`HsmExt::state_machine`](crate::HsmExt::state_machine) or
/// [`HsmExt::uninitialized_state_machine`](crate::HsmExt::uninitialized_state_machine).
///
/// Behavior is dispatched on the [`StateId`] value: `on_event` is called
/// for the current leaf first and climbs the parent chain for as long as
/// handlers answer [`Response::Super`]. The entry/exit/init/tick hooks
/// observe the transition executor. Every hook receives a [`Scheduler`]
/// through which it can post events and arm or clear timers on the
/// machine it runs inside.
pub trait Hsm: Sized {
    /// Enumeration of the states, carrying the tree topology.
    type State: StateId;

    /// Enumeration of the events.
    type Event: EventId;

    /// Host-owned input snapshot passed to tick handlers.
    type Input;

    /// Time representation used by the timer bank.
    type Time: Instant;

    /// Event queue variant owned by the machine.
    type Queue: EventQueue<Self::Event>;

    /// Timer bank variant owned by the machine.
    type Timers: TimerBank<Event = Self::Event, Group = Self::State, Time = Self::Time>;

    /// Policy for states that don't override their hooks.
    const DEFAULT_ACTIONS: DefaultActions = DefaultActions::Nothing;

    /// Clear a state's timer group automatically whenever it is exited,
    /// scoping timers to the lifetime of the state that armed them.
    const CLEAR_TIMERS_ON_EXIT: bool = false;

    /// Handle an event in the given state.
    fn on_event(
        &mut self,
        state: Self::State,
        event: Self::Event,
        scheduler: &mut Scheduler<'_, Self>,
    ) -> Response<Self::State>;

    /// Entry action for the given state.
    fn on_entry(&mut self, state: Self::State, _scheduler: &mut Scheduler<'_, Self>) {
        if Self::DEFAULT_ACTIONS.synthesizes_entry_exit() {
            self.entry(state);
        }
    }

    /// Exit action for the given state.
    fn on_exit(&mut self, state: Self::State, _scheduler: &mut Scheduler<'_, Self>) {
        if Self::DEFAULT_ACTIONS.synthesizes_entry_exit() {
            self.exit(state);
        }
    }

    /// Init action for a composite state, invoked after its entry action
    /// and before its default child is entered.
    fn on_init(&mut self, _state: Self::State, _scheduler: &mut Scheduler<'_, Self>) {}

    /// Tick (during) action for the current leaf. Runs once per
    /// [`tick`](crate::StateMachine::tick) call; returning a transition
    /// implements a guarded auto-transition. `Super` is treated as
    /// `Handled` since ticks have no delegation chain.
    fn on_tick(
        &mut self,
        state: Self::State,
        input: &Self::Input,
        _scheduler: &mut Scheduler<'_, Self>,
    ) -> Response<Self::State> {
        if Self::DEFAULT_ACTIONS.synthesizes_update() {
            self.state_update(state, input);
        }
        Response::Handled
    }

    /// Generic entry notification synthesized by the default-action
    /// policy.
    fn entry(&mut self, _state: Self::State) {}

    /// Generic exit notification synthesized by the default-action
    /// policy.
    fn exit(&mut self, _state: Self::State) {}

    /// Generic per-tick update synthesized under
    /// [`DefaultActions::ControlUpdate`].
    fn state_update(&mut self, _state: Self::State, _input: &Self::Input) {}

    /// Called before every transition, with the current leaf and the
    /// declared target.
    fn before_transition(&mut self, _leaf: &Self::State, _target: &Self::State) {}

    /// Called after every transition, with the previous and the new leaf.
    fn after_transition(&mut self, _from: &Self::State, _to: &Self::State) {}
}
