use crate::hsm::Hsm;
use crate::response::Response;
use crate::scheduler::Scheduler;
use crate::state::{StateId, StateKind};
use crate::timer::TimerBank;
use crate::transition::{self, Semantics};

/// Private representation of a running machine shared by the public
/// typestates.
pub(crate) struct Inner<M: Hsm> {
    pub host: M,
    pub state: M::State,
    pub queue: M::Queue,
    pub timers: M::Timers,
}

impl<M: Hsm> Inner<M> {
    /// Walk into the initial leaf through a synthetic Top -> Top
    /// transition, or re-enter the saved leaf when resuming a snapshot.
    pub fn init(&mut self) {
        #[cfg(debug_assertions)]
        if let Err(error) = crate::state::validate::<M::State>() {
            panic!("malformed state tree: {error}");
        }

        let target = match self.state.kind() {
            StateKind::Leaf => self.state,
            _ => M::State::TOP,
        };
        self.state = M::State::TOP;
        self.transition(M::State::TOP, target, Semantics::External);

        #[cfg(feature = "log")]
        log::debug!("state machine initialized in {:?}", self.state);
    }

    /// Route one event through the nested handler chain, starting at the
    /// current leaf and climbing for as long as handlers defer to their
    /// superstate. `Super` from the top state discards the event.
    pub fn dispatch(&mut self, event: M::Event) {
        let mut level = self.state;
        loop {
            let mut scheduler = Scheduler {
                events: &mut self.queue,
                timers: &mut self.timers,
            };
            match self.host.on_event(level, event, &mut scheduler) {
                Response::Handled => break,
                Response::Super => {
                    if level == M::State::TOP {
                        break;
                    }
                    level = level.parent();
                }
                Response::Transition(target) => {
                    self.transition(level, target, Semantics::External);
                    break;
                }
                Response::LocalTransition(target) => {
                    self.transition(level, target, Semantics::Local);
                    break;
                }
            }
        }
    }

    /// Run the tick action of the current leaf. The leaf is captured
    /// before the handler runs: a transition inside the tick does not
    /// tick the new leaf again within this call.
    pub fn tick(&mut self, input: &M::Input) {
        let leaf = self.state;
        let mut scheduler = Scheduler {
            events: &mut self.queue,
            timers: &mut self.timers,
        };
        match self.host.on_tick(leaf, input, &mut scheduler) {
            Response::Transition(target) => self.transition(leaf, target, Semantics::External),
            Response::LocalTransition(target) => self.transition(leaf, target, Semantics::Local),
            Response::Handled | Response::Super => {}
        }
    }

    /// Execute a transition declared on `source` towards `target` while
    /// the machine rests in `self.state`.
    pub fn transition(&mut self, source: M::State, target: M::State, semantics: Semantics) {
        let origin = self.state;
        self.host.before_transition(&origin, &target);

        // Exit phase: climb from the current leaf, exiting every state
        // until the next step would leave the scope the target is rooted
        // under.
        let mut node = origin;
        loop {
            if !transition::suppressed_by_local(node, source, target, semantics) {
                self.exit_state(node);
            }
            if transition::exit_stop(node, source, target) {
                break;
            }
            node = node.parent();
        }

        // Entry phase: entries collected upward from the target run
        // top-down.
        self.enter_towards(target, source, target, semantics);

        // Init chain: a composite target descends into default children
        // until the machine comes to rest in a leaf.
        let mut landing = target;
        while let Some(child) = landing.default_child() {
            let mut scheduler = Scheduler {
                events: &mut self.queue,
                timers: &mut self.timers,
            };
            self.host.on_init(landing, &mut scheduler);
            self.enter_state(child);
            landing = child;
        }
        self.state = landing;

        #[cfg(feature = "log")]
        log::trace!(
            "transitioned {:?} -> {:?} (declared on {:?} towards {:?})",
            origin,
            self.state,
            source,
            target
        );

        self.host.after_transition(&origin, &self.state);
    }

    /// Recurse up from `node` to the outermost state to enter, then run
    /// the entry actions on the way back down.
    fn enter_towards(&mut self, node: M::State, source: M::State, target: M::State, semantics: Semantics) {
        if !transition::entry_stop(node, source) {
            self.enter_towards(node.parent(), source, target, semantics);
        }
        if !transition::suppressed_by_local(node, source, target, semantics) {
            self.enter_state(node);
        }
    }

    fn enter_state(&mut self, state: M::State) {
        let mut scheduler = Scheduler {
            events: &mut self.queue,
            timers: &mut self.timers,
        };
        self.host.on_entry(state, &mut scheduler);
    }

    fn exit_state(&mut self, state: M::State) {
        if M::CLEAR_TIMERS_ON_EXIT {
            self.timers.clear_group(state);
        }
        let mut scheduler = Scheduler {
            events: &mut self.queue,
            timers: &mut self.timers,
        };
        self.host.on_exit(state, &mut scheduler);
    }
}

impl<M> Clone for Inner<M>
where
    M: Hsm + Clone,
    M::Queue: Clone,
    M::Timers: Clone,
{
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            state: self.state,
            queue: self.queue.clone(),
            timers: self.timers.clone(),
        }
    }
}

impl<M> PartialEq for Inner<M>
where
    M: Hsm + PartialEq,
{
    /// Machines compare by host data and current state; pending events
    /// and timers are not part of the comparison.
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host && self.state == other.state
    }
}

impl<M> Eq for Inner<M> where M: Hsm + PartialEq + Eq {}
