//! The canonical hierarchical state machine from Harel's statechart
//! paper: `Top ⊃ S0 ⊃ {S1 ⊃ {S11, S12}, S2 ⊃ S21 ⊃ S211}`.
//!
//! Every scenario captures the exit/entry/init/during actions as a trace
//! string and compares it against the expected sequence.

#[cfg(test)]
mod tests {

    use substate::prelude::*;

    #[derive(Copy, Clone, PartialEq, Debug)]
    enum State {
        Top,
        S0,
        S1,
        S11,
        S12,
        S2,
        S21,
        S211,
    }

    #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
    enum Event {
        A,
        B,
        C,
        D,
        E,
        F,
        G,
        H,
        ALocal,
        BLocal,
        CLocal,
        DLocal,
        ELocal,
        FLocal,
        GLocal,
        HLocal,
        Z,
        None,
    }

    impl StateId for State {
        const TOP: Self = State::Top;
        const COUNT: usize = 8;
        const VARIANTS: &'static [Self] = &[
            State::Top,
            State::S0,
            State::S1,
            State::S11,
            State::S12,
            State::S2,
            State::S21,
            State::S211,
        ];

        fn index(self) -> usize {
            self as usize
        }

        fn parent(self) -> Self {
            match self {
                State::Top => State::Top,
                State::S0 => State::Top,
                State::S1 => State::S0,
                State::S11 => State::S1,
                State::S12 => State::S1,
                State::S2 => State::S0,
                State::S21 => State::S2,
                State::S211 => State::S21,
            }
        }

        fn default_child(self) -> Option<Self> {
            match self {
                State::Top => Some(State::S0),
                State::S0 => Some(State::S1),
                State::S1 => Some(State::S11),
                State::S2 => Some(State::S21),
                State::S21 => Some(State::S211),
                _ => None,
            }
        }
    }

    impl EventId for Event {
        const NONE: Self = Event::None;
    }

    #[derive(Default)]
    struct Canonical {
        trace: Vec<&'static str>,
    }

    impl Canonical {
        fn take_trace(&mut self) -> String {
            let trace = self.trace.join(" ");
            self.trace.clear();
            trace
        }
    }

    impl Hsm for Canonical {
        type State = State;
        type Event = Event;
        type Input = ();
        type Time = u64;
        type Queue = FifoQueue<Event>;
        type Timers = DynamicTimerBank<Event, State, u64>;

        fn on_event(
            &mut self,
            state: State,
            event: Event,
            _: &mut Scheduler<'_, Self>,
        ) -> Response<State> {
            match (state, event) {
                (State::S0, Event::E) => Transition(State::S211),
                (State::S0, Event::ELocal) => LocalTransition(State::S211),

                (State::S1, Event::A) => Transition(State::S1),
                (State::S1, Event::ALocal) => LocalTransition(State::S1),
                (State::S1, Event::B) => Transition(State::S11),
                (State::S1, Event::BLocal) => LocalTransition(State::S11),
                (State::S1, Event::C) => Transition(State::S2),
                (State::S1, Event::CLocal) => LocalTransition(State::S2),
                (State::S1, Event::D) => Transition(State::S0),
                (State::S1, Event::DLocal) => LocalTransition(State::S0),
                (State::S1, Event::F) => Transition(State::S211),
                (State::S1, Event::FLocal) => LocalTransition(State::S211),

                (State::S11, Event::G) => Transition(State::S211),
                (State::S11, Event::GLocal) => LocalTransition(State::S211),
                (State::S11, Event::Z) => Transition(State::S12),

                (State::S2, Event::C) => Transition(State::S1),
                (State::S2, Event::CLocal) => LocalTransition(State::S1),
                (State::S2, Event::F) => Transition(State::S11),
                (State::S2, Event::FLocal) => LocalTransition(State::S11),

                (State::S21, Event::B) => Transition(State::S211),
                (State::S21, Event::BLocal) => LocalTransition(State::S211),
                (State::S21, Event::H) => Transition(State::S21),
                (State::S21, Event::HLocal) => LocalTransition(State::S21),

                (State::S211, Event::B) => Transition(State::S21),
                (State::S211, Event::BLocal) => LocalTransition(State::S21),
                (State::S211, Event::D) => Transition(State::S211),
                (State::S211, Event::DLocal) => LocalTransition(State::S211),
                (State::S211, Event::G) => Transition(State::S0),
                (State::S211, Event::GLocal) => LocalTransition(State::S0),

                _ => Super,
            }
        }

        fn on_entry(&mut self, state: State, _: &mut Scheduler<'_, Self>) {
            self.trace.push(match state {
                State::Top => "enter_Top",
                State::S0 => "enter_S0",
                State::S1 => "enter_S1",
                State::S11 => "enter_S11",
                State::S12 => "enter_S12",
                State::S2 => "enter_S2",
                State::S21 => "enter_S21",
                State::S211 => "enter_S211",
            });
        }

        fn on_exit(&mut self, state: State, _: &mut Scheduler<'_, Self>) {
            self.trace.push(match state {
                State::Top => "exit_Top",
                State::S0 => "exit_S0",
                State::S1 => "exit_S1",
                State::S11 => "exit_S11",
                State::S12 => "exit_S12",
                State::S2 => "exit_S2",
                State::S21 => "exit_S21",
                State::S211 => "exit_S211",
            });
        }

        fn on_init(&mut self, state: State, _: &mut Scheduler<'_, Self>) {
            self.trace.push(match state {
                State::Top => "init_Top",
                State::S0 => "init_S0",
                State::S1 => "init_S1",
                State::S2 => "init_S2",
                State::S21 => "init_S21",
                _ => return,
            });
        }

        fn on_tick(
            &mut self,
            state: State,
            _: &(),
            _: &mut Scheduler<'_, Self>,
        ) -> Response<State> {
            match state {
                State::S11 => {
                    self.trace.push("during_S11");
                    Handled
                }
                State::S211 => {
                    self.trace.push("during_S211");
                    Handled
                }
                State::S12 => {
                    self.trace.push("during_S12");
                    // Guarded auto-transition; nothing else may run here
                    // because the machine is no longer in S12 afterwards.
                    Transition(State::S11)
                }
                _ => Handled,
            }
        }
    }

    fn machine_in_s11() -> StateMachine<Canonical> {
        let mut machine = Canonical::default().state_machine();
        machine.host_mut().trace.clear();
        machine
    }

    fn machine_in_s211() -> StateMachine<Canonical> {
        let mut machine = machine_in_s11();
        machine.directly_set_state_for_testing(State::S211);
        machine
    }

    fn scenario(machine: &mut StateMachine<Canonical>, event: Event) -> String {
        machine.dispatch(event);
        machine.tick();
        machine.host_mut().take_trace()
    }

    #[test]
    fn initialization_walks_the_default_chain() {
        let mut machine = Canonical::default().state_machine();
        assert_eq!(machine.identify(), State::S11);
        assert_eq!(
            machine.host_mut().take_trace(),
            "exit_Top enter_Top init_Top enter_S0 init_S0 enter_S1 init_S1 enter_S11"
        );
    }

    #[test]
    fn initialization_is_deterministic() {
        let first = Canonical::default().state_machine();
        let second = Canonical::default().state_machine();
        assert_eq!(first.identify(), second.identify());
    }

    #[test]
    fn ancestry_of_s11() {
        let machine = machine_in_s11();

        assert!(machine.is_in_substate_of(State::S11));
        assert!(machine.is_in_substate_of(State::S1));
        assert!(machine.is_in_substate_of(State::S0));
        assert!(machine.is_in_substate_of(State::Top));

        assert!(!machine.is_in_substate_of(State::S12));
        assert!(!machine.is_in_substate_of(State::S211));
        assert!(!machine.is_in_substate_of(State::S21));
        assert!(!machine.is_in_substate_of(State::S2));
    }

    #[test]
    fn ancestry_of_s211() {
        let machine = machine_in_s211();

        assert!(machine.is_in_substate_of(State::S211));
        assert!(machine.is_in_substate_of(State::S21));
        assert!(machine.is_in_substate_of(State::S2));
        assert!(machine.is_in_substate_of(State::S0));
        assert!(machine.is_in_substate_of(State::Top));

        assert!(!machine.is_in_substate_of(State::S12));
        assert!(!machine.is_in_substate_of(State::S11));
        assert!(!machine.is_in_substate_of(State::S1));
    }

    #[test]
    fn event_a_in_s11() {
        let mut machine = machine_in_s11();
        assert_eq!(
            scenario(&mut machine, Event::A),
            "exit_S11 exit_S1 enter_S1 init_S1 enter_S11 during_S11"
        );
        assert_eq!(machine.identify(), State::S11);
    }

    #[test]
    fn event_a_local_in_s11() {
        let mut machine = machine_in_s11();
        assert_eq!(
            scenario(&mut machine, Event::ALocal),
            "exit_S11 init_S1 enter_S11 during_S11"
        );
        assert_eq!(machine.identify(), State::S11);
    }

    #[test]
    fn event_e_in_s11() {
        let mut machine = machine_in_s11();
        assert_eq!(
            scenario(&mut machine, Event::E),
            "exit_S11 exit_S1 exit_S0 enter_S0 enter_S2 enter_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    #[test]
    fn event_e_local_in_s11() {
        let mut machine = machine_in_s11();
        assert_eq!(
            scenario(&mut machine, Event::ELocal),
            "exit_S11 exit_S1 enter_S2 enter_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    #[test]
    fn event_b_in_s11() {
        let mut machine = machine_in_s11();
        assert_eq!(
            scenario(&mut machine, Event::B),
            "exit_S11 exit_S1 enter_S1 enter_S11 during_S11"
        );
        assert_eq!(machine.identify(), State::S11);
    }

    #[test]
    fn event_b_local_in_s11() {
        let mut machine = machine_in_s11();
        assert_eq!(
            scenario(&mut machine, Event::BLocal),
            "exit_S11 enter_S11 during_S11"
        );
        assert_eq!(machine.identify(), State::S11);
    }

    #[test]
    fn event_g_in_s11() {
        let mut machine = machine_in_s11();
        assert_eq!(
            scenario(&mut machine, Event::G),
            "exit_S11 exit_S1 enter_S2 enter_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    // Local and external semantics agree here; checking both anyway.
    #[test]
    fn event_g_local_in_s11() {
        let mut machine = machine_in_s11();
        assert_eq!(
            scenario(&mut machine, Event::GLocal),
            "exit_S11 exit_S1 enter_S2 enter_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    #[test]
    fn auto_transition_from_s12_back_to_s11() {
        let mut machine = machine_in_s11();

        machine.dispatch(Event::Z);
        assert_eq!(machine.identify(), State::S12);
        machine.tick();
        assert_eq!(machine.identify(), State::S11);
        machine.tick();
        assert_eq!(machine.identify(), State::S11);

        assert_eq!(
            machine.host_mut().take_trace(),
            "exit_S11 enter_S12 during_S12 exit_S12 enter_S11 during_S11"
        );
    }

    #[test]
    fn event_e_in_s211() {
        let mut machine = machine_in_s211();
        assert_eq!(
            scenario(&mut machine, Event::E),
            "exit_S211 exit_S21 exit_S2 exit_S0 enter_S0 enter_S2 enter_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    #[test]
    fn event_e_local_in_s211() {
        let mut machine = machine_in_s211();
        assert_eq!(
            scenario(&mut machine, Event::ELocal),
            "exit_S211 exit_S21 exit_S2 enter_S2 enter_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    #[test]
    fn unhandled_event_is_discarded_silently() {
        let mut machine = machine_in_s211();
        assert_eq!(scenario(&mut machine, Event::A), "during_S211");
        assert_eq!(machine.identify(), State::S211);
    }

    #[test]
    fn event_h_in_s211() {
        let mut machine = machine_in_s211();
        assert_eq!(
            scenario(&mut machine, Event::H),
            "exit_S211 exit_S21 enter_S21 init_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    #[test]
    fn event_h_local_in_s211() {
        let mut machine = machine_in_s211();
        assert_eq!(
            scenario(&mut machine, Event::HLocal),
            "exit_S211 init_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    #[test]
    fn event_g_in_s211() {
        let mut machine = machine_in_s211();
        assert_eq!(
            scenario(&mut machine, Event::G),
            "exit_S211 exit_S21 exit_S2 exit_S0 enter_S0 init_S0 enter_S1 init_S1 enter_S11 during_S11"
        );
        assert_eq!(machine.identify(), State::S11);
    }

    #[test]
    fn event_g_local_in_s211() {
        let mut machine = machine_in_s211();
        assert_eq!(
            scenario(&mut machine, Event::GLocal),
            "exit_S211 exit_S21 exit_S2 init_S0 enter_S1 init_S1 enter_S11 during_S11"
        );
        assert_eq!(machine.identify(), State::S11);
    }

    #[test]
    fn event_b_in_s211() {
        let mut machine = machine_in_s211();
        assert_eq!(
            scenario(&mut machine, Event::B),
            "exit_S211 exit_S21 enter_S21 init_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    #[test]
    fn event_b_local_in_s211() {
        let mut machine = machine_in_s211();
        assert_eq!(
            scenario(&mut machine, Event::BLocal),
            "exit_S211 init_S21 enter_S211 during_S211"
        );
        assert_eq!(machine.identify(), State::S211);
    }

    // When neither endpoint contains the other, local semantics must not
    // change anything.
    #[test]
    fn local_matches_external_between_siblings() {
        let mut external = machine_in_s11();
        let mut local = machine_in_s11();
        assert_eq!(
            scenario(&mut external, Event::C),
            scenario(&mut local, Event::CLocal)
        );
        assert_eq!(external.identify(), local.identify());

        let mut external = machine_in_s211();
        let mut local = machine_in_s211();
        assert_eq!(
            scenario(&mut external, Event::F),
            scenario(&mut local, Event::FLocal)
        );
        assert_eq!(external.identify(), local.identify());
    }
}
