#[test]
#[cfg(feature = "serde")]
fn serialize_deserialize() {
    #![allow(unused)]

    use serde::{Deserialize, Serialize};
    use substate::prelude::*;
    use substate::UninitializedStateMachine;

    #[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
    pub struct Blinky {
        led: bool,
    }

    #[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
    pub enum State {
        Top,
        LedOn,
        LedOff,
    }

    #[derive(Copy, Clone, PartialEq, Debug)]
    pub enum Event {
        Toggle,
        None,
    }

    impl StateId for State {
        const TOP: Self = State::Top;
        const COUNT: usize = 3;
        const VARIANTS: &'static [Self] = &[State::Top, State::LedOn, State::LedOff];

        fn index(self) -> usize {
            self as usize
        }

        fn parent(self) -> Self {
            State::Top
        }

        fn default_child(self) -> Option<Self> {
            match self {
                State::Top => Some(State::LedOn),
                _ => None,
            }
        }
    }

    impl EventId for Event {
        const NONE: Self = Event::None;
    }

    impl Hsm for Blinky {
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
                (State::LedOn, Event::Toggle) => {
                    self.led = false;
                    Transition(State::LedOff)
                }
                (State::LedOff, Event::Toggle) => {
                    self.led = true;
                    Transition(State::LedOn)
                }
                _ => Super,
            }
        }
    }

    let machine = Blinky::default().uninitialized_state_machine();

    let ser = serde_json::to_string(&machine).unwrap();
    let de: UninitializedStateMachine<Blinky> = serde_json::from_str(&ser).unwrap();
    assert_eq!(de, machine);

    let mut running = machine.init();
    assert_eq!(running.identify(), State::LedOn);
    running.dispatch(Event::Toggle);
    assert_eq!(running.identify(), State::LedOff);

    // A snapshot of a running machine deserializes uninitialized;
    // initializing it re-enters the saved leaf.
    let ser = serde_json::to_string(&running).unwrap();
    let de: UninitializedStateMachine<Blinky> = serde_json::from_str(&ser).unwrap();
    let restored = de.init();
    assert_eq!(restored.identify(), State::LedOff);
    assert_eq!(restored, running);

    let ser = bincode::serialize(&running).unwrap();
    let de: UninitializedStateMachine<Blinky> = bincode::deserialize(&ser).unwrap();
    let restored = de.init();
    assert_eq!(restored, running);
}
