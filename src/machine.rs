use core::fmt::Debug;

use crate::hsm::Hsm;
use crate::inner::Inner;
use crate::queue::EventQueue;
use crate::state::{StateId, StateKind};
use crate::timer::TimerBank;

/// Extension trait that wraps a host into a runnable machine.
pub trait HsmExt: Hsm {
    /// Create a machine and immediately initialize it: the machine walks
    /// the default-child chain from the top into its initial leaf,
    /// running every entry and init action on the way.
    fn state_machine(self) -> StateMachine<Self> {
        self.uninitialized_state_machine().init()
    }

    /// Create a machine that must be explicitly initialized with
    /// [`init`](UninitializedStateMachine::init) before it can run.
    fn uninitialized_state_machine(self) -> UninitializedStateMachine<Self> {
        UninitializedStateMachine {
            inner: Inner {
                host: self,
                state: Self::State::TOP,
                queue: Default::default(),
                timers: Default::default(),
            },
        }
    }
}

impl<T: Hsm> HsmExt for T {}

/// A state machine that has not yet been initialized.
///
/// No event can be dispatched until [`init`](Self::init) has walked the
/// machine into its initial leaf; the operations simply don't exist on
/// this type. Deserialized machines (with the `serde` feature) start out
/// here as well.
pub struct UninitializedStateMachine<M: Hsm> {
    pub(crate) inner: Inner<M>,
}

impl<M: Hsm> UninitializedStateMachine<M> {
    /// Initialize the machine through a synthetic Top -> Top transition
    /// that descends the default-child chain into a leaf. A machine
    /// restored from a snapshot re-enters its saved leaf instead,
    /// running the entry actions from the top down to it.
    ///
    /// A malformed state tree (see [`validate`](crate::validate)) aborts
    /// in debug builds.
    pub fn init(self) -> StateMachine<M> {
        let mut machine = StateMachine { inner: self.inner };
        machine.inner.init();
        machine
    }

    /// Get a reference to the host.
    pub fn host(&self) -> &M {
        &self.inner.host
    }

    /// Get a mutable reference to the host.
    pub fn host_mut(&mut self) -> &mut M {
        &mut self.inner.host
    }
}

/// A running hierarchical state machine.
///
/// The machine owns its host data, its event queue and its timer bank,
/// and always rests in a leaf state between operations. It is
/// single-threaded and cooperative: dispatch, tick and timer checks all
/// run to completion, and time only enters through the `now` arguments.
pub struct StateMachine<M: Hsm> {
    pub(crate) inner: Inner<M>,
}

impl<M: Hsm> StateMachine<M> {
    /// Dispatch one event to the current leaf's handler, climbing the
    /// parent chain until some handler consumes it.
    pub fn dispatch(&mut self, event: M::Event) {
        self.inner.dispatch(event);
    }

    /// Run the current leaf's tick action with a default input.
    pub fn tick(&mut self)
    where
        M::Input: Default,
    {
        self.inner.tick(&M::Input::default());
    }

    /// Run the current leaf's tick action with the given input snapshot.
    pub fn tick_with(&mut self, input: &M::Input) {
        self.inner.tick(input);
    }

    /// Run one driver cycle: promote expired timers into the event
    /// queue, dispatch the next queued event if any, then tick the
    /// current leaf.
    pub fn update(&mut self, now: M::Time, input: &M::Input) {
        self.inner.timers.check_timers(now, &mut self.inner.queue);
        if !self.inner.queue.is_empty() {
            let event = self.inner.queue.take();
            self.inner.dispatch(event);
        }
        self.inner.tick(input);
    }

    /// Enqueue an event for a later driver cycle.
    pub fn add_event(&mut self, event: M::Event) {
        self.inner.queue.add(event);
    }

    /// The leaf state the machine currently rests in.
    pub fn identify(&self) -> M::State {
        self.inner.state
    }

    /// Whether the current leaf lies inside `query` (inclusive of the
    /// leaf itself and of `Top`).
    pub fn is_in_substate_of(&self, query: M::State) -> bool {
        M::State::is_ancestor(query, self.inner.state)
    }

    /// Get a reference to the machine's event queue.
    pub fn event_queue(&self) -> &M::Queue {
        &self.inner.queue
    }

    /// Get a mutable reference to the machine's event queue.
    pub fn event_queue_mut(&mut self) -> &mut M::Queue {
        &mut self.inner.queue
    }

    /// Get a reference to the machine's timer bank.
    pub fn timer_bank(&self) -> &M::Timers {
        &self.inner.timers
    }

    /// Get a mutable reference to the machine's timer bank.
    pub fn timer_bank_mut(&mut self) -> &mut M::Timers {
        &mut self.inner.timers
    }

    /// Get a reference to the host.
    pub fn host(&self) -> &M {
        &self.inner.host
    }

    /// Get a mutable reference to the host.
    pub fn host_mut(&mut self) -> &mut M {
        &mut self.inner.host
    }

    /// Force the current leaf, bypassing every entry and exit action.
    ///
    /// For tests and simulation only: the host never observes the
    /// change, so any state the host keeps in sync with entry/exit
    /// actions will be stale.
    pub fn directly_set_state_for_testing(&mut self, state: M::State) {
        debug_assert!(state.kind() == StateKind::Leaf);
        self.inner.state = state;
    }
}

impl<M> Clone for StateMachine<M>
where
    M: Hsm + Clone,
    M::Queue: Clone,
    M::Timers: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M> Debug for StateMachine<M>
where
    M: Hsm + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateMachine")
            .field("host", &self.inner.host as &dyn Debug)
            .field("state", &self.inner.state as &dyn Debug)
            .finish()
    }
}

impl<M> PartialEq for StateMachine<M>
where
    M: Hsm + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<M> Eq for StateMachine<M> where M: Hsm + PartialEq + Eq {}

impl<M: Hsm> core::ops::Deref for StateMachine<M> {
    type Target = M;

    fn deref(&self) -> &Self::Target {
        &self.inner.host
    }
}

impl<M> Clone for UninitializedStateMachine<M>
where
    M: Hsm + Clone,
    M::Queue: Clone,
    M::Timers: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M> Debug for UninitializedStateMachine<M>
where
    M: Hsm + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UninitializedStateMachine")
            .field("host", &self.inner.host as &dyn Debug)
            .field("state", &self.inner.state as &dyn Debug)
            .finish()
    }
}

impl<M> PartialEq for UninitializedStateMachine<M>
where
    M: Hsm + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<M> Eq for UninitializedStateMachine<M> where M: Hsm + PartialEq + Eq {}

impl<M: Hsm> core::ops::Deref for UninitializedStateMachine<M> {
    type Target = M;

    fn deref(&self) -> &Self::Target {
        &self.inner.host
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use core::marker::PhantomData;

    use super::{Hsm, Inner, StateMachine, UninitializedStateMachine};

    /// Machines serialize as host data plus current state. Pending
    /// events and timers are deliberately not persisted: a snapshot can
    /// only be deserialized into an [`UninitializedStateMachine`], whose
    /// [`init`](UninitializedStateMachine::init) re-enters the saved
    /// leaf.
    impl<M> serde::Serialize for StateMachine<M>
    where
        M: Hsm + serde::Serialize,
        M::State: serde::Serialize,
    {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serialize_parts(&self.inner, serializer)
        }
    }

    impl<M> serde::Serialize for UninitializedStateMachine<M>
    where
        M: Hsm + serde::Serialize,
        M::State: serde::Serialize,
    {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serialize_parts(&self.inner, serializer)
        }
    }

    fn serialize_parts<M, S>(inner: &Inner<M>, serializer: S) -> Result<S::Ok, S::Error>
    where
        M: Hsm + serde::Serialize,
        M::State: serde::Serialize,
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut serializer = serializer.serialize_struct("StateMachine", 2)?;
        serializer.serialize_field("host", &inner.host)?;
        serializer.serialize_field("state", &inner.state)?;
        serializer.end()
    }

    fn machine_from_parts<M: Hsm>(host: M, state: M::State) -> UninitializedStateMachine<M> {
        UninitializedStateMachine {
            inner: Inner {
                host,
                state,
                queue: Default::default(),
                timers: Default::default(),
            },
        }
    }

    impl<'de, M> serde::Deserialize<'de> for UninitializedStateMachine<M>
    where
        M: Hsm + serde::Deserialize<'de>,
        M::State: serde::Deserialize<'de>,
    {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            enum Field {
                Host,
                State,
            }

            impl<'de> serde::Deserialize<'de> for Field {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    struct FieldVisitor;

                    impl<'de> serde::de::Visitor<'de> for FieldVisitor {
                        type Value = Field;

                        fn expecting(
                            &self,
                            formatter: &mut core::fmt::Formatter,
                        ) -> core::fmt::Result {
                            formatter.write_str("`host` or `state`")
                        }

                        fn visit_str<E>(self, value: &str) -> Result<Field, E>
                        where
                            E: serde::de::Error,
                        {
                            match value {
                                "host" => Ok(Field::Host),
                                "state" => Ok(Field::State),
                                _ => Err(serde::de::Error::unknown_field(value, FIELDS)),
                            }
                        }
                    }

                    deserializer.deserialize_identifier(FieldVisitor)
                }
            }

            struct MachineVisitor<M>(PhantomData<M>);

            impl<'de, M> serde::de::Visitor<'de> for MachineVisitor<M>
            where
                M: Hsm + serde::Deserialize<'de>,
                M::State: serde::Deserialize<'de>,
            {
                type Value = UninitializedStateMachine<M>;

                fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                    formatter.write_str("struct StateMachine")
                }

                fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
                where
                    A: serde::de::SeqAccess<'de>,
                {
                    let host = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(0, &self))?;
                    let state = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(1, &self))?;
                    Ok(machine_from_parts(host, state))
                }

                fn visit_map<V>(self, mut map: V) -> Result<Self::Value, V::Error>
                where
                    V: serde::de::MapAccess<'de>,
                {
                    let mut host = None;
                    let mut state = None;
                    while let Some(key) = map.next_key()? {
                        match key {
                            Field::Host => {
                                if host.is_some() {
                                    return Err(serde::de::Error::duplicate_field("host"));
                                }
                                host = Some(map.next_value()?);
                            }
                            Field::State => {
                                if state.is_some() {
                                    return Err(serde::de::Error::duplicate_field("state"));
                                }
                                state = Some(map.next_value()?);
                            }
                        }
                    }
                    let host = host.ok_or_else(|| serde::de::Error::missing_field("host"))?;
                    let state = state.ok_or_else(|| serde::de::Error::missing_field("state"))?;
                    Ok(machine_from_parts(host, state))
                }
            }

            const FIELDS: &[&str] = &["host", "state"];
            deserializer.deserialize_struct("StateMachine", FIELDS, MachineVisitor(PhantomData))
        }
    }
}
