#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod event;
mod hsm;
mod inner;
mod machine;
mod queue;
mod response;
mod scheduler;
mod state;
mod timer;
mod track;
mod transition;

pub use event::EventId;
pub use hsm::{DefaultActions, Hsm};
pub use machine::{HsmExt, StateMachine, UninitializedStateMachine};
pub use queue::{EventQueue, FifoQueue, PriorityQueue};
pub use response::Response;
pub use scheduler::Scheduler;
pub use state::{validate, StateId, StateKind, TreeError};
pub use timer::{DynamicTimerBank, Instant, StaticTimerBank, Timer, TimerBank};
pub use track::TimeTracker;
pub use transition::Semantics;

/// Prelude containing the imports a host implementation needs.
pub mod prelude {
    pub use crate::event::EventId;
    pub use crate::hsm::{DefaultActions, Hsm};
    pub use crate::machine::{HsmExt as _, StateMachine, UninitializedStateMachine};
    pub use crate::queue::{EventQueue, FifoQueue, PriorityQueue};
    pub use crate::response::Response::{self, *};
    pub use crate::scheduler::Scheduler;
    pub use crate::state::{StateId, StateKind};
    pub use crate::timer::{DynamicTimerBank, Instant, StaticTimerBank, TimerBank};
    pub use crate::transition::Semantics;
}
