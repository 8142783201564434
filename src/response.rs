/// Response returned by event and tick handlers.
///
/// Consumption is explicit: a handler either consumes the event
/// (`Handled` or one of the transition variants) or defers it to the
/// superstate with `Super`. `Super` from the top state discards the
/// event silently.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Response<S> {
    /// Consider the event handled without transitioning.
    Handled,
    /// Defer the event to the superstate's handler.
    Super,
    /// Transition to the given state with external semantics: a
    /// self-transition exits and re-enters its own boundary.
    Transition(S),
    /// Transition to the given state with UML2 local semantics: when
    /// source and target nest inside each other, the containing state is
    /// neither exited nor re-entered.
    LocalTransition(S),
}
