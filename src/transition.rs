use crate::state::StateId;

/// Interpretation of a transition, per UML.
///
/// External semantics predate UML2 and are the default: a transition whose
/// source contains its target (or vice versa) exits and re-enters the
/// containing state. Local semantics, added in UML2, suppress the exit and
/// re-entry of that containing state. In every other configuration the two
/// produce identical exit/entry sequences.
///
/// See <https://en.wikipedia.org/wiki/UML_state_machine#Local_versus_external_transitions>.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Semantics {
    External,
    Local,
}

/// Whether the exit walk stops after exiting `node`.
///
/// Climbing from the current leaf, we keep exiting until the next step
/// would leave the scope the target is rooted under: stop once `node`'s
/// parent is an ancestor of the target's parent while `node` still lies on
/// the source's ancestry.
pub(crate) fn exit_stop<S: StateId>(node: S, source: S, target: S) -> bool {
    S::is_ancestor(node.parent(), target.parent()) && S::is_ancestor(node, source)
}

/// Whether the entry walk stops collecting above `node`.
///
/// Climbing from the target, the first node that either lies on the
/// source's ancestry, or whose parent does while the source is not nested
/// inside it, is the outermost state to enter.
pub(crate) fn entry_stop<S: StateId>(node: S, source: S) -> bool {
    S::is_ancestor(node, source)
        || (S::is_ancestor(node.parent(), source) && !S::is_ancestor(source, node))
}

/// Whether local semantics suppress the exit/entry of `node`.
///
/// Only the containing endpoint of a nested source/target pair is
/// suppressed; every other action runs exactly as under external
/// semantics.
pub(crate) fn suppressed_by_local<S: StateId>(
    node: S,
    source: S,
    target: S,
    semantics: Semantics,
) -> bool {
    semantics == Semantics::Local
        && ((S::is_ancestor(source, target) && node == source)
            || (S::is_ancestor(target, source) && node == target))
}
