use core::fmt::Debug;

/// The role a state plays in the tree.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StateKind {
    /// The unique root of the tree.
    Top,
    /// A state with at least one child and a designated default child.
    Composite,
    /// A state without children. The machine always rests in a leaf.
    Leaf,
}

/// An enum that represents the states of a hierarchical state machine.
///
/// The tree topology is part of the enum itself: every state names its
/// parent and, if it has children, the substate it defaults into. `Top` is
/// its own parent, so every parent chain terminates there.
///
/// ```
/// use substate::StateId;
///
/// #[derive(Copy, Clone, PartialEq, Debug)]
/// enum State {
///     Top,
///     Idle,
///     Running,
/// }
///
/// impl StateId for State {
///     const TOP: Self = State::Top;
///     const COUNT: usize = 3;
///     const VARIANTS: &'static [Self] = &[State::Top, State::Idle, State::Running];
///
///     fn index(self) -> usize {
///         self as usize
///     }
///
///     fn parent(self) -> Self {
///         State::Top
///     }
///
///     fn default_child(self) -> Option<Self> {
///         match self {
///             State::Top => Some(State::Idle),
///             _ => None,
///         }
///     }
/// }
///
/// assert!(State::is_ancestor(State::Top, State::Running));
/// assert_eq!(State::Idle.kind(), substate::StateKind::Leaf);
/// ```
pub trait StateId: Copy + PartialEq + Debug + 'static {
    /// The root of the state tree.
    const TOP: Self;

    /// Total number of states, used to size per-state storage.
    const COUNT: usize;

    /// Every state, in declaration order.
    const VARIANTS: &'static [Self];

    /// Dense index of this state, in `0..COUNT`.
    fn index(self) -> usize;

    /// The parent of this state. `Top` is its own parent.
    fn parent(self) -> Self;

    /// The substate this state initializes into, `None` for leaves.
    fn default_child(self) -> Option<Self>;

    /// Classify this state from its position in the tree.
    fn kind(self) -> StateKind {
        if self == Self::TOP {
            StateKind::Top
        } else if self.default_child().is_some() {
            StateKind::Composite
        } else {
            StateKind::Leaf
        }
    }

    /// Whether `ancestor` lies on `descendant`'s parent chain. A state is
    /// an ancestor of itself.
    fn is_ancestor(ancestor: Self, descendant: Self) -> bool {
        let mut node = descendant;
        // Bounded so a malformed tree cannot hang the walk.
        for _ in 0..=Self::COUNT {
            if node == ancestor {
                return true;
            }
            if node == Self::TOP {
                return false;
            }
            node = node.parent();
        }
        false
    }
}

/// A structural defect in a state tree, reported by [`validate`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TreeError<S> {
    /// `Top` names a parent other than itself.
    TopHasParent(S),
    /// The parent chain starting at this state never reaches `Top`.
    ParentCycle(S),
    /// A state names a default child that does not name it back as parent.
    MismatchedDefaultChild { state: S, child: S },
    /// `Top` has no default child to initialize into.
    MissingDefaultChild(S),
}

impl<S: Debug> core::fmt::Display for TreeError<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TopHasParent(parent) => {
                write!(f, "top state must be its own parent, found parent {parent:?}")
            }
            Self::ParentCycle(state) => {
                write!(f, "parent chain of {state:?} never reaches the top state")
            }
            Self::MismatchedDefaultChild { state, child } => {
                write!(f, "default child {child:?} of {state:?} does not name it as parent")
            }
            Self::MissingDefaultChild(state) => {
                write!(f, "{state:?} has no default child to initialize into")
            }
        }
    }
}

#[cfg(feature = "std")]
impl<S: Debug> std::error::Error for TreeError<S> {}

/// Check a state tree for structural defects.
///
/// A tree that passes is guaranteed to be safe to run: every parent chain
/// terminates at `Top`, every default-child link is consistent with the
/// parent links (which in turn bounds every init chain), and `Top` can
/// initialize into a leaf.
pub fn validate<S: StateId>() -> Result<(), TreeError<S>> {
    if S::TOP.parent() != S::TOP {
        return Err(TreeError::TopHasParent(S::TOP.parent()));
    }
    if S::TOP.default_child().is_none() {
        return Err(TreeError::MissingDefaultChild(S::TOP));
    }

    for &state in S::VARIANTS {
        let mut node = state;
        let mut steps = 0;
        while node != S::TOP {
            node = node.parent();
            steps += 1;
            if steps > S::COUNT {
                return Err(TreeError::ParentCycle(state));
            }
        }

        if let Some(child) = state.default_child() {
            if child.parent() != state {
                return Err(TreeError::MismatchedDefaultChild { state, child });
            }
        }
    }

    Ok(())
}
