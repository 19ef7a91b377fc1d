//! Value types shared by all automaton representations: states, symbolic and
//! epsilon transitions, and the frozen [StateSet] used as a dictionary key
//! during subset construction.

use crate::alphabet::SymbolId;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A state identifier, local to one automaton.
pub type StateId = u32;

/// Sentinel for "no such state". Never a valid state identifier.
pub const INVALID_STATE: StateId = StateId::MAX;

/// The label used when rendering epsilon transitions. Output-only: it is never
/// a member of any alphabet.
pub const EPSILON: &str = "ε";

/// A symbolic transition `(from, symbol, to)`. The derived ordering is
/// lexicographic by field, which is the total order all transition stores and
/// the canonical form rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    pub from: StateId,
    pub symbol: SymbolId,
    pub to: StateId,
}

impl Transition {
    pub fn new(from: StateId, symbol: SymbolId, to: StateId) -> Self {
        Self { from, symbol, to }
    }

    /// The same transition with `from` and `to` swapped.
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            symbol: self.symbol,
            to: self.from,
        }
    }
}

/// An epsilon transition `(from, to)`, taken without consuming input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpsilonTransition {
    pub from: StateId,
    pub to: StateId,
}

impl EpsilonTransition {
    pub fn new(from: StateId, to: StateId) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for EpsilonTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} {}", self.from, self.to, EPSILON)
    }
}

/// A frozen set of states: sorted, deduplicated, structurally equal and
/// hashable with a cached hash. Used as the key mapping epsilon-closed state
/// sets to DFA states during subset construction. Equality is always
/// element-wise, never identity.
#[derive(Debug, Clone)]
pub struct StateSet {
    states: Vec<StateId>,
    hash: u64,
}

impl StateSet {
    pub fn new<I: IntoIterator<Item = StateId>>(states: I) -> Self {
        let mut states: Vec<StateId> = states.into_iter().collect();
        states.sort_unstable();
        states.dedup();
        Self::from_sorted(states)
    }

    fn from_sorted(states: Vec<StateId>) -> Self {
        let mut hasher = DefaultHasher::new();
        states.hash(&mut hasher);
        Self {
            hash: hasher.finish(),
            states,
        }
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.states.binary_search(&state).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl From<&BTreeSet<StateId>> for StateSet {
    fn from(set: &BTreeSet<StateId>) -> Self {
        // BTreeSet iteration is already sorted and deduplicated
        Self::from_sorted(set.iter().copied().collect())
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states
    }
}

impl Eq for StateSet {}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}
