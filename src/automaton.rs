//! A common read-only view over the three automaton representations.

use crate::alphabet::Alphabet;
use crate::transition::{EpsilonTransition, StateId, Transition};

/// Capability view shared by [Nfa](crate::nfa::Nfa), [Dfa](crate::dfa::Dfa)
/// and [Mfa](crate::mfa::Mfa): the alphabet, the initial and final states (as
/// predicates and as iterators), the transitions, and whether the automaton is
/// free of epsilon moves.
///
/// Deterministic representations report `is_epsilon_free() == true` and at
/// most one initial state; this is what
/// [Nfa::from_deterministic](crate::nfa::Nfa::from_deterministic) relies on.
pub trait FiniteAutomaton {
    fn alphabet(&self) -> &Alphabet;

    fn initial_states(&self) -> Box<dyn Iterator<Item = StateId> + '_>;

    fn final_states(&self) -> Box<dyn Iterator<Item = StateId> + '_>;

    fn is_initial(&self, state: StateId) -> bool;

    fn is_final(&self, state: StateId) -> bool;

    /// Iterates the symbolic transitions in ascending `(from, symbol, to)`
    /// order.
    fn transitions(&self) -> Box<dyn Iterator<Item = Transition> + '_>;

    /// Iterates the epsilon transitions in ascending `(from, to)` order.
    /// Empty for deterministic representations.
    fn epsilon_transitions(&self) -> Box<dyn Iterator<Item = EpsilonTransition> + '_>;

    fn is_epsilon_free(&self) -> bool;
}
