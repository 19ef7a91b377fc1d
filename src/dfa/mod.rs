//! # Deterministic Finite Automaton
//! The DFA module includes the [Dfa] struct: a deterministic automaton with a
//! single initial state (or none, for the empty language) and at most one
//! successor per (state, symbol) pair. The successor table is an ordered map
//! on the packed key `(state << 32) | symbol`, so iterating it yields
//! transitions in ascending (from, symbol) order, which is what the canonical
//! numbering of the [Mfa](crate::mfa::Mfa) relies on.
//!
//! A DFA is produced from an [Nfa](crate::nfa::Nfa) by the subset
//! construction ([Nfa::to_dfa](crate::nfa::Nfa::to_dfa)) or from an
//! [Mfa](crate::mfa::Mfa) by [complement](crate::mfa::Mfa::complement).
//!
//! ## Minimization
//! [Dfa::minimized] is Brzozowski's construction: reverse, determinize,
//! reverse, determinize. Both reversals go through
//! [Nfa::from_deterministic](crate::nfa::Nfa::from_deterministic), since
//! reversing a deterministic automaton is in general nondeterministic.
//! [Dfa::to_mfa] minimizes and then canonicalizes into the immutable
//! [Mfa](crate::mfa::Mfa) form.
//!
//! ```
//! use alang::alphabet::Alphabet;
//! use alang::parser;
//!
//! // One, two or three a:s in a row. The union of three chains determinizes
//! // into one chain of four states, which is already minimal
//! let regex = parser::alang("a|a a|a a a").unwrap();
//! let mfa = regex.compile(&Alphabet::new());
//! assert_eq!(mfa.state_count(), 4);
//! ```

use crate::alphabet::{Alphabet, SymbolId};
use crate::automaton::FiniteAutomaton;
use crate::mfa::Mfa;
use crate::nfa::Nfa;
use crate::transition::{EpsilonTransition, StateId, Transition, INVALID_STATE};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

fn pack(state: StateId, symbol: SymbolId) -> u64 {
    ((state as u64) << 32) | symbol as u64
}

fn unpack(key: u64) -> (StateId, SymbolId) {
    ((key >> 32) as StateId, key as SymbolId)
}

/// A deterministic finite automaton: a partial function
/// (state, symbol) → state, a single initial state (or the invalid sentinel),
/// and a set of final states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Alphabet,
    pub(crate) transitions: BTreeMap<u64, StateId>,
    pub(crate) initial_state: StateId,
    pub(crate) final_states: BTreeSet<StateId>,
    pub(crate) max_state: StateId,
}

impl Dfa {
    /// Creates an empty-language DFA over the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            transitions: BTreeMap::new(),
            initial_state: INVALID_STATE,
            final_states: BTreeSet::new(),
            max_state: INVALID_STATE,
        }
    }

    /// Gets the alphabet of this DFA.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The initial state, or [INVALID_STATE] if this DFA has none.
    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    /// The set of final states.
    pub fn final_states(&self) -> &BTreeSet<StateId> {
        &self.final_states
    }

    fn note_state(&mut self, state: StateId) {
        debug_assert_ne!(state, INVALID_STATE);
        if self.max_state == INVALID_STATE || state > self.max_state {
            self.max_state = state;
        }
    }

    /// Sets the initial state.
    pub fn set_initial(&mut self, state: StateId) {
        self.note_state(state);
        self.initial_state = state;
    }

    /// Marks a state as final.
    pub fn set_final(&mut self, state: StateId) {
        self.note_state(state);
        self.final_states.insert(state);
    }

    /// Unmarks a state as final.
    pub fn unset_final(&mut self, state: StateId) {
        self.final_states.remove(&state);
    }

    /// Adds a transition, replacing any previous successor for the same
    /// (state, symbol) pair.
    pub fn set_transition(&mut self, from: StateId, symbol: SymbolId, to: StateId) {
        debug_assert!((symbol as usize) < self.alphabet.len());
        self.note_state(from);
        self.note_state(to);
        self.transitions.insert(pack(from, symbol), to);
    }

    /// The successor of the given state on the given symbol, or
    /// [INVALID_STATE] if there is none.
    pub fn transition(&self, state: StateId, symbol: SymbolId) -> StateId {
        self.transitions
            .get(&pack(state, symbol))
            .copied()
            .unwrap_or(INVALID_STATE)
    }

    /// Iterates all transitions in ascending (from, symbol, to) order.
    pub fn transitions(&self) -> impl Iterator<Item = Transition> + '_ {
        self.transitions.iter().map(|(&key, &to)| {
            let (from, symbol) = unpack(key);
            Transition::new(from, symbol, to)
        })
    }

    /// Iterates the transitions leaving the given state in ascending symbol
    /// order.
    pub fn transitions_from(&self, state: StateId) -> impl Iterator<Item = Transition> + '_ {
        self.transitions
            .range(pack(state, 0)..=pack(state, SymbolId::MAX))
            .map(|(&key, &to)| {
                let (from, symbol) = unpack(key);
                Transition::new(from, symbol, to)
            })
    }

    /// Checks if this DFA recognizes the empty language, i.e. if no final
    /// state is reachable from the initial state.
    pub fn is_empty_language(&self) -> bool {
        if self.initial_state == INVALID_STATE {
            return true;
        }
        let mut reached = BTreeSet::from([self.initial_state]);
        let mut queue = VecDeque::from([self.initial_state]);
        while let Some(state) = queue.pop_front() {
            if self.final_states.contains(&state) {
                return false;
            }
            for transition in self.transitions_from(state) {
                if reached.insert(transition.to) {
                    queue.push_back(transition.to);
                }
            }
        }
        true
    }

    /// Converts this DFA to an NFA recognizing the same language. Cheap: the
    /// transition set is copied as-is.
    pub fn to_nfa(&self) -> Nfa {
        Nfa::from_deterministic(self, false)
    }

    /// Converts this DFA to an NFA recognizing the reversed language: every
    /// transition is swapped, the final states become the initial states and
    /// the initial state becomes the sole final state.
    pub fn to_reversed_nfa(&self) -> Nfa {
        Nfa::from_deterministic(self, true)
    }

    /// Produces the minimal DFA for this DFA's language using Brzozowski's
    /// double-reversal construction: reverse, determinize, reverse,
    /// determinize.
    pub fn minimized(&self) -> Dfa {
        self.to_reversed_nfa().to_dfa().to_reversed_nfa().to_dfa()
    }

    /// Minimizes this DFA and canonicalizes the result into an [Mfa].
    pub fn to_mfa(&self) -> Mfa {
        crate::mfa::canonicalize(&self.minimized())
    }
}

impl From<&Dfa> for Nfa {
    fn from(value: &Dfa) -> Self {
        value.to_nfa()
    }
}

impl FiniteAutomaton for Dfa {
    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn initial_states(&self) -> Box<dyn Iterator<Item = StateId> + '_> {
        Box::new(
            (self.initial_state != INVALID_STATE)
                .then_some(self.initial_state)
                .into_iter(),
        )
    }

    fn final_states(&self) -> Box<dyn Iterator<Item = StateId> + '_> {
        Box::new(self.final_states.iter().copied())
    }

    fn is_initial(&self, state: StateId) -> bool {
        state != INVALID_STATE && state == self.initial_state
    }

    fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }

    fn transitions(&self) -> Box<dyn Iterator<Item = Transition> + '_> {
        Box::new(Dfa::transitions(self))
    }

    fn epsilon_transitions(&self) -> Box<dyn Iterator<Item = EpsilonTransition> + '_> {
        Box::new(std::iter::empty())
    }

    fn is_epsilon_free(&self) -> bool {
        true
    }
}
