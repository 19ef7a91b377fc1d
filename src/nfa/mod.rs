//! # Nondeterministic Finite Automaton, with or without ε-moves
//! The NFA module includes the [Nfa] struct, the mutable workhorse of the
//! operations engine. An NFA holds its [Alphabet], a sorted set of symbolic
//! [Transition]s (supporting range queries by source state and by
//! (source, symbol) pair), a set of [EpsilonTransition]s, a set of initial
//! states and a set of final states. Unlike a textbook NFA it may have any
//! number of initial states, which is what makes reversal of a deterministic
//! automaton closed under this representation.
//!
//! NFAs are produced by lowering Alang expressions
//! ([AlangRegex::compile](crate::alang::AlangRegex::compile)), by converting a
//! deterministic automaton ([Nfa::from_deterministic]), or directly from
//! symbol sequences:
//!
//! ```
//! use alang::nfa::Nfa;
//!
//! // One linear chain per sequence, sharing one alphabet {a, b, c}
//! let nfa = Nfa::from_sequences([["a", "b"], ["a", "c"]]);
//! let mfa = nfa.to_dfa().to_mfa();
//! assert_eq!(
//!     mfa.canonical_string(),
//!     "S#=3, F#=1: [2], T#=3: [0->1 a, 1->2 b, 1->2 c]"
//! );
//! ```
//!
//! ## Language-level operations
//! Union, concatenation, the Kleene closures and the option closure are
//! implemented in place on the NFA with epsilon transitions, offsetting the
//! other operand's states past this automaton's maximum state and remapping
//! its symbol indices through [Alphabet::union_with]. The borrowing
//! free-function forms live in [ops](crate::ops).
//!
//! ## Determinization
//! [Nfa::to_dfa] runs the subset construction: a work queue of epsilon-closed
//! state sets, each frozen into a [StateSet] key and mapped to a fresh DFA
//! state on first sight. A set is final iff it intersects this NFA's final
//! set. The δ̂ step ([Nfa::reachable_states]) closes under epsilon, takes the
//! symbol once, and closes under epsilon again.
//!
//! ## The empty language
//! An NFA is the empty language iff no state has ever been recorded, tracked
//! by a max-state sentinel. Every construction that produces a non-empty
//! language records at least one state, and the operations that can collapse
//! a language to empty ([Nfa::concat_with] with an empty operand) reset the
//! sentinel, so the shortcut is exact.

use crate::alphabet::{Alphabet, SymbolId};
use crate::automaton::FiniteAutomaton;
use crate::dfa::Dfa;
use crate::transition::{EpsilonTransition, StateId, StateSet, Transition, INVALID_STATE};
use std::collections::{BTreeSet, HashMap, VecDeque};
use unicode_segmentation::UnicodeSegmentation;

pub use eval::NfaEvaluator;

pub mod eval;

/// A nondeterministic finite automaton over a symbolic alphabet, with
/// epsilon moves and any number of initial states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) alphabet: Alphabet,
    pub(crate) transitions: BTreeSet<Transition>,
    pub(crate) epsilon_transitions: BTreeSet<EpsilonTransition>,
    pub(crate) initial_states: BTreeSet<StateId>,
    pub(crate) final_states: BTreeSet<StateId>,
    pub(crate) max_state: StateId,
}

impl Nfa {
    /// Creates an empty-language NFA over the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            transitions: BTreeSet::new(),
            epsilon_transitions: BTreeSet::new(),
            initial_states: BTreeSet::new(),
            final_states: BTreeSet::new(),
            max_state: INVALID_STATE,
        }
    }

    /// Creates an NFA from a deterministic source (a [Dfa](crate::dfa::Dfa)
    /// or [Mfa](crate::mfa::Mfa)). With `reversed` set, every transition is
    /// swapped, the source's final states become the initial states, and the
    /// source's initial state becomes the sole final state.
    pub fn from_deterministic(source: &impl FiniteAutomaton, reversed: bool) -> Self {
        debug_assert!(source.is_epsilon_free());
        let mut nfa = Nfa::new(source.alphabet().clone());
        for transition in source.transitions() {
            nfa.add_transition(if reversed {
                transition.reversed()
            } else {
                transition
            });
        }
        let (initials, finals): (Vec<StateId>, Vec<StateId>) = if reversed {
            (source.final_states().collect(), source.initial_states().collect())
        } else {
            (source.initial_states().collect(), source.final_states().collect())
        };
        for state in initials {
            nfa.set_initial(state);
        }
        for state in finals {
            nfa.set_final(state);
        }
        nfa
    }

    /// Creates an NFA from a collection of symbol sequences. Each sequence
    /// forms its own linear chain from a fresh initial state to a fresh final
    /// state, adding symbols to the alphabet as needed.
    pub fn from_sequences<I, S, T>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut nfa = Nfa::new(Alphabet::new());
        for sequence in sequences {
            nfa.add_sequence(sequence);
        }
        nfa
    }

    /// One-state automaton accepting any string over the given alphabet: the
    /// single state is both initial and final and loops on every symbol.
    /// If the alphabet is empty this is the empty language, so a wildcard
    /// only ever matches relative to a populated alphabet.
    pub fn wildcard(alphabet: Alphabet) -> Self {
        let mut nfa = Nfa::new(alphabet);
        if nfa.alphabet.is_empty() {
            return nfa;
        }
        let state = nfa.fresh_state();
        nfa.set_initial(state);
        nfa.set_final(state);
        for symbol in 0..nfa.alphabet.len() as SymbolId {
            nfa.add_transition(Transition::new(state, symbol, state));
        }
        nfa
    }

    /// Gets the alphabet of this NFA.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The highest state identifier recorded so far, or `None` for the
    /// empty-language automaton.
    pub fn max_state(&self) -> Option<StateId> {
        (self.max_state != INVALID_STATE).then_some(self.max_state)
    }

    /// The set of initial states.
    pub fn initial_states(&self) -> &BTreeSet<StateId> {
        &self.initial_states
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

    /// Allocates a state identifier one past the current maximum.
    pub fn fresh_state(&mut self) -> StateId {
        let state = self.state_offset();
        self.note_state(state);
        state
    }

    /// The offset to add to another automaton's states to place them past
    /// this automaton's states.
    fn state_offset(&self) -> StateId {
        if self.max_state == INVALID_STATE {
            0
        } else {
            self.max_state + 1
        }
    }

    /// Adds a symbolic transition. The symbol index must be valid for this
    /// NFA's alphabet.
    pub fn add_transition(&mut self, transition: Transition) {
        debug_assert!((transition.symbol as usize) < self.alphabet.len());
        self.note_state(transition.from);
        self.note_state(transition.to);
        self.transitions.insert(transition);
    }

    /// Adds every transition of the iterator.
    pub fn add_transitions<I: IntoIterator<Item = Transition>>(&mut self, transitions: I) {
        for transition in transitions {
            self.add_transition(transition);
        }
    }

    /// Adds an epsilon transition.
    pub fn add_epsilon_transition(&mut self, from: StateId, to: StateId) {
        self.note_state(from);
        self.note_state(to);
        self.epsilon_transitions
            .insert(EpsilonTransition::new(from, to));
    }

    /// Adds an epsilon-free chain of fresh states spelling out the sequence,
    /// from a fresh initial state to a fresh final state. Symbols are added
    /// to the alphabet as needed. An empty sequence yields a single fresh
    /// state that is both initial and final.
    pub fn add_sequence<I, T>(&mut self, sequence: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut current = self.fresh_state();
        self.set_initial(current);
        for symbol in sequence {
            let symbol = self.alphabet.get_or_add(symbol.as_ref());
            let next = self.fresh_state();
            self.add_transition(Transition::new(current, symbol, next));
            current = next;
        }
        self.set_final(current);
    }

    /// Marks a state as initial.
    pub fn set_initial(&mut self, state: StateId) {
        self.note_state(state);
        self.initial_states.insert(state);
    }

    /// Unmarks a state as initial.
    pub fn unset_initial(&mut self, state: StateId) {
        self.initial_states.remove(&state);
    }

    /// Removes all initial states.
    pub fn clear_initials(&mut self) {
        self.initial_states.clear();
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

    /// Removes all final states.
    pub fn clear_finals(&mut self) {
        self.final_states.clear();
    }

    /// All symbolic transitions leaving the given state, in ascending
    /// (symbol, to) order.
    pub fn transitions_from(&self, state: StateId) -> impl Iterator<Item = Transition> + '_ {
        self.transitions
            .range(Transition::new(state, 0, 0)..=Transition::new(state, SymbolId::MAX, INVALID_STATE))
            .copied()
    }

    /// All transitions leaving the given state on the given symbol, in
    /// ascending destination order.
    pub fn transitions_on(
        &self,
        state: StateId,
        symbol: SymbolId,
    ) -> impl Iterator<Item = Transition> + '_ {
        self.transitions
            .range(Transition::new(state, symbol, 0)..=Transition::new(state, symbol, INVALID_STATE))
            .copied()
    }

    /// The one-step epsilon successors of the given state.
    pub fn epsilon_successors(&self, state: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.epsilon_transitions
            .range(EpsilonTransition::new(state, 0)..=EpsilonTransition::new(state, INVALID_STATE))
            .map(|t| t.to)
    }

    /// The set of symbols with at least one non-epsilon transition leaving
    /// some member of the given state set.
    pub fn available_symbols(&self, states: &BTreeSet<StateId>) -> BTreeSet<SymbolId> {
        states
            .iter()
            .flat_map(|&state| self.transitions_from(state).map(|t| t.symbol))
            .collect()
    }

    /// Extends the given state set to its epsilon closure in place. The
    /// fixed point is breadth-first; the set itself guards against
    /// re-insertion, so epsilon self-loops terminate.
    pub fn epsilon_closure(&self, states: &mut BTreeSet<StateId>) {
        let mut queue: VecDeque<StateId> = states.iter().copied().collect();
        while let Some(state) = queue.pop_front() {
            for successor in self.epsilon_successors(state) {
                if states.insert(successor) {
                    queue.push_back(successor);
                }
            }
        }
    }

    /// The δ̂ of subset construction: the set of states reachable from the
    /// given set after closing under epsilon, taking the symbol once, and
    /// closing under epsilon again.
    pub fn reachable_states(
        &self,
        from: &BTreeSet<StateId>,
        symbol: SymbolId,
    ) -> BTreeSet<StateId> {
        let mut closed = from.clone();
        self.epsilon_closure(&mut closed);
        let mut reached: BTreeSet<StateId> = closed
            .iter()
            .flat_map(|&state| self.transitions_on(state, symbol).map(|t| t.to))
            .collect();
        self.epsilon_closure(&mut reached);
        reached
    }

    /// Checks if this NFA accepts the empty string, i.e. if the epsilon
    /// closure of the initial set intersects the final set.
    pub fn accepts_epsilon(&self) -> bool {
        let mut closure = self.initial_states.clone();
        self.epsilon_closure(&mut closure);
        closure.iter().any(|state| self.final_states.contains(state))
    }

    /// Checks if this NFA recognizes the empty language (not even ε).
    pub fn is_empty_language(&self) -> bool {
        self.max_state == INVALID_STATE
    }

    /// Replaces this automaton with the empty language, keeping the alphabet.
    fn clear_to_empty(&mut self) {
        self.transitions.clear();
        self.epsilon_transitions.clear();
        self.initial_states.clear();
        self.final_states.clear();
        self.max_state = INVALID_STATE;
    }

    /// Replaces this automaton's states with `other`'s, remapping symbols
    /// into the already-unioned alphabet.
    fn become_remapped(&mut self, other: Nfa, remap: &[SymbolId]) {
        self.transitions = other
            .transitions
            .into_iter()
            .map(|t| Transition::new(t.from, remap[t.symbol as usize], t.to))
            .collect();
        self.epsilon_transitions = other.epsilon_transitions;
        self.initial_states = other.initial_states;
        self.final_states = other.final_states;
        self.max_state = other.max_state;
    }

    /// Copies `other`'s transitions into this automaton with states shifted
    /// by `offset` and symbols remapped, and returns nothing; initial/final
    /// bookkeeping stays with the caller.
    fn import_shifted(&mut self, other: &Nfa, offset: StateId, remap: &[SymbolId]) {
        for t in &other.transitions {
            self.add_transition(Transition::new(
                t.from + offset,
                remap[t.symbol as usize],
                t.to + offset,
            ));
        }
        for t in &other.epsilon_transitions {
            self.add_epsilon_transition(t.from + offset, t.to + offset);
        }
        if other.max_state != INVALID_STATE {
            self.note_state(other.max_state + offset);
        }
    }

    /// In-place union: afterwards this NFA accepts every string accepted by
    /// either operand. The other automaton's states are offset past this
    /// one's, its symbols remapped, and its initial and final states added to
    /// this automaton's. Union with the empty language is the identity (the
    /// alphabets are still unioned).
    pub fn union_with(&mut self, other: Nfa) {
        let remap = self.alphabet.union_with(&other.alphabet);
        if other.initial_states.is_empty() {
            return;
        }
        if self.initial_states.is_empty() {
            self.become_remapped(other, &remap);
            return;
        }
        let offset = self.state_offset();
        self.import_shifted(&other, offset, &remap);
        for &state in &other.initial_states {
            self.set_initial(state + offset);
        }
        for &state in &other.final_states {
            self.set_final(state + offset);
        }
    }

    /// In-place concatenation: afterwards this NFA accepts every string that
    /// splits into a prefix it accepted before and a suffix `other` accepts.
    /// Implemented by linking every current final state to `other`'s offset
    /// initial states with epsilon transitions. If either operand is the
    /// empty language the result is the empty language.
    pub fn concat_with(&mut self, other: Nfa) {
        let remap = self.alphabet.union_with(&other.alphabet);
        if self.initial_states.is_empty() || other.initial_states.is_empty() {
            self.clear_to_empty();
            return;
        }
        let offset = self.state_offset();
        self.import_shifted(&other, offset, &remap);
        let finals: Vec<StateId> = self.final_states.iter().copied().collect();
        self.final_states.clear();
        for &initial in &other.initial_states {
            for &last in &finals {
                self.add_epsilon_transition(last, initial + offset);
            }
        }
        for &state in &other.final_states {
            self.set_final(state + offset);
        }
    }

    /// In-place Kleene star: zero or more repetitions. A fresh state becomes
    /// the sole initial and sole final state, linked by epsilon transitions
    /// to the previous initial states and from the previous final states.
    /// The result always accepts ε.
    pub fn kleene_star(&mut self) {
        let hub = self.loop_hub();
        self.initial_states.clear();
        self.final_states.clear();
        self.set_initial(hub);
        self.set_final(hub);
    }

    /// In-place Kleene plus: one or more repetitions. As [Nfa::kleene_star],
    /// but the fresh state is not final and the previous final states are
    /// kept, so ε is only accepted if it already was.
    pub fn kleene_plus(&mut self) {
        let hub = self.loop_hub();
        self.initial_states.clear();
        self.set_initial(hub);
    }

    fn loop_hub(&mut self) -> StateId {
        let hub = self.fresh_state();
        let initials: Vec<StateId> = self.initial_states.iter().copied().collect();
        let finals: Vec<StateId> = self.final_states.iter().copied().collect();
        for initial in initials {
            self.add_epsilon_transition(hub, initial);
        }
        for last in finals {
            self.add_epsilon_transition(last, hub);
        }
        hub
    }

    /// In-place option: afterwards this NFA also accepts ε. If it already
    /// does, it is left unchanged; otherwise a fresh state that is both
    /// initial and final is added. Applied to the empty language this yields
    /// the automaton accepting exactly ε.
    pub fn optional(&mut self) {
        if self.accepts_epsilon() {
            return;
        }
        let state = self.fresh_state();
        self.set_initial(state);
        self.set_final(state);
    }

    /// Gets an evaluator tracking the set of states this NFA can be in while
    /// consuming input symbol by symbol.
    pub fn evaluator(&self) -> NfaEvaluator<'_> {
        self.into()
    }

    /// Checks if this automaton accepts the given symbol sequence.
    pub fn accepts(&self, input: &[&str]) -> bool {
        let mut evaluator = self.evaluator();
        let _ = evaluator.step_multiple(input);
        evaluator.is_accepting()
    }

    /// Checks if this automaton accepts the given string when split into
    /// extended grapheme clusters, each treated as one symbol.
    pub fn accepts_graphemes(&self, input: &str) -> bool {
        let graphemes: Vec<&str> = input.graphemes(true).collect();
        self.accepts(&graphemes)
    }

    /// Converts this NFA to a DFA using the subset construction. Each
    /// reachable epsilon-closed state set becomes one DFA state, numbered
    /// sequentially from 0 in discovery order with the initial set first.
    pub fn to_dfa(&self) -> Dfa {
        /// Maps the set to its DFA state, allocating the next identifier and
        /// queueing the set for expansion on first sight.
        fn admit(
            nfa: &Nfa,
            set: BTreeSet<StateId>,
            ids: &mut HashMap<StateSet, StateId>,
            queue: &mut VecDeque<(BTreeSet<StateId>, StateId)>,
            dfa: &mut Dfa,
            next_id: &mut StateId,
        ) -> StateId {
            let key = StateSet::from(&set);
            if let Some(&id) = ids.get(&key) {
                return id;
            }
            let id = *next_id;
            *next_id += 1;
            if set.iter().any(|state| nfa.final_states.contains(state)) {
                dfa.set_final(id);
            }
            ids.insert(key, id);
            queue.push_back((set, id));
            id
        }

        let mut dfa = Dfa::new(self.alphabet.clone());
        if self.initial_states.is_empty() {
            return dfa;
        }

        let mut start = self.initial_states.clone();
        self.epsilon_closure(&mut start);

        let mut ids: HashMap<StateSet, StateId> = HashMap::new();
        let mut queue: VecDeque<(BTreeSet<StateId>, StateId)> = VecDeque::new();
        let mut next_id: StateId = 0;

        let initial = admit(self, start, &mut ids, &mut queue, &mut dfa, &mut next_id);
        dfa.set_initial(initial);

        while let Some((set, id)) = queue.pop_front() {
            for symbol in self.available_symbols(&set) {
                let target = self.reachable_states(&set, symbol);
                debug_assert!(!target.is_empty());
                let target_id = admit(self, target, &mut ids, &mut queue, &mut dfa, &mut next_id);
                dfa.set_transition(id, symbol, target_id);
            }
        }
        dfa
    }
}

impl FiniteAutomaton for Nfa {
    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn initial_states(&self) -> Box<dyn Iterator<Item = StateId> + '_> {
        Box::new(self.initial_states.iter().copied())
    }

    fn final_states(&self) -> Box<dyn Iterator<Item = StateId> + '_> {
        Box::new(self.final_states.iter().copied())
    }

    fn is_initial(&self, state: StateId) -> bool {
        self.initial_states.contains(&state)
    }

    fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }

    fn transitions(&self) -> Box<dyn Iterator<Item = Transition> + '_> {
        Box::new(self.transitions.iter().copied())
    }

    fn epsilon_transitions(&self) -> Box<dyn Iterator<Item = EpsilonTransition> + '_> {
        Box::new(self.epsilon_transitions.iter().copied())
    }

    fn is_epsilon_free(&self) -> bool {
        self.epsilon_transitions.is_empty()
    }
}
