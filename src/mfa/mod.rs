//! # Minimal canonical Finite Automaton
//! The MFA module includes the immutable [Mfa] struct, the canonical form
//! every compilation and minimization pipeline ends in. Its shape is a frozen
//! contract:
//!
//! - if the language is empty, the state count is 0; otherwise the initial
//!   state is 0,
//! - states are numbered by breadth-first traversal from the initial state,
//!   visiting outgoing transitions in ascending (symbol, destination) order
//!   and assigning the next integer to each newly discovered state,
//! - transitions are stored in ascending (from, symbol, to) order,
//! - there are no unreachable states and no dead states (states that cannot
//!   reach a final state).
//!
//! Because of this, two MFAs recognize the same language exactly when their
//! canonical forms coincide, which makes [Mfa::canonical_string] a language
//! fingerprint and [Mfa::language_equals] a string-free comparison of the
//! same data:
//!
//! ```
//! use alang::alphabet::Alphabet;
//! use alang::parser;
//!
//! let mfa = parser::alang("ab | cd").unwrap().compile(&Alphabet::new());
//! // "ab" and "cd" are single (multi-character) symbols
//! assert_eq!(
//!     mfa.canonical_string(),
//!     "S#=2, F#=1: [1], T#=2: [0->1 ab, 0->1 cd]"
//! );
//!
//! let path = mfa.state_path(["ab"]);
//! assert_eq!(path.states(), &[0, 1]);
//! assert!(path.is_accepted());
//! ```
//!
//! An MFA is produced by [Dfa::to_mfa](crate::dfa::Dfa::to_mfa) and is
//! immutable thereafter; the only operations producing new automata from it
//! are [Mfa::complement] and [Mfa::to_nfa].

use crate::alphabet::{Alphabet, SymbolId};
use crate::automaton::FiniteAutomaton;
use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::transition::{EpsilonTransition, StateId, Transition, INVALID_STATE};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

pub use eval::MfaEvaluator;

pub mod eval;

/// A minimal finite automaton in canonical form. See the
/// [module-level documentation](crate::mfa) for the shape contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mfa {
    alphabet: Alphabet,
    transitions: Vec<Transition>,
    final_states: Vec<StateId>,
    state_count: u32,
}

/// The outcome of running an [Mfa] over an input: the visited states in
/// order, whether the whole input could be consumed, and whether it was
/// accepted. Produced by [Mfa::state_path].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePath {
    states: Vec<StateId>,
    complete: bool,
    accepted: bool,
}

impl StatePath {
    /// The visited states, starting with the initial state. Empty for the
    /// empty automaton.
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// False if execution stopped early on a missing transition or an
    /// unknown symbol.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// True if the whole input was consumed and ended in a final state.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }
}

impl Mfa {
    /// The empty-language MFA over the given alphabet.
    pub fn empty(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            transitions: Vec::new(),
            final_states: Vec::new(),
            state_count: 0,
        }
    }

    /// Gets the alphabet of this MFA.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The number of states. 0 exactly for the empty language.
    pub fn state_count(&self) -> u32 {
        self.state_count
    }

    /// The initial state: 0 when the automaton is non-empty, the invalid
    /// sentinel otherwise.
    pub fn initial_state(&self) -> StateId {
        if self.state_count == 0 {
            INVALID_STATE
        } else {
            0
        }
    }

    /// The final states, sorted ascending.
    pub fn final_states(&self) -> &[StateId] {
        &self.final_states
    }

    /// The transitions in ascending (from, symbol, to) order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Checks if this MFA recognizes the empty language.
    pub fn is_empty_language(&self) -> bool {
        self.state_count == 0
    }

    /// The successor of the given state on the given symbol, or
    /// [INVALID_STATE] if there is none.
    pub fn transition(&self, state: StateId, symbol: SymbolId) -> StateId {
        self.transitions
            .binary_search_by(|t| (t.from, t.symbol).cmp(&(state, symbol)))
            .map(|idx| self.transitions[idx].to)
            .unwrap_or(INVALID_STATE)
    }

    /// Gets an evaluator for step-wise deterministic execution.
    pub fn evaluator(&self) -> MfaEvaluator<'_> {
        self.into()
    }

    /// Runs this MFA over the input, recording every visited state.
    /// Execution stops at the first missing transition or unknown symbol,
    /// which is reported through [StatePath::is_complete].
    pub fn state_path<I, S>(&self, input: I) -> StatePath
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut evaluator = self.evaluator();
        let mut states = Vec::new();
        match evaluator.current_state() {
            Some(state) => states.push(state),
            None => {
                return StatePath {
                    states,
                    complete: false,
                    accepted: false,
                }
            }
        }
        for symbol in input {
            match evaluator.step(symbol.as_ref()) {
                Some(next) => states.push(next),
                None => {
                    return StatePath {
                        states,
                        complete: false,
                        accepted: false,
                    }
                }
            }
        }
        StatePath {
            states,
            complete: true,
            accepted: evaluator.is_accepting(),
        }
    }

    /// Checks if this automaton accepts the given symbol sequence.
    pub fn accepts(&self, input: &[&str]) -> bool {
        let mut evaluator = self.evaluator();
        let _ = evaluator.step_multiple(input);
        evaluator.is_accepting()
    }

    /// Checks if this automaton accepts the given string when split into
    /// extended grapheme clusters, each treated as one symbol. See
    /// [Alphabet::graphemes_only] for when this splitting is unambiguous.
    pub fn accepts_graphemes(&self, input: &str) -> bool {
        let graphemes: Vec<&str> = input.graphemes(true).collect();
        self.accepts(&graphemes)
    }

    /// The canonical string: state count, sorted final states, and the
    /// transitions in canonical order with symbols spelled out. Two MFAs
    /// built against the same universe recognize the same language iff their
    /// canonical strings are equal. The empty automaton prints
    /// `S#=0, F#=0, T#=0`.
    pub fn canonical_string(&self) -> String {
        let mut out = format!("S#={}", self.state_count);
        out.push_str(&format!(", F#={}", self.final_states.len()));
        if !self.final_states.is_empty() {
            let finals: Vec<String> = self.final_states.iter().map(|s| s.to_string()).collect();
            out.push_str(&format!(": [{}]", finals.join(", ")));
        }
        out.push_str(&format!(", T#={}", self.transitions.len()));
        if !self.transitions.is_empty() {
            let transitions: Vec<String> = self
                .transitions
                .iter()
                .map(|t| {
                    let symbol = self
                        .alphabet
                        .symbol_at(t.symbol)
                        .expect("transition symbols are always in the alphabet");
                    format!("{}->{} {}", t.from, t.to, symbol)
                })
                .collect();
            out.push_str(&format!(": [{}]", transitions.join(", ")));
        }
        out
    }

    /// The canonical form projected onto the symbols actually referenced by
    /// transitions, with symbols compared by string rather than by index.
    fn projection(&self) -> (Vec<&str>, Vec<(StateId, usize, StateId)>, &[StateId], u32) {
        let mut used: Vec<SymbolId> = self.transitions.iter().map(|t| t.symbol).collect();
        used.sort_unstable();
        used.dedup();
        let symbols = used
            .iter()
            .map(|&id| {
                self.alphabet
                    .symbol_at(id)
                    .expect("transition symbols are always in the alphabet")
            })
            .collect();
        let transitions = self
            .transitions
            .iter()
            .map(|t| {
                let dense = used
                    .binary_search(&t.symbol)
                    .expect("symbol collected from this very transition list");
                (t.from, dense, t.to)
            })
            .collect();
        (symbols, transitions, &self.final_states, self.state_count)
    }

    /// Checks if this MFA recognizes the same language as another by
    /// comparing the canonical forms projected onto their referenced
    /// symbols. Automata compiled against the same context alphabet always
    /// compare exactly.
    pub fn language_equals(&self, other: &Mfa) -> bool {
        self.projection() == other.projection()
    }

    /// The complement of this automaton relative to its own alphabet, as a
    /// DFA: a single fresh trap state is added, every missing (state, symbol)
    /// transition is pointed at it, and the final states become every
    /// non-final state of the original plus the trap state. The caller's
    /// alphabet defines the universe, so complementing the same language
    /// under a larger alphabet yields a larger language.
    pub fn complement(&self) -> Dfa {
        let mut dfa = Dfa::new(self.alphabet.clone());
        let trap: StateId = self.state_count;
        dfa.set_initial(if self.state_count == 0 { trap } else { 0 });
        for t in &self.transitions {
            dfa.set_transition(t.from, t.symbol, t.to);
        }
        for state in 0..=trap {
            for symbol in 0..self.alphabet.len() as SymbolId {
                if dfa.transition(state, symbol) == INVALID_STATE {
                    dfa.set_transition(state, symbol, trap);
                }
            }
        }
        for state in 0..self.state_count {
            if self.final_states.binary_search(&state).is_err() {
                dfa.set_final(state);
            }
        }
        dfa.set_final(trap);
        dfa
    }

    /// Converts this MFA to an NFA recognizing the same language.
    pub fn to_nfa(&self) -> Nfa {
        Nfa::from_deterministic(self, false)
    }
}

impl fmt::Display for Mfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

impl From<&Mfa> for Nfa {
    fn from(value: &Mfa) -> Self {
        value.to_nfa()
    }
}

impl FiniteAutomaton for Mfa {
    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn initial_states(&self) -> Box<dyn Iterator<Item = StateId> + '_> {
        Box::new((self.state_count > 0).then_some(0).into_iter())
    }

    fn final_states(&self) -> Box<dyn Iterator<Item = StateId> + '_> {
        Box::new(self.final_states.iter().copied())
    }

    fn is_initial(&self, state: StateId) -> bool {
        self.state_count > 0 && state == 0
    }

    fn is_final(&self, state: StateId) -> bool {
        self.final_states.binary_search(&state).is_ok()
    }

    fn transitions(&self) -> Box<dyn Iterator<Item = Transition> + '_> {
        Box::new(self.transitions.iter().copied())
    }

    fn epsilon_transitions(&self) -> Box<dyn Iterator<Item = EpsilonTransition> + '_> {
        Box::new(std::iter::empty())
    }

    fn is_epsilon_free(&self) -> bool {
        true
    }
}

/// Canonicalizes a minimal DFA into the [Mfa] form: drops dead states (found
/// by a backward pass from the final states), renumbers the survivors by BFS
/// from the initial state visiting outgoing transitions in ascending
/// (symbol, destination) order, and sorts the transition list. The input must
/// already be minimal for the result to be the minimal automaton; this is
/// guaranteed by the only caller, [Dfa::to_mfa].
pub(crate) fn canonicalize(dfa: &Dfa) -> Mfa {
    let alphabet = dfa.alphabet().clone();
    if dfa.initial_state() == INVALID_STATE || dfa.final_states().is_empty() {
        return Mfa::empty(alphabet);
    }

    // Backward pass: the states that can reach a final state.
    let mut predecessors: HashMap<StateId, Vec<StateId>> = HashMap::new();
    for t in dfa.transitions() {
        predecessors.entry(t.to).or_default().push(t.from);
    }
    let mut live: BTreeSet<StateId> = dfa.final_states().iter().copied().collect();
    let mut queue: Vec<StateId> = live.iter().copied().collect();
    while let Some(state) = queue.pop() {
        for &previous in predecessors.get(&state).map(Vec::as_slice).unwrap_or(&[]) {
            if live.insert(previous) {
                queue.push(previous);
            }
        }
    }
    if !live.contains(&dfa.initial_state()) {
        return Mfa::empty(alphabet);
    }

    // Forward BFS over live states assigns the canonical numbering. For a
    // deterministic automaton, ascending symbol order is ascending
    // (symbol, destination) order, which is how the packed successor table
    // iterates.
    let mut numbering: HashMap<StateId, StateId> = HashMap::new();
    numbering.insert(dfa.initial_state(), 0);
    let mut next: StateId = 1;
    let mut bfs: VecDeque<StateId> = VecDeque::from([dfa.initial_state()]);
    let mut kept: Vec<Transition> = Vec::new();
    while let Some(state) = bfs.pop_front() {
        for t in dfa.transitions_from(state) {
            if !live.contains(&t.to) {
                continue;
            }
            if !numbering.contains_key(&t.to) {
                numbering.insert(t.to, next);
                next += 1;
                bfs.push_back(t.to);
            }
            kept.push(t);
        }
    }

    let mut transitions: Vec<Transition> = kept
        .into_iter()
        .map(|t| Transition::new(numbering[&t.from], t.symbol, numbering[&t.to]))
        .collect();
    transitions.sort_unstable();

    let mut final_states: Vec<StateId> = dfa
        .final_states()
        .iter()
        .filter_map(|state| numbering.get(state).copied())
        .collect();
    final_states.sort_unstable();

    Mfa {
        alphabet,
        transitions,
        final_states,
        state_count: next,
    }
}
