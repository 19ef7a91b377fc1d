use crate::alphabet::SymbolId;
use crate::nfa::Nfa;
use crate::transition::StateId;
use std::collections::{BTreeSet, HashMap};

/// Step-wise execution of an [Nfa]: tracks the epsilon-closed set of states
/// the automaton can currently be in. Stepping on a symbol with no reachable
/// successor (or one not in the alphabet at all) empties the set, after which
/// the evaluator stays empty.
#[derive(Debug, Clone)]
pub struct NfaEvaluator<'a> {
    nfa: &'a Nfa,
    rev_map: HashMap<&'a str, SymbolId>,
    current_states: BTreeSet<StateId>,
}

impl<'a> NfaEvaluator<'a> {
    /// Checks if any state the automaton can currently be in is final.
    pub fn is_accepting(&self) -> bool {
        self.current_states
            .iter()
            .any(|state| self.nfa.final_states().contains(state))
    }

    /// The epsilon-closed set of states the automaton can currently be in.
    pub fn current_states(&self) -> &BTreeSet<StateId> {
        &self.current_states
    }

    /// Consumes one symbol. A symbol outside the alphabet empties the state
    /// set and returns `None`; an empty set rejects all further input.
    pub fn step(&mut self, symbol: &str) -> Option<()> {
        match self.rev_map.get(symbol) {
            Some(&symbol) => {
                self.current_states = self.nfa.reachable_states(&self.current_states, symbol);
                Some(())
            }
            None => {
                self.current_states.clear();
                None
            }
        }
    }

    /// Consumes a sequence of symbols, stopping at the first unknown one.
    pub fn step_multiple(&mut self, symbols: &[&str]) -> Option<()> {
        symbols.iter().try_for_each(|symbol| self.step(symbol))
    }
}

impl<'a> From<&'a Nfa> for NfaEvaluator<'a> {
    fn from(value: &'a Nfa) -> Self {
        let rev_map = value
            .alphabet()
            .iter()
            .enumerate()
            .map(|(idx, symbol)| (symbol, idx as SymbolId))
            .collect();
        let mut current_states = value.initial_states().clone();
        value.epsilon_closure(&mut current_states);
        Self {
            nfa: value,
            rev_map,
            current_states,
        }
    }
}
