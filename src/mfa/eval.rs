use crate::alphabet::SymbolId;
use crate::mfa::Mfa;
use crate::transition::{StateId, INVALID_STATE};
use std::collections::HashMap;

/// Step-wise deterministic execution of an [Mfa]. Keeps the current state
/// while consuming one symbol at a time; once a symbol has no transition (or
/// is not in the alphabet at all), the evaluator stays failed.
#[derive(Debug, Clone)]
pub struct MfaEvaluator<'a> {
    mfa: &'a Mfa,
    rev_map: HashMap<&'a str, SymbolId>,
    current: StateId,
}

impl<'a> MfaEvaluator<'a> {
    /// Checks if the evaluator currently sits in a final state.
    pub fn is_accepting(&self) -> bool {
        self.current != INVALID_STATE
            && self.mfa.final_states().binary_search(&self.current).is_ok()
    }

    /// The current state, or `None` once execution has failed (or if the
    /// automaton is empty).
    pub fn current_state(&self) -> Option<StateId> {
        (self.current != INVALID_STATE).then_some(self.current)
    }

    /// Consumes one symbol and returns the state reached, or `None` if there
    /// is no transition for it.
    pub fn step(&mut self, symbol: &str) -> Option<StateId> {
        if self.current == INVALID_STATE {
            return None;
        }
        self.current = match self.rev_map.get(symbol) {
            Some(&id) => self.mfa.transition(self.current, id),
            None => INVALID_STATE,
        };
        self.current_state()
    }

    /// Consumes a sequence of symbols, stopping at the first failure.
    pub fn step_multiple(&mut self, symbols: &[&str]) -> Option<StateId> {
        for symbol in symbols {
            self.step(symbol)?;
        }
        self.current_state()
    }
}

impl<'a> From<&'a Mfa> for MfaEvaluator<'a> {
    fn from(value: &'a Mfa) -> Self {
        let rev_map = value
            .alphabet()
            .iter()
            .enumerate()
            .map(|(idx, symbol)| (symbol, idx as SymbolId))
            .collect();
        Self {
            mfa: value,
            rev_map,
            current: value.initial_state(),
        }
    }
}
