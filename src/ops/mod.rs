//! # Binary language operations
//! Free-function forms of the binary operations. The NFA-level operations
//! (union, concatenation) clone and delegate to the in-place methods on
//! [Nfa]; intersection, difference and overlap work on deterministic
//! operands, as the compilation pipeline produces them.
//!
//! Every operation here first unions the operands' alphabets into the result
//! (via [Alphabet::union_with](crate::alphabet::Alphabet::union_with)), so
//! the result's alphabet is the union of both regardless of which symbols
//! its transitions reference.
//!
//! Operands must be distinct instances: passing the same automaton twice
//! fails with [AutomataError::AliasedOperands]. Clone first if `A ⊕ A` is
//! intended. (The in-place methods on [Nfa] take their second operand by
//! value, so aliasing is not expressible there.)
//!
//! ```
//! use alang::alphabet::Alphabet;
//! use alang::ops;
//! use alang::parser;
//!
//! let alphabet = Alphabet::new();
//! let even = parser::alang("(a a)*").unwrap().compile(&alphabet);
//! let nonempty = parser::alang("a a*").unwrap().compile(&alphabet);
//! let both = ops::intersection(&even.to_nfa().to_dfa(), &nonempty.to_nfa().to_dfa()).unwrap();
//! assert!(both.accepts_graphemes("aa"));
//! assert!(!both.accepts_graphemes("a"));
//! assert!(!both.accepts_graphemes(""));
//! ```

use crate::dfa::Dfa;
use crate::error::AutomataError;
use crate::mfa::Mfa;
use crate::nfa::Nfa;
use crate::transition::{StateId, INVALID_STATE};
use std::collections::{HashMap, VecDeque};
use std::ptr;

fn ensure_distinct<T>(a: &T, b: &T) -> Result<(), AutomataError> {
    if ptr::eq(a, b) {
        Err(AutomataError::AliasedOperands)
    } else {
        Ok(())
    }
}

/// Encodes a pair of states into the single 64-bit key used by the product
/// construction's pair-to-state map.
fn pack_pair(a: StateId, b: StateId) -> u64 {
    ((a as u64) << 32) | b as u64
}

/// The union of two NFAs as a new automaton. See [Nfa::union_with].
pub fn union(a: &Nfa, b: &Nfa) -> Result<Nfa, AutomataError> {
    ensure_distinct(a, b)?;
    let mut result = a.clone();
    result.union_with(b.clone());
    Ok(result)
}

/// The concatenation of two NFAs as a new automaton. See [Nfa::concat_with].
pub fn concatenation(a: &Nfa, b: &Nfa) -> Result<Nfa, AutomataError> {
    ensure_distinct(a, b)?;
    let mut result = a.clone();
    result.concat_with(b.clone());
    Ok(result)
}

/// The intersection of two DFAs via the product construction, minimized and
/// canonicalized. Each reachable pair (qa, qb) becomes one state, final iff
/// both components are final. Symbols are aligned by their string form, so
/// the operands may have different alphabets: a transition of `a` whose
/// symbol is absent from `b`'s alphabet (or has no successor from qb) simply
/// contributes nothing.
pub fn intersection(a: &Dfa, b: &Dfa) -> Result<Mfa, AutomataError> {
    ensure_distinct(a, b)?;
    let mut alphabet = a.alphabet().clone();
    alphabet.union_with(b.alphabet());
    if a.initial_state() == INVALID_STATE || b.initial_state() == INVALID_STATE {
        return Ok(Mfa::empty(alphabet));
    }

    /// Maps the pair to its product state, allocating the next identifier
    /// and queueing the pair for expansion on first sight.
    fn admit(
        a: &Dfa,
        b: &Dfa,
        qa: StateId,
        qb: StateId,
        ids: &mut HashMap<u64, StateId>,
        queue: &mut VecDeque<(StateId, StateId, StateId)>,
        product: &mut Dfa,
        next_id: &mut StateId,
    ) -> StateId {
        let key = pack_pair(qa, qb);
        if let Some(&id) = ids.get(&key) {
            return id;
        }
        let id = *next_id;
        *next_id += 1;
        if a.final_states().contains(&qa) && b.final_states().contains(&qb) {
            product.set_final(id);
        }
        ids.insert(key, id);
        queue.push_back((qa, qb, id));
        id
    }

    // The result alphabet extends a's, so a's symbol indices stay valid.
    let mut product = Dfa::new(alphabet);
    let mut ids: HashMap<u64, StateId> = HashMap::new();
    let mut queue: VecDeque<(StateId, StateId, StateId)> = VecDeque::new();
    let mut next_id: StateId = 0;

    let initial = admit(
        a,
        b,
        a.initial_state(),
        b.initial_state(),
        &mut ids,
        &mut queue,
        &mut product,
        &mut next_id,
    );
    product.set_initial(initial);

    while let Some((qa, qb, id)) = queue.pop_front() {
        for t in a.transitions_from(qa) {
            let symbol = a
                .alphabet()
                .symbol_at(t.symbol)
                .expect("transition symbols are always in the alphabet");
            let b_symbol = b.alphabet().index_of(symbol);
            if b_symbol == crate::alphabet::INVALID_SYMBOL {
                continue;
            }
            let b_to = b.transition(qb, b_symbol);
            if b_to == INVALID_STATE {
                continue;
            }
            let target = admit(
                a,
                b,
                t.to,
                b_to,
                &mut ids,
                &mut queue,
                &mut product,
                &mut next_id,
            );
            product.set_transition(id, t.symbol, target);
        }
    }
    Ok(product.to_mfa())
}

/// The difference L(minuend) − L(subtrahend), computed as the intersection
/// of the minuend with the complement of the subtrahend. Subtracting the
/// empty language returns the minuend unchanged (canonicalized). The
/// operands have different types, so aliasing is not expressible here.
pub fn difference(minuend: &Dfa, subtrahend: &Mfa) -> Result<Mfa, AutomataError> {
    if subtrahend.is_empty_language() {
        let mut result = minuend.to_mfa();
        // Alphabet coherence holds on the short-circuit path too.
        if !subtrahend.alphabet().iter().all(|s| result.alphabet().contains(s)) {
            let mut widened = minuend.clone();
            widened.alphabet.union_with(subtrahend.alphabet());
            result = widened.to_mfa();
        }
        return Ok(result);
    }
    let complement = subtrahend.complement();
    intersection(minuend, &complement)
}

/// Checks if two languages share at least one string, i.e. whether their
/// intersection is non-empty.
pub fn overlaps(a: &Dfa, b: &Dfa) -> Result<bool, AutomataError> {
    Ok(!intersection(a, b)?.is_empty_language())
}
