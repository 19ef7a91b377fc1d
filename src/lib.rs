//!# alang
//!
//! `alang` is a Rust library for finite automata over symbolic alphabets, built around the Alang
//! regular expression dialect. Symbols are arbitrary strings rather than single characters, and the
//! dialect has the set operations plain regexes lack: difference `-`, intersection `&` and
//! complement `~`, next to union `|`, concatenation, option `?`, the Kleene closures `*`/`+`, the
//! wildcard `.` and the empty-language literal `()`.
//!
//! ## Usage
//!
//! ```rust
//! use alang::alphabet::Alphabet;
//! use alang::parser;
//!
//! // Strings over {a, b} containing at least one a
//! let regex = parser::alang("(a|b)* - b*").unwrap();
//! let mfa = regex.compile(&Alphabet::new());
//!
//! assert!(mfa.accepts_graphemes("ba"));
//! assert!(mfa.accepts_graphemes("a"));
//! assert!(!mfa.accepts_graphemes(""));
//! assert!(!mfa.accepts_graphemes("bb"));
//!
//! // The canonical form is a language fingerprint: equal canonical strings
//! // mean equal languages (over the same universe), so there is exactly one
//! // possible value here regardless of how the expression was written
//! assert_eq!(
//!     mfa.canonical_string(),
//!     "S#=2, F#=1: [1], T#=4: [0->1 a, 0->0 b, 1->1 a, 1->1 b]"
//! );
//! ```
//!
//! Compilation lowers the parsed tree bottom-up into an [ε-NFA](nfa::Nfa), determinizes it with the
//! subset construction ([Nfa::to_dfa](nfa::Nfa::to_dfa)), minimizes the [DFA](dfa::Dfa) with
//! Brzozowski's double-reversal construction ([Dfa::minimized](dfa::Dfa::minimized)) and
//! canonicalizes the result into an immutable [Mfa](mfa::Mfa) whose state numbering and transition
//! order are uniquely determined by the language. Everything is deterministic: the same expression
//! and context alphabet always produce byte-identical canonical strings.
//!
//! ## The three representations
//!
//! * [Nfa](nfa::Nfa) — mutable, multiple initial states, epsilon moves; the workhorse all
//!   language-level operations are built on
//! * [Dfa](dfa::Dfa) — mutable, single initial state, at most one successor per (state, symbol)
//! * [Mfa](mfa::Mfa) — immutable minimal canonical form with the testing surface:
//!   [canonical strings](mfa::Mfa::canonical_string), [state paths](mfa::Mfa::state_path) and
//!   [language equivalence](mfa::Mfa::language_equals)
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing Alang expressions](parser::alang) with precise diagnostics (error kind + byte offset)
//! * [Printing an expression tree](alang::AlangRegex::expression_string) with minimal parentheses
//! * [Compiling expressions to canonical minimal automata](alang::AlangRegex::compile)
//! * [Determinization](nfa::Nfa::to_dfa) by subset construction
//! * [Minimization](dfa::Dfa::minimized) by double reversal, and
//!   [canonicalization](dfa::Dfa::to_mfa)
//! * In-place [union](nfa::Nfa::union_with), [concatenation](nfa::Nfa::concat_with),
//!   [Kleene star](nfa::Nfa::kleene_star), [Kleene plus](nfa::Nfa::kleene_plus) and
//!   [option](nfa::Nfa::optional) on NFAs, with borrowing forms in [ops]
//! * [Complement](mfa::Mfa::complement) relative to the automaton's alphabet,
//!   [intersection](ops::intersection) by product construction, [difference](ops::difference) and
//!   [overlap](ops::overlaps)
//! * [Reversal](dfa::Dfa::to_reversed_nfa) of deterministic automata
//! * [Step-wise execution](mfa::MfaEvaluator) and [acceptance checks](mfa::Mfa::accepts), also
//!   [directly on NFAs](nfa::NfaEvaluator) without determinizing first
//!
//! The core is single-threaded and synchronous; automata are plain owned values, and no operation
//! touches the filesystem, the network or global state.

pub mod alang;
pub mod alphabet;
pub mod automaton;
pub mod dfa;
pub mod error;
pub mod mfa;
pub mod nfa;
pub mod ops;
pub mod parser;
pub mod transition;

#[cfg(test)]
mod tests;
