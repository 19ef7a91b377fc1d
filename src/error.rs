use crate::alphabet::SymbolId;
use thiserror::Error;

/// Domain errors surfaced by automaton operations. Parse errors have their own
/// type, [ParseError](crate::parser::ParseError), since they carry a source
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AutomataError {
    /// A binary operation was given the same instance as both operands.
    /// Clone one operand first if `A ⊕ A` is intended.
    #[error("binary operation applied to the same automaton instance twice")]
    AliasedOperands,
    /// A symbol index was looked up in an alphabet that does not contain it.
    #[error("symbol index {index} out of range for alphabet with {len} symbols")]
    OutOfRangeIndex { index: SymbolId, len: usize },
}
