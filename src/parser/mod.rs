//! # Alang parser
//! This module contains the parser for the Alang regular expression dialect.
//! See the [alang](crate::alang) module for the grammar. Parsing either
//! yields an [AlangRegex](crate::alang::AlangRegex) or fails on the first
//! malformed token with a [ParseError] carrying a [ParseErrorKind] and the
//! byte offset into the input where the problem sits. There is no recovery:
//! the most specific applicable kind wins and parsing stops.
//!
//! ```
//! use alang::parser::{self, ParseErrorKind};
//!
//! let regex = parser::alang("ab (c | d)+").unwrap();
//! assert_eq!(regex.expression_string(), "ab(c|d)+");
//!
//! let error = parser::alang("ab | ").unwrap_err();
//! assert_eq!(error.kind, ParseErrorKind::MissingRightOperand);
//! assert_eq!(error.offset, 4);
//! ```
//!
//! The reported offsets follow fixed conventions: `empty-input` points at the
//! end of the input after any whitespace, `missing-closing-parenthesis`
//! points one past the unmatched `(`, `unexpected-closing-parenthesis` and
//! `unexpected-operator` point at the offending character, and
//! `missing-right-operand` points just after the infix operator.

use crate::alang::AlangRegex;
use thiserror::Error;

mod alang;

/// The categories of Alang parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The input holds nothing but whitespace.
    #[error("empty input")]
    EmptyInput,
    /// A `(` is never matched by a `)`.
    #[error("missing closing parenthesis")]
    MissingClosingParenthesis,
    /// A `)` with no matching `(`.
    #[error("unexpected closing parenthesis")]
    UnexpectedClosingParenthesis,
    /// An infix operator with nothing to its right.
    #[error("missing right operand")]
    MissingRightOperand,
    /// An operator where an operand was expected.
    #[error("unexpected operator")]
    UnexpectedOperator,
    /// Trailing input that cannot begin an expression.
    #[error("expected start of expression or end of input")]
    ExpectedBeginExpressionOrEoi,
}

/// An Alang parse failure: what went wrong and where. `offset` is a byte
/// offset into the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

/// Parses an Alang regular expression. The whole input must be consumed;
/// leading, trailing and separating whitespace is insignificant.
pub fn alang(input: &str) -> Result<AlangRegex, ParseError> {
    alang::parse(input)
}
