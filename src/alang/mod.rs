//! # The Alang regular expression dialect
//! Alang is a regular-expression dialect over symbolic alphabets: atoms are
//! whole symbol strings (one or more characters), not single characters, and
//! besides the regular operators it has difference, intersection and
//! complement, which plain regular expressions lack.
//!
//! ## Syntax
//! Reserved characters are `|`, `&`, `-`, `?`, `*`, `+`, `~`, `(`, `)` and
//! `.`; a symbol is any non-empty run of other non-whitespace characters.
//! Whitespace is insignificant except that it separates adjacent symbols.
//! Precedence from lowest to highest: union `|`, difference `-`,
//! intersection `&`, concatenation (juxtaposition), then the postfix
//! operators `?` (option), `*` (Kleene star), `+` (Kleene plus) and `~`
//! (complement), which all bind equally and apply in source order, so `a?*`
//! is `(a?)*`. `.` is the wildcard, a single state looping on every symbol
//! of the compile-time alphabet (so it accepts any string over that
//! alphabet), and `()` is the empty-language literal.
//!
//! ```text
//! AlangRegex       ::= Union
//! Union            ::= Difference ( '|' Difference )*
//! Difference       ::= Intersection ( '-' Intersection )*
//! Intersection     ::= Concatenation ( '&' Concatenation )*
//! Concatenation    ::= UnaryRegex+
//! UnaryRegex       ::= PrimaryRegex ( '?' | '*' | '+' | '~' )*
//! PrimaryRegex     ::= '(' AlangRegex? ')' | Symbol | '.' | '()'
//! Symbol           ::= SymbolChar+
//! SymbolChar       ::= any char except '|' '&' '-' '?' '*' '+' '~' '(' ')' '.' and whitespace
//! ```
//!
//! ## Usage
//! Parsing yields an [AlangRegex]; [AlangRegex::compile] lowers it through an
//! NFA and a DFA into the canonical minimal [Mfa](crate::mfa::Mfa):
//!
//! ```
//! use alang::alphabet::Alphabet;
//! use alang::parser;
//!
//! let regex = parser::alang("a(b|c)*").unwrap();
//! assert_eq!(regex.expression_string(), "a(b|c)*");
//!
//! let mfa = regex.compile(&Alphabet::new());
//! assert!(mfa.accepts_graphemes("abcb"));
//! assert!(!mfa.accepts_graphemes("ba"));
//! ```
//!
//! [AlangRegex::expression_string] prints the tree back with the minimum
//! parentheses consistent with precedence; reparsing the result yields an
//! equal tree, and the printed form is a fixed point of print-then-parse.

use std::rc::Rc;

mod compile;

/// A parsed Alang regular expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlangRegex {
    pub tree: AlangTree,
}

/// One node of an Alang expression tree. Binary nodes own their two operand
/// subtrees, unary nodes own one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlangTree {
    Union(Box<AlangTree>, Box<AlangTree>),
    Difference(Box<AlangTree>, Box<AlangTree>),
    Intersection(Box<AlangTree>, Box<AlangTree>),
    Concatenation(Box<AlangTree>, Box<AlangTree>),
    Option(Box<AlangTree>),
    KleeneStar(Box<AlangTree>),
    KleenePlus(Box<AlangTree>),
    Complement(Box<AlangTree>),
    Symbol(Rc<str>),
    Wildcard,
    EmptyLang,
}

/// Checks if a character may appear in a symbol: anything that is neither
/// reserved nor whitespace.
pub(crate) fn is_symbol_char(c: char) -> bool {
    !is_reserved_char(c) && !c.is_whitespace()
}

pub(crate) fn is_reserved_char(c: char) -> bool {
    matches!(
        c,
        '|' | '&' | '-' | '?' | '*' | '+' | '~' | '(' | ')' | '.'
    )
}

impl AlangRegex {
    /// Serializes this expression with minimal parentheses. Reparsing the
    /// result yields an equal tree.
    pub fn expression_string(&self) -> String {
        self.tree.expression_string()
    }
}

impl AlangTree {
    /// Binding strength: union 1, difference 2, intersection 3,
    /// concatenation 4, postfix operators 5, atoms 6.
    fn precedence(&self) -> u8 {
        match self {
            AlangTree::Union(..) => 1,
            AlangTree::Difference(..) => 2,
            AlangTree::Intersection(..) => 3,
            AlangTree::Concatenation(..) => 4,
            AlangTree::Option(_)
            | AlangTree::KleeneStar(_)
            | AlangTree::KleenePlus(_)
            | AlangTree::Complement(_) => 5,
            AlangTree::Symbol(_) | AlangTree::Wildcard | AlangTree::EmptyLang => 6,
        }
    }

    /// See [AlangRegex::expression_string].
    pub fn expression_string(&self) -> String {
        let mut out = String::new();
        self.build(&mut out);
        out
    }

    fn build(&self, out: &mut String) {
        match self {
            AlangTree::Union(a, b) => self.build_infix(a, b, '|', out),
            AlangTree::Difference(a, b) => self.build_infix(a, b, '-', out),
            AlangTree::Intersection(a, b) => self.build_infix(a, b, '&', out),
            AlangTree::Concatenation(a, b) => {
                let left = Self::render_operand(a, self.precedence(), false);
                let right = Self::render_operand(b, self.precedence(), true);
                out.push_str(&left);
                // Adjacent symbol characters would lex as one atom
                if left.chars().last().is_some_and(is_symbol_char)
                    && right.chars().next().is_some_and(is_symbol_char)
                {
                    out.push(' ');
                }
                out.push_str(&right);
            }
            AlangTree::Option(x) => self.build_postfix(x, '?', out),
            AlangTree::KleeneStar(x) => self.build_postfix(x, '*', out),
            AlangTree::KleenePlus(x) => self.build_postfix(x, '+', out),
            AlangTree::Complement(x) => self.build_postfix(x, '~', out),
            AlangTree::Symbol(symbol) => out.push_str(symbol),
            AlangTree::Wildcard => out.push('.'),
            AlangTree::EmptyLang => out.push_str("()"),
        }
    }

    fn build_infix(&self, a: &AlangTree, b: &AlangTree, op: char, out: &mut String) {
        // Left-associative: an equal-precedence left child needs no
        // parentheses, an equal-precedence right child does.
        out.push_str(&Self::render_operand(a, self.precedence(), false));
        out.push(op);
        out.push_str(&Self::render_operand(b, self.precedence(), true));
    }

    fn build_postfix(&self, x: &AlangTree, op: char, out: &mut String) {
        out.push_str(&Self::render_operand(x, self.precedence(), false));
        out.push(op);
    }

    fn render_operand(operand: &AlangTree, parent: u8, parenthesize_equal: bool) -> String {
        let mut out = String::new();
        let precedence = operand.precedence();
        if precedence < parent || (parenthesize_equal && precedence == parent) {
            out.push('(');
            operand.build(&mut out);
            out.push(')');
        } else {
            operand.build(&mut out);
        }
        out
    }
}
