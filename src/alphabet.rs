//! # Alphabet
//! The [Alphabet] is the bidirectional mapping between symbol strings and the
//! dense integer indices used by all transitions. Symbols are arbitrary
//! non-empty strings: there is no restriction to single characters, so "ab"
//! and "a" may both be symbols of the same alphabet (see
//! [Alphabet::graphemes_only] for checking whether grapheme-based input
//! splitting is unambiguous).
//!
//! An alphabet is append-only: once a symbol has an index, that index stays
//! valid for the lifetime of every automaton built on the alphabet. Automata
//! own their alphabet by value; cloning an automaton clones the alphabet with
//! it (cheaply, since the symbols themselves are `Rc<str>`).
//!
//! Binary operations between automata with different alphabets go through
//! [Alphabet::union_with], which inserts the other alphabet's symbols and
//! returns a dense remap usable as a direct lookup table from the other
//! alphabet's indices to this one's:
//!
//! ```
//! use alang::alphabet::Alphabet;
//!
//! let mut a = Alphabet::from_symbols(["x", "y"]);
//! let b = Alphabet::from_symbols(["y", "z"]);
//! let remap = a.union_with(&b);
//! // "y" already existed in `a` at index 1, "z" was appended at index 2
//! assert_eq!(remap, vec![1, 2]);
//! assert_eq!(a.len(), 3);
//! ```

use crate::error::AutomataError;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

/// Index of a symbol within an [Alphabet].
pub type SymbolId = u32;

/// Sentinel returned by lookups for symbols that are not in the alphabet.
/// Never a valid index.
pub const INVALID_SYMBOL: SymbolId = SymbolId::MAX;

/// An ordered, append-only collection of symbol strings with dense indices
/// starting at 0. Each string appears at most once.
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    symbols: Vec<Rc<str>>,
    index: HashMap<Rc<str>, SymbolId>,
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        // `index` is derived from `symbols`
        self.symbols == other.symbols
    }
}

impl Eq for Alphabet {}

impl Alphabet {
    /// Creates an empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an alphabet seeded with the given symbols, indexed in iteration
    /// order. Duplicates keep their first index.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut alphabet = Self::new();
        alphabet.add_all(symbols);
        alphabet
    }

    /// The number of symbols in this alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Checks if this alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Gets the index of the given symbol, or [INVALID_SYMBOL] if the symbol
    /// is not part of this alphabet.
    pub fn index_of(&self, symbol: &str) -> SymbolId {
        self.index.get(symbol).copied().unwrap_or(INVALID_SYMBOL)
    }

    /// Gets the symbol at the given index, failing with
    /// [AutomataError::OutOfRangeIndex] if the index is invalid.
    pub fn symbol_at(&self, index: SymbolId) -> Result<&str, AutomataError> {
        self.symbols
            .get(index as usize)
            .map(|s| s.as_ref())
            .ok_or(AutomataError::OutOfRangeIndex {
                index,
                len: self.symbols.len(),
            })
    }

    /// Checks if the given symbol is part of this alphabet.
    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Gets the index of the given symbol, appending it first if it is not
    /// already part of this alphabet.
    pub fn get_or_add(&mut self, symbol: &str) -> SymbolId {
        if let Some(&id) = self.index.get(symbol) {
            return id;
        }
        let id = self.symbols.len() as SymbolId;
        let symbol: Rc<str> = Rc::from(symbol);
        self.symbols.push(symbol.clone());
        self.index.insert(symbol, id);
        id
    }

    /// Appends every symbol of the iterator that is not already present, in
    /// iteration order.
    pub fn add_all<I, S>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for symbol in symbols {
            self.get_or_add(symbol.as_ref());
        }
    }

    /// Inserts every symbol of `other` into this alphabet and returns the
    /// remap from `other`'s indices to this alphabet's indices: `remap[i]` is
    /// the index in `self` of the symbol `other` holds at index `i`. This is
    /// the sole cross-alphabet bridge used by binary automaton operations.
    pub fn union_with(&mut self, other: &Alphabet) -> Vec<SymbolId> {
        other
            .symbols
            .iter()
            .map(|symbol| self.get_or_add(symbol))
            .collect()
    }

    /// Iterates over the symbols in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| s.as_ref())
    }

    /// Checks if every symbol of this alphabet is a single extended unicode
    /// grapheme cluster. If so, splitting an input string into graphemes is an
    /// unambiguous way to turn it into a symbol sequence.
    pub fn graphemes_only(&self) -> bool {
        self.symbols.iter().all(|s| s.graphemes(true).count() == 1)
    }
}

/// Debug expansion: one `i: s` pair per line.
impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.symbols.iter().enumerate() {
            writeln!(f, "{i}: {symbol}")?;
        }
        Ok(())
    }
}
