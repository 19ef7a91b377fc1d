//! Lowering from the Alang tree to the canonical minimal automaton: a
//! post-order walk producing NFAs, followed by determinization, minimization
//! and canonicalization of the top result.

use crate::alang::{AlangRegex, AlangTree};
use crate::alphabet::Alphabet;
use crate::mfa::Mfa;
use crate::nfa::Nfa;
use crate::ops;
use crate::transition::Transition;

impl AlangRegex {
    /// Compiles this expression into its canonical minimal automaton,
    /// relative to the given context alphabet.
    ///
    /// The working universe is the context alphabet extended with every
    /// symbol of the expression, collected up front; wildcard and complement
    /// are relative to that universe, and it becomes the alphabet of the
    /// result whether or not every symbol ends up referenced. A wildcard
    /// compiled against an empty universe (empty context and no symbols in
    /// the expression) is the empty language.
    ///
    /// ```
    /// use alang::alphabet::Alphabet;
    /// use alang::parser;
    ///
    /// let regex = parser::alang("()~").unwrap();
    /// // Complementing the empty language relative to the alphabet {0, 1}
    /// // accepts every string over that alphabet
    /// let mfa = regex.compile(&Alphabet::from_symbols(["0", "1"]));
    /// assert!(mfa.accepts_graphemes(""));
    /// assert!(mfa.accepts_graphemes("0110"));
    /// assert_eq!(
    ///     mfa.canonical_string(),
    ///     "S#=1, F#=1: [0], T#=2: [0->0 0, 0->0 1]"
    /// );
    /// ```
    pub fn compile(&self, context: &Alphabet) -> Mfa {
        self.to_nfa(context).to_dfa().to_mfa()
    }

    /// Lowers this expression into an NFA over the working universe without
    /// determinizing or minimizing it. [AlangRegex::compile] is this followed
    /// by [Nfa::to_dfa] and [Dfa::to_mfa](crate::dfa::Dfa::to_mfa).
    pub fn to_nfa(&self, context: &Alphabet) -> Nfa {
        let mut universe = context.clone();
        self.tree.collect_symbols(&mut universe);
        self.tree.lower(&universe)
    }
}

impl AlangTree {
    /// Adds every symbol of the expression to the alphabet, leftmost first.
    fn collect_symbols(&self, alphabet: &mut Alphabet) {
        match self {
            AlangTree::Union(a, b)
            | AlangTree::Difference(a, b)
            | AlangTree::Intersection(a, b)
            | AlangTree::Concatenation(a, b) => {
                a.collect_symbols(alphabet);
                b.collect_symbols(alphabet);
            }
            AlangTree::Option(x)
            | AlangTree::KleeneStar(x)
            | AlangTree::KleenePlus(x)
            | AlangTree::Complement(x) => x.collect_symbols(alphabet),
            AlangTree::Symbol(symbol) => {
                alphabet.get_or_add(symbol);
            }
            AlangTree::Wildcard | AlangTree::EmptyLang => {}
        }
    }

    /// Post-order lowering to an NFA over the universe. Intersection,
    /// difference and complement route through the deterministic
    /// representations and come back as NFAs so that enclosing operations
    /// can keep composing.
    fn lower(&self, universe: &Alphabet) -> Nfa {
        match self {
            AlangTree::Union(a, b) => {
                let mut nfa = a.lower(universe);
                nfa.union_with(b.lower(universe));
                nfa
            }
            AlangTree::Concatenation(a, b) => {
                let mut nfa = a.lower(universe);
                nfa.concat_with(b.lower(universe));
                nfa
            }
            AlangTree::Intersection(a, b) => {
                let left = a.lower(universe).to_dfa();
                let right = b.lower(universe).to_dfa();
                ops::intersection(&left, &right)
                    .expect("operands are distinct instances")
                    .to_nfa()
            }
            AlangTree::Difference(a, b) => {
                let minuend = a.lower(universe).to_dfa();
                let subtrahend = b.lower(universe).to_dfa().to_mfa();
                ops::difference(&minuend, &subtrahend)
                    .expect("operands are distinct instances")
                    .to_nfa()
            }
            AlangTree::Option(x) => {
                let mut nfa = x.lower(universe);
                nfa.optional();
                nfa
            }
            AlangTree::KleeneStar(x) => {
                let mut nfa = x.lower(universe);
                nfa.kleene_star();
                nfa
            }
            AlangTree::KleenePlus(x) => {
                let mut nfa = x.lower(universe);
                nfa.kleene_plus();
                nfa
            }
            AlangTree::Complement(x) => x.lower(universe).to_dfa().to_mfa().complement().to_nfa(),
            AlangTree::Symbol(symbol) => {
                let mut nfa = Nfa::new(universe.clone());
                let symbol = nfa.alphabet().index_of(symbol);
                debug_assert_ne!(symbol, crate::alphabet::INVALID_SYMBOL);
                let from = nfa.fresh_state();
                let to = nfa.fresh_state();
                nfa.set_initial(from);
                nfa.set_final(to);
                nfa.add_transition(Transition::new(from, symbol, to));
                nfa
            }
            AlangTree::Wildcard => Nfa::wildcard(universe.clone()),
            AlangTree::EmptyLang => Nfa::new(universe.clone()),
        }
    }
}
