use crate::alang::{AlangRegex, AlangTree};
use crate::alphabet::{Alphabet, INVALID_SYMBOL};
use crate::automaton::FiniteAutomaton;
use crate::error::AutomataError;
use crate::mfa::Mfa;
use crate::nfa::Nfa;
use crate::ops;
use crate::parser::{self, ParseErrorKind};
use crate::transition::StateSet;
use ::regex::Regex as LibRegex;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

fn compile(input: &str) -> Mfa {
    parser::alang(input).unwrap().compile(&Alphabet::new())
}

fn compile_with(input: &str, context: &Alphabet) -> Mfa {
    parser::alang(input).unwrap().compile(context)
}

#[test]
fn canonical_forms() {
    let cases = [
        ("a", "S#=2, F#=1: [1], T#=1: [0->1 a]"),
        ("()", "S#=0, F#=0, T#=0"),
        ("(((a1)))", "S#=2, F#=1: [1], T#=1: [0->1 a1]"),
        ("aa(bb)cc", "S#=4, F#=1: [3], T#=3: [0->1 aa, 1->2 bb, 2->3 cc]"),
        ("a | b", "S#=2, F#=1: [1], T#=2: [0->1 a, 0->1 b]"),
        ("a?*", "S#=1, F#=1: [0], T#=1: [0->0 a]"),
        ("()?", "S#=1, F#=1: [0], T#=0"),
        (
            "a+~ b",
            "S#=4, F#=1: [2], T#=8: [0->1 a, 0->2 b, 1->1 a, 1->3 b, 2->3 a, 2->2 b, 3->3 a, 3->2 b]",
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(compile(input).canonical_string(), expected, "for input {input:?}");
    }
}

#[test]
fn parse_error_offsets() {
    use ParseErrorKind::*;
    let cases = [
        ("", 0, EmptyInput),
        ("   ", 3, EmptyInput),
        ("(", 1, MissingClosingParenthesis),
        (")", 0, UnexpectedClosingParenthesis),
        ("a|", 2, MissingRightOperand),
        ("(&)", 1, UnexpectedOperator),
        ("a||b", 2, MissingRightOperand),
        ("(|)", 1, UnexpectedOperator),
        ("a)", 1, UnexpectedClosingParenthesis),
        ("((a)", 1, MissingClosingParenthesis),
        ("*a", 0, UnexpectedOperator),
        ("a & ", 3, MissingRightOperand),
        ("a-)", 2, MissingRightOperand),
    ];
    for (input, offset, kind) in cases {
        let error = parser::alang(input).unwrap_err();
        assert_eq!((error.kind, error.offset), (kind, offset), "for input {input:?}");
    }
}

#[test]
fn expression_strings() {
    let cases = [
        ("a | b", "a|b"),
        ("((a))", "a"),
        ("(a|b)c", "(a|b)c"),
        ("a b c", "a b c"),
        ("aa(bb)cc", "aa bb cc"),
        ("a? * ~", "a?*~"),
        ("a-(b-c)", "a-(b-c)"),
        ("a-b-c", "a-b-c"),
        ("(a|b)&c", "(a|b)&c"),
        (". a", ".a"),
        ("()", "()"),
        ("a (b)?", "a b?"),
        ("a+~ b", "a+~b"),
    ];
    for (input, expected) in cases {
        let printed = parser::alang(input).unwrap().expression_string();
        assert_eq!(printed, expected, "for input {input:?}");
    }
}

#[test]
fn alphabet_union_produces_remap() {
    let mut alphabet = Alphabet::from_symbols(["x", "y"]);
    let other = Alphabet::from_symbols(["y", "z", "x"]);
    let remap = alphabet.union_with(&other);
    assert_eq!(remap, vec![1, 2, 0]);
    assert_eq!(alphabet.len(), 3);
    assert_eq!(alphabet.index_of("z"), 2);
}

#[test]
fn alphabet_lookups() {
    let mut alphabet = Alphabet::from_symbols(["x"]);
    assert_eq!(alphabet.symbol_at(0).unwrap(), "x");
    assert_eq!(
        alphabet.symbol_at(7),
        Err(AutomataError::OutOfRangeIndex { index: 7, len: 1 })
    );
    assert_eq!(alphabet.index_of("y"), INVALID_SYMBOL);
    assert_eq!(alphabet.get_or_add("y"), 1);
    assert_eq!(alphabet.get_or_add("y"), 1);
    assert!(alphabet.contains("y"));
    assert!(alphabet.graphemes_only());
    alphabet.get_or_add("xy");
    assert!(!alphabet.graphemes_only());
}

#[test]
fn state_sets_compare_structurally() {
    let a = StateSet::new([3, 1, 2, 3]);
    let b = StateSet::new([1, 2, 3]);
    assert_eq!(a, b);
    assert!(a.contains(2));
    assert!(!a.contains(4));
    let mut map = HashMap::new();
    map.insert(a, "first");
    assert_eq!(map.get(&b), Some(&"first"));
}

#[test]
fn epsilon_closure_handles_cycles() {
    let mut nfa = Nfa::new(Alphabet::new());
    let a = nfa.fresh_state();
    let b = nfa.fresh_state();
    nfa.add_epsilon_transition(a, a);
    nfa.add_epsilon_transition(a, b);
    nfa.add_epsilon_transition(b, a);
    let mut set = BTreeSet::from([a]);
    nfa.epsilon_closure(&mut set);
    assert_eq!(set, BTreeSet::from([a, b]));
}

#[test]
fn subset_construction_merges_prefixes() {
    let nfa = Nfa::from_sequences([["a", "b"], ["a", "c"]]);
    assert_eq!(nfa.max_state(), Some(5));
    assert!(!nfa.accepts_epsilon());
    assert!(!nfa.is_empty_language());
    let mfa = nfa.to_dfa().to_mfa();
    assert_eq!(
        mfa.canonical_string(),
        "S#=3, F#=1: [2], T#=3: [0->1 a, 1->2 b, 1->2 c]"
    );
}

#[test]
fn nfa_evaluator_tracks_state_sets() {
    let nfa = Nfa::from_sequences([["a", "b"], ["a", "c"]]);
    let mut evaluator = nfa.evaluator();
    // One initial state per chain
    assert_eq!(evaluator.current_states().len(), 2);
    evaluator.step("a").unwrap();
    assert_eq!(evaluator.current_states().len(), 2);
    assert!(!evaluator.is_accepting());
    evaluator.step("b").unwrap();
    assert!(evaluator.is_accepting());

    assert!(nfa.accepts(&["a", "c"]));
    assert!(!nfa.accepts(&["a"]));
    assert!(!nfa.accepts(&["a", "x"]));
    assert!(!nfa.accepts_graphemes("ca"));
}

#[test]
fn aliased_operands_rejected() {
    let nfa = Nfa::from_sequences([["a"]]);
    assert_eq!(ops::union(&nfa, &nfa).unwrap_err(), AutomataError::AliasedOperands);
    assert_eq!(
        ops::concatenation(&nfa, &nfa).unwrap_err(),
        AutomataError::AliasedOperands
    );
    let dfa = nfa.to_dfa();
    assert_eq!(
        ops::intersection(&dfa, &dfa).unwrap_err(),
        AutomataError::AliasedOperands
    );
    // A clone is a distinct instance
    let clone = nfa.clone();
    let union = ops::union(&nfa, &clone).unwrap();
    assert_eq!(
        union.to_dfa().to_mfa().canonical_string(),
        compile("a").canonical_string()
    );
}

#[test]
fn state_paths() {
    let mfa = compile("a b|a c");
    let path = mfa.state_path(["a", "b"]);
    assert_eq!(path.states(), &[0, 1, 2]);
    assert!(path.is_complete());
    assert!(path.is_accepted());

    let path = mfa.state_path(["a"]);
    assert!(path.is_complete());
    assert!(!path.is_accepted());

    let path = mfa.state_path(["a", "x"]);
    assert_eq!(path.states(), &[0, 1]);
    assert!(!path.is_complete());
    assert!(!path.is_accepted());

    let empty = compile("()");
    let path = empty.state_path(Vec::<&str>::new());
    assert!(path.states().is_empty());
    assert!(!path.is_complete());
}

#[test]
fn wildcard_is_relative_to_context() {
    let mfa = compile_with(".", &Alphabet::from_symbols(["a", "b"]));
    assert!(mfa.accepts_graphemes(""));
    assert!(mfa.accepts_graphemes("abba"));
    assert!(!mfa.accepts_graphemes("c"));

    // The wildcard over an empty universe is the empty language
    let empty = compile(".");
    assert!(empty.is_empty_language());

    // Expression symbols widen the universe the wildcard ranges over
    let widened = compile(". & (a|b)*");
    assert!(widened.accepts_graphemes("ab"));
}

#[test]
fn complement_is_relative_to_alphabet() {
    let narrow = compile("a~");
    assert!(narrow.accepts_graphemes(""));
    assert!(narrow.accepts_graphemes("aa"));
    assert!(!narrow.accepts_graphemes("a"));

    let wide = compile_with("a~", &Alphabet::from_symbols(["a", "b"]));
    assert!(wide.accepts_graphemes("b"));
    assert!(!narrow.language_equals(&wide));
}

#[test]
fn language_equals_projects_referenced_symbols() {
    let small = compile("a");
    let wide = compile_with("a", &Alphabet::from_symbols(["a", "z"]));
    assert!(small.language_equals(&wide));
    assert_eq!(wide.alphabet().len(), 2);
    assert!(!small.language_equals(&compile("b")));
}

#[test]
fn overlap_checks() {
    let nonempty_a = compile("a a*").to_nfa().to_dfa();
    let b_then_a = compile("b* a").to_nfa().to_dfa();
    let nonempty_b = compile("b b*").to_nfa().to_dfa();
    assert!(ops::overlaps(&nonempty_a, &b_then_a).unwrap());
    assert!(!ops::overlaps(&nonempty_a, &nonempty_b).unwrap());
}

#[test]
fn finite_automaton_view() {
    fn summarize(automaton: &impl FiniteAutomaton) -> (usize, usize, bool) {
        (
            automaton.transitions().count(),
            automaton.epsilon_transitions().count(),
            automaton.is_epsilon_free(),
        )
    }

    let mfa = compile("a b");
    assert_eq!(summarize(&mfa), (2, 0, true));
    assert!(FiniteAutomaton::is_initial(&mfa, 0));
    assert!(FiniteAutomaton::is_final(&mfa, 2));

    let mut nfa = mfa.to_nfa();
    assert_eq!(summarize(&nfa), (2, 0, true));
    nfa.kleene_star();
    let (_, epsilons, epsilon_free) = summarize(&nfa);
    assert!(epsilons > 0);
    assert!(!epsilon_free);
}

#[test]
fn reversal_swaps_roles() {
    let dfa = compile("a b").to_nfa().to_dfa();
    let reversed = dfa.to_reversed_nfa();
    // "a b" reversed is "b a"
    let mfa = reversed.to_dfa().to_mfa();
    assert_eq!(mfa.canonical_string(), compile("b a").canonical_string());
}

#[test]
fn minimization_is_stable() {
    for expr in ["a(b|c)*", "(a b)+c?", "(a|b)*-b*", "()"] {
        let mfa = compile(expr);
        let again = mfa.to_nfa().to_dfa().to_mfa();
        assert_eq!(again.canonical_string(), mfa.canonical_string(), "for {expr:?}");
    }
}

#[test]
fn double_reversal_preserves_language() {
    for expr in ["a(b|c)*", "(a b)+c?", "a|b b"] {
        let mfa = compile(expr);
        let dfa = mfa.to_nfa().to_dfa();
        let double = dfa.to_reversed_nfa().to_dfa().to_reversed_nfa().to_dfa();
        assert_eq!(
            double.to_mfa().canonical_string(),
            mfa.canonical_string(),
            "for {expr:?}"
        );
    }
}

#[test]
fn complement_involution() {
    let context = Alphabet::from_symbols(["a", "b"]);
    for expr in ["a", "a|b", "(a b)*", "()"] {
        let x = compile_with(expr, &context);
        let back = compile_with(&format!("({expr})~~"), &context);
        assert_eq!(back.canonical_string(), x.canonical_string(), "for {expr:?}");
    }
}

#[test]
fn de_morgan() {
    let cases = [
        ("(a|b b)~", "a~ & (b b)~"),
        ("(a b|b)~", "(a b)~ & b~"),
        ("(a & b)~", "a~|b~"),
    ];
    let context = Alphabet::from_symbols(["a", "b"]);
    for (left, right) in cases {
        assert_eq!(
            compile_with(left, &context).canonical_string(),
            compile_with(right, &context).canonical_string(),
            "for {left:?} vs {right:?}"
        );
    }
}

#[test]
fn difference_identities() {
    for expr in ["a", "(a|b)*", "a b?"] {
        let x = compile(expr);
        let minus_empty = compile(&format!("({expr})-()"));
        assert_eq!(minus_empty.canonical_string(), x.canonical_string(), "for {expr:?}");
        let minus_self = compile(&format!("({expr})-({expr})"));
        assert!(minus_self.is_empty_language(), "for {expr:?}");
    }
}

#[test]
fn kleene_laws() {
    for expr in ["a", "a|b", "a b"] {
        let plus = compile(&format!("({expr})+"));
        let unrolled = compile(&format!("({expr})({expr})*"));
        assert_eq!(plus.canonical_string(), unrolled.canonical_string(), "for {expr:?}");

        let star = compile(&format!("({expr})*"));
        let star_star = compile(&format!("(({expr})*)*"));
        assert_eq!(star_star.canonical_string(), star.canonical_string(), "for {expr:?}");

        let option = compile(&format!("({expr})?"));
        let option_option = compile(&format!("(({expr})?)?"));
        assert_eq!(
            option_option.canonical_string(),
            option.canonical_string(),
            "for {expr:?}"
        );
    }
}

fn arb_tree() -> impl Strategy<Value = AlangTree> {
    let leaf = prop_oneof![
        4 => "[a-z]{1,3}".prop_map(|s| AlangTree::Symbol(Rc::from(s.as_str()))),
        1 => Just(AlangTree::Wildcard),
        1 => Just(AlangTree::EmptyLang),
    ];
    leaf.prop_recursive(8, 64, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| AlangTree::Union(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| AlangTree::Difference(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| AlangTree::Intersection(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| AlangTree::Concatenation(Box::new(a), Box::new(b))),
            inner.clone().prop_map(|x| AlangTree::Option(Box::new(x))),
            inner.clone().prop_map(|x| AlangTree::KleeneStar(Box::new(x))),
            inner.clone().prop_map(|x| AlangTree::KleenePlus(Box::new(x))),
            inner.prop_map(|x| AlangTree::Complement(Box::new(x))),
        ]
    })
}

/// The subset of Alang that reads identically as a `regex`-crate pattern:
/// single-letter symbols and the shared operators, printed fully
/// parenthesized so neither syntax needs disambiguation.
fn arb_shared_tree() -> impl Strategy<Value = AlangTree> {
    let leaf = "[a-c]".prop_map(|s| AlangTree::Symbol(Rc::from(s.as_str())));
    leaf.prop_recursive(5, 24, 2, |inner| {
        prop_oneof![
            3 => (inner.clone(), inner.clone())
                .prop_map(|(a, b)| AlangTree::Concatenation(Box::new(a), Box::new(b))),
            3 => (inner.clone(), inner.clone())
                .prop_map(|(a, b)| AlangTree::Union(Box::new(a), Box::new(b))),
            1 => inner.clone().prop_map(|x| AlangTree::Option(Box::new(x))),
            1 => inner.clone().prop_map(|x| AlangTree::KleeneStar(Box::new(x))),
            1 => inner.prop_map(|x| AlangTree::KleenePlus(Box::new(x))),
        ]
    })
}

fn render_shared(tree: &AlangTree) -> String {
    match tree {
        AlangTree::Symbol(symbol) => symbol.to_string(),
        AlangTree::Union(a, b) => format!("(({})|({}))", render_shared(a), render_shared(b)),
        AlangTree::Concatenation(a, b) => {
            format!("(({})({}))", render_shared(a), render_shared(b))
        }
        AlangTree::Option(x) => format!("(({})?)", render_shared(x)),
        AlangTree::KleeneStar(x) => format!("(({})*)", render_shared(x)),
        AlangTree::KleenePlus(x) => format!("(({})+)", render_shared(x)),
        _ => unreachable!("not part of the shared syntax"),
    }
}

proptest! {
    /// Printing any tree and reparsing the result yields an equal tree, and
    /// the printed form is a fixed point of print-then-parse.
    #[test]
    fn expression_string_roundtrip(tree in arb_tree()) {
        let printed = AlangRegex { tree: tree.clone() }.expression_string();
        let reparsed = parser::alang(&printed).unwrap();
        prop_assert_eq!(&reparsed.tree, &tree);
        prop_assert_eq!(reparsed.expression_string(), printed);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// On the syntax both engines share, compiled automata agree with the
    /// regex crate on whole-input matching.
    #[test]
    fn matches_regex_crate(
        tree in arb_shared_tree(),
        inputs in prop::collection::vec("[a-c]{0,8}", 16),
    ) {
        let pattern = render_shared(&tree);
        let mfa = parser::alang(&pattern).unwrap().compile(&Alphabet::new());
        let oracle = LibRegex::new(&format!("^(?:{pattern})$")).unwrap();
        for input in &inputs {
            prop_assert_eq!(
                mfa.accepts_graphemes(input),
                oracle.is_match(input),
                "pattern {} input {}",
                pattern,
                input
            );
        }
    }

    /// Union, intersection and difference agree with acceptance of their
    /// operands, string by string.
    #[test]
    fn binary_operations_agree_with_acceptance(
        first in arb_shared_tree(),
        second in arb_shared_tree(),
        inputs in prop::collection::vec("[a-c]{0,6}", 24),
    ) {
        let p1 = render_shared(&first);
        let p2 = render_shared(&second);
        let context = Alphabet::from_symbols(["a", "b", "c"]);
        let m1 = compile_with(&p1, &context);
        let m2 = compile_with(&p2, &context);
        let union = compile_with(&format!("({p1})|({p2})"), &context);
        let intersection = compile_with(&format!("({p1})&({p2})"), &context);
        let difference = compile_with(&format!("({p1})-({p2})"), &context);
        for input in &inputs {
            let (r1, r2) = (m1.accepts_graphemes(input), m2.accepts_graphemes(input));
            prop_assert_eq!(union.accepts_graphemes(input), r1 || r2);
            prop_assert_eq!(intersection.accepts_graphemes(input), r1 && r2);
            prop_assert_eq!(difference.accepts_graphemes(input), r1 && !r2);
        }
    }

    /// The subset construction (and the minimization after it) preserves the
    /// language: the NFA evaluator and the compiled canonical form agree
    /// string by string.
    #[test]
    fn determinization_preserves_acceptance(
        tree in arb_shared_tree(),
        inputs in prop::collection::vec("[a-c]{0,6}", 24),
    ) {
        let pattern = render_shared(&tree);
        let regex = parser::alang(&pattern).unwrap();
        let context = Alphabet::from_symbols(["a", "b", "c"]);
        let nfa = regex.to_nfa(&context);
        let mfa = regex.compile(&context);
        for input in &inputs {
            prop_assert_eq!(
                mfa.accepts_graphemes(input),
                nfa.accepts_graphemes(input),
                "pattern {} input {}",
                pattern,
                input
            );
        }
    }

    /// Complementing relative to the context alphabet flips acceptance for
    /// every string over that alphabet.
    #[test]
    fn complement_flips_acceptance(
        tree in arb_shared_tree(),
        inputs in prop::collection::vec("[a-c]{0,6}", 24),
    ) {
        let pattern = render_shared(&tree);
        let context = Alphabet::from_symbols(["a", "b", "c"]);
        let mfa = compile_with(&pattern, &context);
        let complement = compile_with(&format!("({pattern})~"), &context);
        for input in &inputs {
            prop_assert_ne!(
                mfa.accepts_graphemes(input),
                complement.accepts_graphemes(input),
                "pattern {} input {}",
                pattern,
                input
            );
        }
    }
}
