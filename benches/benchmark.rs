use alang::alphabet::Alphabet;
use alang::ops;
use alang::parser;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use regex::Regex as LibRegex;

/// A wide union of distinct multi-character symbols, stressing the lexer and
/// the precedence-climbing loops.
fn wide_alternation(symbols: usize) -> String {
    (0..symbols)
        .map(|i| format!("s{i}"))
        .collect::<Vec<_>>()
        .join("|")
}

pub fn parse(c: &mut Criterion) {
    let input = wide_alternation(1000);
    c.bench_function("parse wide alternation", |b| {
        b.iter(|| parser::alang(black_box(&input)).unwrap())
    });

    let printed = parser::alang(&input).unwrap().expression_string();
    c.bench_function("print wide alternation", |b| {
        b.iter(|| parser::alang(black_box(&printed)).unwrap().expression_string())
    });
}

pub fn compile(c: &mut Criterion) {
    let regex = parser::alang("(a|b c)*(a b)+(c? b)*").unwrap();
    let context = Alphabet::new();
    c.bench_function("alang compile", |b| {
        b.iter(|| black_box(&regex).compile(&context))
    });

    c.bench_function("library regex compile", |b| {
        b.iter(|| LibRegex::new(black_box("(a|bc)*(ab)+(c?b)*")).unwrap())
    });
}

pub fn operations(c: &mut Criterion) {
    let context = Alphabet::from_symbols(["a", "b", "c"]);
    let left = parser::alang("(a|b)* c (a|b)*")
        .unwrap()
        .compile(&context)
        .to_nfa()
        .to_dfa();
    let right = parser::alang("(b|c)* a")
        .unwrap()
        .compile(&context)
        .to_nfa()
        .to_dfa();

    c.bench_function("intersection", |b| {
        b.iter(|| ops::intersection(black_box(&left), black_box(&right)).unwrap())
    });
    c.bench_function("minimize and canonicalize", |b| {
        b.iter(|| black_box(&left).to_mfa())
    });

    let mfa = parser::alang("(a b|b c)+").unwrap().compile(&context);
    c.bench_function("acceptance check", |b| {
        b.iter(|| black_box(&mfa).accepts_graphemes("abbcabbcabbc"))
    });
}

criterion_group!(benches, parse, compile, operations);
criterion_main!(benches);
