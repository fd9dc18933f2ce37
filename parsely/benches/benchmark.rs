use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use parsely::grammar::Grammar;
use parsely::lexer::LexerRules;
use parsely::lr::Lr1Automaton;
use parsely::table::LexerDefinition;
use regex::Regex as LibRegex;

const RULES: &str = include_str!("../tests/test_files/tokens.rules");
const EXPR_GRAMMAR: &str = include_str!("../tests/test_files/expr.grammar");
const PATTERN: &str = "(a|b|c|d|e|f|h|i|l|s|w)(a|b|c|d|e|f|h|i|l|s|w|0|1|2|3|4|5|6|7|8|9)*";

lazy_static! {
    static ref LEXER_RULES: LexerRules = parsely::parser::rules(RULES)
        .unwrap()
        .try_into()
        .unwrap();
    static ref TABLE: LexerDefinition = {
        let alphabet = LEXER_RULES.alphabet();
        LEXER_RULES.compile(&alphabet).unwrap()
    };
    static ref INPUT: String = "while abc1=if 42==ids<23 else ".repeat(200);
}

pub fn lexer_compile(c: &mut Criterion) {
    let alphabet = LEXER_RULES.alphabet();
    c.bench_function("lexer compile", |b| {
        b.iter(|| LEXER_RULES.compile(black_box(&alphabet)).unwrap())
    });

    c.bench_function("library regex compile", |b| {
        b.iter(|| LibRegex::new(black_box(PATTERN)).unwrap())
    });
}

pub fn tokenize(c: &mut Criterion) {
    c.bench_function("tokenize", |b| {
        b.iter(|| TABLE.tokenize(black_box(&INPUT)).count())
    });
}

pub fn lalr_build(c: &mut Criterion) {
    let grammar: Grammar = parsely::parser::grammar(EXPR_GRAMMAR)
        .unwrap()
        .try_into()
        .unwrap();
    c.bench_function("lalr table build", |b| {
        b.iter(|| Lr1Automaton::construct(black_box(&grammar)).lalr_table())
    });
}

pub fn lalr_parse(c: &mut Criterion) {
    let grammar: Grammar = parsely::parser::grammar(EXPR_GRAMMAR)
        .unwrap()
        .try_into()
        .unwrap();
    let table = Lr1Automaton::construct(&grammar).lalr_table();
    let mut stream = vec!["id"];
    for _ in 0..500 {
        stream.extend(["+", "id", "*", "(", "id", "+", "id", ")"]);
    }
    c.bench_function("lalr parse", |b| {
        b.iter(|| table.parse(black_box(&stream)).unwrap())
    });
}

criterion_group!(benches, lexer_compile, tokenize, lalr_build, lalr_parse);
criterion_main!(benches);
