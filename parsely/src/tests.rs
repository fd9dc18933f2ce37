use crate::dfa::Dfa;
use crate::grammar::{Grammar, Lookahead};
use crate::lexer::LexerRules;
use crate::ll::Ll1Table;
use crate::lr::{LalrTable, Lr1Automaton};
use crate::nfa::TokenTag;
use crate::parser;
use crate::regex::Regex;
use crate::table::LexerDefinition;
use ::regex::Regex as LibRegex;
use proptest::prelude::*;
use rand::prelude::*;
use std::collections::BTreeSet;

fn grammar(input: &str) -> Grammar {
    parser::grammar(input).unwrap().try_into().unwrap()
}

fn lexer_rules(input: &str) -> LexerRules {
    parser::rules(input).unwrap().try_into().unwrap()
}

fn compile(input: &str) -> LexerDefinition {
    let rules = lexer_rules(input);
    let alphabet = rules.alphabet();
    rules.compile(&alphabet).unwrap()
}

fn single_dfa(pattern: &str, alphabet: &[char]) -> Dfa {
    Regex::parse(pattern)
        .to_nfa(TokenTag::new("T", 0))
        .unwrap()
        .to_dfa(alphabet)
}

fn token_names(table: &LexerDefinition, input: &str) -> Vec<String> {
    table
        .tokenize(input)
        .map(|token| token.name.to_string())
        .collect()
}

#[test]
fn regex_pipeline_on_a_or_b_star_c_plus() {
    let dfa = single_dfa("(a|b)*c+", &['a', 'b', 'c']);
    for accepted in ["c", "ac", "bc", "abc", "ababcc"] {
        assert!(dfa.accepts(accepted), "should accept {accepted}");
    }
    for rejected in ["", "a", "ab", "ccd"] {
        assert!(!dfa.accepts(rejected), "should reject {rejected}");
    }

    // Minimization keeps the language
    let minimized = dfa.minimize();
    assert!(minimized.equivalent_to(&dfa));
    assert!(minimized.accepts("ababcc"));
    assert!(!minimized.accepts("ab"));
}

#[test]
fn union_of_two_rules_classifies_by_rule() {
    let table = compile("(a|b)*c+;ABC\nd(e|f)g*;DEFG");
    assert_eq!(token_names(&table, "bbbc"), vec!["ABC"]);
    assert_eq!(token_names(&table, "de"), vec!["DEFG"]);
    // d alone reaches no accepting state at all
    assert_eq!(token_names(&table, "d"), vec!["UNKNOWN"]);
}

#[test]
fn keywords_win_ties_but_not_length() {
    let table = compile("(i|f|e)(i|f|e)*;IDENTIFIER\nif;KEYWORD");
    // Maximal munch beats the keyword on longer input
    assert_eq!(token_names(&table, "iff"), vec!["IDENTIFIER"]);
    // On equal length, the later rule's lower priority number wins
    assert_eq!(token_names(&table, "if"), vec!["KEYWORD"]);
    assert_eq!(token_names(&table, "fee"), vec!["IDENTIFIER"]);
}

#[test]
fn toy_language_fixture_tokenizes() {
    let rules = lexer_rules(include_str!("../tests/test_files/tokens.rules"));
    let alphabet = rules.alphabet();
    let table = rules.compile(&alphabet).unwrap();

    let names = token_names(&table, "while=if1==23<iff");
    assert_eq!(
        names,
        vec!["WHILE", "ASSIGN", "IDENT", "EQ", "NUMBER", "LESS", "IDENT"]
    );

    // Lexemes partition the input exactly
    let input = "ifwhilelse42";
    let rebuilt: String = table.tokenize(input).map(|t| t.lexeme).collect();
    assert_eq!(rebuilt, input);
}

#[test]
fn tokenization_does_not_distribute_over_concatenation() {
    // A counterexample showing maximal munch is not compositional:
    // tokenize("a") + tokenize("b") is A B, but tokenize("ab") is AB
    let table = compile("a;A\nb;B\nab;AB");
    assert_eq!(token_names(&table, "a"), vec!["A"]);
    assert_eq!(token_names(&table, "b"), vec!["B"]);
    assert_eq!(token_names(&table, "ab"), vec!["AB"]);
}

#[test]
fn definition_json_round_trips_through_the_documented_layout() {
    let table = compile("(a|b)*c+;ABC");
    let json = table.to_json();
    assert!(json.contains("\"startState\""));
    assert!(json.contains("\"tokenTypeNames\""));
    assert_eq!(LexerDefinition::from_json(&json).unwrap(), table);

    assert!(LexerDefinition::from_json("{").is_err());
    assert!(LexerDefinition::from_json("{\"alphabet\": []}").is_err());
}

#[test]
fn subset_construction_is_idempotent() {
    let alphabet = ['a', 'b', 'c'];
    let dfa = single_dfa("(a|b)*c+", &alphabet);
    let again = dfa.to_nfa().to_dfa(&alphabet);
    assert_eq!(again.states().len(), dfa.states().len());
    assert!(again.equivalent_to(&dfa));
}

#[test]
fn minimization_is_idempotent() {
    let dfa = single_dfa("(a|b)*abb", &['a', 'b']);
    let once = dfa.minimize();
    let twice = once.minimize();
    assert_eq!(once.states().len(), twice.states().len());
    assert!(twice.equivalent_to(&once));
}

#[test]
fn first_follow_of_the_right_linear_grammar() {
    let grammar = grammar("S -> a S | b");
    let first = grammar.first_sets();
    let s = first.get("S").unwrap();
    assert!(s.contains("a") && s.contains("b") && !s.is_nullable());

    let follow = grammar.follow_sets(&first);
    let s = follow.get("S").unwrap();
    assert_eq!(s.terminals().count(), 0);
    assert!(s.has_endmarker());

    let table = grammar.ll1_table().unwrap();
    assert!(table.accepts(&["b"]));
    assert!(table.accepts(&["a", "b"]));
    assert!(table.accepts(&["a", "a", "a", "b"]));
    assert!(!table.accepts(&[]));
    assert!(!table.accepts(&["a"]));
    assert!(!table.accepts(&["b", "a"]));
}

#[test]
fn expression_grammar_is_lalr_but_not_ll() {
    let grammar = grammar(include_str!("../tests/test_files/expr.grammar"));

    // Left recursion makes it unusable for LL(1)
    assert!(grammar.ll1_table().is_err());

    let lr1 = Lr1Automaton::construct(&grammar);
    let table = lr1.lalr_table();
    assert_eq!(table.state_count(), 12);
    assert!(table.conflicts().is_empty());
    assert!(table.accepts(&["id", "+", "id", "*", "id"]));
    assert!(!table.accepts(&["id", "+"]));
}

#[test]
fn merging_preserves_kernels_and_shift_symbols() {
    // Lookaheads never influence GOTO: a merged state transitions on
    // exactly the symbols its LR(1) group members did
    let grammar = grammar("S -> C C\nC -> c C | d");
    let lr1 = Lr1Automaton::construct(&grammar);
    let table = lr1.lalr_table();
    assert!(table.conflicts().is_empty());

    for state in lr1.states() {
        let kernel = state.kernel();
        let merged = table
            .states()
            .iter()
            .find(|candidate| {
                candidate
                    .items()
                    .map(|item| (item.production_index(), item.dot()))
                    .collect::<BTreeSet<_>>()
                    == kernel
            })
            .expect("every LR(1) state has a merged counterpart");
        // The merged state must transition on exactly the same symbol set
        let lr1_symbols: Vec<_> = state.transitions().keys().collect();
        let merged_symbols: Vec<_> = merged.transitions().keys().collect();
        assert_eq!(lr1_symbols, merged_symbols);
    }
}

#[test]
fn ll_and_lalr_agree_on_the_expression_language() {
    let ll = grammar(include_str!("../tests/test_files/ll_expr.grammar"))
        .ll1_table()
        .unwrap();
    let lalr = Lr1Automaton::construct(&grammar(include_str!(
        "../tests/test_files/expr.grammar"
    )))
    .lalr_table();

    let samples: &[&[&str]] = &[
        &[],
        &["id"],
        &["id", "+", "id"],
        &["id", "*", "id", "+", "id"],
        &["(", "id", ")"],
        &["(", "id", "+", "id", ")", "*", "id"],
        &["id", "id"],
        &["+", "id"],
        &["(", ")"],
        &["id", "+"],
        &["(", "id"],
    ];
    for sample in samples {
        assert_eq!(
            ll.accepts(sample),
            lalr.accepts(sample),
            "engines disagree on {sample:?}"
        );
    }
}

#[test]
fn grammar_reader_treats_undeclared_symbols_as_terminals() {
    let grammar = grammar("Nonterminals: S\nTerminals: a\nStart: S\nS -> a S | stop");
    assert_eq!(grammar.inferred_terminals(), ["stop".into()]);
    let table = Lr1Automaton::construct(&grammar).lalr_table();
    assert!(table.accepts(&["a", "a", "stop"]));
}

fn derive_sentence(grammar: &Grammar, rng: &mut StdRng) -> Vec<String> {
    // Random leftmost derivation; after a while it winds down by always
    // taking the shortest alternative, which for this grammar spawns no new
    // branches
    let mut sentence = Vec::new();
    let mut stack = vec![crate::grammar::Symbol::Nonterminal(grammar.start().into())];
    let mut steps = 0usize;
    while let Some(symbol) = stack.pop() {
        match symbol {
            crate::grammar::Symbol::Terminal(name) => sentence.push(name.to_string()),
            crate::grammar::Symbol::Nonterminal(name) => {
                steps += 1;
                let candidates: Vec<_> = grammar.productions_of(&name).collect();
                let (_, production) = if steps > 30 {
                    *candidates
                        .iter()
                        .min_by_key(|(_, p)| p.rhs().len())
                        .unwrap()
                } else {
                    *candidates.choose(rng).unwrap()
                };
                for symbol in production.rhs().iter().rev() {
                    stack.push(symbol.clone());
                }
            }
        }
    }
    sentence
}

#[test]
fn derived_sentences_parse_and_predict_first() {
    let grammar = grammar(include_str!("../tests/test_files/expr.grammar"));
    let table = Lr1Automaton::construct(&grammar).lalr_table();
    let first = grammar.first_sets();
    let start_first = first.get(grammar.start()).unwrap();

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..100 {
        let sentence = derive_sentence(&grammar, &mut rng);
        let tokens: Vec<&str> = sentence.iter().map(String::as_str).collect();
        assert!(table.accepts(&tokens), "derived sentence rejected: {tokens:?}");
        let head = tokens.first().expect("this grammar derives no empty string");
        assert!(
            start_first.contains(head),
            "{head} not in FIRST({})",
            grammar.start()
        );
    }
}

proptest! {
    /// The NFA, the DFA and the minimized DFA accept exactly the same
    /// strings as the reference regex engine
    #[test]
    fn regex_pipeline_matches_library_regex(
        regex_str in random_regex(),
        tests in prop::collection::vec("[a-d]*", 20)
    ) {
        let nfa = Regex::parse(&regex_str)
            .to_nfa(TokenTag::new("T", 0))
            .unwrap();
        let alphabet: Vec<char> = {
            let mut chars: Vec<char> = regex_str.chars().filter(char::is_ascii_lowercase).collect();
            chars.sort_unstable();
            chars.dedup();
            chars
        };
        let dfa = nfa.to_dfa(&alphabet);
        let minimized = dfa.minimize();
        let lib_regex = LibRegex::new(&format!("^({regex_str})$")).unwrap();

        for test in &tests {
            // Strip characters the automaton's alphabet cannot see
            let s: String = test.chars().filter(|c| alphabet.contains(c)).collect();
            let expected = lib_regex.is_match(&s);
            prop_assert_eq!(nfa.accepts(&s), expected, "NFA disagrees on {}", s);
            prop_assert_eq!(dfa.accepts(&s), expected, "DFA disagrees on {}", s);
            prop_assert_eq!(minimized.accepts(&s), expected, "minimized DFA disagrees on {}", s);
        }
    }

    /// Minimization never grows the automaton and is idempotent
    #[test]
    fn minimization_shrinks_and_stabilizes(regex_str in random_regex()) {
        let alphabet: Vec<char> = {
            let mut chars: Vec<char> = regex_str.chars().filter(char::is_ascii_lowercase).collect();
            chars.sort_unstable();
            chars.dedup();
            chars
        };
        let dfa = Regex::parse(&regex_str)
            .to_nfa(TokenTag::new("T", 0))
            .unwrap()
            .to_dfa(&alphabet);
        let minimized = dfa.minimize();
        prop_assert!(minimized.states().len() <= dfa.states().len());
        prop_assert!(minimized.equivalent_to(&dfa));
        let again = minimized.minimize();
        prop_assert_eq!(again.states().len(), minimized.states().len());
    }

    /// Tokenization always partitions the input, whatever the input is
    #[test]
    fn tokenization_partitions_the_input(input in "[a-c0-9<=]*") {
        let table = compile("(a|b|c)(a|b|c|0|1)*;IDENT\n(0|1)(0|1)*;NUMBER\n=;ASSIGN\n==;EQ");
        let mut expected_start = 0;
        let mut rebuilt = String::new();
        for token in table.tokenize(&input) {
            prop_assert_eq!(token.start, expected_start);
            prop_assert_eq!(&input[token.start..token.end], token.lexeme);
            expected_start = token.end;
            rebuilt.push_str(token.lexeme);
        }
        prop_assert_eq!(rebuilt, input);
    }

    /// The LL(1) and LALR(1) engines agree on random token streams over the
    /// two formulations of the expression grammar
    #[test]
    fn ll_and_lalr_agree_on_random_streams(
        tokens in prop::collection::vec(
            prop::sample::select(vec!["id", "+", "*", "(", ")"]),
            0..8
        )
    ) {
        let ll = ll_expression_table();
        let lalr = lalr_expression_table();
        let stream: Vec<&str> = tokens.to_vec();
        prop_assert_eq!(ll.accepts(&stream), lalr.accepts(&stream));
    }
}

fn ll_expression_table() -> Ll1Table {
    grammar(include_str!("../tests/test_files/ll_expr.grammar"))
        .ll1_table()
        .unwrap()
}

fn lalr_expression_table() -> LalrTable {
    Lr1Automaton::construct(&grammar(include_str!("../tests/test_files/expr.grammar")))
        .lalr_table()
}

fn random_regex() -> impl Strategy<Value = String> {
    "[a-d]".prop_recursive(8, 64, 6, |inner| {
        prop_oneof![
            10 => prop::collection::vec(inner.clone(), 1..5)
                .prop_map(|vec| format!("({})", vec.join(""))),
            10 => prop::collection::vec(inner.clone(), 1..5).prop_map(|vec| vec.join("|")),
            3 => inner.clone().prop_map(|r| format!("({r})*")),
            3 => inner.clone().prop_map(|r| format!("({r})+")),
            2 => inner.prop_map(|r| format!("({r})?")),
        ]
    })
}

#[test]
fn ll_table_rejects_ambiguous_cells_with_both_productions() {
    let conflict = grammar("S -> a b | a c").ll1_table().unwrap_err();
    assert_eq!(&*conflict.nonterminal, "S");
    assert_eq!(conflict.lookahead, Lookahead::Terminal("a".into()));
    assert_ne!(conflict.first, conflict.second);
}
