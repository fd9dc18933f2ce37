//!# parsely
//!
//! `parsely` is a compiler front-end construction toolkit: it builds
//! table-driven lexers from regular-expression token rules, and LL(1) and
//! LALR(1) parsing tables from context-free grammars.
//!
//! ## Building a lexer
//!
//! A lexer is described by a token-definition file with one `regex;TOKEN`
//! rule per line; rules further down the file win ties. The pipeline runs
//! regex → NFA (Thompson construction) → DFA (subset construction) →
//! minimized DFA → dense transition table, which the runtime tokenizer walks
//! with maximal munch:
//!
//! ```rust
//! use parsely::lexer::LexerRules;
//! use parsely::table::LexerDefinition;
//!
//! let source = "
//! ## numbers first so the later keyword wins ties
//! (0|1)(0|1)*;NUMBER
//! 0;ZERO
//! ";
//! let rules: LexerRules = parsely::parser::rules(source).unwrap().try_into().unwrap();
//! let table = rules.compile(&rules.alphabet()).unwrap();
//!
//! let tokens: Vec<_> = table
//!     .tokenize("0110")
//!     .map(|token| (token.name.to_string(), token.lexeme.to_string()))
//!     .collect();
//! assert_eq!(tokens, vec![("NUMBER".to_string(), "0110".to_string())]);
//!
//! let tokens: Vec<_> = table.tokenize("0").map(|t| t.name.to_string()).collect();
//! assert_eq!(tokens, vec!["ZERO"]);
//!
//! // The table round-trips through its JSON interchange form
//! let json = table.to_json();
//! assert_eq!(LexerDefinition::from_json(&json).unwrap(), table);
//! ```
//!
//! ## Building parsers
//!
//! Grammars are written as `A -> α | β` productions. From a [grammar::Grammar]
//! you can compute [FIRST/FOLLOW sets](grammar::analysis), an
//! [LL(1) table](ll::Ll1Table) (conflicts reject the grammar) or an
//! [LALR(1) table](lr::LalrTable) (conflicts are collected as diagnostics),
//! each with a driver deciding token-stream membership:
//!
//! ```rust
//! use parsely::grammar::Grammar;
//! use parsely::lr::Lr1Automaton;
//!
//! let grammar: Grammar = parsely::parser::grammar(
//!     "E -> E + T | T\nT -> T * F | F\nF -> ( E ) | id",
//! )
//! .unwrap()
//! .try_into()
//! .unwrap();
//!
//! let table = Lr1Automaton::construct(&grammar).lalr_table();
//! assert!(table.conflicts().is_empty());
//! assert!(table.accepts(&["id", "+", "id", "*", "id"]));
//! assert!(!table.accepts(&["id", "+"]));
//! ```
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing](parser::rules) and [validating](lexer::parse) token-definition files
//! * [Converting regexes to postfix form](regex::Regex::parse) and
//!   [compiling them to NFAs](regex::Regex::to_nfa)
//! * [Combining rule NFAs](nfa::Nfa::union_all) and
//!   [converting NFAs to DFAs](nfa::Nfa::to_dfa)
//! * [Minimizing DFAs](dfa::Dfa::minimize) without conflating token classes
//! * [Flattening DFAs into transition tables](dfa::Dfa::to_definition) and
//!   [serializing them to JSON](table::LexerDefinition::to_json)
//! * [Tokenizing input by maximal munch](table::LexerDefinition::tokenize)
//! * [Parsing](parser::grammar) and [validating](grammar::parse) grammars
//! * [FIRST/FOLLOW computation](grammar::Grammar::first_sets)
//! * [LL(1) tables](grammar::Grammar::ll1_table) with conflict detection and a
//!   [predictive driver](ll::Ll1Table::parse)
//! * [Canonical LR(1) collections](lr::Lr1Automaton::construct),
//!   [LALR(1) tables](lr::LalrTable) with conflict diagnostics and a
//!   [shift/reduce driver](lr::LalrTable::parse)

pub mod dfa;
pub mod grammar;
pub mod lexer;
pub mod ll;
pub mod lr;
pub mod nfa;
pub mod parser;
pub mod regex;
pub mod table;
mod util;

#[cfg(test)]
mod tests;
