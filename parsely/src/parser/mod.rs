//! # parsely parser
//! This module contains the `nom` parsers for the two text formats the
//! toolkit consumes: token-definition files and grammar files. Both are
//! line-oriented UTF-8; lines containing only whitespace are ignored, and `#`
//! starts a comment running to the end of the line.
//!
//! ## Token-definition files
//! One rule per line, `regex;TOKEN_NAME`, split on the *first* `;` with both
//! sides trimmed. Rules further down the file take precedence over earlier
//! ones when matches tie on length:
//!
//! ```text
//! # a toy ruleset
//! (a|b)(a|b|0|1)*;IDENT
//! (0|1)(0|1)*;NUMBER
//! ab;KEYWORD
//! ```
//!
//! ## Grammar files
//! Productions are written `A -> α | β` (`→` also works) with
//! whitespace-separated symbols; `|` separates alternatives and `ε`/`eps`
//! denotes the empty alternative. Three optional header lines may come first:
//!
//! ```text
//! Nonterminals: S A
//! Terminals:    a b
//! Start:        S
//! S -> a A | b
//! A -> S | ε
//! ```
//!
//! Without headers, the non-terminals are the left-hand sides, the start
//! symbol is the first production's left-hand side, and every other symbol is
//! a terminal.
//!
//! Parsing happens in two steps: the functions here produce borrowed
//! [ParsedRules]/[ParsedGrammar] values without checking any invariants, and
//! `TryInto` converts them into validated [crate::lexer::LexerRules] and
//! [crate::grammar::Grammar] values.

mod grammar;
mod rules;

use nom::{combinator::all_consuming, error::Error, Finish};

#[derive(Debug)]
pub struct ParsedRules<'a> {
    pub rules: Vec<ParsedRule<'a>>,
}

#[derive(Debug, Clone)]
pub struct ParsedRule<'a> {
    pub pattern: &'a str,
    pub token: &'a str,
}

#[derive(Debug)]
pub struct ParsedGrammar<'a> {
    pub nonterminals: Option<Vec<&'a str>>,
    pub terminals: Option<Vec<&'a str>>,
    pub start: Option<&'a str>,
    pub productions: Vec<ParsedProduction<'a>>,
}

#[derive(Debug, Clone)]
pub struct ParsedProduction<'a> {
    pub name: &'a str,
    pub alternatives: Vec<Vec<&'a str>>,
}

/// Parses a token-definition file according to the format above. The whole
/// string must be parsable, otherwise this function errors. Note that the
/// result is a [ParsedRules], which is not yet a valid rule set; use
/// [TryInto::try_into] to convert it to a [crate::lexer::LexerRules].
pub fn rules(input: &str) -> Result<ParsedRules, Error<&str>> {
    all_consuming(rules::full_rules)(input)
        .finish()
        .map(|(_, rules)| rules)
}

/// Parses a grammar according to the format above. The whole string must be
/// parsable, otherwise this function errors. Note that the result is a
/// [ParsedGrammar], which is not yet a valid grammar; use
/// [TryInto::try_into] to convert it to a [crate::grammar::Grammar].
pub fn grammar(input: &str) -> Result<ParsedGrammar, Error<&str>> {
    all_consuming(grammar::full_grammar)(input)
        .finish()
        .map(|(_, grammar)| grammar)
}
