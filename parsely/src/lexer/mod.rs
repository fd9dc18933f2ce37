//! # Lexer construction
//! This module turns a token-definition file into a ready-to-run
//! [LexerDefinition]. A definition file is line-oriented: each rule is
//! `regex;TOKEN_NAME` split on the first `;`, blank lines and lines starting
//! with `#` are ignored, and *later* rules take precedence when two rules
//! match the same lexeme with the same length.
//!
//! The pipeline is the classical one: each rule's regex is compiled to an NFA
//! with the Thompson construction, the NFAs are combined under a single start
//! state, the subset construction produces a DFA, the DFA is minimized, and
//! the result is flattened into a transition table.
//!
//! ## Example
//! ```
//! use parsely::lexer::LexerRules;
//!
//! let source = "
//! ## identifiers first, keywords later so they win ties
//! (i|f|e)(i|f|e)*;IDENTIFIER
//! if;KEYWORD
//! ";
//! let rules: LexerRules = parsely::parser::rules(source).unwrap().try_into().unwrap();
//! let table = rules.compile(&rules.alphabet()).unwrap();
//!
//! let tokens: Vec<_> = table.tokenize("iff").map(|t| t.name.to_string()).collect();
//! assert_eq!(tokens, vec!["IDENTIFIER"]); // maximal munch beats the keyword
//! let tokens: Vec<_> = table.tokenize("if").map(|t| t.name.to_string()).collect();
//! assert_eq!(tokens, vec!["KEYWORD"]); // equal length, the later rule wins
//! ```

use crate::nfa::{Nfa, TokenTag};
use crate::regex::{Regex, RegexError};
use crate::table::LexerDefinition;
pub use crate::parser::rules as parse;
pub use parse::RulesParseError;
use std::rc::Rc;
use thiserror::Error;

pub mod parse;

/// One token rule: the regex it matches and the token-type name it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRule {
    pub(crate) pattern: Rc<str>,
    pub(crate) regex: Regex,
    pub(crate) token: Rc<str>,
}

impl TokenRule {
    /// The regex source text of this rule
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The token-type name this rule produces
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// An ordered list of token rules, as read from a token-definition file.
/// The order matters: rule `i` of `n` gets priority `n - i - 1`, so rules
/// further down the file shadow earlier ones on equal-length matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerRules {
    pub(crate) rules: Vec<TokenRule>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("rule '{token}': {source}")]
    Regex { token: Rc<str>, source: RegexError },
    #[error("rule '{token}': literal '{ch}' is not in the lexer alphabet")]
    AlphabetMismatch { token: Rc<str>, ch: char },
}

impl LexerRules {
    /// Gets the rules in file order
    pub fn rules(&self) -> &[TokenRule] {
        self.rules.as_slice()
    }

    /// The alphabet implied by the rules: every literal character used by
    /// any rule, sorted and deduplicated
    pub fn alphabet(&self) -> Vec<char> {
        let mut alphabet: Vec<char> = self
            .rules
            .iter()
            .flat_map(|rule| rule.regex.literals())
            .collect();
        alphabet.sort_unstable();
        alphabet.dedup();
        alphabet
    }

    /// Compiles the rules into a transition table over the given alphabet.
    /// A rule literal outside the alphabet is not an error here; its state
    /// simply never gets a transition, making that path unreachable at
    /// runtime. Use [LexerRules::compile_strict] to reject it instead.
    pub fn compile(&self, alphabet: &[char]) -> Result<LexerDefinition, CompileError> {
        self.build(alphabet, false)
    }

    /// Like [LexerRules::compile], but errors on any rule literal missing
    /// from the alphabet
    pub fn compile_strict(&self, alphabet: &[char]) -> Result<LexerDefinition, CompileError> {
        self.build(alphabet, true)
    }

    fn build(&self, alphabet: &[char], strict: bool) -> Result<LexerDefinition, CompileError> {
        if strict {
            for rule in &self.rules {
                if let Some(ch) = rule.regex.literals().find(|ch| !alphabet.contains(ch)) {
                    return Err(CompileError::AlphabetMismatch {
                        token: rule.token.clone(),
                        ch,
                    });
                }
            }
        }

        let total = self.rules.len();
        let nfas = self
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                let tag = TokenTag::new(rule.token.clone(), (total - index - 1) as i32);
                rule.regex.to_nfa(tag).map_err(|source| CompileError::Regex {
                    token: rule.token.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let dfa = Nfa::union_all(nfas).to_dfa(alphabet).minimize();
        Ok(dfa.to_definition())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn rules(source: &str) -> LexerRules {
        parser::rules(source).unwrap().try_into().unwrap()
    }

    #[test]
    fn alphabet_is_sorted_and_deduplicated() {
        let rules = rules("ba;X\ncb;Y");
        assert_eq!(rules.alphabet(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn strict_mode_rejects_missing_literal() {
        let rules = rules("abc;X");
        assert_eq!(
            rules.compile_strict(&['a', 'b']),
            Err(CompileError::AlphabetMismatch {
                token: Rc::from("X"),
                ch: 'c'
            })
        );
        // Lenient mode compiles; the rule just can't match at runtime
        let table = rules.compile(&['a', 'b']).unwrap();
        assert_eq!(table.tokenize("abc").count(), 3);
    }

    #[test]
    fn bad_regex_is_reported_with_its_token() {
        let rules = rules("(ab;X");
        assert!(matches!(
            rules.compile(&['a', 'b']),
            Err(CompileError::Regex { token, .. }) if &*token == "X"
        ));
    }
}
