//! # Regular expressions for token rules
//! This module implements the regular expressions used by token-definition
//! files. The syntax is intentionally small: any character which is not one of
//! the six reserved operator characters `|`, `*`, `+`, `?`, `(` and `)` is a
//! literal. `|` denotes alternation, `*`/`+`/`?` are the postfix repetition
//! operators (zero or more, one or more, zero or one), and parentheses group.
//! There is no escape character, so the operator characters themselves cannot
//! be matched.
//!
//! Expressions are kept in postfix form: [Regex::parse] scans the input,
//! inserts the implicit concatenation operator and runs the Shunting-Yard
//! conversion. Scanning never fails; malformed expressions (unbalanced
//! parentheses, operators without operands) are detected when the expression
//! is compiled to an NFA by [Regex::to_nfa].
//!
//! ```
//! use parsely::nfa::TokenTag;
//! use parsely::regex::Regex;
//!
//! let regex = Regex::parse("(a|b)*c+");
//! let nfa = regex.to_nfa(TokenTag::new("ABC", 0)).unwrap();
//! let dfa = nfa.to_dfa(&['a', 'b', 'c']);
//! assert!(dfa.accepts("ababcc"));
//! assert!(!dfa.accepts("ab"));
//!
//! assert!(Regex::parse("(a|b").to_nfa(TokenTag::new("BAD", 0)).is_err());
//! ```

use crate::nfa::{Nfa, NfaState, TokenTag};
use thiserror::Error;

pub mod postfix;

/// One token of a scanned regular expression. Positions are character indices
/// into the original expression text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexToken {
    Literal { ch: char, pos: usize },
    Op { op: RegexOp, pos: usize },
    Open { pos: usize },
    Close { pos: usize },
}

/// The regex operators, including the implicit concatenation operator that
/// [postfix::insert_concat] introduces. Concatenation has no written form, so
/// it can never collide with a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexOp {
    Alt,
    Concat,
    Star,
    Plus,
    Question,
}

impl RegexOp {
    /// Binding strength: alternation < concatenation < repetition.
    pub(crate) fn precedence(self) -> u8 {
        match self {
            RegexOp::Alt => 1,
            RegexOp::Concat => 2,
            RegexOp::Star | RegexOp::Plus | RegexOp::Question => 3,
        }
    }

    /// The character used for this operator in diagnostics. Concatenation is
    /// shown as `·` even though it has no written form.
    pub(crate) fn symbol(self) -> char {
        match self {
            RegexOp::Alt => '|',
            RegexOp::Concat => '·',
            RegexOp::Star => '*',
            RegexOp::Plus => '+',
            RegexOp::Question => '?',
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegexError {
    #[error("empty regular expression")]
    Empty,
    #[error("unmatched '(' at position {0}")]
    UnmatchedOpenParen(usize),
    #[error("unmatched ')' at position {0}")]
    UnmatchedCloseParen(usize),
    #[error("operator '{op}' at position {pos} is missing an operand")]
    MissingOperand { op: char, pos: usize },
    #[error("expression leaves {0} unconnected terms")]
    DanglingOperands(usize),
}

/// A regular expression in postfix form, ready to be compiled to an NFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pub(crate) postfix: Vec<RegexToken>,
}

/// A partial automaton on the Thompson construction stack: the indices of its
/// entry and exit states in the arena being built.
struct Frag {
    start: usize,
    end: usize,
}

impl Regex {
    /// Scans an expression and converts it to postfix form. This never fails:
    /// malformed expressions are reported by [Regex::to_nfa].
    pub fn parse(input: &str) -> Regex {
        let tokens = postfix::scan(input);
        let tokens = postfix::insert_concat(tokens);
        Regex {
            postfix: postfix::to_postfix(tokens),
        }
    }

    /// The literal characters this expression can match, in order of
    /// appearance. Used to derive lexer alphabets.
    pub fn literals(&self) -> impl Iterator<Item = char> + '_ {
        self.postfix.iter().filter_map(|token| match token {
            RegexToken::Literal { ch, .. } => Some(*ch),
            _ => None,
        })
    }

    /// Compiles this expression to an NFA using the Thompson construction,
    /// tagging the accepting state with `token`. Each postfix token either
    /// pushes a fragment onto the working stack (literals) or combines the
    /// topmost fragments (operators); a well-formed expression leaves exactly
    /// one fragment, whose end state becomes the single accepting state.
    pub fn to_nfa(&self, token: TokenTag) -> Result<Nfa, RegexError> {
        let mut states: Vec<NfaState> = Vec::new();
        let mut stack: Vec<Frag> = Vec::new();

        let mut new_state = |states: &mut Vec<NfaState>| -> usize {
            states.push(NfaState {
                transitions: Vec::new(),
                accept: None,
            });
            states.len() - 1
        };

        for &tok in &self.postfix {
            match tok {
                RegexToken::Literal { ch, .. } => {
                    let start = new_state(&mut states);
                    let end = new_state(&mut states);
                    states[start].transitions.push((Some(ch), end));
                    stack.push(Frag { start, end });
                }
                RegexToken::Op { op, pos } => {
                    let missing = |op: RegexOp| RegexError::MissingOperand {
                        op: op.symbol(),
                        pos,
                    };
                    match op {
                        RegexOp::Concat => {
                            let b = stack.pop().ok_or(missing(op))?;
                            let a = stack.pop().ok_or(missing(op))?;
                            states[a.end].transitions.push((None, b.start));
                            stack.push(Frag {
                                start: a.start,
                                end: b.end,
                            });
                        }
                        RegexOp::Alt => {
                            let b = stack.pop().ok_or(missing(op))?;
                            let a = stack.pop().ok_or(missing(op))?;
                            let start = new_state(&mut states);
                            let end = new_state(&mut states);
                            states[start].transitions.push((None, a.start));
                            states[start].transitions.push((None, b.start));
                            states[a.end].transitions.push((None, end));
                            states[b.end].transitions.push((None, end));
                            stack.push(Frag { start, end });
                        }
                        RegexOp::Star => {
                            let a = stack.pop().ok_or(missing(op))?;
                            let start = new_state(&mut states);
                            let end = new_state(&mut states);
                            states[start].transitions.push((None, a.start));
                            states[start].transitions.push((None, end));
                            states[a.end].transitions.push((None, a.start));
                            states[a.end].transitions.push((None, end));
                            stack.push(Frag { start, end });
                        }
                        RegexOp::Plus => {
                            // Like star, but without the edge skipping the body
                            let a = stack.pop().ok_or(missing(op))?;
                            let start = new_state(&mut states);
                            let end = new_state(&mut states);
                            states[start].transitions.push((None, a.start));
                            states[a.end].transitions.push((None, a.start));
                            states[a.end].transitions.push((None, end));
                            stack.push(Frag { start, end });
                        }
                        RegexOp::Question => {
                            let a = stack.pop().ok_or(missing(op))?;
                            let start = new_state(&mut states);
                            let end = new_state(&mut states);
                            states[start].transitions.push((None, a.start));
                            states[start].transitions.push((None, end));
                            states[a.end].transitions.push((None, end));
                            stack.push(Frag { start, end });
                        }
                    }
                }
                // Group markers only reach the postfix stream when the
                // parentheses were unbalanced
                RegexToken::Open { pos } => return Err(RegexError::UnmatchedOpenParen(pos)),
                RegexToken::Close { pos } => return Err(RegexError::UnmatchedCloseParen(pos)),
            }
        }

        let frag = stack.pop().ok_or(RegexError::Empty)?;
        if !stack.is_empty() {
            return Err(RegexError::DanglingOperands(stack.len() + 1));
        }
        states[frag.end].accept = Some(token);
        Ok(Nfa {
            states,
            start: frag.start,
            end: Some(frag.end),
        })
    }
}
