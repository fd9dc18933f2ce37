use crate::grammar::{Lookahead, Symbol};
use crate::ll::Ll1Table;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LlParseError {
    #[error("expected '{expected}' but found {found}")]
    UnexpectedToken { expected: Rc<str>, found: String },
    #[error("no rule for {nonterminal} on {lookahead}")]
    NoEntry {
        nonterminal: Rc<str>,
        lookahead: String,
    },
    #[error("unexpected trailing input at token {0}")]
    TrailingInput(usize),
}

impl Ll1Table {
    /// Runs the predictive parser over a token stream, where each token is
    /// the name of a terminal. The parse stack starts with the start symbol;
    /// a terminal on top must match the current token, a non-terminal is
    /// replaced by the table's production for the current lookahead (pushed
    /// in reverse), and the input is accepted when stack and input run out
    /// together.
    pub fn parse(&self, input: &[&str]) -> Result<(), LlParseError> {
        let mut stack = vec![Symbol::Nonterminal(self.start.clone())];
        let mut position = 0usize;

        while let Some(top) = stack.pop() {
            match top {
                Symbol::Terminal(expected) => {
                    if input.get(position) == Some(&&*expected) {
                        position += 1;
                    } else {
                        return Err(LlParseError::UnexpectedToken {
                            expected,
                            found: found_at(input, position),
                        });
                    }
                }
                Symbol::Nonterminal(name) => {
                    let lookahead = match input.get(position) {
                        Some(&token) => Lookahead::Terminal(Rc::from(token)),
                        None => Lookahead::End,
                    };
                    match self.entries.get(&(name.clone(), lookahead)) {
                        Some(&index) => {
                            for symbol in self.productions[index].rhs.iter().rev() {
                                stack.push(symbol.clone());
                            }
                        }
                        None => {
                            return Err(LlParseError::NoEntry {
                                nonterminal: name,
                                lookahead: found_at(input, position),
                            })
                        }
                    }
                }
            }
        }

        if position == input.len() {
            Ok(())
        } else {
            Err(LlParseError::TrailingInput(position))
        }
    }

    /// Checks whether the table accepts the given token stream
    pub fn accepts(&self, input: &[&str]) -> bool {
        self.parse(input).is_ok()
    }
}

fn found_at(input: &[&str], position: usize) -> String {
    match input.get(position) {
        Some(token) => format!("'{token}'"),
        None => "end of input".to_string(),
    }
}
