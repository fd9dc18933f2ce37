use crate::grammar::Lookahead;
use crate::lr::lalr::{Action, LalrTable};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LrParseError {
    #[error("syntax error in state {state} at {symbol}")]
    Unexpected { state: usize, symbol: String },
    #[error("missing goto from state {state} on {nonterminal}")]
    MissingGoto {
        state: usize,
        nonterminal: Rc<str>,
    },
}

impl LalrTable {
    /// Runs the shift/reduce loop over a token stream, where each token is
    /// the name of a terminal and the end of the slice is the `$` marker.
    /// A shift pushes the target state and advances; a reduce by `A -> β`
    /// pops |β| states and pushes GOTO of the uncovered state on A; an
    /// absent ACTION entry is a syntax error. ε-productions reduce without
    /// popping.
    pub fn parse(&self, input: &[&str]) -> Result<(), LrParseError> {
        let mut stack = vec![0usize];
        let mut position = 0usize;

        loop {
            let state = *stack.last().expect("the state stack is never empty");
            let lookahead = match input.get(position) {
                Some(&token) => Lookahead::Terminal(Rc::from(token)),
                None => Lookahead::End,
            };

            match self.actions[state].get(&lookahead) {
                None => {
                    return Err(LrParseError::Unexpected {
                        state,
                        symbol: lookahead.to_string(),
                    })
                }
                Some(Action::Shift(target)) => {
                    stack.push(*target);
                    position += 1;
                }
                Some(Action::Reduce(index)) => {
                    let production = &self.productions[*index];
                    for _ in 0..production.rhs.len() {
                        stack.pop();
                    }
                    let uncovered = *stack.last().expect("reductions never empty the stack");
                    match self.gotos[uncovered].get(&production.lhs) {
                        Some(&target) => stack.push(target),
                        None => {
                            return Err(LrParseError::MissingGoto {
                                state: uncovered,
                                nonterminal: production.lhs.clone(),
                            })
                        }
                    }
                }
                Some(Action::Accept) => return Ok(()),
            }
        }
    }

    /// Checks whether the table accepts the given token stream
    pub fn accepts(&self, input: &[&str]) -> bool {
        self.parse(input).is_ok()
    }
}
