//! # Lexer transition tables
//! A [LexerDefinition] is the flattened, dense form of a lexer DFA: the
//! alphabet as an ordered character list, one transition row per state with
//! `-1` for "no transition", and parallel arrays flagging accepting states
//! and naming their tokens. It is what the runtime tokenizer walks, and it is
//! the JSON interchange format of the toolkit:
//!
//! ```json
//! {
//!   "alphabet": ["a", "b"],
//!   "startState": 0,
//!   "transitions": [[1, -1], [1, 0]],
//!   "isFinal": [false, true],
//!   "tokenTypeNames": [null, "AB"]
//! }
//! ```
//!
//! [LexerDefinition::from_json] re-checks the shape invariants after
//! deserializing, since a hand-edited table can easily disagree with itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use eval::{Token, Tokenizer, UNKNOWN_TOKEN};

pub mod eval;

/// A dense lexer transition table: rows are states, columns follow the
/// alphabet order, `-1` means the automaton halts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexerDefinition {
    pub alphabet: Vec<char>,
    pub start_state: usize,
    pub transitions: Vec<Vec<i32>>,
    pub is_final: Vec<bool>,
    pub token_type_names: Vec<Option<String>>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("malformed JSON: {0}")]
    Json(String),
    #[error("table has {transitions} transition rows, {finals} final flags and {names} token names")]
    LengthMismatch {
        transitions: usize,
        finals: usize,
        names: usize,
    },
    #[error("state {state} has {width} transition entries, expected {expected}")]
    WrongRowWidth {
        state: usize,
        width: usize,
        expected: usize,
    },
    #[error("start state {0} is out of range")]
    StartOutOfRange(usize),
    #[error("state {state} transitions to {target}, which is out of range")]
    TargetOutOfRange { state: usize, target: i32 },
    #[error("state {0} is final but has no token name")]
    MissingTokenName(usize),
}

impl LexerDefinition {
    /// Parses a definition from its JSON form and validates its shape
    pub fn from_json(input: &str) -> Result<LexerDefinition, DefinitionError> {
        let definition: LexerDefinition =
            serde_json::from_str(input).map_err(|e| DefinitionError::Json(e.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    /// Serializes this definition to its JSON form
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("a definition always serializes")
    }

    /// Checks the shape invariants: parallel arrays agree on the state count,
    /// every row spans the alphabet, and every transition target as well as
    /// the start state indexes an existing state
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let states = self.transitions.len();
        if self.is_final.len() != states || self.token_type_names.len() != states {
            return Err(DefinitionError::LengthMismatch {
                transitions: states,
                finals: self.is_final.len(),
                names: self.token_type_names.len(),
            });
        }
        for (state, row) in self.transitions.iter().enumerate() {
            if row.len() != self.alphabet.len() {
                return Err(DefinitionError::WrongRowWidth {
                    state,
                    width: row.len(),
                    expected: self.alphabet.len(),
                });
            }
            for &target in row {
                if target < -1 || target >= states as i32 {
                    return Err(DefinitionError::TargetOutOfRange { state, target });
                }
            }
        }
        if self.start_state >= states {
            return Err(DefinitionError::StartOutOfRange(self.start_state));
        }
        for state in 0..states {
            if self.is_final[state] && self.token_type_names[state].is_none() {
                return Err(DefinitionError::MissingTokenName(state));
            }
        }
        Ok(())
    }

    /// Gets a tokenizer over the given input, which yields tokens by maximal
    /// munch until the input is exhausted
    pub fn tokenize<'a>(&'a self, input: &'a str) -> Tokenizer<'a> {
        Tokenizer::new(self, input)
    }

    /// The number of states in this table
    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }
}
