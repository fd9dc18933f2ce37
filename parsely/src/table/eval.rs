use crate::table::LexerDefinition;
use std::collections::HashMap;

/// The token name given to a single character no rule matches
pub const UNKNOWN_TOKEN: &str = "UNKNOWN";

/// One token produced by the tokenizer: the token-type name, the matched
/// slice of the input and its byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub name: &'a str,
    pub lexeme: &'a str,
    pub start: usize,
    pub end: usize,
}

/// A maximal-munch tokenizer walking a [LexerDefinition] over an input
/// string.
///
/// At each position the automaton is advanced as far as the input allows,
/// remembering the last accepting state it passed; the token of that state is
/// emitted and scanning resumes after its lexeme. If no accepting state was
/// reached at all, a one-character [UNKNOWN_TOKEN] is emitted instead, so
/// tokenization always consumes the entire input. A character outside the
/// alphabet halts the current run just like a missing transition.
///
/// A rule that accepts the empty string never produces empty tokens: a match
/// only counts once at least one character has been consumed.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    definition: &'a LexerDefinition,
    input: &'a str,
    rev_map: HashMap<char, usize>,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(definition: &'a LexerDefinition, input: &'a str) -> Self {
        let rev_map = definition
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, &ch)| (ch, idx))
            .collect();
        Self {
            definition,
            input,
            rev_map,
            pos: 0,
        }
    }

    /// The byte offset the next token will start at
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.input.len() {
            return None;
        }

        let mut state = self.definition.start_state;
        let mut last_accept: Option<(usize, usize)> = None; // (end byte, state)

        for (offset, ch) in self.input[self.pos..].char_indices() {
            let Some(&column) = self.rev_map.get(&ch) else {
                break;
            };
            let next = self.definition.transitions[state][column];
            if next < 0 {
                break;
            }
            state = next as usize;
            if self.definition.is_final[state] {
                last_accept = Some((self.pos + offset + ch.len_utf8(), state));
            }
        }

        let token = match last_accept {
            Some((end, accepting)) => {
                let name = self.definition.token_type_names[accepting]
                    .as_deref()
                    .unwrap_or(UNKNOWN_TOKEN);
                Token {
                    name,
                    lexeme: &self.input[self.pos..end],
                    start: self.pos,
                    end,
                }
            }
            None => {
                let width = self.input[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                let end = self.pos + width;
                Token {
                    name: UNKNOWN_TOKEN,
                    lexeme: &self.input[self.pos..end],
                    start: self.pos,
                    end,
                }
            }
        };
        self.pos = token.end;
        Some(token)
    }
}
