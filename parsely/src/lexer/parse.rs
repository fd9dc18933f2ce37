use crate::lexer::{LexerRules, TokenRule};
use crate::parser::{ParsedRule, ParsedRules};
use crate::regex::Regex;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesParseError<'a> {
    #[error("no token rules defined")]
    NoRules,
    #[error("rule {0} has an empty pattern")]
    EmptyPattern(usize),
    #[error("the rule for pattern '{0}' has an empty token name")]
    EmptyTokenName(&'a str),
}

impl<'a> TryFrom<ParsedRules<'a>> for LexerRules {
    type Error = RulesParseError<'a>;

    fn try_from(value: ParsedRules<'a>) -> Result<Self, Self::Error> {
        use RulesParseError::*;
        if value.rules.is_empty() {
            return Err(NoRules);
        }

        let rules = value
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, ParsedRule { pattern, token })| {
                if pattern.is_empty() {
                    return Err(EmptyPattern(index));
                }
                if token.is_empty() {
                    return Err(EmptyTokenName(pattern));
                }
                Ok(TokenRule {
                    pattern: Rc::from(pattern),
                    regex: Regex::parse(pattern),
                    token: Rc::from(token),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LexerRules { rules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn reads_rules_in_order() {
        let source = "
        # a comment
        (a|b)*c+;ABC

        d(e|f)g*;DEFG
        ";
        let rules: LexerRules = parser::rules(source).unwrap().try_into().unwrap();
        assert_eq!(rules.rules().len(), 2);
        assert_eq!(rules.rules()[0].token(), "ABC");
        assert_eq!(rules.rules()[0].pattern(), "(a|b)*c+");
        assert_eq!(rules.rules()[1].token(), "DEFG");
    }

    #[test]
    fn splits_on_the_first_semicolon() {
        let source = "ab;X;Y";
        let rules: LexerRules = parser::rules(source).unwrap().try_into().unwrap();
        assert_eq!(rules.rules()[0].pattern(), "ab");
        assert_eq!(rules.rules()[0].token(), "X;Y");
    }

    #[test]
    fn rejects_empty_file() {
        let parsed = parser::rules("# only a comment\n").unwrap();
        let result: Result<LexerRules, _> = parsed.try_into();
        assert_eq!(result.unwrap_err(), RulesParseError::NoRules);
    }

    #[test]
    fn rejects_missing_token_name() {
        let parsed = parser::rules("abc;   ").unwrap();
        let result: Result<LexerRules, _> = parsed.try_into();
        assert_eq!(result.unwrap_err(), RulesParseError::EmptyTokenName("abc"));
    }
}
