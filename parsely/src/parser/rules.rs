use crate::parser::{ParsedRule, ParsedRules};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{char, line_ending, not_line_ending, space0};
use nom::combinator::{eof, map, opt, recognize, value, verify};
use nom::multi::{many0, many1, separated_list0};
use nom::sequence::{delimited, pair, preceded, separated_pair, terminated};
use nom::IResult;

pub(crate) fn full_rules(input: &str) -> IResult<&str, ParsedRules> {
    map(
        delimited(
            many0(space_comment_line),
            separated_list0(many1(space_comment_line), rule),
            many0(space_comment_line),
        ),
        |rules| ParsedRules { rules },
    )(input)
}

fn rule(input: &str) -> IResult<&str, ParsedRule> {
    map(
        preceded(
            space0,
            separated_pair(
                take_till1(|c| c == ';' || c == '\n' || c == '\r'),
                char(';'),
                not_line_ending,
            ),
        ),
        |(pattern, token): (&str, &str)| ParsedRule {
            pattern: pattern.trim(),
            token: token.trim(),
        },
    )(input)
}

fn space_comment_line(input: &str) -> IResult<&str, ()> {
    // We need to allow a space-only or comment-only line to end with either
    // a line ending or eof, but we need to consume *something* otherwise
    // many0(space_comment_line) will be in an endless loop at eof
    value(
        (),
        verify(
            recognize(terminated(space_comment, alt((line_ending, eof)))),
            |consumed: &str| !consumed.is_empty(),
        ),
    )(input)
}

fn space_comment(input: &str) -> IResult<&str, ()> {
    value((), pair(space0, opt(comment)))(input)
}

fn comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("#"), not_line_ending))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules_with_comments_and_blanks() {
        let input = "
        # tokens for the toy language
        (a|b)*c+;ABC

        d(e|f)g*;DEFG  # trailing rules win ties
        ";
        let (_, parsed) = full_rules(input).unwrap();
        // The '#' on the rule line belongs to the token name; comments are
        // only recognized on their own lines
        assert_eq!(parsed.rules.len(), 2);
        assert_eq!(parsed.rules[0].pattern, "(a|b)*c+");
        assert_eq!(parsed.rules[0].token, "ABC");
        assert_eq!(parsed.rules[1].token, "DEFG  # trailing rules win ties");
    }

    #[test]
    fn empty_input_parses_to_no_rules() {
        let (_, parsed) = full_rules("\n  \n# nothing\n").unwrap();
        assert!(parsed.rules.is_empty());
    }
}
