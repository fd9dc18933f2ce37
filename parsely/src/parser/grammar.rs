use crate::parser::{ParsedGrammar, ParsedProduction};
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_till1};
use nom::character::complete::{line_ending, not_line_ending, space0, space1};
use nom::combinator::{eof, map, opt, recognize, value, verify};
use nom::multi::{many0, many1, separated_list0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

pub(crate) fn full_grammar(input: &str) -> IResult<&str, ParsedGrammar> {
    map(
        delimited(
            many0(space_comment_line),
            tuple((
                opt(terminated(symbols("Nonterminals:"), many1(space_comment_line))),
                opt(terminated(symbols("Terminals:"), many1(space_comment_line))),
                opt(terminated(symbol("Start:"), many1(space_comment_line))),
                separated_list1(many1(space_comment_line), production),
            )),
            many0(space_comment_line),
        ),
        |(nonterminals, terminals, start, productions)| ParsedGrammar {
            nonterminals,
            terminals,
            start,
            productions,
        },
    )(input)
}

fn symbols(prompt: &str) -> impl Fn(&str) -> IResult<&str, Vec<&str>> + '_ {
    move |input: &str| {
        preceded(
            delimited(space0, tag_no_case(prompt), space1),
            separated_list0(space1, symbol_name),
        )(input)
    }
}

fn symbol(prompt: &str) -> impl Fn(&str) -> IResult<&str, &str> + '_ {
    move |input: &str| {
        preceded(
            delimited(space0, tag_no_case(prompt), space1),
            symbol_name,
        )(input)
    }
}

fn production(input: &str) -> IResult<&str, ParsedProduction> {
    map(
        preceded(
            space0,
            pair(
                terminated(symbol_name, delimited(space1, arrow, space1)),
                separated_list1(
                    delimited(space0, pipe, space0),
                    separated_list0(space1, symbol_name),
                ),
            ),
        ),
        |(name, alternatives)| ParsedProduction { name, alternatives },
    )(input)
}

fn symbol_name(input: &str) -> IResult<&str, &str> {
    verify(
        take_till1(|c: char| c.is_whitespace() || "#".contains(c)),
        |elem| !["|", "→", "->"].contains(&elem),
    )(input)
}

fn arrow(input: &str) -> IResult<&str, ()> {
    map(alt((tag("->"), tag("→"))), |_| ())(input)
}

fn pipe(input: &str) -> IResult<&str, ()> {
    map(tag("|"), |_| ())(input)
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
    fn parses_headerless_grammar() {
        let input = "
        # a tiny right-linear grammar
        S -> a S | b
        ";
        let (_, parsed) = full_grammar(input).unwrap();
        assert!(parsed.nonterminals.is_none());
        assert!(parsed.start.is_none());
        assert_eq!(parsed.productions.len(), 1);
        assert_eq!(parsed.productions[0].name, "S");
        assert_eq!(
            parsed.productions[0].alternatives,
            vec![vec!["a", "S"], vec!["b"]]
        );
    }

    #[test]
    fn parses_headers() {
        let input = "
        Nonterminals: S A
        Terminals: a b
        Start: S
        S -> a A
        A -> b | ε
        ";
        let (_, parsed) = full_grammar(input).unwrap();
        assert_eq!(parsed.nonterminals, Some(vec!["S", "A"]));
        assert_eq!(parsed.terminals, Some(vec!["a", "b"]));
        assert_eq!(parsed.start, Some("S"));
        assert_eq!(parsed.productions.len(), 2);
        assert_eq!(parsed.productions[1].alternatives, vec![vec!["b"], vec!["ε"]]);
    }

    #[test]
    fn unicode_arrow_is_accepted() {
        let (_, parsed) = full_grammar("S → a").unwrap();
        assert_eq!(parsed.productions[0].alternatives, vec![vec!["a"]]);
    }
}
