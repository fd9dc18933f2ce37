use crate::{GrammarArgs, ParselyArgs};
use parsely::grammar::{Grammar, GrammarParseError};
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error<'a> {
    #[error("Error reading grammar file: {0}")]
    InputFile(#[from] io::Error),
    #[error("Error parsing grammar: {0}")]
    GrammarParse(nom::error::Error<&'a str>),
    #[error("Error validating grammar: {0}")]
    Grammar(GrammarParseError<'a>),
}

pub fn run(main_args: &ParselyArgs, args: &GrammarArgs) -> Result<(), String> {
    let file = fs::read_to_string(&args.grammar).map_err(|e| Error::InputFile(e).to_string())?;
    do_run(main_args, &file).map_err(|e| e.to_string())
}

fn do_run<'a>(main_args: &ParselyArgs, file: &'a str) -> Result<(), Error<'a>> {
    let grammar = parse_grammar(file)?;

    if !main_args.quiet {
        for inferred in grammar.inferred_terminals() {
            eprintln!("warning: treating undeclared symbol '{inferred}' as a terminal");
        }
    }

    let first = grammar.first_sets();
    let follow = grammar.follow_sets(&first);

    println!("start symbol: {}", grammar.start());
    println!();
    for (name, set) in first.iter() {
        let mut entries: Vec<String> = set.terminals().map(str::to_string).collect();
        if set.is_nullable() {
            entries.push("ε".to_string());
        }
        println!("FIRST({name}) = {{ {} }}", entries.join(", "));
    }
    println!();
    for (name, set) in follow.iter() {
        let mut entries: Vec<String> = set.terminals().map(str::to_string).collect();
        if set.has_endmarker() {
            entries.push("$".to_string());
        }
        println!("FOLLOW({name}) = {{ {} }}", entries.join(", "));
    }
    Ok(())
}

pub(crate) fn parse_grammar(file: &str) -> Result<Grammar, Error<'_>> {
    parsely::parser::grammar(file)
        .map_err(Error::GrammarParse)?
        .try_into()
        .map_err(Error::Grammar)
}
