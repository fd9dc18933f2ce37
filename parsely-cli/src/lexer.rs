use crate::{LexerArgs, ParselyArgs};
use parsely::lexer::{CompileError, LexerRules, RulesParseError};
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error<'a> {
    #[error("Error reading rules file: {0}")]
    InputFile(#[from] io::Error),
    #[error("Error parsing rules: {0}")]
    RulesParse(nom::error::Error<&'a str>),
    #[error("Error validating rules: {0}")]
    Rules(RulesParseError<'a>),
    #[error("Error compiling rules: {0}")]
    Compile(CompileError),
    #[error("Error writing table: {0}")]
    OutputFile(io::Error),
}

pub fn run(main_args: &ParselyArgs, args: &LexerArgs) -> Result<(), String> {
    let file = fs::read_to_string(&args.rules).map_err(|e| Error::InputFile(e).to_string())?;
    do_run(main_args, args, &file).map_err(|e| e.to_string())
}

fn do_run<'a>(
    main_args: &ParselyArgs,
    args: &LexerArgs,
    file: &'a str,
) -> Result<(), Error<'a>> {
    let rules: LexerRules = parsely::parser::rules(file)
        .map_err(Error::RulesParse)?
        .try_into()
        .map_err(Error::Rules)?;

    let alphabet: Vec<char> = match &args.alphabet {
        Some(chars) => chars.chars().collect(),
        None => rules.alphabet(),
    };

    let table = if args.strict {
        rules.compile_strict(&alphabet)
    } else {
        rules.compile(&alphabet)
    }
    .map_err(Error::Compile)?;

    if !main_args.quiet {
        eprintln!(
            "compiled {} rules over {} characters into {} states",
            rules.rules().len(),
            alphabet.len(),
            table.state_count()
        );
    }

    let json = table.to_json();
    match &args.output {
        Some(path) => fs::write(path, json).map_err(Error::OutputFile)?,
        None => println!("{json}"),
    }
    Ok(())
}
