use crate::{ParselyArgs, TokenizeArgs};
use parsely::table::{DefinitionError, LexerDefinition};
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error reading table file: {0}")]
    TableFile(io::Error),
    #[error("Error loading table: {0}")]
    Table(#[from] DefinitionError),
    #[error("Error reading input file: {0}")]
    InputFile(io::Error),
    #[error("No input given; pass it as an argument or with --file")]
    NoInput,
}

pub fn run(_main_args: &ParselyArgs, args: &TokenizeArgs) -> Result<(), String> {
    do_run(args).map_err(|e| e.to_string())
}

fn do_run(args: &TokenizeArgs) -> Result<(), Error> {
    let table_json = fs::read_to_string(&args.table).map_err(Error::TableFile)?;
    let table = LexerDefinition::from_json(&table_json)?;

    let input = match (&args.input, &args.file) {
        (Some(input), _) => input.clone(),
        (None, Some(path)) => fs::read_to_string(path).map_err(Error::InputFile)?,
        (None, None) => return Err(Error::NoInput),
    };

    for token in table.tokenize(&input) {
        println!(
            "{:<12} {:?} [{}..{})",
            token.name, token.lexeme, token.start, token.end
        );
    }
    Ok(())
}
