use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

mod grammar;
mod lexer;
mod parse;
mod tokenize;

#[derive(Debug, Parser)]
#[command(
    name = "parsely",
    version,
    about = "Compiler front-end construction toolkit: lexer tables and LL(1)/LALR(1) parsers"
)]
pub struct ParselyArgs {
    /// Suppress informational output
    #[arg(long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a token-definition file into a JSON transition table
    Lexer(LexerArgs),
    /// Tokenize input with a compiled transition table
    Tokenize(TokenizeArgs),
    /// Print the FIRST and FOLLOW sets of a grammar
    Grammar(GrammarArgs),
    /// Build an LL(1) or LALR(1) table and optionally parse a token stream
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
pub struct LexerArgs {
    /// Token-definition file with one regex;TOKEN rule per line
    pub rules: PathBuf,
    /// Use exactly these alphabet characters instead of the ones appearing
    /// in the rules
    #[arg(long)]
    pub alphabet: Option<String>,
    /// Reject rules using literals outside the alphabet
    #[arg(long)]
    pub strict: bool,
    /// Write the JSON table to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TokenizeArgs {
    /// A JSON transition table produced by `parsely lexer`
    pub table: PathBuf,
    /// The text to tokenize; read from the --file argument if absent
    pub input: Option<String>,
    /// Read the text to tokenize from this file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct GrammarArgs {
    /// Grammar file with A -> alpha | beta productions
    pub grammar: PathBuf,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Grammar file with A -> alpha | beta productions
    pub grammar: PathBuf,
    /// Whitespace-separated token stream to parse
    pub tokens: Option<String>,
    /// Which table to build and drive
    #[arg(long, value_enum, default_value_t = Engine::Lalr)]
    pub engine: Engine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    Ll,
    Lalr,
}

fn main() -> ExitCode {
    let args = ParselyArgs::parse();
    let result = match &args.command {
        Command::Lexer(cmd) => lexer::run(&args, cmd),
        Command::Tokenize(cmd) => tokenize::run(&args, cmd),
        Command::Grammar(cmd) => grammar::run(&args, cmd),
        Command::Parse(cmd) => parse::run(&args, cmd),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
