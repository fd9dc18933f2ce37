use crate::{Engine, ParseArgs, ParselyArgs};
use parsely::lr::Lr1Automaton;
use std::fs;

pub fn run(main_args: &ParselyArgs, args: &ParseArgs) -> Result<(), String> {
    let file = fs::read_to_string(&args.grammar).map_err(|e| e.to_string())?;
    let grammar = crate::grammar::parse_grammar(&file).map_err(|e| e.to_string())?;

    let tokens: Option<Vec<&str>> = args
        .tokens
        .as_ref()
        .map(|stream| stream.split_whitespace().collect());

    match args.engine {
        Engine::Ll => {
            let table = grammar.ll1_table().map_err(|e| e.to_string())?;
            if !main_args.quiet {
                eprintln!("LL(1) table with {} entries", table.entry_count());
            }
            if let Some(tokens) = tokens {
                table.parse(&tokens).map_err(|e| e.to_string())?;
                println!("accepted");
            }
        }
        Engine::Lalr => {
            let automaton = Lr1Automaton::construct(&grammar);
            let table = automaton.lalr_table();
            if !main_args.quiet {
                eprintln!(
                    "{} LR(1) states merged into {} LALR(1) states",
                    automaton.states().len(),
                    table.state_count()
                );
            }
            for conflict in table.conflicts() {
                eprintln!("warning: {conflict}");
            }
            if let Some(tokens) = tokens {
                table.parse(&tokens).map_err(|e| e.to_string())?;
                println!("accepted");
            }
        }
    }
    Ok(())
}
