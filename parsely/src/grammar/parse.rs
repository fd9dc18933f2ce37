use crate::grammar::{Grammar, Production, Symbol};
use crate::parser::ParsedGrammar;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarParseError<'a> {
    #[error("'{0}' appears twice in the nonterminal symbols")]
    DuplicateNonterminal(&'a str),
    #[error("'{0}' appears twice in the terminal symbols")]
    DuplicateTerminal(&'a str),
    #[error("'{0}' is declared as both a nonterminal and a terminal symbol")]
    TerminalNonterminal(&'a str),
    #[error("the start symbol '{0}' is not a nonterminal")]
    StartNotNonterminal(&'a str),
    #[error("'{0}' has productions but is not a nonterminal symbol")]
    ProductionsNotNonterminal(&'a str),
    #[error("the grammar has no productions")]
    Empty,
}

impl<'a> TryFrom<ParsedGrammar<'a>> for Grammar {
    type Error = GrammarParseError<'a>;

    fn try_from(value: ParsedGrammar<'a>) -> Result<Self, Self::Error> {
        use GrammarParseError::*;
        let ParsedGrammar {
            nonterminals,
            terminals,
            start,
            productions,
        } = value;

        if productions.is_empty() {
            return Err(Empty);
        }

        let mut names: HashMap<&'a str, Rc<str>> = HashMap::new();
        let mut intern = |name: &'a str| -> Rc<str> {
            names
                .entry(name)
                .or_insert_with(|| Rc::from(name))
                .clone()
        };

        let terminals_declared = terminals.is_some();

        {
            if let Some(list) = &nonterminals {
                let mut set = HashSet::new();
                list.iter()
                    .try_for_each(|n| set.insert(n).then_some(()).ok_or(n))
                    .map_err(|d| DuplicateNonterminal(d))?;
            }
            if let Some(list) = &terminals {
                let mut set = HashSet::new();
                list.iter()
                    .try_for_each(|t| set.insert(t).then_some(()).ok_or(t))
                    .map_err(|d| DuplicateTerminal(d))?;
            }
            if let (Some(nts), Some(ts)) = (&nonterminals, &terminals) {
                let nts: HashSet<_> = nts.iter().collect();
                if let Some(x) = ts.iter().find(|t| nts.contains(t)) {
                    return Err(TerminalNonterminal(x));
                }
            }
        }

        // Nonterminals are either declared or the left-hand sides, in order
        // of first appearance
        let nonterminal_names: Vec<&'a str> = match &nonterminals {
            Some(list) => list.clone(),
            None => {
                let mut seen = HashSet::new();
                productions
                    .iter()
                    .filter(|p| seen.insert(p.name))
                    .map(|p| p.name)
                    .collect()
            }
        };
        let nonterminal_set: HashSet<&'a str> = nonterminal_names.iter().copied().collect();

        if nonterminals.is_some() {
            if let Some(p) = productions.iter().find(|p| !nonterminal_set.contains(p.name)) {
                return Err(ProductionsNotNonterminal(p.name));
            }
        }

        let start_name = match start {
            Some(name) => {
                if !nonterminal_set.contains(name) {
                    return Err(StartNotNonterminal(name));
                }
                name
            }
            None => productions[0].name,
        };

        let declared_terminal_set: HashSet<&'a str> = terminals
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .copied()
            .collect();
        let mut terminal_names: Vec<&'a str> = terminals.clone().unwrap_or_default();
        let mut inferred: Vec<&'a str> = Vec::new();

        // Flatten the alternatives into one production list, classifying
        // each symbol as we go. `ε`/`eps` entries are dropped: an
        // alternative consisting only of them is the empty production.
        let mut flat = Vec::new();
        for parsed in &productions {
            for alternative in &parsed.alternatives {
                let mut rhs = Vec::with_capacity(alternative.len());
                for &symbol in alternative {
                    if symbol == "ε" || symbol == "eps" {
                        continue;
                    }
                    if nonterminal_set.contains(symbol) {
                        rhs.push(Symbol::Nonterminal(intern(symbol)));
                    } else {
                        if !declared_terminal_set.contains(symbol)
                            && !terminal_names.contains(&symbol)
                        {
                            terminal_names.push(symbol);
                            if terminals_declared {
                                inferred.push(symbol);
                            }
                        }
                        rhs.push(Symbol::Terminal(intern(symbol)));
                    }
                }
                flat.push(Production {
                    lhs: intern(parsed.name),
                    rhs,
                });
            }
        }

        Ok(Grammar {
            nonterminals: nonterminal_names.into_iter().map(&mut intern).collect(),
            terminals: terminal_names.into_iter().map(&mut intern).collect(),
            start: intern(start_name),
            productions: flat,
            inferred_terminals: inferred.into_iter().map(&mut intern).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn grammar(input: &str) -> Result<Grammar, String> {
        parser::grammar(input)
            .map_err(|e| e.to_string())?
            .try_into()
            .map_err(|e: GrammarParseError| e.to_string())
    }

    #[test]
    fn headerless_grammar_infers_symbols() {
        let grammar = grammar("S -> a S | b").unwrap();
        assert_eq!(grammar.start(), "S");
        assert_eq!(grammar.nonterminals(), ["S".into()]);
        assert_eq!(grammar.terminals(), ["a".into(), "b".into()]);
        assert!(grammar.inferred_terminals().is_empty());
        assert_eq!(grammar.productions().len(), 2);
        assert_eq!(grammar.productions()[0].to_string(), "S -> a S");
    }

    #[test]
    fn epsilon_alternative_is_an_empty_production() {
        let grammar = grammar("A -> a A | ε").unwrap();
        assert!(grammar.productions()[1].is_empty());
        assert_eq!(grammar.productions()[1].to_string(), "A -> ε");
    }

    #[test]
    fn undeclared_rhs_symbols_are_inferred_terminals() {
        let grammar = grammar(
            "Nonterminals: S\nTerminals: a\nStart: S\nS -> a S | b",
        )
        .unwrap();
        assert_eq!(grammar.inferred_terminals(), ["b".into()]);
        assert_eq!(grammar.terminals(), ["a".into(), "b".into()]);
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        assert!(grammar("Nonterminals: S S\nStart: S\nS -> a")
            .unwrap_err()
            .contains("appears twice"));
        assert!(grammar("Nonterminals: S\nTerminals: a a\nStart: S\nS -> a")
            .unwrap_err()
            .contains("appears twice"));
    }

    #[test]
    fn start_must_be_a_nonterminal() {
        assert!(grammar("Nonterminals: S\nTerminals: a\nStart: a\nS -> a")
            .unwrap_err()
            .contains("not a nonterminal"));
    }

    #[test]
    fn undeclared_lhs_is_rejected_in_declared_mode() {
        assert!(grammar("Nonterminals: S\nStart: S\nS -> a\nB -> a")
            .unwrap_err()
            .contains("not a nonterminal symbol"));
    }
}
