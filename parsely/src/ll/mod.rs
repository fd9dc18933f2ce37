//! # LL(1) table construction
//! Builds the single-lookahead predictive parsing table from the FIRST and
//! FOLLOW sets. Each production `A -> α` claims the cell `M[A, a]` for every
//! terminal `a` in FIRST(α), and, when α can vanish, for everything in
//! FOLLOW(A). Claiming an occupied cell is an [Ll1Conflict] and rejects the
//! grammar: unlike the LALR builder, there is no useful way to continue past
//! an LL(1) conflict.
//!
//! ```
//! use parsely::grammar::Grammar;
//!
//! let grammar: Grammar = parsely::parser::grammar("S -> a S | b")
//!     .unwrap()
//!     .try_into()
//!     .unwrap();
//! let table = grammar.ll1_table().unwrap();
//! assert!(table.accepts(&["a", "a", "b"]));
//! assert!(!table.accepts(&["a"]));
//! ```

use crate::grammar::analysis::{FirstSets, FollowSets};
use crate::grammar::{Grammar, Lookahead, Production};
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

pub use eval::LlParseError;

pub mod eval;

/// Two productions claimed the same table cell; the grammar is not LL(1)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("LL(1) conflict at ({nonterminal}, {lookahead}): both '{first}' and '{second}' apply")]
pub struct Ll1Conflict {
    pub nonterminal: Rc<str>,
    pub lookahead: Lookahead,
    pub first: Production,
    pub second: Production,
}

/// An LL(1) predictive parsing table: a sparse map from (non-terminal,
/// lookahead) to the production to expand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ll1Table {
    pub(crate) start: Rc<str>,
    pub(crate) productions: Vec<Production>,
    pub(crate) entries: BTreeMap<(Rc<str>, Lookahead), usize>,
}

impl Ll1Table {
    /// Looks up the production to expand for a non-terminal under a
    /// lookahead
    pub fn get(&self, nonterminal: &str, lookahead: &Lookahead) -> Option<&Production> {
        self.entries
            .get(&(Rc::from(nonterminal), lookahead.clone()))
            .map(|&index| &self.productions[index])
    }

    /// The number of filled cells
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Grammar {
    /// Builds the LL(1) table, computing FIRST and FOLLOW on the way
    pub fn ll1_table(&self) -> Result<Ll1Table, Ll1Conflict> {
        let first = self.first_sets();
        let follow = self.follow_sets(&first);
        self.ll1_table_from(&first, &follow)
    }

    /// Builds the LL(1) table from precomputed FIRST and FOLLOW sets
    pub fn ll1_table_from(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> Result<Ll1Table, Ll1Conflict> {
        let mut entries: BTreeMap<(Rc<str>, Lookahead), usize> = BTreeMap::new();

        let claim = |entries: &mut BTreeMap<(Rc<str>, Lookahead), usize>,
                         lookahead: Lookahead,
                         index: usize|
         -> Result<(), Ll1Conflict> {
            let production = &self.productions[index];
            let key = (production.lhs.clone(), lookahead);
            if let Some(&previous) = entries.get(&key) {
                if previous != index {
                    return Err(Ll1Conflict {
                        nonterminal: key.0,
                        lookahead: key.1,
                        first: self.productions[previous].clone(),
                        second: production.clone(),
                    });
                }
            } else {
                entries.insert(key, index);
            }
            Ok(())
        };

        for (index, production) in self.productions.iter().enumerate() {
            let head = first.of_sequence(&production.rhs);
            for terminal in &head.terminals {
                claim(&mut entries, Lookahead::Terminal(terminal.clone()), index)?;
            }
            if head.nullable {
                let lhs_follow = follow
                    .get(&production.lhs)
                    .expect("every nonterminal has a FOLLOW set");
                for terminal in &lhs_follow.terminals {
                    claim(&mut entries, Lookahead::Terminal(terminal.clone()), index)?;
                }
                if lhs_follow.endmarker {
                    claim(&mut entries, Lookahead::End, index)?;
                }
            }
        }

        Ok(Ll1Table {
            start: self.start.clone(),
            productions: self.productions.clone(),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn grammar(input: &str) -> Grammar {
        parser::grammar(input).unwrap().try_into().unwrap()
    }

    #[test]
    fn builds_the_right_cells() {
        let table = grammar("S -> a S | b").ll1_table().unwrap();
        assert_eq!(table.entry_count(), 2);
        assert_eq!(
            table
                .get("S", &Lookahead::Terminal("a".into()))
                .unwrap()
                .to_string(),
            "S -> a S"
        );
        assert_eq!(
            table
                .get("S", &Lookahead::Terminal("b".into()))
                .unwrap()
                .to_string(),
            "S -> b"
        );
        assert!(table.get("S", &Lookahead::End).is_none());
    }

    #[test]
    fn common_prefix_is_a_conflict() {
        let conflict = grammar("S -> a b | a c").ll1_table().unwrap_err();
        assert_eq!(&*conflict.nonterminal, "S");
        assert_eq!(conflict.lookahead, Lookahead::Terminal("a".into()));
    }

    #[test]
    fn left_recursion_is_a_conflict() {
        assert!(grammar("E -> E + a | a").ll1_table().is_err());
    }

    #[test]
    fn nullable_production_claims_follow_cells() {
        let table = grammar("S -> A b\nA -> a | ε").ll1_table().unwrap();
        // On lookahead b, A must expand to ε
        let production = table.get("A", &Lookahead::Terminal("b".into())).unwrap();
        assert!(production.is_empty());
    }
}
