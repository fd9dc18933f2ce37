//! # FIRST and FOLLOW sets
//! The static analysis both table builders are based on. FIRST(A) is the set
//! of terminals that can begin a string derived from A, with a `nullable`
//! flag standing in for ε-membership; FOLLOW(A) is the set of terminals that
//! can appear immediately after A in a sentential form, with an `endmarker`
//! flag standing in for `$`. Both are computed by full-scan fixed-point
//! iteration, which converges because the sets only ever grow.
//!
//! ```
//! use parsely::grammar::Grammar;
//!
//! let grammar: Grammar = parsely::parser::grammar("S -> a S | b")
//!     .unwrap()
//!     .try_into()
//!     .unwrap();
//! let first = grammar.first_sets();
//! let s = first.get("S").unwrap();
//! assert!(s.contains("a") && s.contains("b") && !s.is_nullable());
//!
//! let follow = grammar.follow_sets(&first);
//! let s = follow.get("S").unwrap();
//! assert!(s.terminals().next().is_none() && s.has_endmarker());
//! ```

use crate::grammar::{Grammar, Symbol};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// The FIRST set of a non-terminal or symbol sequence: the terminals a
/// derivation can begin with, plus whether the whole thing can derive ε
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirstSet {
    pub(crate) terminals: BTreeSet<Rc<str>>,
    pub(crate) nullable: bool,
}

impl FirstSet {
    pub fn terminals(&self) -> impl Iterator<Item = &str> {
        self.terminals.iter().map(|t| &**t)
    }

    pub fn contains(&self, terminal: &str) -> bool {
        self.terminals.contains(terminal)
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// The FOLLOW set of a non-terminal: the terminals that can appear right
/// after it, plus whether the end of input can
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FollowSet {
    pub(crate) terminals: BTreeSet<Rc<str>>,
    pub(crate) endmarker: bool,
}

impl FollowSet {
    pub fn terminals(&self) -> impl Iterator<Item = &str> {
        self.terminals.iter().map(|t| &**t)
    }

    pub fn contains(&self, terminal: &str) -> bool {
        self.terminals.contains(terminal)
    }

    pub fn has_endmarker(&self) -> bool {
        self.endmarker
    }
}

/// The FIRST sets of every non-terminal of a grammar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirstSets {
    pub(crate) sets: BTreeMap<Rc<str>, FirstSet>,
}

impl FirstSets {
    /// Gets the FIRST set of a non-terminal
    pub fn get(&self, nonterminal: &str) -> Option<&FirstSet> {
        self.sets.get(nonterminal)
    }

    /// FIRST of a symbol sequence: the union of the FIRST sets along the
    /// longest nullable prefix, plus the first non-nullable symbol's set;
    /// nullable iff every symbol of the sequence is
    pub fn of_sequence(&self, sequence: &[Symbol]) -> FirstSet {
        let mut first = FirstSet {
            terminals: BTreeSet::new(),
            nullable: true,
        };
        for symbol in sequence {
            match symbol {
                Symbol::Terminal(name) => {
                    first.terminals.insert(name.clone());
                    first.nullable = false;
                    break;
                }
                Symbol::Nonterminal(name) => {
                    let set = self
                        .sets
                        .get(name)
                        .expect("every nonterminal has a FIRST set");
                    first.terminals.extend(set.terminals.iter().cloned());
                    if !set.nullable {
                        first.nullable = false;
                        break;
                    }
                }
            }
        }
        first
    }

    /// Iterates over the (non-terminal, FIRST set) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FirstSet)> {
        self.sets.iter().map(|(name, set)| (&**name, set))
    }
}

/// The FOLLOW sets of every non-terminal of a grammar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowSets {
    pub(crate) sets: BTreeMap<Rc<str>, FollowSet>,
}

impl FollowSets {
    /// Gets the FOLLOW set of a non-terminal
    pub fn get(&self, nonterminal: &str) -> Option<&FollowSet> {
        self.sets.get(nonterminal)
    }

    /// Iterates over the (non-terminal, FOLLOW set) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FollowSet)> {
        self.sets.iter().map(|(name, set)| (&**name, set))
    }
}

fn extend_tracked(target: &mut BTreeSet<Rc<str>>, source: &BTreeSet<Rc<str>>) -> bool {
    let before = target.len();
    target.extend(source.iter().cloned());
    target.len() != before
}

impl Grammar {
    /// Computes the FIRST set of every non-terminal by iterating over the
    /// productions until nothing changes
    pub fn first_sets(&self) -> FirstSets {
        let mut sets: BTreeMap<Rc<str>, FirstSet> = self
            .nonterminals
            .iter()
            .map(|name| (name.clone(), FirstSet::default()))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                let mut nullable_so_far = true;
                let mut gathered = BTreeSet::new();
                for symbol in &production.rhs {
                    match symbol {
                        Symbol::Terminal(name) => {
                            gathered.insert(name.clone());
                            nullable_so_far = false;
                            break;
                        }
                        Symbol::Nonterminal(name) => {
                            let source = &sets[name];
                            gathered.extend(source.terminals.iter().cloned());
                            if !source.nullable {
                                nullable_so_far = false;
                                break;
                            }
                        }
                    }
                }

                let target = sets
                    .get_mut(&production.lhs)
                    .expect("every LHS is a nonterminal");
                if extend_tracked(&mut target.terminals, &gathered) {
                    changed = true;
                }
                if nullable_so_far && !target.nullable {
                    target.nullable = true;
                    changed = true;
                }
            }
        }
        FirstSets { sets }
    }

    /// Computes the FOLLOW set of every non-terminal. FOLLOW(start) gets the
    /// endmarker; for every occurrence `B -> α X β`, FOLLOW(X) gets
    /// FIRST(β) \ {ε}, and FOLLOW(B) too when β can vanish.
    pub fn follow_sets(&self, first: &FirstSets) -> FollowSets {
        let mut sets: BTreeMap<Rc<str>, FollowSet> = self
            .nonterminals
            .iter()
            .map(|name| (name.clone(), FollowSet::default()))
            .collect();
        if let Some(start) = sets.get_mut(&self.start) {
            start.endmarker = true;
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                for (index, symbol) in production.rhs.iter().enumerate() {
                    let Symbol::Nonterminal(name) = symbol else {
                        continue;
                    };
                    let beta = first.of_sequence(&production.rhs[index + 1..]);

                    // Reading FOLLOW(B) while writing FOLLOW(X) needs a
                    // snapshot, since B and X may be the same symbol
                    let lhs_follow = if beta.nullable {
                        Some(sets[&production.lhs].clone())
                    } else {
                        None
                    };

                    let target = sets.get_mut(name).expect("RHS nonterminals are declared");
                    if extend_tracked(&mut target.terminals, &beta.terminals) {
                        changed = true;
                    }
                    if let Some(lhs_follow) = lhs_follow {
                        if extend_tracked(&mut target.terminals, &lhs_follow.terminals) {
                            changed = true;
                        }
                        if lhs_follow.endmarker && !target.endmarker {
                            target.endmarker = true;
                            changed = true;
                        }
                    }
                }
            }
        }
        FollowSets { sets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::parser;

    fn grammar(input: &str) -> Grammar {
        parser::grammar(input).unwrap().try_into().unwrap()
    }

    fn first_of(sets: &FirstSets, name: &str) -> (Vec<String>, bool) {
        let set = sets.get(name).unwrap();
        (
            set.terminals().map(str::to_string).collect(),
            set.is_nullable(),
        )
    }

    fn follow_of(sets: &FollowSets, name: &str) -> (Vec<String>, bool) {
        let set = sets.get(name).unwrap();
        (
            set.terminals().map(str::to_string).collect(),
            set.has_endmarker(),
        )
    }

    #[test]
    fn right_linear_grammar() {
        let grammar = grammar("S -> a S | b");
        let first = grammar.first_sets();
        assert_eq!(first_of(&first, "S"), (vec!["a".into(), "b".into()], false));
        let follow = grammar.follow_sets(&first);
        assert_eq!(follow_of(&follow, "S"), (vec![], true));
    }

    #[test]
    fn nullable_chain() {
        let grammar = grammar("S -> A B c\nA -> a | ε\nB -> b | ε");
        let first = grammar.first_sets();
        assert_eq!(
            first_of(&first, "S"),
            (vec!["a".into(), "b".into(), "c".into()], false)
        );
        assert_eq!(first_of(&first, "A"), (vec!["a".into()], true));
        let follow = grammar.follow_sets(&first);
        // B can vanish, so both b and c follow A
        assert_eq!(follow_of(&follow, "A"), (vec!["b".into(), "c".into()], false));
        assert_eq!(follow_of(&follow, "B"), (vec!["c".into()], false));
    }

    #[test]
    fn ll_expression_grammar() {
        let grammar = grammar(
            "E -> T E'\nE' -> + T E' | ε\nT -> F T'\nT' -> * F T' | ε\nF -> ( E ) | id",
        );
        let first = grammar.first_sets();
        assert_eq!(
            first_of(&first, "E"),
            (vec!["(".into(), "id".into()], false)
        );
        assert_eq!(first_of(&first, "E'"), (vec!["+".into()], true));
        let follow = grammar.follow_sets(&first);
        assert_eq!(follow_of(&follow, "E"), (vec![")".into()], true));
        assert_eq!(follow_of(&follow, "E'"), (vec![")".into()], true));
        assert_eq!(
            follow_of(&follow, "T"),
            (vec![")".into(), "+".into()], true)
        );
    }

    #[test]
    fn first_of_sequence_walks_nullable_prefix() {
        let grammar = grammar("S -> A B c\nA -> a | ε\nB -> b | ε");
        let first = grammar.first_sets();
        let rhs = grammar.productions()[0].rhs();
        let sequence = first.of_sequence(rhs);
        assert!(sequence.contains("a") && sequence.contains("b") && sequence.contains("c"));
        assert!(!sequence.is_nullable());
        assert!(first.of_sequence(&rhs[..2]).is_nullable());
        assert!(first.of_sequence(&[]).is_nullable());
    }
}
