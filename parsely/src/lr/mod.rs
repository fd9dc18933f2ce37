//! # Canonical LR(1) collection
//! Items, CLOSURE, GOTO and the canonical collection of LR(1) item sets. The
//! grammar is augmented with a fresh start symbol `S'` and the production
//! `S' -> S` so that acceptance is a single unambiguous item; state 0 is
//! CLOSURE of `[S' -> •S, $]`. States live in an arena, carry their GOTO
//! transitions as a map from grammar symbols to state indices, and are
//! deduplicated by item-set equality. The worklist is FIFO, so state indices
//! follow breadth-first discovery order.
//!
//! The collection itself is rarely the end product; it is the input of the
//! LALR(1) merge in [lalr].
//!
//! ```
//! use parsely::grammar::Grammar;
//! use parsely::lr::Lr1Automaton;
//!
//! let grammar: Grammar = parsely::parser::grammar("S -> a S | b")
//!     .unwrap()
//!     .try_into()
//!     .unwrap();
//! let automaton = Lr1Automaton::construct(&grammar);
//! let table = automaton.lalr_table();
//! assert!(table.conflicts().is_empty());
//! assert!(table.accepts(&["a", "a", "b"]));
//! ```

use crate::grammar::analysis::FirstSets;
use crate::grammar::{Grammar, Lookahead, Production, Symbol};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

pub use lalr::{Action, LalrTable, TableConflict};

pub mod eval;
pub mod lalr;

/// An LR(1) item: a production with a dot position and a single lookahead.
/// The production is an index into the automaton's production arena.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item {
    pub(crate) production: usize,
    pub(crate) dot: usize,
    pub(crate) lookahead: Lookahead,
}

impl Item {
    pub fn production_index(&self) -> usize {
        self.production
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    pub fn lookahead(&self) -> &Lookahead {
        &self.lookahead
    }
}

/// A state of the canonical collection: an item set and its outgoing GOTO
/// transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lr1State {
    pub(crate) items: BTreeSet<Item>,
    pub(crate) transitions: BTreeMap<Symbol, usize>,
}

impl Lr1State {
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn transitions(&self) -> &BTreeMap<Symbol, usize> {
        &self.transitions
    }

    /// The kernel of this state: its (production, dot) pairs with the
    /// lookaheads dropped
    pub fn kernel(&self) -> BTreeSet<(usize, usize)> {
        self.items
            .iter()
            .map(|item| (item.production, item.dot))
            .collect()
    }
}

/// The canonical collection of LR(1) states for an augmented grammar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lr1Automaton {
    pub(crate) productions: Vec<Production>,
    pub(crate) augmented: usize,
    pub(crate) states: Vec<Lr1State>,
}

impl Lr1Automaton {
    /// Builds the canonical collection, computing the FIRST sets on the way
    pub fn construct(grammar: &Grammar) -> Self {
        let first = grammar.first_sets();
        Self::construct_from(grammar, &first)
    }

    /// Builds the canonical collection from precomputed FIRST sets
    pub fn construct_from(grammar: &Grammar, first: &FirstSets) -> Self {
        // Augment with a fresh start symbol, priming the name until unused
        let mut fresh = format!("{}'", grammar.start);
        while grammar.nonterminals.iter().any(|n| **n == *fresh)
            || grammar.terminals.iter().any(|t| **t == *fresh)
        {
            fresh.push('\'');
        }
        let fresh: Rc<str> = Rc::from(fresh.as_str());

        let mut productions = grammar.productions.clone();
        let augmented = productions.len();
        productions.push(Production {
            lhs: fresh,
            rhs: vec![Symbol::Nonterminal(grammar.start.clone())],
        });

        let mut by_lhs: HashMap<Rc<str>, Vec<usize>> = HashMap::new();
        for (index, production) in productions.iter().enumerate() {
            by_lhs.entry(production.lhs.clone()).or_default().push(index);
        }

        // GOTO is probed for every grammar symbol, terminals first; the
        // fresh start symbol never occurs on a right-hand side, so it is
        // not a candidate
        let symbols: Vec<Symbol> = grammar
            .terminals
            .iter()
            .cloned()
            .map(Symbol::Terminal)
            .chain(grammar.nonterminals.iter().cloned().map(Symbol::Nonterminal))
            .collect();

        let initial = closure(
            BTreeSet::from([Item {
                production: augmented,
                dot: 0,
                lookahead: Lookahead::End,
            }]),
            &productions,
            &by_lhs,
            first,
        );

        let mut states = vec![Lr1State {
            items: initial.clone(),
            transitions: BTreeMap::new(),
        }];
        let mut index: HashMap<BTreeSet<Item>, usize> = HashMap::from([(initial, 0)]);
        let mut worklist = VecDeque::from([0usize]);

        while let Some(current) = worklist.pop_front() {
            let items = states[current].items.clone();
            for symbol in &symbols {
                let target_items = goto(&items, symbol, &productions, &by_lhs, first);
                if target_items.is_empty() {
                    continue;
                }
                let target = match index.get(&target_items) {
                    Some(&existing) => existing,
                    None => {
                        let new = states.len();
                        states.push(Lr1State {
                            items: target_items.clone(),
                            transitions: BTreeMap::new(),
                        });
                        index.insert(target_items, new);
                        worklist.push_back(new);
                        new
                    }
                };
                states[current].transitions.insert(symbol.clone(), target);
            }
        }

        Lr1Automaton {
            productions,
            augmented,
            states,
        }
    }

    /// Merges this collection into an LALR(1) table
    pub fn lalr_table(&self) -> LalrTable {
        LalrTable::construct(self)
    }

    /// Gets the states of the collection, state 0 being the initial state
    pub fn states(&self) -> &[Lr1State] {
        self.states.as_slice()
    }

    /// Gets the productions, the augmented `S' -> S` production last
    pub fn productions(&self) -> &[Production] {
        self.productions.as_slice()
    }

    /// The index of the augmented production
    pub fn augmented_production(&self) -> usize {
        self.augmented
    }
}

/// CLOSURE(I): for every `[A -> α • B β, a]` with B a non-terminal and every
/// production `B -> γ`, add `[B -> •γ, b]` for each terminal b in FIRST(βa),
/// to fixpoint
fn closure(
    mut items: BTreeSet<Item>,
    productions: &[Production],
    by_lhs: &HashMap<Rc<str>, Vec<usize>>,
    first: &FirstSets,
) -> BTreeSet<Item> {
    let mut changed = true;
    while changed {
        changed = false;
        let mut added = Vec::new();
        for item in &items {
            let production = &productions[item.production];
            let Some(Symbol::Nonterminal(next)) = production.rhs.get(item.dot) else {
                continue;
            };

            let beta = first.of_sequence(&production.rhs[item.dot + 1..]);
            let mut lookaheads: Vec<Lookahead> = beta
                .terminals
                .iter()
                .cloned()
                .map(Lookahead::Terminal)
                .collect();
            if beta.nullable {
                lookaheads.push(item.lookahead.clone());
            }

            if let Some(candidates) = by_lhs.get(next) {
                for &candidate in candidates {
                    for lookahead in &lookaheads {
                        added.push(Item {
                            production: candidate,
                            dot: 0,
                            lookahead: lookahead.clone(),
                        });
                    }
                }
            }
        }
        for item in added {
            if items.insert(item) {
                changed = true;
            }
        }
    }
    items
}

/// GOTO(I, X): advance the dot over X in every item that allows it, then
/// close the result
fn goto(
    items: &BTreeSet<Item>,
    symbol: &Symbol,
    productions: &[Production],
    by_lhs: &HashMap<Rc<str>, Vec<usize>>,
    first: &FirstSets,
) -> BTreeSet<Item> {
    let advanced: BTreeSet<Item> = items
        .iter()
        .filter(|item| productions[item.production].rhs.get(item.dot) == Some(symbol))
        .map(|item| Item {
            production: item.production,
            dot: item.dot + 1,
            lookahead: item.lookahead.clone(),
        })
        .collect();
    if advanced.is_empty() {
        advanced
    } else {
        closure(advanced, productions, by_lhs, first)
    }
}
