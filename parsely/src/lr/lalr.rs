//! # LALR(1) merge and table construction
//! LR(1) states sharing a kernel (their (production, dot) pairs, lookaheads
//! dropped) are merged into one LALR state whose items carry the union of
//! the group's lookaheads. GOTO depends only on kernels, so retargeting the
//! LR(1) transitions through the merge map is well-defined; the group of
//! LR(1) state 0 keeps index 0.
//!
//! The ACTION/GOTO fill records conflicts instead of failing: the first
//! writer of a cell wins and every losing write becomes a [TableConflict]
//! diagnostic, classified as shift/reduce or reduce/reduce. Whether a
//! non-empty diagnostic list is fatal is the caller's decision; merging can
//! introduce reduce/reduce conflicts that the canonical collection did not
//! have, and grammars outside LALR(1) are still often useful to inspect.

use crate::grammar::{Lookahead, Production, Symbol};
use crate::lr::{Item, Lr1Automaton};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

/// A parse action: shift to a state, reduce by a production (an index into
/// the table's production list), or accept
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

/// A diagnostic recorded when a second action is written to an occupied
/// ACTION cell. Production and state numbers refer to the finished table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableConflict {
    ShiftReduce {
        state: usize,
        symbol: Lookahead,
        shift: usize,
        reduce: usize,
    },
    ReduceReduce {
        state: usize,
        symbol: Lookahead,
        first: usize,
        second: usize,
    },
}

impl fmt::Display for TableConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableConflict::ShiftReduce {
                state,
                symbol,
                shift,
                reduce,
            } => write!(
                f,
                "shift/reduce conflict in state {state} on {symbol}: shift to {shift} or reduce production {reduce}"
            ),
            TableConflict::ReduceReduce {
                state,
                symbol,
                first,
                second,
            } => write!(
                f,
                "reduce/reduce conflict in state {state} on {symbol}: productions {first} and {second}"
            ),
        }
    }
}

/// A merged LALR(1) state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LalrState {
    pub(crate) items: BTreeSet<Item>,
    pub(crate) transitions: BTreeMap<Symbol, usize>,
}

impl LalrState {
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn transitions(&self) -> &BTreeMap<Symbol, usize> {
        &self.transitions
    }
}

/// An LALR(1) parsing table: per-state ACTION rows keyed by lookahead,
/// per-state GOTO rows keyed by non-terminal, and the conflict diagnostics
/// gathered while filling them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LalrTable {
    pub(crate) productions: Vec<Production>,
    pub(crate) augmented: usize,
    pub(crate) states: Vec<LalrState>,
    pub(crate) actions: Vec<BTreeMap<Lookahead, Action>>,
    pub(crate) gotos: Vec<BTreeMap<Rc<str>, usize>>,
    pub(crate) conflicts: Vec<TableConflict>,
}

impl LalrTable {
    /// Merges a canonical LR(1) collection and fills the ACTION/GOTO table
    pub fn construct(lr1: &Lr1Automaton) -> LalrTable {
        // Group states by kernel; groups are numbered in order of first
        // appearance, which keeps the initial state at index 0
        let mut kernel_index: HashMap<BTreeSet<(usize, usize)>, usize> = HashMap::new();
        let mut lalr_of = Vec::with_capacity(lr1.states.len());
        let mut merged: Vec<LalrState> = Vec::new();

        for state in &lr1.states {
            let index = *kernel_index.entry(state.kernel()).or_insert_with(|| {
                merged.push(LalrState {
                    items: BTreeSet::new(),
                    transitions: BTreeMap::new(),
                });
                merged.len() - 1
            });
            lalr_of.push(index);
            // Items with equal (production, dot) but different lookaheads
            // stay distinct members, so this union *is* the lookahead merge
            merged[index].items.extend(state.items.iter().cloned());
        }

        for (source, state) in lr1.states.iter().enumerate() {
            let merged_source = lalr_of[source];
            for (symbol, &target) in &state.transitions {
                merged[merged_source]
                    .transitions
                    .insert(symbol.clone(), lalr_of[target]);
            }
        }

        let mut actions: Vec<BTreeMap<Lookahead, Action>> = vec![BTreeMap::new(); merged.len()];
        let mut gotos: Vec<BTreeMap<Rc<str>, usize>> = vec![BTreeMap::new(); merged.len()];
        let mut conflicts = Vec::new();

        for (index, state) in merged.iter().enumerate() {
            for item in &state.items {
                let production = &lr1.productions[item.production];
                match production.rhs.get(item.dot) {
                    Some(Symbol::Terminal(terminal)) => {
                        if let Some(&target) =
                            state.transitions.get(&Symbol::Terminal(terminal.clone()))
                        {
                            set_action(
                                &mut actions[index],
                                &mut conflicts,
                                index,
                                Lookahead::Terminal(terminal.clone()),
                                Action::Shift(target),
                            );
                        }
                    }
                    Some(Symbol::Nonterminal(_)) => {}
                    None => {
                        if item.production == lr1.augmented {
                            set_action(
                                &mut actions[index],
                                &mut conflicts,
                                index,
                                Lookahead::End,
                                Action::Accept,
                            );
                        } else {
                            set_action(
                                &mut actions[index],
                                &mut conflicts,
                                index,
                                item.lookahead.clone(),
                                Action::Reduce(item.production),
                            );
                        }
                    }
                }
            }

            for (symbol, &target) in &state.transitions {
                if let Symbol::Nonterminal(name) = symbol {
                    gotos[index].insert(name.clone(), target);
                }
            }
        }

        LalrTable {
            productions: lr1.productions.clone(),
            augmented: lr1.augmented,
            states: merged,
            actions,
            gotos,
            conflicts,
        }
    }

    /// The conflicts encountered while filling the table; empty for an
    /// LALR(1) grammar
    pub fn conflicts(&self) -> &[TableConflict] {
        self.conflicts.as_slice()
    }

    /// Gets the merged states
    pub fn states(&self) -> &[LalrState] {
        self.states.as_slice()
    }

    /// The number of merged states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Gets the productions, the augmented one last
    pub fn productions(&self) -> &[Production] {
        self.productions.as_slice()
    }

    /// Looks up the action of a state under a lookahead
    pub fn action(&self, state: usize, lookahead: &Lookahead) -> Option<Action> {
        self.actions.get(state)?.get(lookahead).copied()
    }

    /// Looks up the GOTO target of a state for a non-terminal
    pub fn goto(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.gotos.get(state)?.get(nonterminal).copied()
    }
}

/// First writer wins; a losing write is recorded as a diagnostic. The accept
/// cell is claimed by the unique `[S' -> S •, $]` item and nothing else may
/// land on it.
fn set_action(
    row: &mut BTreeMap<Lookahead, Action>,
    conflicts: &mut Vec<TableConflict>,
    state: usize,
    symbol: Lookahead,
    action: Action,
) {
    match row.get(&symbol) {
        None => {
            row.insert(symbol, action);
        }
        Some(&existing) if existing == action => {}
        Some(&existing) => {
            let conflict = match (existing, action) {
                (Action::Shift(shift), Action::Reduce(reduce))
                | (Action::Reduce(reduce), Action::Shift(shift)) => TableConflict::ShiftReduce {
                    state,
                    symbol,
                    shift,
                    reduce,
                },
                (Action::Reduce(first), Action::Reduce(second)) => TableConflict::ReduceReduce {
                    state,
                    symbol,
                    first,
                    second,
                },
                (Action::Accept, _) | (_, Action::Accept) => {
                    debug_assert!(false, "accept cell must not conflict");
                    return;
                }
                (Action::Shift(_), Action::Shift(_)) => {
                    unreachable!("GOTO is a function, equal shifts are filtered above")
                }
            };
            conflicts.push(conflict);
        }
    }
}
