//! # Deterministic finite automata
//! The DFA module includes the [Dfa] struct produced by the subset
//! construction ([crate::nfa::Nfa::to_dfa]). A DFA state remembers the set of
//! NFA states it stands for, along with its token tag and a sparse
//! transition map; a missing entry means the automaton halts. The NFA-state
//! set is the state's identity, which is what lets the subset construction
//! deduplicate states.
//!
//! The main operation here is [Dfa::minimize], the table-filling procedure:
//! mark every pair of states that some input distinguishes, then collapse the
//! unmarked pairs into equivalence classes with a union-find. Two accepting
//! states carrying *different token names* are always marked, so minimizing a
//! lexer automaton can never conflate two token classes, even when their
//! states are otherwise equivalent.
//!
//! ## Example
//! ```
//! use parsely::nfa::TokenTag;
//! use parsely::regex::Regex;
//!
//! let nfa = Regex::parse("(a|b)*c+").to_nfa(TokenTag::new("ABC", 0)).unwrap();
//! let dfa = nfa.to_dfa(&['a', 'b', 'c']);
//! let minimized = dfa.minimize();
//!
//! assert!(minimized.states().len() <= dfa.states().len());
//! assert!(minimized.equivalent_to(&dfa));
//! assert!(minimized.accepts("ababcc"));
//! assert!(!minimized.accepts("ab"));
//! ```

use crate::nfa::{Nfa, NfaState, TokenTag};
use crate::table::LexerDefinition;
use crate::util::{alphabet_equal, UnionFind};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// A state in a DFA: the sorted set of NFA states it represents, its token
/// tag if accepting, and a sparse map of transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) nfa_states: Vec<usize>,
    pub(crate) accept: Option<TokenTag>,
    pub(crate) transitions: HashMap<char, usize>,
}

impl DfaState {
    /// The sorted NFA state set this DFA state stands for
    pub fn nfa_states(&self) -> &[usize] {
        self.nfa_states.as_slice()
    }

    /// Gets the token tag if this state is accepting
    pub fn accept(&self) -> Option<&TokenTag> {
        self.accept.as_ref()
    }

    /// Gets the transition map from characters to state indices
    pub fn transitions(&self) -> &HashMap<char, usize> {
        &self.transitions
    }
}

/// A deterministic finite automaton over a fixed alphabet, with states in an
/// arena and a designated initial state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Rc<[char]>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial_state: usize,
}

impl Dfa {
    /// Produces the minimal DFA equivalent to this one using table-filling.
    ///
    /// Pairs of states are marked distinguishable when their acceptance
    /// differs, when their token names differ, or when some character leads
    /// exactly one of them nowhere or leads them to an already-marked pair.
    /// The unmarked pairs are collapsed with a union-find; each class becomes
    /// one state of the new automaton, keeping the highest-priority tag of
    /// its accepting members. The original automaton is left untouched.
    pub fn minimize(&self) -> Dfa {
        let n = self.states.len();
        let mut marked = vec![vec![false; n]; n];

        // Initial marking: acceptance or token class differs
        for p in 0..n {
            for q in p + 1..n {
                let distinguished = match (&self.states[p].accept, &self.states[q].accept) {
                    (Some(a), Some(b)) => a.name != b.name,
                    (None, None) => false,
                    _ => true,
                };
                if distinguished {
                    marked[p][q] = true;
                }
            }
        }

        // Iterative marking until fixpoint
        let mut changed = true;
        while changed {
            changed = false;
            for p in 0..n {
                for q in p + 1..n {
                    if marked[p][q] {
                        continue;
                    }
                    for &ch in self.alphabet.iter() {
                        let pd = self.states[p].transitions.get(&ch);
                        let qd = self.states[q].transitions.get(&ch);
                        let distinguished = match (pd, qd) {
                            (None, None) => false,
                            (Some(&a), Some(&b)) => {
                                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                                lo != hi && marked[lo][hi]
                            }
                            _ => true,
                        };
                        if distinguished {
                            marked[p][q] = true;
                            changed = true;
                            break;
                        }
                    }
                }
            }
        }

        // Unmarked pairs are equivalent; collect classes
        let mut uf = UnionFind::new(n);
        for p in 0..n {
            for q in p + 1..n {
                if !marked[p][q] {
                    uf.union(p, q);
                }
            }
        }

        let mut class_index: HashMap<usize, usize> = HashMap::new();
        let mut class_of = vec![0usize; n];
        let mut members: Vec<Vec<usize>> = Vec::new();
        for state in 0..n {
            let root = uf.find(state);
            let class = *class_index.entry(root).or_insert_with(|| {
                members.push(Vec::new());
                members.len() - 1
            });
            class_of[state] = class;
            members[class].push(state);
        }

        let states = members
            .iter()
            .map(|class_members| {
                let mut nfa_states: Vec<usize> = class_members
                    .iter()
                    .flat_map(|&member| self.states[member].nfa_states.iter().copied())
                    .collect();
                nfa_states.sort_unstable();
                nfa_states.dedup();

                // All accepting members share a token name; keep the best
                // priority among them
                let accept = class_members
                    .iter()
                    .filter_map(|&member| self.states[member].accept.clone())
                    .min_by_key(|tag| tag.priority);

                // Members are transition-equivalent, so any representative
                // will do; take the first (smallest id)
                let representative = class_members[0];
                let transitions = self
                    .alphabet
                    .iter()
                    .filter_map(|&ch| {
                        self.states[representative]
                            .transitions
                            .get(&ch)
                            .map(|&target| (ch, class_of[target]))
                    })
                    .collect();

                DfaState {
                    nfa_states,
                    accept,
                    transitions,
                }
            })
            .collect();

        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: class_of[self.initial_state],
        }
    }

    /// Checks if this automaton accepts the given string. Characters without
    /// a transition (including characters outside the alphabet) halt the
    /// automaton in a rejecting way.
    pub fn accepts(&self, input: &str) -> bool {
        self.walk(input)
            .map_or(false, |state| self.states[state].accept.is_some())
    }

    /// Runs the automaton to completion on the given string and gives the
    /// token name it classifies the whole string as, if any
    pub fn token_of(&self, input: &str) -> Option<&str> {
        self.walk(input)
            .and_then(|state| self.states[state].accept.as_ref())
            .map(TokenTag::name)
    }

    fn walk(&self, input: &str) -> Option<usize> {
        let mut current = self.initial_state;
        for ch in input.chars() {
            current = *self.states[current].transitions.get(&ch)?;
        }
        Some(current)
    }

    /// Checks if this DFA is equivalent to another DFA: same alphabet (in any
    /// order) and the same classification of every string, token names
    /// included. Works by exploring pairs of states in lockstep, with a
    /// missing transition treated as a shared dead state.
    pub fn equivalent_to(&self, other: &Dfa) -> bool {
        if !alphabet_equal(&self.alphabet, &other.alphabet) {
            return false;
        }

        let mut explored = HashSet::new();
        let mut to_explore = vec![(Some(self.initial_state), Some(other.initial_state))];
        explored.insert((Some(self.initial_state), Some(other.initial_state)));

        while let Some((p, q)) = to_explore.pop() {
            let pa = p.and_then(|state| self.states[state].accept.as_ref());
            let qa = q.and_then(|state| other.states[state].accept.as_ref());
            match (pa, qa) {
                (None, None) => {}
                (Some(a), Some(b)) if a.name == b.name => {}
                _ => return false,
            }

            for &ch in self.alphabet.iter() {
                let pd = p.and_then(|state| self.states[state].transitions.get(&ch).copied());
                let qd = q.and_then(|state| other.states[state].transitions.get(&ch).copied());
                if (pd, qd) == (None, None) {
                    continue;
                }
                if explored.insert((pd, qd)) {
                    to_explore.push((pd, qd));
                }
            }
        }
        true
    }

    /// Converts this DFA back to an NFA by reading each transition as a
    /// singleton move. Feeding the result through the subset construction
    /// again reproduces an automaton isomorphic to this one.
    pub fn to_nfa(&self) -> Nfa {
        let states = self
            .states
            .iter()
            .map(|state| NfaState {
                transitions: self
                    .alphabet
                    .iter()
                    .filter_map(|&ch| {
                        state
                            .transitions
                            .get(&ch)
                            .map(|&target| (Some(ch), target))
                    })
                    .collect(),
                accept: state.accept.clone(),
            })
            .collect();
        Nfa {
            states,
            start: self.initial_state,
            end: None,
        }
    }

    /// Flattens this DFA into the dense transition table consumed by the
    /// runtime tokenizer and the JSON serializer. Rows follow the state
    /// order, columns the alphabet order, and `-1` marks a missing
    /// transition.
    pub fn to_definition(&self) -> LexerDefinition {
        LexerDefinition {
            alphabet: self.alphabet.to_vec(),
            start_state: self.initial_state,
            transitions: self
                .states
                .iter()
                .map(|state| {
                    self.alphabet
                        .iter()
                        .map(|ch| {
                            state
                                .transitions
                                .get(ch)
                                .map_or(-1, |&target| target as i32)
                        })
                        .collect()
                })
                .collect(),
            is_final: self.states.iter().map(|s| s.accept.is_some()).collect(),
            token_type_names: self
                .states
                .iter()
                .map(|s| s.accept.as_ref().map(|tag| tag.name.to_string()))
                .collect(),
        }
    }

    /// Gets the alphabet of this DFA
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this DFA
    pub fn initial_state(&self) -> &DfaState {
        &self.states[self.initial_state]
    }

    /// Get the index of the initial state of this DFA
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }
}
