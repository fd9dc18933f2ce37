//! # Nondeterministic finite automata
//! The NFA module includes the [Nfa] struct produced by the Thompson
//! construction ([crate::regex::Regex::to_nfa]). States live in an arena and
//! refer to each other by index, so the cycles created by the repetition
//! operators need no special ownership treatment. A transition carries an
//! optional character; `None` is an ε-move.
//!
//! An accepting state carries a [TokenTag]: the name of the token it
//! recognizes and a priority. Priorities resolve the ties that appear once
//! several rules are combined into one automaton with [Nfa::union_all]: a
//! DFA state covering accepting NFA states of several rules takes the tag
//! with the *lowest* priority number.
//!
//! ## Example
//! ```
//! use parsely::nfa::{Nfa, TokenTag};
//! use parsely::regex::Regex;
//!
//! let abc = Regex::parse("(a|b)*c+").to_nfa(TokenTag::new("ABC", 1)).unwrap();
//! let defg = Regex::parse("d(e|f)g*").to_nfa(TokenTag::new("DEFG", 0)).unwrap();
//! let combined = Nfa::union_all(vec![abc, defg]);
//!
//! let dfa = combined.to_dfa(&['a', 'b', 'c', 'd', 'e', 'f', 'g']);
//! assert_eq!(dfa.token_of("bbbc"), Some("ABC"));
//! assert_eq!(dfa.token_of("deg"), Some("DEFG"));
//! assert_eq!(dfa.token_of("d"), None);
//! ```

use crate::dfa::{Dfa, DfaState};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// The token label carried by an accepting state: a token-type name and a
/// priority, where a lower number takes precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTag {
    pub(crate) name: Rc<str>,
    pub(crate) priority: i32,
}

impl TokenTag {
    pub fn new(name: impl Into<Rc<str>>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }

    /// The token-type name this tag labels its state with
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tie-breaking priority; lower wins
    pub fn priority(&self) -> i32 {
        self.priority
    }
}

/// A state in an NFA: its outgoing transitions (`None` is an ε-move) and its
/// token tag, if it is accepting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaState {
    pub(crate) transitions: Vec<(Option<char>, usize)>,
    pub(crate) accept: Option<TokenTag>,
}

impl NfaState {
    /// Gets the outgoing transitions as `(symbol, target index)` pairs, where
    /// a `None` symbol is an ε-move
    pub fn transitions(&self) -> &[(Option<char>, usize)] {
        self.transitions.as_slice()
    }

    /// Gets the token tag if this state is accepting
    pub fn accept(&self) -> Option<&TokenTag> {
        self.accept.as_ref()
    }
}

/// A nondeterministic finite automaton with ε-moves, denoted by its state
/// arena and the index of its start state. A freshly built single-rule NFA
/// has a unique accepting end state; after [Nfa::union_all] there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) states: Vec<NfaState>,
    pub(crate) start: usize,
    pub(crate) end: Option<usize>,
}

impl Nfa {
    /// Combines several rule NFAs under one fresh start state with an ε-move
    /// to each rule's start state. Each rule's accepting state keeps its own
    /// token tag, so the combined automaton recognizes every rule at once.
    pub fn union_all(nfas: Vec<Nfa>) -> Nfa {
        let mut states = Vec::with_capacity(nfas.iter().map(|n| n.states.len()).sum::<usize>() + 1);
        let mut starts = Vec::with_capacity(nfas.len());

        for nfa in nfas {
            let offset = states.len();
            starts.push(nfa.start + offset);
            states.extend(nfa.states.into_iter().map(|mut state| {
                for (_, target) in state.transitions.iter_mut() {
                    *target += offset;
                }
                state
            }));
        }

        let start = states.len();
        states.push(NfaState {
            transitions: starts.into_iter().map(|s| (None, s)).collect(),
            accept: None,
        });

        Nfa {
            states,
            start,
            end: None,
        }
    }

    /// Gives the ε-closure of a set of states: the set itself plus every
    /// state reachable through ε-moves alone
    pub fn closure(&self, set: &HashSet<usize>) -> HashSet<usize> {
        let mut all = set.clone();
        let mut new: Vec<usize> = set.iter().copied().collect();
        while let Some(state) = new.pop() {
            for &(symbol, target) in &self.states[state].transitions {
                if symbol.is_none() && all.insert(target) {
                    new.push(target);
                }
            }
        }
        all
    }

    /// Converts this NFA to a DFA using the subset construction over the
    /// given alphabet. The alphabet is taken as given: characters the NFA
    /// never reads produce dead columns, and literals outside the alphabet
    /// simply never get a transition.
    ///
    /// Each DFA state stands for a set of NFA states which is closed under
    /// ε-moves; it is accepting if the set contains an accepting NFA state,
    /// and takes the tag with the lowest priority number (on equal
    /// priorities, the one of the lowest state index). The DFA state order
    /// is the worklist discovery order, so it is deterministic for a given
    /// alphabet order, with the start state at index 0.
    pub fn to_dfa(&self, alphabet: &[char]) -> Dfa {
        let mut gen = 0usize..;
        let mut index: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut dfa_states: Vec<DfaState> = Vec::new();
        let mut worklist = VecDeque::new();

        let start_set = Self::set_to_vec(self.closure(&HashSet::from([self.start])));
        let n = gen.next().unwrap(); // 0
        index.insert(start_set.clone(), n);
        dfa_states.push(DfaState {
            accept: self.accept_of(&start_set),
            nfa_states: start_set,
            transitions: HashMap::new(),
        });
        worklist.push_back(n);

        while let Some(current) = worklist.pop_front() {
            let current_set = dfa_states[current].nfa_states.clone();
            for &ch in alphabet {
                let moved: HashSet<usize> = current_set
                    .iter()
                    .flat_map(|&state| {
                        self.states[state]
                            .transitions
                            .iter()
                            .filter(move |&&(symbol, _)| symbol == Some(ch))
                            .map(|&(_, target)| target)
                    })
                    .collect();
                if moved.is_empty() {
                    continue;
                }
                let target_set = Self::set_to_vec(self.closure(&moved));
                let target = match index.get(&target_set) {
                    Some(&existing) => existing,
                    None => {
                        let new = gen.next().unwrap();
                        index.insert(target_set.clone(), new);
                        dfa_states.push(DfaState {
                            accept: self.accept_of(&target_set),
                            nfa_states: target_set,
                            transitions: HashMap::new(),
                        });
                        worklist.push_back(new);
                        new
                    }
                };
                dfa_states[current].transitions.insert(ch, target);
            }
        }

        Dfa {
            alphabet: Rc::from(alphabet),
            states: dfa_states,
            initial_state: 0,
        }
    }

    /// Checks if this automaton accepts the given string, by simulating the
    /// set of states it can be in
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.closure(&HashSet::from([self.start]));
        for ch in input.chars() {
            let moved: HashSet<usize> = current
                .iter()
                .flat_map(|&state| {
                    self.states[state]
                        .transitions
                        .iter()
                        .filter(move |&&(symbol, _)| symbol == Some(ch))
                        .map(|&(_, target)| target)
                })
                .collect();
            if moved.is_empty() {
                return false;
            }
            current = self.closure(&moved);
        }
        current
            .iter()
            .any(|&state| self.states[state].accept.is_some())
    }

    /// Picks the winning tag of a set of NFA states: lowest priority number
    /// first, lowest state index on ties. `set` must be sorted ascending.
    fn accept_of(&self, set: &[usize]) -> Option<TokenTag> {
        let mut best: Option<&TokenTag> = None;
        for &state in set {
            if let Some(tag) = &self.states[state].accept {
                match best {
                    Some(b) if tag.priority >= b.priority => {}
                    _ => best = Some(tag),
                }
            }
        }
        best.cloned()
    }

    /// Converts a HashSet (which is not hashable) to a Vec (which is
    /// hashable) in a deterministic way
    pub(crate) fn set_to_vec(set: HashSet<usize>) -> Vec<usize> {
        let mut vec = set.into_iter().collect::<Vec<_>>();
        vec.sort_unstable();
        vec
    }

    /// Gets the states of this NFA
    pub fn states(&self) -> &[NfaState] {
        self.states.as_slice()
    }

    /// Gets the index of the start state
    pub fn start_index(&self) -> usize {
        self.start
    }

    /// Gets the index of the unique accepting state, if this NFA still has
    /// one (a combined automaton does not)
    pub fn end_index(&self) -> Option<usize> {
        self.end
    }
}
