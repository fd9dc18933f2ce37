//! # Context-free grammars
//! The grammar module includes the [Grammar] struct: an ordered list of
//! [Production]s over [Symbol]s, with a designated start symbol. Grammars are
//! parsed from text in two steps: [crate::parser::grammar] produces a
//! [crate::parser::ParsedGrammar], and `TryInto` checks its invariants.
//!
//! ```
//! use parsely::grammar::Grammar;
//!
//! let grammar: Grammar = parsely::parser::grammar("S -> a S | b")
//!     .unwrap()
//!     .try_into()
//!     .unwrap();
//! assert_eq!(grammar.start(), "S");
//! assert_eq!(grammar.nonterminals(), ["S".into()]);
//! assert_eq!(grammar.productions().len(), 2);
//! ```
//!
//! ε and the end-of-input marker are deliberately not [Symbol]s: the empty
//! production has an empty body, nullability is a flag on the analysis sets
//! ([analysis::FirstSet]), and `$` is [Lookahead::End]. This keeps sentinel
//! values off the parser stacks entirely.

pub use crate::parser::grammar as parse;
pub use parse::GrammarParseError;

pub mod analysis;
pub mod parse;

use std::fmt;
use std::rc::Rc;

/// A grammar symbol: a named terminal or non-terminal. Equality is by name
/// and kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Nonterminal(Rc<str>),
    Terminal(Rc<str>),
}

impl Symbol {
    /// The name of this symbol
    pub fn name(&self) -> &str {
        match self {
            Symbol::Nonterminal(name) | Symbol::Terminal(name) => name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single production `A -> X₁ … Xₙ`; an empty body is the ε-production
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production {
    pub(crate) lhs: Rc<str>,
    pub(crate) rhs: Vec<Symbol>,
}

impl Production {
    /// The non-terminal this production derives from
    pub fn lhs(&self) -> &str {
        &self.lhs
    }

    /// The body of this production; empty for the ε-production
    pub fn rhs(&self) -> &[Symbol] {
        self.rhs.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        if self.rhs.is_empty() {
            write!(f, " ε")?;
        }
        for symbol in &self.rhs {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}

/// A terminal lookahead or the end-of-input marker `$`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lookahead {
    Terminal(Rc<str>),
    End,
}

impl fmt::Display for Lookahead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookahead::Terminal(name) => f.write_str(name),
            Lookahead::End => f.write_str("$"),
        }
    }
}

/// A context-free grammar: the symbol sets, the start symbol and the ordered
/// list of productions. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    pub(crate) nonterminals: Vec<Rc<str>>,
    pub(crate) terminals: Vec<Rc<str>>,
    pub(crate) start: Rc<str>,
    pub(crate) productions: Vec<Production>,
    pub(crate) inferred_terminals: Vec<Rc<str>>,
}

impl Grammar {
    /// Gets the non-terminal names, in declaration order
    pub fn nonterminals(&self) -> &[Rc<str>] {
        self.nonterminals.as_slice()
    }

    /// Gets the terminal names, in declaration order (inferred terminals
    /// come last)
    pub fn terminals(&self) -> &[Rc<str>] {
        self.terminals.as_slice()
    }

    /// Gets the start symbol
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Gets the productions in file order
    pub fn productions(&self) -> &[Production] {
        self.productions.as_slice()
    }

    /// Symbols that appeared on a right-hand side without being declared
    /// anywhere; they are treated as terminals, but a frontend may want to
    /// warn about them
    pub fn inferred_terminals(&self) -> &[Rc<str>] {
        self.inferred_terminals.as_slice()
    }

    /// Checks whether `name` is a non-terminal of this grammar
    pub fn is_nonterminal(&self, name: &str) -> bool {
        self.nonterminals.iter().any(|n| &**n == name)
    }

    /// The productions deriving from `name`, with their indices
    pub fn productions_of<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Production)> + 'a {
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, production)| &*production.lhs == name)
    }
}
