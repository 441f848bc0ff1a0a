use std::fmt::{self, Display};

use derive_more::derive::Display;
use enum_as_inner::EnumAsInner;
use indexmap::IndexSet;
use itertools::Itertools;
use termtree::Tree;

/// A propositional variable, named by the identifier it was parsed from.
#[derive(Debug, Display, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Atom(pub String);

/// Abstract syntax tree of a propositional formula.
///
/// The binary connectives are strictly binary; `P ∧ Q ∧ R` parses as
/// `(P ∧ Q) ∧ R`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, EnumAsInner)]
pub enum Formula {
    Atomic(Atom),
    Negation(Box<Formula>),
    Conjunction(Box<Formula>, Box<Formula>),
    Disjunction(Box<Formula>, Box<Formula>),
    Implication(Box<Formula>, Box<Formula>),
    Equivalence(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn symbol(&self) -> String {
        match self {
            Formula::Atomic(atom) => atom.to_string(),
            Formula::Negation(_) => "¬".to_string(),
            Formula::Conjunction(..) => "∧".to_string(),
            Formula::Disjunction(..) => "∨".to_string(),
            Formula::Implication(..) => "→".to_string(),
            Formula::Equivalence(..) => "↔".to_string(),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            Formula::Conjunction(..)
                | Formula::Disjunction(..)
                | Formula::Implication(..)
                | Formula::Equivalence(..)
        )
    }

    pub fn negated(&self) -> Formula {
        Formula::Negation(Box::new(self.clone()))
    }

    /// The atoms of the formula, in leftmost-first order of appearance.
    pub fn atoms(&self) -> AtomSet {
        fn collect(formula: &Formula, atoms: &mut IndexSet<Atom>) {
            match formula {
                Formula::Atomic(atom) => {
                    atoms.insert(atom.clone());
                }
                Formula::Negation(operand) => collect(operand, atoms),
                Formula::Conjunction(left, right)
                | Formula::Disjunction(left, right)
                | Formula::Implication(left, right)
                | Formula::Equivalence(left, right) => {
                    collect(left, atoms);
                    collect(right, atoms);
                }
            }
        }

        let mut atoms = IndexSet::new();
        collect(self, &mut atoms);

        AtomSet(atoms)
    }

    pub fn get_tree(&self) -> Tree<String> {
        let mut tree = Tree::new(self.symbol());

        match self {
            Formula::Atomic(_) => {}
            Formula::Negation(operand) => {
                tree.push(operand.get_tree());
            }
            Formula::Conjunction(left, right)
            | Formula::Disjunction(left, right)
            | Formula::Implication(left, right)
            | Formula::Equivalence(left, right) => {
                tree.push(left.get_tree());
                tree.push(right.get_tree());
            }
        }

        tree
    }
}

impl From<Atom> for Formula {
    fn from(atom: Atom) -> Formula {
        Formula::Atomic(atom)
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Binary subformulas are parenthesized, everything else prints bare.
        fn operand(formula: &Formula) -> String {
            if formula.is_binary() {
                format!("({formula})")
            } else {
                formula.to_string()
            }
        }

        match self {
            Formula::Atomic(atom) => write!(f, "{atom}"),
            Formula::Negation(inner) => write!(f, "¬{}", operand(inner)),
            Formula::Conjunction(left, right)
            | Formula::Disjunction(left, right)
            | Formula::Implication(left, right)
            | Formula::Equivalence(left, right) => {
                write!(f, "{} {} {}", operand(left), self.symbol(), operand(right))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomSet(pub IndexSet<Atom>);

impl Display for AtomSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}
