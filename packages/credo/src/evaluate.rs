use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::{
    ast::{Atom, AtomSet, Formula},
    clauses::{Clause, ClauseSet},
};

/// An assignment of truth values to atoms.
#[derive(Debug, Clone, Default)]
pub struct Interpretation(pub IndexMap<Atom, TruthValue>);

impl Interpretation {
    /// All `2^n` interpretations of `atoms`, in binary counting order.
    pub fn generate_all(atoms: AtomSet) -> impl Iterator<Item = Interpretation> {
        let n = atoms.0.len();
        let interpretation_count = 1usize << n;

        (0..interpretation_count).map(move |i| {
            let bit_string = format!("{:0n$b}", i);
            let mapping = bit_string.chars().map(|c| c == '1').collect::<Vec<bool>>();

            let mut interpretation = Interpretation(IndexMap::new());
            for (atom, value) in atoms.0.iter().zip(mapping) {
                interpretation.0.insert(atom.clone(), TruthValue(value));
            }

            interpretation
        })
    }
}

impl Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut atoms = self.0.keys().collect::<Vec<_>>();
        atoms.sort_by_key(|atom| &atom.0);

        let atom_list = atoms
            .iter()
            .map(|&atom| {
                let prefix = if self.0.get(atom).unwrap().0 { "" } else { "¬" };
                format!("{prefix}{atom}")
            })
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{{{}}}", atom_list)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruthValue(pub bool);

impl Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.0 { "𝐓" } else { "𝟊" })
    }
}

/// Truth under an interpretation. The interpretation must assign every atom
/// the implementor mentions.
pub trait Evaluate {
    fn evaluate(&self, interpretation: &Interpretation) -> TruthValue;
}

impl Evaluate for Atom {
    fn evaluate(&self, interpretation: &Interpretation) -> TruthValue {
        *interpretation.0.get(self).unwrap()
    }
}

impl Evaluate for Formula {
    fn evaluate(&self, interpretation: &Interpretation) -> TruthValue {
        match self {
            Formula::Atomic(atom) => atom.evaluate(interpretation),
            Formula::Negation(operand) => TruthValue(!operand.evaluate(interpretation).0),
            Formula::Conjunction(left, right) => {
                TruthValue(left.evaluate(interpretation).0 && right.evaluate(interpretation).0)
            }
            Formula::Disjunction(left, right) => {
                TruthValue(left.evaluate(interpretation).0 || right.evaluate(interpretation).0)
            }
            Formula::Implication(left, right) => {
                TruthValue(!left.evaluate(interpretation).0 || right.evaluate(interpretation).0)
            }
            Formula::Equivalence(left, right) => {
                TruthValue(left.evaluate(interpretation).0 == right.evaluate(interpretation).0)
            }
        }
    }
}

impl Evaluate for Clause {
    fn evaluate(&self, interpretation: &Interpretation) -> TruthValue {
        TruthValue(
            self.0
                .iter()
                .any(|literal| literal.0.evaluate(interpretation).0 == literal.1),
        )
    }
}

impl Evaluate for ClauseSet {
    fn evaluate(&self, interpretation: &Interpretation) -> TruthValue {
        TruthValue(self.0.iter().all(|clause| clause.evaluate(interpretation).0))
    }
}
