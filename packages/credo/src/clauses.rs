use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt::{self, Display},
};

use indexmap::IndexSet;
use itertools::Itertools;

use crate::{
    ast::{Atom, Formula},
    explanation::Explanation,
    normal_forms::{cnf_of, TransformError},
};

/// Parses `input`, converts it to conjunctive normal form, and extracts its
/// clauses.
pub fn clauses_of(input: &str, explanation: &mut Explanation) -> Result<ClauseSet, crate::Error> {
    let formula = cnf_of(input, explanation)?;

    Ok(ClauseSet::from_cnf(&formula)?)
}

/// An atom or its negation. The flag is `false` for a negated atom.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Literal(pub Atom, pub bool);

impl Literal {
    pub fn complement(&self) -> Literal {
        Literal(self.0.clone(), !self.1)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.1 {
            write!(f, "¬")?;
        }

        write!(f, "{}", self.0)
    }
}

/// A disjunction of literals, kept as a set. The empty clause is the
/// unsatisfiable clause.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Clause(pub BTreeSet<Literal>);

impl PartialOrd for Clause {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Clause {
    fn cmp(&self, other: &Self) -> Ordering {
        // Order by size first so that smaller clauses sort before larger ones.
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

/// The clauses of a formula in conjunctive normal form, in extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClauseSet(pub IndexSet<Clause>);

impl ClauseSet {
    /// Reads the clauses out of a formula already in conjunctive normal form.
    ///
    /// Duplicate clauses and duplicate literals collapse through the set
    /// representation; tautological clauses are kept as extracted.
    pub fn from_cnf(formula: &Formula) -> Result<ClauseSet, TransformError> {
        let mut clauses = IndexSet::new();
        collect_clauses(formula, &mut clauses)?;

        Ok(ClauseSet(clauses))
    }
}

impl Display for ClauseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

fn collect_clauses(
    formula: &Formula,
    clauses: &mut IndexSet<Clause>,
) -> Result<(), TransformError> {
    match formula {
        Formula::Conjunction(left, right) => {
            collect_clauses(left, clauses)?;
            collect_clauses(right, clauses)?;
        }
        _ => {
            let mut literals = BTreeSet::new();
            collect_literals(formula, &mut literals)?;
            clauses.insert(Clause(literals));
        }
    }

    Ok(())
}

fn collect_literals(
    formula: &Formula,
    literals: &mut BTreeSet<Literal>,
) -> Result<(), TransformError> {
    match formula {
        Formula::Disjunction(left, right) => {
            collect_literals(left, literals)?;
            collect_literals(right, literals)?;
        }
        Formula::Atomic(atom) => {
            literals.insert(Literal(atom.clone(), true));
        }
        Formula::Negation(operand) => match operand.as_ref() {
            Formula::Atomic(atom) => {
                literals.insert(Literal(atom.clone(), false));
            }
            _ => return Err(TransformError::MalformedClause(formula.to_string())),
        },
        _ => return Err(TransformError::MalformedClause(formula.to_string())),
    }

    Ok(())
}
