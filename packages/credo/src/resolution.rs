use std::collections::BTreeSet;

use colored::Colorize;
use indexmap::IndexSet;
use itertools::Itertools;

use crate::{
    clauses::{clauses_of, Clause, ClauseSet},
    explanation::{Explain, Explanation},
};

/// All resolvents of a pair of clauses.
///
/// For every literal of `left` whose complement is in `right`, the resolvent
/// keeps every literal of both clauses except the resolved atom. Resolvents
/// containing a complementary pair are discarded.
pub fn resolve(left: &Clause, right: &Clause, explanation: &mut impl Explain) -> Vec<Clause> {
    let mut resolvents = Vec::new();

    'literals: for literal in &left.0 {
        if !right.0.contains(&literal.complement()) {
            continue;
        }

        let resolvent = Clause(
            left.0
                .union(&right.0)
                .filter(|l| l.0 != literal.0)
                .cloned()
                .collect::<BTreeSet<_>>(),
        );

        for kept in &resolvent.0 {
            let complement = kept.complement();

            if resolvent.0.contains(&complement) {
                explanation.step(|| {
                    format!(
                        "Discarding redundant resolvent: {} - contains both {} and {}",
                        resolvent.to_string().blue(),
                        kept.to_string().green(),
                        complement.to_string().red()
                    )
                });

                continue 'literals;
            }
        }

        resolvents.push(resolvent);
    }

    resolvents
}

/// Saturates a clause set under resolution.
#[derive(Debug)]
pub struct Resolver {
    clauses: IndexSet<Clause>,
}

impl Resolver {
    pub fn new(clauses: ClauseSet) -> Resolver {
        Resolver { clauses: clauses.0 }
    }

    /// Resolves until the empty clause appears or a round adds nothing.
    /// Returns `true` when the clauses are unsatisfiable.
    pub fn is_unsatisfiable(&mut self, explanation: &mut impl Explain) -> bool {
        let result = explanation.with_subexplanation(
            || "Applying the resolution algorithm",
            |explanation| self.saturate(explanation),
        );

        explanation.step(|| {
            format!(
                "Result: {}",
                if result {
                    "unsatisfiable".red()
                } else {
                    "satisfiable".green()
                }
            )
        });

        result
    }

    fn saturate(&mut self, explanation: &mut impl Explain) -> bool {
        // The extracted clauses may already contain the empty clause.
        if self.clauses.iter().any(|clause| clause.0.is_empty()) {
            explanation.step(|| {
                format!(
                    "Found an empty clause, therefore the clauses are {}",
                    "unsatisfiable".red()
                )
            });

            return true;
        }

        loop {
            explanation.with_subexplanation(
                || "Current clauses",
                |explanation| {
                    // Listed smallest first; resolution order is insertion order.
                    for (i, clause) in self.clauses.iter().sorted().enumerate() {
                        explanation.step(|| {
                            format!(
                                "{} {}",
                                format!("({i})").magenta(),
                                clause.to_string().blue()
                            )
                        });
                    }
                },
            );

            let mut fresh = Vec::new();

            for (i, left) in self.clauses.iter().enumerate() {
                for right in self.clauses.iter().skip(i + 1) {
                    for resolvent in resolve(left, right, explanation) {
                        if resolvent.0.is_empty() {
                            explanation.step(|| {
                                format!(
                                    "Derived the empty clause from {} and {}, therefore the clauses are {}",
                                    left.to_string().blue(),
                                    right.to_string().blue(),
                                    "unsatisfiable".red()
                                )
                            });

                            return true;
                        }

                        fresh.push(resolvent);
                    }
                }
            }

            let mut grew = false;

            for resolvent in fresh {
                if self.clauses.contains(&resolvent) {
                    continue;
                }

                explanation
                    .step(|| format!("Found a new resolvent: {}", resolvent.to_string().blue()));

                self.clauses.insert(resolvent);
                grew = true;
            }

            if !grew {
                explanation.step(|| {
                    format!(
                        "No new resolvents, therefore the clauses are {}",
                        "satisfiable".green()
                    )
                });

                return false;
            }
        }
    }
}

/// Parses `input`, converts it to conjunctive normal form, and decides by
/// resolution whether it is unsatisfiable.
pub fn resolution_unsat(input: &str, explanation: &mut Explanation) -> Result<bool, crate::Error> {
    let clauses = clauses_of(input, explanation)?;
    let mut resolver = Resolver::new(clauses);

    Ok(resolver.is_unsatisfiable(explanation))
}
