//! Prioritized belief bases with AGM-style expansion and contraction.

use std::fmt::{self, Display};

use colored::Colorize;
use itertools::Itertools;

use crate::{
    ast::Formula,
    clauses::ClauseSet,
    explanation::{DiscardedExplanation, Explain, Explanation},
    normal_forms::to_cnf,
    parser::parse_formula,
    resolution::Resolver,
    Error,
};

/// A stored belief: the formula text exactly as given, and its entrenchment
/// priority. Higher priority means harder to give up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeliefEntry {
    pub formula: String,
    pub priority: i32,
}

impl Display for BeliefEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (priority {})", self.formula, self.priority)
    }
}

/// An insertion-ordered set of beliefs. No two entries share the same
/// formula text.
#[derive(Debug, Clone, Default)]
pub struct BeliefBase {
    entries: Vec<BeliefEntry>,
}

impl BeliefBase {
    pub const DEFAULT_PRIORITY: i32 = 1;

    pub fn new() -> BeliefBase {
        BeliefBase::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BeliefEntry] {
        &self.entries
    }

    /// The stored formula texts, in insertion order.
    pub fn formulas(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.formula.as_str())
    }

    pub fn contains(&self, formula: &str) -> bool {
        self.entries.iter().any(|entry| entry.formula == formula)
    }

    pub fn remove(&mut self, formula: &str) {
        self.entries.retain(|entry| entry.formula != formula);
    }

    /// Adds a belief with the given priority. Returns `Ok(false)` without
    /// changing the base when the exact text is already stored; rejects
    /// unparseable formulas without mutating anything.
    pub fn add(
        &mut self,
        formula: &str,
        priority: i32,
        explanation: &mut Explanation,
    ) -> Result<bool, Error> {
        parse_formula(formula, explanation)?;

        if self.contains(formula) {
            explanation.step(|| {
                format!(
                    "{} is already in the belief base, leaving it unchanged",
                    formula.blue()
                )
            });

            return Ok(false);
        }

        self.entries.push(BeliefEntry {
            formula: formula.to_string(),
            priority,
        });

        explanation.step(|| {
            format!(
                "Added {} with priority {}",
                formula.blue(),
                priority.to_string().magenta()
            )
        });

        Ok(true)
    }

    /// Expansion: unconditional addition of a belief, rejecting only exact
    /// duplicates.
    pub fn expansion(
        &mut self,
        formula: &str,
        priority: i32,
        explanation: &mut Explanation,
    ) -> Result<bool, Error> {
        explanation.with_subexplanation(
            || format!("Expanding the belief base with {}", formula.blue()),
            |explanation| self.add(formula, priority, explanation),
        )
    }

    /// Refutation entailment: the base entails `query` iff the base together
    /// with the negated query is unsatisfiable.
    pub fn entails(&self, query: &str, explanation: &mut Explanation) -> Result<bool, Error> {
        explanation.with_subexplanation(
            || format!("Checking whether the belief base entails {}", query.blue()),
            |explanation| {
                let negated = negate(parse_formula(query, explanation)?);

                explanation.step(|| format!("Negated query: {}", negated.to_string().blue()));

                let negated_clauses =
                    ClauseSet::from_cnf(&to_cnf(negated, &mut DiscardedExplanation)?)?;

                let result = selection_entails(self.formulas(), &negated_clauses, explanation)?;

                explanation.step(|| {
                    format!(
                        "The belief base {} {}",
                        if result {
                            "entails".green().to_string()
                        } else {
                            "does not entail".red().to_string()
                        },
                        query.blue()
                    )
                });

                Ok(result)
            },
        )
    }

    /// Priority-aware partial meet contraction.
    ///
    /// Searches the subsets of the base from largest to smallest for maximal
    /// subsets that no longer entail `formula`, installs the one with the
    /// greatest priority sum, and reports whether the base changed.
    /// Contracting a formula the base does not entail, or one it cannot give
    /// up (a tautology), leaves the base unchanged and returns `Ok(false)`.
    pub fn contraction(
        &mut self,
        formula: &str,
        explanation: &mut Explanation,
    ) -> Result<bool, Error> {
        explanation.with_subexplanation(
            || format!("Contracting {} from the belief base", formula.blue()),
            |explanation| self.contract(formula, explanation),
        )
    }

    fn contract(&mut self, formula: &str, explanation: &mut Explanation) -> Result<bool, Error> {
        let parsed = parse_formula(formula, explanation)?;
        let negated_clauses =
            ClauseSet::from_cnf(&to_cnf(negate(parsed), &mut DiscardedExplanation)?)?;

        let entailed = explanation.with_subexplanation(
            || format!("Checking whether the belief base entails {}", formula.blue()),
            |explanation| selection_entails(self.formulas(), &negated_clauses, explanation),
        )?;

        if !entailed {
            explanation.step(|| {
                format!(
                    "The belief base does not entail {}, nothing to contract",
                    formula.blue()
                )
            });

            return Ok(false);
        }

        explanation.step(|| {
            format!(
                "The belief base entails {}, searching for maximal non-entailing subsets",
                formula.blue()
            )
        });

        for size in (0..self.entries.len()).rev() {
            let mut best: Option<(Vec<usize>, i64)> = None;

            for candidate in (0..self.entries.len()).combinations(size) {
                if !self.is_maximal_non_entailing(&candidate, &negated_clauses)? {
                    continue;
                }

                let priority_sum = candidate
                    .iter()
                    .map(|&i| i64::from(self.entries[i].priority))
                    .sum::<i64>();

                explanation.step(|| {
                    format!(
                        "Found a maximal non-entailing subset {} with priority sum {}",
                        self.describe_selection(&candidate).blue(),
                        priority_sum.to_string().magenta()
                    )
                });

                // The first subset of a given priority sum wins.
                match &best {
                    Some((_, best_sum)) if *best_sum >= priority_sum => {}
                    _ => best = Some((candidate, priority_sum)),
                }
            }

            if let Some((selection, _)) = best {
                self.install_selection(&selection, formula, explanation);

                return Ok(true);
            }
        }

        explanation.step(|| {
            format!(
                "Every subset still entails {}, it cannot be contracted",
                formula.blue()
            )
        });

        Ok(false)
    }

    /// A selection qualifies when it does not entail the target and putting
    /// back any single excluded entry restores the entailment.
    fn is_maximal_non_entailing(
        &self,
        selection: &[usize],
        negated_query: &ClauseSet,
    ) -> Result<bool, Error> {
        let texts = |indices: &[usize]| {
            indices
                .iter()
                .map(|&i| self.entries[i].formula.as_str())
                .collect::<Vec<_>>()
        };

        if selection_entails(texts(selection), negated_query, &mut DiscardedExplanation)? {
            return Ok(false);
        }

        for excluded in 0..self.entries.len() {
            if selection.contains(&excluded) {
                continue;
            }

            let mut extended = selection.to_vec();
            extended.push(excluded);

            if !selection_entails(texts(&extended), negated_query, &mut DiscardedExplanation)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn install_selection(
        &mut self,
        selection: &[usize],
        formula: &str,
        explanation: &mut Explanation,
    ) {
        let retained = selection
            .iter()
            .map(|&i| self.entries[i].clone())
            .collect::<Vec<_>>();

        for entry in &self.entries {
            if !retained.iter().any(|kept| kept.formula == entry.formula) {
                explanation.step(|| {
                    format!(
                        "Removing {} to contract {}",
                        entry.to_string().red(),
                        formula.blue()
                    )
                });
            }
        }

        // Swapped in one assignment so no caller observes a partial base.
        self.entries = retained;
    }

    fn describe_selection(&self, selection: &[usize]) -> String {
        format!(
            "{{{}}}",
            selection
                .iter()
                .map(|&i| self.entries[i].formula.as_str())
                .join(", ")
        )
    }
}

impl Display for BeliefBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.entries.iter().join(", "))
    }
}

/// Syntactic negation: strips one leading negation instead of stacking a
/// second one.
fn negate(formula: Formula) -> Formula {
    match formula {
        Formula::Negation(operand) => *operand,
        formula => formula.negated(),
    }
}

/// Decides whether the given formulas entail the query whose negated clauses
/// are `negated_query`. Every formula is parsed and transformed afresh.
fn selection_entails<'a>(
    formulas: impl IntoIterator<Item = &'a str>,
    negated_query: &ClauseSet,
    explanation: &mut impl Explain,
) -> Result<bool, Error> {
    let mut clauses = ClauseSet::default();

    for formula in formulas {
        let parsed = parse_formula(formula, &mut Explanation::default())?;
        let cnf = to_cnf(parsed, &mut DiscardedExplanation)?;

        clauses.0.extend(ClauseSet::from_cnf(&cnf)?.0);
    }

    clauses.0.extend(negated_query.0.iter().cloned());

    let mut resolver = Resolver::new(clauses);

    Ok(resolver.is_unsatisfiable(explanation))
}
