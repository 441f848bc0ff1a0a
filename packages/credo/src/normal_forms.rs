//! Rewriting of formulas into conjunctive normal form.
//!
//! The conversion runs four stages in a fixed order: eliminate equivalences,
//! eliminate implications, push negations down to the atoms, and distribute
//! disjunctions over conjunctions until a fixpoint.

use colored::Colorize;
use thiserror::Error;

use crate::{
    ast::Formula,
    explanation::{Explain, Explanation},
    parser::parse_formula,
};

/// A rewrite stage found structure that an earlier stage should have removed,
/// or failed to make progress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("`{0}` still contains an equivalence after equivalence elimination")]
    EquivalenceNotEliminated(String),
    #[error("`{0}` should have been eliminated before negations are pushed")]
    ConnectiveNotEliminated(String),
    #[error("`{0}` reached distribution but is not in negation normal form")]
    NegationNotPushed(String),
    #[error("distribution of ∨ over ∧ did not converge after {0} passes")]
    DistributionDiverged(usize),
    #[error("`{0}` is not a disjunction of literals")]
    MalformedClause(String),
}

const DISTRIBUTION_PASS_LIMIT: usize = 100;

fn law(equivalence: &str) -> String {
    format!("Applying {equivalence}").green().to_string()
}

/// Parses `input` and converts it to conjunctive normal form.
pub fn cnf_of(input: &str, explanation: &mut Explanation) -> Result<Formula, crate::Error> {
    let formula = parse_formula(input, explanation)?;

    Ok(to_cnf(formula, explanation)?)
}

/// Converts a formula to conjunctive normal form.
pub fn to_cnf(formula: Formula, explanation: &mut impl Explain) -> Result<Formula, TransformError> {
    let formula = explanation.with_subexplanation(
        || "Eliminating equivalences",
        |explanation| eliminate_equivalences(formula, explanation),
    );

    let formula = explanation.with_subexplanation(
        || "Eliminating implications",
        |explanation| eliminate_implications(formula, explanation),
    )?;

    let formula = explanation.with_subexplanation(
        || "Pushing negations inward",
        |explanation| push_negations(formula, explanation),
    )?;

    let formula = explanation.with_subexplanation(
        || "Distributing disjunctions over conjunctions",
        |explanation| distribute_disjunctions(formula, explanation),
    )?;

    explanation.step(|| format!("Conjunctive normal form: {formula}"));

    Ok(formula)
}

/// Replaces every `F ↔ G` with `(F → G) ∧ (G → F)`.
pub fn eliminate_equivalences(formula: Formula, explanation: &mut impl Explain) -> Formula {
    match formula {
        Formula::Atomic(_) => formula,
        Formula::Negation(operand) => {
            Formula::Negation(Box::new(eliminate_equivalences(*operand, explanation)))
        }
        Formula::Conjunction(left, right) => Formula::Conjunction(
            Box::new(eliminate_equivalences(*left, explanation)),
            Box::new(eliminate_equivalences(*right, explanation)),
        ),
        Formula::Disjunction(left, right) => Formula::Disjunction(
            Box::new(eliminate_equivalences(*left, explanation)),
            Box::new(eliminate_equivalences(*right, explanation)),
        ),
        Formula::Implication(left, right) => Formula::Implication(
            Box::new(eliminate_equivalences(*left, explanation)),
            Box::new(eliminate_equivalences(*right, explanation)),
        ),
        Formula::Equivalence(left, right) => {
            explanation.step(|| law("(F ↔ G) ∼ (F → G) ∧ (G → F)"));

            let left = eliminate_equivalences(*left, explanation);
            let right = eliminate_equivalences(*right, explanation);

            Formula::Conjunction(
                Box::new(Formula::Implication(
                    Box::new(left.clone()),
                    Box::new(right.clone()),
                )),
                Box::new(Formula::Implication(Box::new(right), Box::new(left))),
            )
        }
    }
}

/// Replaces every `F → G` with `¬F ∨ G`.
pub fn eliminate_implications(
    formula: Formula,
    explanation: &mut impl Explain,
) -> Result<Formula, TransformError> {
    Ok(match formula {
        Formula::Atomic(_) => formula,
        Formula::Negation(operand) => {
            Formula::Negation(Box::new(eliminate_implications(*operand, explanation)?))
        }
        Formula::Conjunction(left, right) => Formula::Conjunction(
            Box::new(eliminate_implications(*left, explanation)?),
            Box::new(eliminate_implications(*right, explanation)?),
        ),
        Formula::Disjunction(left, right) => Formula::Disjunction(
            Box::new(eliminate_implications(*left, explanation)?),
            Box::new(eliminate_implications(*right, explanation)?),
        ),
        Formula::Implication(left, right) => {
            explanation.step(|| law("(F → G) ∼ ¬F ∨ G"));

            Formula::Disjunction(
                Box::new(Formula::Negation(Box::new(eliminate_implications(
                    *left,
                    explanation,
                )?))),
                Box::new(eliminate_implications(*right, explanation)?),
            )
        }
        Formula::Equivalence(..) => {
            return Err(TransformError::EquivalenceNotEliminated(
                formula.to_string(),
            ))
        }
    })
}

/// Moves negations inward until they apply only to atoms.
pub fn push_negations(
    formula: Formula,
    explanation: &mut impl Explain,
) -> Result<Formula, TransformError> {
    Ok(match formula {
        Formula::Atomic(_) => formula,
        Formula::Negation(operand) => match *operand {
            Formula::Atomic(_) => Formula::Negation(operand),
            Formula::Negation(inner) => {
                explanation.step(|| law("¬¬F ∼ F"));

                push_negations(*inner, explanation)?
            }
            Formula::Conjunction(left, right) => {
                explanation.step(|| law("¬(F ∧ G) ∼ ¬F ∨ ¬G"));

                Formula::Disjunction(
                    Box::new(push_negations(Formula::Negation(left), explanation)?),
                    Box::new(push_negations(Formula::Negation(right), explanation)?),
                )
            }
            Formula::Disjunction(left, right) => {
                explanation.step(|| law("¬(F ∨ G) ∼ ¬F ∧ ¬G"));

                Formula::Conjunction(
                    Box::new(push_negations(Formula::Negation(left), explanation)?),
                    Box::new(push_negations(Formula::Negation(right), explanation)?),
                )
            }
            operand @ (Formula::Implication(..) | Formula::Equivalence(..)) => {
                return Err(TransformError::ConnectiveNotEliminated(
                    Formula::Negation(Box::new(operand)).to_string(),
                ))
            }
        },
        Formula::Conjunction(left, right) => Formula::Conjunction(
            Box::new(push_negations(*left, explanation)?),
            Box::new(push_negations(*right, explanation)?),
        ),
        Formula::Disjunction(left, right) => Formula::Disjunction(
            Box::new(push_negations(*left, explanation)?),
            Box::new(push_negations(*right, explanation)?),
        ),
        formula @ (Formula::Implication(..) | Formula::Equivalence(..)) => {
            return Err(TransformError::ConnectiveNotEliminated(formula.to_string()))
        }
    })
}

/// Distributes `∨` over `∧` until the formula stops changing.
pub fn distribute_disjunctions(
    formula: Formula,
    explanation: &mut impl Explain,
) -> Result<Formula, TransformError> {
    let mut formula = formula;

    for _ in 0..DISTRIBUTION_PASS_LIMIT {
        let next = distribute_pass(formula.clone(), explanation)?;

        if next == formula {
            return Ok(formula);
        }

        formula = next;
    }

    Err(TransformError::DistributionDiverged(DISTRIBUTION_PASS_LIMIT))
}

fn distribute_pass(
    formula: Formula,
    explanation: &mut impl Explain,
) -> Result<Formula, TransformError> {
    Ok(match formula {
        Formula::Atomic(_) | Formula::Negation(_) => formula,
        Formula::Conjunction(left, right) => Formula::Conjunction(
            Box::new(distribute_pass(*left, explanation)?),
            Box::new(distribute_pass(*right, explanation)?),
        ),
        Formula::Disjunction(left, right) => {
            let left = distribute_pass(*left, explanation)?;
            let right = distribute_pass(*right, explanation)?;

            // The right conjunction is split first when both sides are
            // conjunctions.
            match (left, right) {
                (left, Formula::Conjunction(right_left, right_right)) => {
                    explanation.step(|| law("F ∨ (G ∧ H) ∼ (F ∨ G) ∧ (F ∨ H)"));

                    Formula::Conjunction(
                        Box::new(distribute_pass(
                            Formula::Disjunction(Box::new(left.clone()), right_left),
                            explanation,
                        )?),
                        Box::new(distribute_pass(
                            Formula::Disjunction(Box::new(left), right_right),
                            explanation,
                        )?),
                    )
                }
                (Formula::Conjunction(left_left, left_right), right) => {
                    explanation.step(|| law("(F ∧ G) ∨ H ∼ (F ∨ H) ∧ (G ∨ H)"));

                    Formula::Conjunction(
                        Box::new(distribute_pass(
                            Formula::Disjunction(left_left, Box::new(right.clone())),
                            explanation,
                        )?),
                        Box::new(distribute_pass(
                            Formula::Disjunction(left_right, Box::new(right)),
                            explanation,
                        )?),
                    )
                }
                (left, right) => Formula::Disjunction(Box::new(left), Box::new(right)),
            }
        }
        formula @ (Formula::Implication(..) | Formula::Equivalence(..)) => {
            return Err(TransformError::NegationNotPushed(formula.to_string()))
        }
    })
}
