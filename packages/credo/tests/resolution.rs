use credo::{
    ast::Atom,
    clauses::{Clause, ClauseSet, Literal},
    explanation::{DiscardedExplanation, Explanation},
    resolution::{resolution_unsat, resolve, Resolver},
};
use indexmap::IndexSet;
use maplit::btreeset;

#[test]
fn resolvents_of_clause_pairs() {
    let test_cases: [(Clause, Clause, Vec<Clause>); 4] = [
        (
            Clause(btreeset! {
                Literal(Atom("p".to_owned()), true),
                Literal(Atom("q".to_owned()), false),
            }),
            Clause(btreeset! {
                Literal(Atom("q".to_owned()), true),
                Literal(Atom("r".to_owned()), true),
            }),
            vec![Clause(btreeset! {
                Literal(Atom("p".to_owned()), true),
                Literal(Atom("r".to_owned()), true),
            })],
        ),
        (
            Clause(btreeset! {
                Literal(Atom("p".to_owned()), true),
            }),
            Clause(btreeset! {
                Literal(Atom("p".to_owned()), false),
            }),
            vec![Clause(btreeset! {})],
        ),
        (
            Clause(btreeset! {
                Literal(Atom("p".to_owned()), true),
                Literal(Atom("q".to_owned()), true),
            }),
            Clause(btreeset! {
                Literal(Atom("r".to_owned()), true),
            }),
            vec![],
        ),
        // Both resolvents of a doubly complementary pair are tautologies.
        (
            Clause(btreeset! {
                Literal(Atom("p".to_owned()), true),
                Literal(Atom("q".to_owned()), true),
            }),
            Clause(btreeset! {
                Literal(Atom("p".to_owned()), false),
                Literal(Atom("q".to_owned()), false),
            }),
            vec![],
        ),
    ];

    for (i, (left, right, expected)) in test_cases.into_iter().enumerate() {
        let result = resolve(&left, &right, &mut DiscardedExplanation);

        assert_eq!(
            result,
            expected,
            "Test case {}; Input: {} and {}",
            i + 1,
            left,
            right
        );
    }
}

#[test]
fn unit_clauses_refute_an_implication_chain() {
    let clauses = ClauseSet(IndexSet::from_iter([
        Clause(btreeset! {
            Literal(Atom("P".to_owned()), true),
        }),
        Clause(btreeset! {
            Literal(Atom("P".to_owned()), false),
            Literal(Atom("Q".to_owned()), true),
        }),
        Clause(btreeset! {
            Literal(Atom("Q".to_owned()), false),
        }),
    ]));

    let mut resolver = Resolver::new(clauses);

    assert!(resolver.is_unsatisfiable(&mut Explanation::default()));
}

#[test]
fn saturation_without_the_empty_clause_is_satisfiable() {
    let test_cases: [ClauseSet; 3] = [
        ClauseSet::default(),
        ClauseSet(IndexSet::from_iter([Clause(btreeset! {
            Literal(Atom("p".to_owned()), true),
            Literal(Atom("q".to_owned()), true),
        })])),
        ClauseSet(IndexSet::from_iter([
            Clause(btreeset! {
                Literal(Atom("p".to_owned()), true),
            }),
            Clause(btreeset! {
                Literal(Atom("p".to_owned()), false),
                Literal(Atom("q".to_owned()), true),
            }),
        ])),
    ];

    for (i, clauses) in test_cases.into_iter().enumerate() {
        let input = clauses.to_string();
        let mut resolver = Resolver::new(clauses);

        assert!(
            !resolver.is_unsatisfiable(&mut DiscardedExplanation),
            "Test case {}; Input: {}",
            i + 1,
            input
        );
    }
}

#[test]
fn an_empty_clause_is_already_a_refutation() {
    let clauses = ClauseSet(IndexSet::from_iter([
        Clause(btreeset! {
            Literal(Atom("p".to_owned()), true),
        }),
        Clause(btreeset! {}),
    ]));

    let mut resolver = Resolver::new(clauses);

    assert!(resolver.is_unsatisfiable(&mut DiscardedExplanation));
}

#[test]
fn satisfiability_of_formulas() {
    let test_cases: [(&str, bool); 9] = [
        ("p ∧ ¬p", true),
        ("p", false),
        ("p ∨ ¬p", false),
        ("(p ∨ q) ∧ ¬p ∧ ¬q", true),
        ("(p → q) ∧ p ∧ ¬q", true),
        ("(p → q) ∧ (q → r) ∧ p ∧ ¬r", true),
        ("(p ∨ q) ∧ (¬p ∨ q)", false),
        ("(p ↔ q) ∧ p ∧ ¬q", true),
        ("¬(p → p)", true),
    ];

    for (i, (input, expected)) in test_cases.into_iter().enumerate() {
        let result = resolution_unsat(input, &mut Explanation::default());

        assert_eq!(
            result,
            Ok(expected),
            "Test case {}; Input: {}",
            i + 1,
            input
        );
    }
}

#[test]
fn refutations_are_narrated() {
    let mut explanation = Explanation::new("Refuting p ∧ ¬p");
    let result = resolution_unsat("p ∧ ¬p", &mut explanation);

    assert_eq!(result, Ok(true));

    let narration = explanation.to_string();

    assert!(narration.contains("resolution"));
    assert!(narration.contains("empty clause"));
}
