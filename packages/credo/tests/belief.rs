use credo::{
    belief::BeliefBase,
    explanation::Explanation,
    parser::ParseError,
    Error,
};

#[test]
fn added_beliefs_are_listed_in_insertion_order() {
    let mut base = BeliefBase::new();

    assert!(base.is_empty());

    let first = base.add("P", BeliefBase::DEFAULT_PRIORITY, &mut Explanation::default());
    let second = base.add("¬P ∨ Q", 2, &mut Explanation::default());

    assert_eq!(first, Ok(true));
    assert_eq!(second, Ok(true));
    assert_eq!(base.len(), 2);
    assert_eq!(base.formulas().collect::<Vec<_>>(), ["P", "¬P ∨ Q"]);
    assert_eq!(base.entries()[0].priority, BeliefBase::DEFAULT_PRIORITY);
    assert_eq!(base.entries()[1].priority, 2);
    assert!(base.contains("P"));
    assert!(base.contains("¬P ∨ Q"));
    assert!(!base.contains("Q"));
}

#[test]
fn duplicate_texts_are_rejected() {
    let mut base = BeliefBase::new();

    assert_eq!(
        base.add("P ∧ Q", 1, &mut Explanation::default()),
        Ok(true)
    );
    assert_eq!(
        base.add("P ∧ Q", 5, &mut Explanation::default()),
        Ok(false)
    );
    assert_eq!(base.len(), 1);
    assert_eq!(base.entries()[0].priority, 1);

    // Identity is syntactic, so a respelling of the same belief is a new entry.
    assert_eq!(
        base.add("P∧Q", 1, &mut Explanation::default()),
        Ok(true)
    );
    assert_eq!(base.len(), 2);
}

#[test]
fn unparsable_beliefs_leave_the_base_unchanged() {
    let mut base = BeliefBase::new();

    let result = base.add("2x", 1, &mut Explanation::default());

    assert_eq!(
        result,
        Err(Error::Parse(ParseError::InvalidLiteral("2x".to_owned())))
    );
    assert!(base.is_empty());
}

#[test]
fn removal_is_by_exact_text() {
    let mut base = BeliefBase::new();
    base.add("P", 1, &mut Explanation::default()).unwrap();
    base.add("Q", 1, &mut Explanation::default()).unwrap();

    base.remove("P");

    assert_eq!(base.formulas().collect::<Vec<_>>(), ["Q"]);

    base.remove("R");

    assert_eq!(base.len(), 1);
}

#[test]
fn bases_display_their_entries() {
    let mut base = BeliefBase::new();
    base.add("P", 1, &mut Explanation::default()).unwrap();
    base.add("¬P ∨ Q", 2, &mut Explanation::default()).unwrap();

    assert_eq!(base.to_string(), "{P (priority 1), ¬P ∨ Q (priority 2)}");
}

#[test]
fn expansion_appends_unless_already_present() {
    let mut base = BeliefBase::new();

    assert_eq!(
        base.expansion("P → Q", 3, &mut Explanation::default()),
        Ok(true)
    );
    assert_eq!(
        base.expansion("P → Q", 3, &mut Explanation::default()),
        Ok(false)
    );
    assert_eq!(base.len(), 1);
}

#[test]
fn modus_ponens_is_entailed() {
    let mut base = BeliefBase::new();
    base.add("¬P ∨ Q", 2, &mut Explanation::default()).unwrap();
    base.add("P", 1, &mut Explanation::default()).unwrap();

    let test_cases: [(&str, bool); 5] = [
        ("Q", true),
        ("P", true),
        ("¬P", false),
        ("R", false),
        ("¬R", false),
    ];

    for (i, (query, expected)) in test_cases.into_iter().enumerate() {
        let result = base.entails(query, &mut Explanation::default());

        assert_eq!(
            result,
            Ok(expected),
            "Test case {}; Input: {}",
            i + 1,
            query
        );
    }
}

#[test]
fn an_empty_base_entails_only_tautologies() {
    let base = BeliefBase::new();

    let test_cases: [(&str, bool); 4] = [
        ("P", false),
        ("P ∨ ¬P", true),
        ("P → P", true),
        ("P ∧ ¬P", false),
    ];

    for (i, (query, expected)) in test_cases.into_iter().enumerate() {
        let result = base.entails(query, &mut Explanation::default());

        assert_eq!(
            result,
            Ok(expected),
            "Test case {}; Input: {}",
            i + 1,
            query
        );
    }
}

#[test]
fn entailment_sees_through_double_negation() {
    let mut base = BeliefBase::new();
    base.add("¬P ∨ Q", 2, &mut Explanation::default()).unwrap();
    base.add("P", 1, &mut Explanation::default()).unwrap();

    assert_eq!(base.entails("¬¬Q", &mut Explanation::default()), Ok(true));
}

#[test]
fn an_inconsistent_base_entails_everything() {
    let mut base = BeliefBase::new();
    base.add("P", 1, &mut Explanation::default()).unwrap();
    base.add("¬P", 1, &mut Explanation::default()).unwrap();

    assert_eq!(base.entails("R", &mut Explanation::default()), Ok(true));
}

#[test]
fn unparsable_queries_are_errors() {
    let mut base = BeliefBase::new();
    base.add("P", 1, &mut Explanation::default()).unwrap();

    let result = base.entails("((", &mut Explanation::default());

    assert!(matches!(result, Err(Error::Parse(_))));
}
