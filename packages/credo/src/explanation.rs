use std::fmt::{self, Display};

use enum_as_inner::EnumAsInner;
use termtree::Tree;

/// Sink for step-by-step narration of an operation.
///
/// Steps are built lazily so that callers which discard the narration
/// (via [`DiscardedExplanation`]) pay nothing for formatting.
pub trait Explain {
    fn step<S: Into<String>>(&mut self, step: impl FnOnce() -> S);

    fn subexplanation<S: Into<String>>(&mut self, description: impl FnOnce() -> S) -> &mut Self;

    fn with_subexplanation<S: Into<String>, T>(
        &mut self,
        description: impl FnOnce() -> S,
        function: impl FnOnce(&mut Self) -> T,
    ) -> T {
        function(self.subexplanation(description))
    }

    fn use_tree(&mut self, tree: Tree<String>);
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, EnumAsInner)]
pub enum ExplanationComponent {
    Step(String),
    Explanation(Explanation),
}

impl ExplanationComponent {
    fn from_tree(tree: Tree<String>) -> ExplanationComponent {
        if tree.leaves.is_empty() {
            ExplanationComponent::Step(tree.root)
        } else {
            let mut explanation = Explanation::new(tree.root);
            for leaf in tree.leaves {
                explanation.components.push(ExplanationComponent::from_tree(leaf));
            }
            ExplanationComponent::Explanation(explanation)
        }
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Explanation {
    pub description: String,
    pub components: Vec<ExplanationComponent>,
}

impl Explanation {
    pub fn new(description: impl Into<String>) -> Explanation {
        Explanation {
            description: description.into(),
            components: Vec::new(),
        }
    }

    pub fn get_tree(&self) -> Tree<String> {
        let mut tree = Tree::new(self.description.clone());

        for component in &self.components {
            match component {
                ExplanationComponent::Step(step) => tree.push(Tree::new(step.clone())),
                ExplanationComponent::Explanation(explanation) => tree.push(explanation.get_tree()),
            };
        }

        tree
    }
}

impl Explain for Explanation {
    fn step<S: Into<String>>(&mut self, step: impl FnOnce() -> S) {
        let step = step().into();

        // Collapse immediate repetitions of the same step.
        if let Some(ExplanationComponent::Step(last_step)) = self.components.last() {
            if last_step == &step {
                return;
            }
        }

        self.components.push(ExplanationComponent::Step(step));
    }

    fn subexplanation<S: Into<String>>(&mut self, description: impl FnOnce() -> S) -> &mut Self {
        let explanation = Explanation::new(description());
        self.components
            .push(ExplanationComponent::Explanation(explanation));

        self.components
            .last_mut()
            .unwrap()
            .as_explanation_mut()
            .unwrap()
    }

    fn use_tree(&mut self, tree: Tree<String>) {
        self.components.push(ExplanationComponent::from_tree(tree));
    }
}

impl Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_tree())
    }
}

/// Implementation of [`Explain`] which throws away everything it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardedExplanation;

impl Explain for DiscardedExplanation {
    fn step<S: Into<String>>(&mut self, _step: impl FnOnce() -> S) {}

    fn subexplanation<S: Into<String>>(&mut self, _description: impl FnOnce() -> S) -> &mut Self {
        self
    }

    fn use_tree(&mut self, _tree: Tree<String>) {}
}
