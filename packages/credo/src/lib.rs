pub mod ast;
pub mod belief;
pub mod clauses;
pub mod evaluate;
pub mod explanation;
pub mod normal_forms;
pub mod parser;
pub mod resolution;

use thiserror::Error;

/// Any failure a belief base operation can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] parser::ParseError),
    #[error(transparent)]
    Transform(#[from] normal_forms::TransformError),
}
