use std::{any::Any, fmt::Debug, str::FromStr};

use colored::Colorize;
use thiserror::Error;
use winnow::{
    ascii::multispace0,
    combinator::{alt, delimited, preceded},
    error::{ErrMode, ErrorKind, ParserError},
    stream::Stream,
    token::take_while,
    PResult, Parser, Stateful,
};

use crate::{
    ast::{Atom, Formula},
    explanation::{Explain, Explanation},
};

/// Why an input string is not a formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("cannot parse an empty formula")]
    EmptyInput,
    #[error("invalid literal name `{0}`")]
    InvalidLiteral(String),
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unmatched parenthesis")]
    UnmatchedParenthesis,
    #[error("trailing input `{0}` after a complete formula")]
    TrailingInput(String),
}

#[derive(Debug)]
struct State {
    explanation: Explanation,
}

type Input<'a> = Stateful<&'a str, State>;

type ParseResult<T> = PResult<T, ParseError>;

impl<'a> ParserError<Input<'a>> for ParseError {
    fn from_error_kind(input: &Input<'a>, _kind: ErrorKind) -> Self {
        unexpected(input)
    }

    fn append(
        self,
        _input: &Input<'a>,
        _token_start: &<Input<'a> as Stream>::Checkpoint,
        _kind: ErrorKind,
    ) -> Self {
        self
    }
}

/// Parses a formula, narrating every attempted grammar rule into `explanation`.
///
/// The whole input must be consumed; anything left over after a complete
/// formula is reported as trailing input.
pub fn parse_formula(input: &str, explanation: &mut Explanation) -> Result<Formula, ParseError> {
    let input = input.trim();

    if input.is_empty() {
        explanation.step(|| "Nothing to parse in an empty formula");
        return Err(ParseError::EmptyInput);
    }

    let state = State {
        explanation: explanation.clone(),
    };
    let mut parser_input = Stateful { input, state };

    let result = formula.parse_next(&mut parser_input);

    let _ = std::mem::replace(explanation, parser_input.state.explanation);

    match result {
        Ok(parsed) => {
            let rest = parser_input.input.trim_start();

            if rest.is_empty() {
                Ok(parsed)
            } else if rest.starts_with(')') {
                Err(ParseError::UnmatchedParenthesis)
            } else {
                Err(ParseError::TrailingInput(
                    next_token(rest).unwrap_or_default(),
                ))
            }
        }
        Err(ErrMode::Backtrack(error)) | Err(ErrMode::Cut(error)) => Err(error),
        Err(ErrMode::Incomplete(_)) => unimplemented!(),
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Formula, ParseError> {
        parse_formula(s, &mut Explanation::default())
    }
}

fn formula(input: &mut Input) -> ParseResult<Formula> {
    describe(equivalence, "formula").parse_next(input)
}

fn equivalence(input: &mut Input) -> ParseResult<Formula> {
    describe(
        binary_level(
            implication,
            describe('↔', "equivalence logical connective"),
            Formula::Equivalence,
        ),
        "equivalence or formula without equivalences",
    )
    .parse_next(input)
}

fn implication(input: &mut Input) -> ParseResult<Formula> {
    describe(
        binary_level(
            disjunction,
            describe('→', "implication logical connective"),
            Formula::Implication,
        ),
        "implication or formula without implications or equivalences",
    )
    .parse_next(input)
}

fn disjunction(input: &mut Input) -> ParseResult<Formula> {
    describe(
        binary_level(
            conjunction,
            describe('∨', "disjunction logical connective"),
            Formula::Disjunction,
        ),
        "disjunction or formula without disjunctions or looser connectives",
    )
    .parse_next(input)
}

fn conjunction(input: &mut Input) -> ParseResult<Formula> {
    describe(
        binary_level(
            negation_level,
            describe('∧', "conjunction logical connective"),
            Formula::Conjunction,
        ),
        "conjunction or formula without binary logical connectives",
    )
    .parse_next(input)
}

fn negation_level(input: &mut Input) -> ParseResult<Formula> {
    preceded(multispace0, alt((negation, factor))).parse_next(input)
}

fn negation(input: &mut Input) -> ParseResult<Formula> {
    describe(
        preceded(
            describe('¬', "negation logical connective"),
            or_fail(negation_level, unexpected),
        )
        .map(|operand| Formula::Negation(Box::new(operand))),
        "negation",
    )
    .parse_next(input)
}

fn factor(input: &mut Input) -> ParseResult<Formula> {
    describe(alt((parenthesized, literal)), "base expression").parse_next(input)
}

fn parenthesized(input: &mut Input) -> ParseResult<Formula> {
    describe(
        delimited(
            '(',
            or_fail(equivalence, unexpected),
            or_fail(preceded(multispace0, ')'), |_| {
                ParseError::UnmatchedParenthesis
            }),
        ),
        "parenthesized formula",
    )
    .parse_next(input)
}

fn literal(input: &mut Input) -> ParseResult<Formula> {
    describe(atom.map(Formula::from), "literal").parse_next(input)
}

fn atom(input: &mut Input) -> ParseResult<Atom> {
    let name = take_while(1.., |c: char| !c.is_whitespace() && !is_symbol_char(c))
        .parse_next(input)?;

    // A name is a run of alphanumerics and underscores containing at least
    // one alphanumeric, and must not start with a digit.
    let is_valid = !name.starts_with(|c: char| c.is_numeric())
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !name.chars().all(|c| c == '_');

    if !is_valid {
        return Err(ErrMode::Cut(ParseError::InvalidLiteral(name.to_string())));
    }

    Ok(Atom(name.to_string()))
}

/// Left-associative chain of one precedence level: `operand` separated by
/// `connective`, folded as it is consumed. A connective with no operand after
/// it is a fatal error rather than a backtrack.
fn binary_level<'a>(
    mut operand: impl Parser<Input<'a>, Formula, ParseError>,
    connective: impl Parser<Input<'a>, char, ParseError>,
    build: fn(Box<Formula>, Box<Formula>) -> Formula,
) -> impl FnMut(&mut Input<'a>) -> ParseResult<Formula> {
    let mut connective = spaced(connective);

    move |input| {
        let mut left = operand.parse_next(input)?;

        loop {
            let checkpoint = input.checkpoint();

            match connective.parse_next(input) {
                Ok(_) => {}
                Err(ErrMode::Backtrack(_)) => {
                    input.reset(&checkpoint);
                    return Ok(left);
                }
                Err(e) => return Err(e),
            }

            match operand.parse_next(input) {
                Ok(right) => left = build(Box::new(left), Box::new(right)),
                Err(ErrMode::Backtrack(_)) => return Err(ErrMode::Cut(unexpected(input))),
                Err(e) => return Err(e),
            }
        }
    }
}

/// Upgrades a backtrack into a fatal error built from the current position.
fn or_fail<'a, T>(
    mut parser: impl Parser<Input<'a>, T, ParseError>,
    error: fn(&Input<'a>) -> ParseError,
) -> impl FnMut(&mut Input<'a>) -> ParseResult<T> {
    move |input| {
        let checkpoint = input.checkpoint();

        match parser.parse_next(input) {
            Err(ErrMode::Backtrack(_)) => {
                input.reset(&checkpoint);
                Err(ErrMode::Cut(error(input)))
            }
            result => result,
        }
    }
}

fn unexpected(input: &Input) -> ParseError {
    match next_token(input.input) {
        Some(token) => ParseError::UnexpectedToken(token),
        None => ParseError::UnexpectedEnd,
    }
}

fn next_token(input: &str) -> Option<String> {
    let input = input.trim_start();
    let first = input.chars().next()?;

    if is_symbol_char(first) {
        return Some(first.to_string());
    }

    Some(
        input
            .chars()
            .take_while(|c| !c.is_whitespace() && !is_symbol_char(*c))
            .collect(),
    )
}

fn is_symbol_char(c: char) -> bool {
    matches!(c, '¬' | '∧' | '∨' | '→' | '↔' | '(' | ')')
}

fn spaced<'a, T>(
    parser: impl Parser<Input<'a>, T, ParseError>,
) -> impl Parser<Input<'a>, T, ParseError> {
    delimited(multispace0, parser, multispace0)
}

fn describe<'a, T: Any>(
    mut parser: impl Parser<Input<'a>, T, ParseError>,
    what: &'static str,
) -> impl FnMut(&mut Input<'a>) -> ParseResult<T>
where
    T: Debug,
{
    move |input| {
        let input_str = input.input;

        let subexplanation = input.state.explanation.subexplanation(|| {
            format!(
                "Trying to parse {} at the beginning of '{}'",
                what.magenta(),
                input_str.cyan()
            )
        });

        let mut next_input = Input {
            input: input.input,
            state: State {
                explanation: subexplanation.clone(),
            },
        };

        let result = parser.parse_next(&mut next_input);

        next_input.state.explanation.with_subexplanation(
            || "Result",
            |explanation| match &result {
                Ok(result) => {
                    let result_any = result as &dyn Any;
                    if let Some(formula) = result_any.downcast_ref::<Formula>() {
                        explanation.use_tree(formula.get_tree());
                    } else {
                        explanation.step(|| format!("{result:?}"));
                    }
                }
                Err(e) => explanation.step(|| match e {
                    ErrMode::Backtrack(_) => "Backtrack".yellow().to_string(),
                    ErrMode::Cut(e) => {
                        format!("Fatal parsing error: {}", e.to_string().red())
                    }
                    ErrMode::Incomplete(_) => unimplemented!(),
                }),
            },
        );

        let _ = std::mem::replace(subexplanation, next_input.state.explanation);
        input.input = next_input.input;

        result
    }
}
