//! A `nom`-based parser for rule expressions.
use crate::ast::Expression;
use crate::error::TransformError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, char},
    combinator::{map, recognize, rest, verify},
    sequence::{pair, preceded},
};

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, TransformError> {
    if input.is_empty() {
        return Ok(Expression::Empty);
    }
    match expression(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((remainder, _)) => Err(TransformError::ExpressionParse(
            input.to_string(),
            format!("parser did not consume all input, remainder: '{}'", remainder),
        )),
        Err(e) => Err(TransformError::ExpressionParse(input.to_string(), e.to_string())),
    }
}

// --- Combinators ---

fn expression(input: &str) -> IResult<&str, Expression> {
    alt((literal, function_call)).parse(input)
}

/// A leading `"` makes the whole expression a literal; the trailing quote is
/// stripped when present, so a lone `"` is the empty literal.
fn literal(input: &str) -> IResult<&str, Expression> {
    map(preceded(char('"'), rest), |body: &str| {
        Expression::Literal(body.strip_suffix('"').unwrap_or(body).to_string())
    })
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

/// `name(argument)`: the argument is everything between the first `(` and
/// the last `)`, verbatim, so nested parentheses are legal.
fn function_call(input: &str) -> IResult<&str, Expression> {
    map(
        (identifier, char('('), verify(rest, |body: &str| body.ends_with(')'))),
        |(name, _, body): (&str, char, &str)| Expression::Call {
            name: name.to_string(),
            arg: body[..body.len() - 1].to_string(),
        },
    )
    .parse(input)
}
