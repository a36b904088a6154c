//! The embedded arithmetic evaluator used to resolve dynamic segment sizes.
//!
//! Grammar (integers, identifiers, `+ - * /`, parentheses, unary `+`/`-`):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-')? atom
//! atom   := integer | identifier | '(' expr ')'
//! ```
//!
//! Parsing is built with `nom`, repointed here from BER/DER grammar to this
//! small arithmetic one. Evaluation always runs over [`BigInt`]; the crate's
//! integer/binary segment encoders are the ones responsible for narrowing a
//! resolved size down to a host width.

use std::collections::BTreeSet;
use std::fmt;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, digit1, multispace0};
use nom::combinator::{map, recognize};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;
use num_bigint::BigInt;
use num_traits::Zero;

use crate::error::EvalError;

/// An arithmetic expression over integers and identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Num(BigInt),
    Var(String),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

impl Expr {
    /// Collect the set of free variable names referenced by this expression.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) => {}
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
            Expr::Neg(a) => a.collect_vars(out),
        }
    }

    /// A single bare identifier, if this expression is nothing but a variable
    /// reference (the common case: `size = N` where `N` names a prior bound
    /// variable rather than a compound expression).
    pub fn as_bare_var(&self) -> Option<&str> {
        match self {
            Expr::Var(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Evaluate this expression with `resolve` answering free variable
    /// lookups. Always computes in arbitrary precision.
    pub fn eval(&self, resolve: &dyn Fn(&str) -> Option<BigInt>) -> Result<BigInt, EvalError> {
        match self {
            Expr::Num(n) => Ok(n.clone()),
            Expr::Var(name) => resolve(name)
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Expr::Add(a, b) => Ok(a.eval(resolve)? + b.eval(resolve)?),
            Expr::Sub(a, b) => Ok(a.eval(resolve)? - b.eval(resolve)?),
            Expr::Mul(a, b) => Ok(a.eval(resolve)? * b.eval(resolve)?),
            Expr::Div(a, b) => {
                let divisor = b.eval(resolve)?;
                if divisor.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(a.eval(resolve)? / divisor)
            }
            Expr::Neg(a) => Ok(-a.eval(resolve)?),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(n) => write!(f, "{n}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Sub(a, b) => write!(f, "({a} - {b})"),
            Expr::Mul(a, b) => write!(f, "({a} * {b})"),
            Expr::Div(a, b) => write!(f, "({a} / {b})"),
            Expr::Neg(a) => write!(f, "(-{a})"),
        }
    }
}

/// Parse a full arithmetic expression, failing on any trailing input.
pub fn parse_expr(input: &str) -> Result<Expr, EvalError> {
    let (rest, expr) =
        delimited(multispace0, expr, multispace0)(input).map_err(|e| EvalError::Parse(e.to_string()))?;
    if !rest.is_empty() {
        return Err(EvalError::Parse(format!("trailing input: {rest:?}")));
    }
    Ok(expr)
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(
        delimited(multispace0, alt((tag("+"), tag("-"))), multispace0),
        term,
    ))(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        "+" => Expr::Add(Box::new(acc), Box::new(rhs)),
        _ => Expr::Sub(Box::new(acc), Box::new(rhs)),
    });
    Ok((input, expr))
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = factor(input)?;
    let (input, rest) = many0(pair(
        delimited(multispace0, alt((tag("*"), tag("/"))), multispace0),
        factor,
    ))(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        "*" => Expr::Mul(Box::new(acc), Box::new(rhs)),
        _ => Expr::Div(Box::new(acc), Box::new(rhs)),
    });
    Ok((input, expr))
}

fn factor(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    alt((
        map(preceded(tag("-"), factor), |e| Expr::Neg(Box::new(e))),
        preceded(tag("+"), factor),
        atom,
    ))(input)
}

fn atom(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    alt((
        map(digit1, |s: &str| Expr::Num(s.parse::<BigInt>().expect("digit1 yields a valid integer"))),
        map(identifier, |s: &str| Expr::Var(s.to_string())),
        delimited(
            pair(tag("("), multispace0),
            expr,
            pair(multispace0, tag(")")),
        ),
    ))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_map<'a>(pairs: &'a [(&str, i64)]) -> impl Fn(&str) -> Option<BigInt> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| BigInt::from(*v))
        }
    }

    #[test]
    fn parses_and_evaluates_constants() {
        let expr = parse_expr("2 + 3 * 4").unwrap();
        assert_eq!(expr.eval(&resolve_map(&[])).unwrap(), BigInt::from(14));
    }

    #[test]
    fn parentheses_change_precedence() {
        let expr = parse_expr("(2 + 3) * 4").unwrap();
        assert_eq!(expr.eval(&resolve_map(&[])).unwrap(), BigInt::from(20));
    }

    #[test]
    fn unary_minus_and_variables() {
        let expr = parse_expr("-a + 10").unwrap();
        assert_eq!(
            expr.eval(&resolve_map(&[("a", 3)])).unwrap(),
            BigInt::from(7)
        );
    }

    #[test]
    fn integer_division_truncates_toward_zero() {
        let expr = parse_expr("7 / 2").unwrap();
        assert_eq!(expr.eval(&resolve_map(&[])).unwrap(), BigInt::from(3));
        let expr = parse_expr("-7 / 2").unwrap();
        assert_eq!(expr.eval(&resolve_map(&[])).unwrap(), BigInt::from(-3));
    }

    #[test]
    fn division_by_zero_is_reported() {
        let expr = parse_expr("1 / 0").unwrap();
        assert_eq!(expr.eval(&resolve_map(&[])).unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn undefined_variable_is_reported() {
        let expr = parse_expr("len * len").unwrap();
        assert_eq!(
            expr.eval(&resolve_map(&[])).unwrap_err(),
            EvalError::UndefinedVariable("len".to_string())
        );
    }

    #[test]
    fn free_vars_collects_unique_names() {
        let expr = parse_expr("a + a * b").unwrap();
        let vars = expr.free_vars();
        assert_eq!(vars.len(), 2);
        assert!(vars.contains("a"));
        assert!(vars.contains("b"));
    }

    #[test]
    fn trailing_garbage_is_a_parse_error() {
        assert!(parse_expr("1 +").is_err());
        assert!(parse_expr("1 + 2)").is_err());
        assert!(parse_expr("(1 + 2").is_err());
        assert!(parse_expr("1 2").is_err());
    }

    #[test]
    fn overflow_in_size_narrowing_is_caller_responsibility() {
        // The evaluator itself never overflows (BigInt); narrowing to u64 is
        // done by the caller (builder/matcher), see OVERFLOW_ERROR handling there.
        let expr = parse_expr("999999999999999999999999999999").unwrap();
        let big = expr.eval(&resolve_map(&[])).unwrap();
        assert!(u64::try_from(big).is_err());
    }
}
