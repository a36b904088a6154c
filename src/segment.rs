use num_bigint::BigInt;

use crate::bitstring::BitString;
use crate::eval::Expr;

/// A literal value carried by a segment: either what the builder encodes, or
/// what the matcher must find equal to the extracted value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(BigInt),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Bits(BitString),
    Bool(bool),
}

/// What a segment's `value` position names.
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentValue {
    /// A literal to encode (builder) or match for equality (pattern).
    Literal(Literal),
    /// A named slot: a variable to resolve (builder) or bind (pattern).
    /// Qualified names (`lang.x`) are carried verbatim.
    Variable(String),
    /// Pattern-only: consume bits without binding.
    Wildcard,
}

/// A segment's `size` position.
#[derive(Clone, Debug, PartialEq)]
pub enum SizeSpec {
    /// No size given; defaults apply per type (§4.C), or — in a pattern's
    /// final segment — "the rest".
    Unspecified,
    /// A constant size known without evaluation.
    Const(u64),
    /// An arithmetic expression, evaluated against bound/environment variables.
    Dynamic(Expr),
}

impl SizeSpec {
    /// A size spec built directly from a bare identifier, e.g. `len` in `x:len`.
    pub fn var(name: impl Into<String>) -> SizeSpec {
        SizeSpec::Dynamic(Expr::Var(name.into()))
    }
}

/// One segment of a bitstring literal: a value, optional size, and an
/// ordered list of specifier tokens (§3).
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub value: SegmentValue,
    pub size: SizeSpec,
    pub specifiers: Vec<String>,
}

impl Segment {
    pub fn new(value: SegmentValue, size: SizeSpec, specifiers: Vec<String>) -> Self {
        Segment {
            value,
            size,
            specifiers,
        }
    }

    /// Shorthand for a plain integer literal segment with a constant size.
    pub fn int(value: i64, size: u64, specifiers: &[&str]) -> Self {
        Segment {
            value: SegmentValue::Literal(Literal::Int(BigInt::from(value))),
            size: SizeSpec::Const(size),
            specifiers: specifiers.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Shorthand for a named variable segment with a constant size.
    pub fn var(name: &str, size: u64, specifiers: &[&str]) -> Self {
        Segment {
            value: SegmentValue::Variable(name.to_string()),
            size: SizeSpec::Const(size),
            specifiers: specifiers.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Shorthand for a named variable segment with a dynamic size expression.
    pub fn var_dynamic(name: &str, size: Expr, specifiers: &[&str]) -> Self {
        Segment {
            value: SegmentValue::Variable(name.to_string()),
            size: SizeSpec::Dynamic(size),
            specifiers: specifiers.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Shorthand for a sizeless rest segment (binary/bitstring/utf*).
    pub fn rest(value: SegmentValue, specifiers: &[&str]) -> Self {
        Segment {
            value,
            size: SizeSpec::Unspecified,
            specifiers: specifiers.iter().map(|s| s.to_string()).collect(),
        }
    }
}
