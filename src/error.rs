#![allow(non_local_definitions)] // false positive for displaydoc::Display: https://github.com/yaahc/displaydoc/issues/46

use displaydoc::Display;
use thiserror::Error;

/// Failure resolving a specifier token list (§4.B).
#[derive(Clone, Debug, Display, PartialEq, Eq, Error)]
pub enum SpecifierError {
    /// unrecognized specifier token: {0:?}
    UnknownToken(String),
    /// `unit:<N>` must be the last element of a compound specifier, found in {0:?}
    UnitNotLast(String),
    /// `unit:<N>` has a non-numeric or non-positive argument: {0:?}
    InvalidUnit(String),
}

/// Failure evaluating a dynamic-size arithmetic expression (§4.D).
#[derive(Clone, Debug, Display, PartialEq, Eq, Error)]
pub enum EvalError {
    /// could not parse size expression: {0}
    Parse(String),
    /// division by zero in size expression
    DivisionByZero,
    /// big integer overflow in size expression
    Overflow,
    /// size expression evaluated to a negative value
    NegativeSize,
    /// undefined variable in size expression: {0}
    UndefinedVariable(String),
}

/// Construction-time failure (§4.C).
#[derive(Debug, Display, Error)]
pub enum BuildError {
    /// segment {segment}: could not convert value for encoding: {msg}
    ValueConversion { segment: usize, msg: String },
    /// segment {segment}: could not resolve size: {msg}
    SizeConversion { segment: usize, msg: String },
    /// segment {segment}: {source}
    SpecifierParse {
        segment: usize,
        #[source]
        source: SpecifierError,
    },
    /// segment {segment}: integer segment exceeds {limit} bits (requested {bits})
    IntegerSize {
        segment: usize,
        bits: u64,
        limit: u64,
    },
    /// segment {segment}: binary/bitstring segment exceeds {limit} bits (requested {bits})
    BinarySize {
        segment: usize,
        bits: u64,
        limit: u64,
    },
    /// segment {segment}: float segment width must be 16, 32 or 64 bits, got {bits}
    FloatSize { segment: usize, bits: u64 },
    /// segment {segment}: unsupported type specifier: {type_name}
    UnsupportedType { segment: usize, type_name: String },
    /// segment {segment}: value is a non-whole float, cannot encode as integer
    IntegerType { segment: usize },
    /// segment {segment}: invalid value for UTF encoding
    UtfType { segment: usize },
    /// segment {segment}: {source}
    Eval {
        segment: usize,
        #[source]
        source: EvalError,
    },
}

/// Match-time failure (§4.D).
#[derive(Debug, Display, Error)]
pub enum MatchError {
    /// pattern has no rest segment but total size {expected} bits does not match data length {actual} bits
    SizeMismatch { expected: u64, actual: u64 },
    /// segment {segment}: extracted value does not equal literal pattern value
    SegmentConstantMismatch { segment: usize },
    /// segment {segment}: invalid pattern: {msg}
    InvalidPattern { segment: usize, msg: String },
    /// segment {segment}: {source}
    SpecifierParse {
        segment: usize,
        #[source]
        source: SpecifierError,
    },
    /// segment {segment}: {source}
    Eval {
        segment: usize,
        #[source]
        source: EvalError,
    },
    /// not enough bits remaining to satisfy segment {segment} (needs {needed}, has {available})
    InsufficientBits {
        segment: usize,
        needed: u64,
        available: u64,
    },
}

/// A specialized `Result` for builder operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// A specialized `Result` for matcher operations.
pub type MatchResult<T> = Result<T, MatchError>;
