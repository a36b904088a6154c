use num_bigint::BigInt;

use crate::bitstring::BitString;

/// A value crossing the build/match boundary.
///
/// This is the single sum type the rest of the crate works with instead of
/// juggling host integers and arbitrary-precision integers separately (see
/// the Design Notes on a unified value type). Arithmetic in the dynamic-size
/// evaluator always coerces to [`Value::BigInt`]; narrowing back to a target
/// width happens explicitly in `builder`/`matcher`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A host-width signed integer.
    I64(i64),
    /// An arbitrary-precision integer.
    BigInt(BigInt),
    /// An IEEE-754 double.
    F64(f64),
    /// A boolean.
    Bool(bool),
    /// A UTF-8 string.
    Str(String),
    /// An opaque byte sequence.
    Bytes(Vec<u8>),
    /// A bit-granular sequence.
    Bits(BitString),
}

impl Value {
    /// Coerce to a [`BigInt`] if this value is integer-shaped.
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Value::I64(i) => Some(BigInt::from(*i)),
            Value::BigInt(b) => Some(b.clone()),
            Value::F64(f) if f.is_finite() && f.fract() == 0.0 => {
                num_traits::cast::FromPrimitive::from_f64(*f)
            }
            _ => None,
        }
    }

    /// Coerce to an `f64` if this value is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I64(i) => Some(*i as f64),
            Value::F64(f) => Some(*f),
            Value::BigInt(b) => big_to_f64(b),
            _ => None,
        }
    }

    /// Narrow to a host `i64` when the value fits exactly.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            Value::BigInt(b) => i64::try_from(b).ok(),
            Value::F64(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 => {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    /// Borrow this value as raw bytes, if it holds a byte- or string-shaped payload.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::Str(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<BitString> for Value {
    fn from(v: BitString) -> Self {
        Value::Bits(v)
    }
}

fn big_to_f64(b: &BigInt) -> Option<f64> {
    use num_traits::ToPrimitive;
    b.to_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i64_round_trips_through_bigint() {
        let v = Value::I64(42);
        assert_eq!(v.as_bigint(), Some(BigInt::from(42)));
        assert_eq!(v.as_i64(), Some(42));
    }

    #[test]
    fn whole_float_coerces_to_bigint() {
        let v = Value::F64(7.0);
        assert_eq!(v.as_bigint(), Some(BigInt::from(7)));
    }

    #[test]
    fn fractional_float_has_no_bigint() {
        let v = Value::F64(7.5);
        assert_eq!(v.as_bigint(), None);
    }

    #[test]
    fn bytes_and_str_expose_as_bytes() {
        assert_eq!(Value::Bytes(vec![1, 2]).as_bytes(), Some(&[1u8, 2u8][..]));
        assert_eq!(Value::Str("hi".into()).as_bytes(), Some(b"hi".as_slice()));
        assert_eq!(Value::Bool(true).as_bytes(), None);
    }
}
