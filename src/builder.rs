//! Appends typed segments to a growing [`BitString`] (§4.C).

use num_bigint::BigInt;
use num_traits::cast::FromPrimitive;
use num_traits::ToPrimitive;

use crate::bitstring::BitString;
use crate::env::Environment;
use crate::error::{BuildError, BuildResult, EvalError};
use crate::intbits::encode_integer_bits;
use crate::limits::Limits;
use crate::segment::{Literal, Segment, SegmentValue, SizeSpec};
use crate::specifier::{ResolvedEndianness, SegmentType, Specifiers};
use crate::utf;
use crate::value::Value;

#[cfg(feature = "trace")]
use log::trace;

/// Build a [`BitString`] from `segments`, resolving variables through `env`,
/// using the default size caps.
pub fn build(segments: &[Segment], env: &dyn Environment) -> BuildResult<BitString> {
    build_with_limits(segments, env, &Limits::default())
}

/// As [`build`], with explicit size caps.
pub fn build_with_limits(
    segments: &[Segment],
    env: &dyn Environment,
    limits: &Limits,
) -> BuildResult<BitString> {
    let mut out = BitString::new_empty();
    for (idx, segment) in segments.iter().enumerate() {
        let specs = Specifiers::resolve(&segment.specifiers)
            .map_err(|source| BuildError::SpecifierParse { segment: idx, source })?;
        let value = resolve_segment_value(&segment.value, env, idx)?;
        let contribution = build_segment(idx, &value, &segment.size, &specs, env, limits)?;
        #[cfg(feature = "trace")]
        trace!(
            "segment {idx}: type={:?} bits={}",
            specs.ty,
            contribution.length_bits()
        );
        out.append_bitstring(&contribution);
    }
    Ok(out)
}

fn resolve_segment_value(
    value: &SegmentValue,
    env: &dyn Environment,
    idx: usize,
) -> BuildResult<Value> {
    match value {
        SegmentValue::Literal(lit) => Ok(literal_to_value(lit)),
        SegmentValue::Variable(name) => env.resolve(name).ok_or_else(|| BuildError::ValueConversion {
            segment: idx,
            msg: format!("unresolved variable `{name}`"),
        }),
        SegmentValue::Wildcard => Err(BuildError::ValueConversion {
            segment: idx,
            msg: "wildcard cannot appear in a build segment".to_string(),
        }),
    }
}

fn literal_to_value(lit: &Literal) -> Value {
    match lit {
        Literal::Int(i) => Value::BigInt(i.clone()),
        Literal::Float(f) => Value::F64(*f),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Bytes(b) => Value::Bytes(b.clone()),
        Literal::Bits(b) => Value::Bits(b.clone()),
        Literal::Bool(b) => Value::Bool(*b),
    }
}

fn eval_size(idx: usize, size: &SizeSpec, env: &dyn Environment) -> BuildResult<Option<u64>> {
    match size {
        SizeSpec::Unspecified => Ok(None),
        SizeSpec::Const(n) => Ok(Some(*n)),
        SizeSpec::Dynamic(expr) => {
            let resolve = |name: &str| env.resolve(name).and_then(|v| v.as_bigint());
            let big = expr
                .eval(&resolve)
                .map_err(|source| BuildError::Eval { segment: idx, source })?;
            if big.sign() == num_bigint::Sign::Minus {
                return Err(BuildError::Eval {
                    segment: idx,
                    source: EvalError::NegativeSize,
                });
            }
            let n: u64 = big.to_u64().ok_or(BuildError::Eval {
                segment: idx,
                source: EvalError::Overflow,
            })?;
            Ok(Some(n))
        }
    }
}

fn infer_type(value: &Value) -> SegmentType {
    match value {
        Value::I64(_) | Value::BigInt(_) | Value::Bool(_) => SegmentType::Integer,
        Value::F64(_) => SegmentType::Float,
        Value::Str(_) | Value::Bytes(_) => SegmentType::Binary,
        Value::Bits(_) => SegmentType::BitString,
    }
}

fn value_as_bigint_strict(value: &Value, idx: usize) -> BuildResult<BigInt> {
    match value {
        Value::I64(i) => Ok(BigInt::from(*i)),
        Value::BigInt(b) => Ok(b.clone()),
        Value::Bool(b) => Ok(BigInt::from(*b as i64)),
        Value::F64(f) if f.fract() == 0.0 && f.is_finite() => {
            BigInt::from_f64(*f).ok_or(BuildError::IntegerType { segment: idx })
        }
        Value::F64(_) => Err(BuildError::IntegerType { segment: idx }),
        _ => Err(BuildError::ValueConversion {
            segment: idx,
            msg: "value is not integer-shaped".to_string(),
        }),
    }
}

fn build_segment(
    idx: usize,
    value: &Value,
    size: &SizeSpec,
    specs: &Specifiers,
    env: &dyn Environment,
    limits: &Limits,
) -> BuildResult<BitString> {
    let ty = match specs.ty {
        SegmentType::Inferred => infer_type(value),
        other => other,
    };
    let size_bits = eval_size(idx, size, env)?;
    let endian = specs.endianness.resolved();

    match ty {
        SegmentType::Integer => {
            let bits = size_bits.unwrap_or(8) * u64::from(specs.unit);
            if bits > limits.max_integer_bits {
                return Err(BuildError::IntegerSize {
                    segment: idx,
                    bits,
                    limit: limits.max_integer_bits,
                });
            }
            if bits == 0 {
                return Ok(BitString::new_empty());
            }
            let big = value_as_bigint_strict(value, idx)?;
            Ok(encode_integer_bits(&big, bits, specs.signed, endian))
        }
        SegmentType::Float => {
            let bits = size_bits.unwrap_or(64) * u64::from(specs.unit);
            if bits != 16 && bits != 32 && bits != 64 {
                return Err(BuildError::FloatSize { segment: idx, bits });
            }
            let f = value.as_f64().ok_or_else(|| BuildError::ValueConversion {
                segment: idx,
                msg: "value is not float-shaped".to_string(),
            })?;
            Ok(encode_float_bits(f, bits, endian))
        }
        SegmentType::Binary => encode_binary_segment(idx, value, size_bits, specs, limits),
        SegmentType::BitString => {
            // size options are ignored when appending an existing bitstring
            match value {
                Value::Bits(b) => Ok(b.clone()),
                Value::Bytes(b) => Ok(BitString::from_bytes(b)),
                Value::Str(s) => Ok(BitString::from_bytes(s.as_bytes())),
                _ => Err(BuildError::ValueConversion {
                    segment: idx,
                    msg: "value is not bitstring-shaped".to_string(),
                }),
            }
        }
        SegmentType::Utf8 | SegmentType::Utf16 | SegmentType::Utf32 => {
            if !matches!(size, SizeSpec::Unspecified) {
                return Err(BuildError::SizeConversion {
                    segment: idx,
                    msg: "UTF segments do not accept a size".to_string(),
                });
            }
            encode_utf_segment(idx, value, ty, endian)
        }
        SegmentType::Inferred => unreachable!("resolved above"),
    }
}

fn encode_binary_segment(
    idx: usize,
    value: &Value,
    size_bits: Option<u64>,
    specs: &Specifiers,
    limits: &Limits,
) -> BuildResult<BitString> {
    let target_bits = size_bits.map(|n| n * u64::from(specs.unit));
    if let Some(bits) = target_bits {
        if bits > limits.max_binary_bits {
            return Err(BuildError::BinarySize {
                segment: idx,
                bits,
                limit: limits.max_binary_bits,
            });
        }
    }

    // An existing bitstring appended as a `binary` segment ignores width
    // fitting and is elided if empty and a size was requested (§4.C Empty
    // segments): sizing an already-fixed-length object is meaningless.
    if let Value::Bits(bits) = value {
        if bits.is_empty() && target_bits.is_some() {
            return Ok(BitString::new_empty());
        }
        return Ok(bits.clone());
    }

    let natural: Vec<u8> = match value {
        Value::Bytes(b) => b.clone(),
        Value::Str(s) => s.as_bytes().to_vec(),
        Value::I64(_) | Value::BigInt(_) => {
            let big = value_as_bigint_strict(value, idx)?;
            big.to_signed_bytes_be()
        }
        Value::Bool(b) => vec![*b as u8],
        Value::F64(_) | Value::Bits(_) => {
            return Err(BuildError::ValueConversion {
                segment: idx,
                msg: "value is not binary-shaped".to_string(),
            })
        }
    };

    if natural.is_empty() && target_bits.is_some() {
        return Ok(BitString::new_empty());
    }

    let target_bits = match target_bits {
        Some(bits) => bits,
        None => (natural.len() as u64) * 8,
    };
    if target_bits == 0 {
        return Ok(BitString::new_empty());
    }
    Ok(fit_bytes_to_width(&natural, target_bits))
}

fn fit_bytes_to_width(natural: &[u8], target_bits: u64) -> BitString {
    let target_bytes = ((target_bits + 7) / 8) as usize;
    let mut buf = natural.to_vec();
    buf.resize(target_bytes, 0u8);
    if target_bits % 8 == 0 {
        BitString::from_bytes(&buf)
    } else {
        let skip = target_bytes * 8 - target_bits as usize;
        let full: bitvec::vec::BitVec<u8, bitvec::order::Msb0> = bitvec::vec::BitVec::from_slice(&buf);
        BitString::from_bits(full[skip..].iter().map(|b| *b))
    }
}

fn encode_utf_segment(
    idx: usize,
    value: &Value,
    ty: SegmentType,
    endian: ResolvedEndianness,
) -> BuildResult<BitString> {
    match value {
        Value::Str(s) if ty == SegmentType::Utf8 => Ok(BitString::from_bytes(&utf::encode_utf8_str(s))),
        Value::Str(s) => {
            let mut out = Vec::new();
            for ch in s.chars() {
                let bytes = utf::encode_codepoint(ch as u32, ty, endian)
                    .map_err(|_| BuildError::UtfType { segment: idx })?;
                out.extend(bytes);
            }
            Ok(BitString::from_bytes(&out))
        }
        _ => {
            let cp = value
                .as_i64()
                .and_then(|i| u32::try_from(i).ok())
                .ok_or(BuildError::UtfType { segment: idx })?;
            let bytes =
                utf::encode_codepoint(cp, ty, endian).map_err(|_| BuildError::UtfType { segment: idx })?;
            Ok(BitString::from_bytes(&bytes))
        }
    }
}

fn encode_float_bits(f: f64, bits: u64, endian: ResolvedEndianness) -> BitString {
    match bits {
        64 => {
            let raw = f.to_bits();
            BitString::from_bytes(&match endian {
                ResolvedEndianness::Big => raw.to_be_bytes(),
                ResolvedEndianness::Little => raw.to_le_bytes(),
            })
        }
        32 => {
            let raw = (f as f32).to_bits();
            BitString::from_bytes(&match endian {
                ResolvedEndianness::Big => raw.to_be_bytes(),
                ResolvedEndianness::Little => raw.to_le_bytes(),
            })
        }
        16 => {
            let raw = f32_to_f16_bits(f as f32);
            BitString::from_bytes(&match endian {
                ResolvedEndianness::Big => raw.to_be_bytes(),
                ResolvedEndianness::Little => raw.to_le_bytes(),
            })
        }
        _ => unreachable!("caller validated bits in {{16,32,64}}"),
    }
}

/// IEEE-754 binary16 encoding of an `f32`, rounding to nearest.
fn f32_to_f16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xFF) as i32 - 127 + 15;
    let mantissa = bits & 0x007F_FFFF;

    if exp <= 0 {
        // Too small for normal half-precision: flush to signed zero.
        sign
    } else if exp >= 0x1F {
        // Overflow to infinity, preserving the original sign.
        sign | 0x7C00
    } else {
        sign | ((exp as u16) << 10) | (mantissa >> 13) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvironment;

    #[test]
    fn build_integers_with_endianness() {
        let segs = vec![Segment::int(258, 16, &["big", "integer"])];
        let bs = build(&segs, &MapEnvironment::new()).unwrap();
        assert_eq!(bs.to_bytes(), vec![0x01, 0x02]);

        let segs = vec![Segment::int(258, 16, &["little", "integer"])];
        let bs = build(&segs, &MapEnvironment::new()).unwrap();
        assert_eq!(bs.to_bytes(), vec![0x02, 0x01]);
    }

    #[test]
    fn signed_truncation_scenarios() {
        let segs = vec![Segment::int(-1, 8, &["signed", "integer"])];
        let bs = build(&segs, &MapEnvironment::new()).unwrap();
        assert_eq!(bs.to_bytes(), vec![0xFF]);

        let segs = vec![Segment::int(-1000, 8, &["signed", "integer"])];
        let bs = build(&segs, &MapEnvironment::new()).unwrap();
        assert_eq!(bs.to_bytes(), vec![0xFF]);
    }

    #[test]
    fn length_law_sums_effective_bits() {
        let segs = vec![
            Segment::int(1, 8, &["integer"]),
            Segment::int(2, 16, &["integer"]),
        ];
        let bs = build(&segs, &MapEnvironment::new()).unwrap();
        assert_eq!(bs.length_bits(), 24);
    }

    #[test]
    fn zero_size_segment_is_elided() {
        let segs = vec![
            Segment::int(0, 0, &["integer"]),
            Segment::int(7, 8, &["integer"]),
        ];
        let bs = build(&segs, &MapEnvironment::new()).unwrap();
        assert_eq!(bs.to_bytes(), vec![7]);
    }

    #[test]
    fn dynamic_size_resolved_from_env() {
        let mut env = MapEnvironment::new();
        env.insert("n", 16i64);
        let segs = vec![Segment::var_dynamic(
            "x",
            crate::eval::Expr::Var("n".to_string()),
            &["integer"],
        )];
        env.insert("x", 0x0102i64);
        let bs = build(&segs, &env).unwrap();
        assert_eq!(bs.to_bytes(), vec![0x01, 0x02]);
    }

    #[test]
    fn float_size_must_be_16_32_or_64() {
        let segs = vec![Segment::new(
            SegmentValue::Literal(Literal::Float(1.0)),
            SizeSpec::Const(24),
            vec!["float".to_string()],
        )];
        let err = build(&segs, &MapEnvironment::new()).unwrap_err();
        assert!(matches!(err, BuildError::FloatSize { bits: 24, .. }));
    }

    #[test]
    fn binary_pads_short_value_with_zeros() {
        let segs = vec![Segment::new(
            SegmentValue::Literal(Literal::Bytes(vec![0xAB])),
            SizeSpec::Const(4),
            vec!["binary".to_string()],
        )];
        let bs = build(&segs, &MapEnvironment::new()).unwrap();
        assert_eq!(bs.to_bytes(), vec![0xAB, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn binary_truncates_long_value() {
        let segs = vec![Segment::new(
            SegmentValue::Literal(Literal::Bytes(vec![1, 2, 3, 4])),
            SizeSpec::Const(2),
            vec!["binary".to_string()],
        )];
        let bs = build(&segs, &MapEnvironment::new()).unwrap();
        assert_eq!(bs.to_bytes(), vec![1, 2]);
    }

    #[test]
    fn utf8_codepoint_builds_expected_bytes() {
        let segs = vec![Segment::rest(
            SegmentValue::Literal(Literal::Int(BigInt::from(0x20ACu32))),
            &["utf8"],
        )];
        let bs = build(&segs, &MapEnvironment::new()).unwrap();
        assert_eq!(bs.to_bytes(), vec![0xE2, 0x82, 0xAC]);
    }

    #[test]
    fn integer_cap_is_enforced() {
        let limits = Limits {
            max_integer_bits: 32,
            ..Limits::default()
        };
        let segs = vec![Segment::int(1, 64, &["integer"])];
        let err = build_with_limits(&segs, &MapEnvironment::new(), &limits).unwrap_err();
        assert!(matches!(err, BuildError::IntegerSize { bits: 64, limit: 32, .. }));
    }
}
