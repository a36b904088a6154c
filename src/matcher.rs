//! Walks a pattern against a [`BitString`], extracting bindings (§4.D).

use std::collections::HashMap;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::bitstring::BitString;
use crate::env::Environment;
use crate::error::{EvalError, MatchError};
use crate::intbits::decode_integer_bits;
use crate::limits::Limits;
use crate::segment::{Literal, Segment, SegmentValue, SizeSpec};
use crate::specifier::{ResolvedEndianness, SegmentType, Specifiers};
use crate::utf;
use crate::value::Value;

#[cfg(feature = "trace")]
use log::{debug, trace};

/// Controls how a structural mismatch is surfaced (§4.D, §7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// A structural mismatch yields empty bindings, no error.
    Assignment,
    /// A structural mismatch is a typed error.
    Statement,
}

/// Bindings produced by a successful match: variable name (qualified names
/// kept verbatim) to extracted value.
pub type Bindings = HashMap<String, Value>;

/// A failure that is either a structural mismatch (mode-dependent surfacing)
/// or a hard error (always propagates, per spec.md §7).
enum MatchFailure {
    Mismatch(Mismatch),
    Error(MatchError),
}

enum Mismatch {
    SizeMismatch { expected: u64, actual: u64 },
    ConstantMismatch { segment: usize },
    InsufficientBits { segment: usize, needed: u64, available: u64 },
    DecodeFailure { segment: usize },
}

impl From<Mismatch> for MatchError {
    fn from(m: Mismatch) -> Self {
        match m {
            Mismatch::SizeMismatch { expected, actual } => MatchError::SizeMismatch { expected, actual },
            Mismatch::ConstantMismatch { segment } => MatchError::SegmentConstantMismatch { segment },
            Mismatch::InsufficientBits { segment, needed, available } => {
                MatchError::InsufficientBits { segment, needed, available }
            }
            Mismatch::DecodeFailure { segment } => MatchError::InvalidPattern {
                segment,
                msg: "rest segment bytes do not decode under the requested encoding".to_string(),
            },
        }
    }
}

/// Match `pattern` against `data`, using the default size caps.
pub fn match_bitstring(
    pattern: &[Segment],
    data: &BitString,
    env: &dyn Environment,
    mode: MatchMode,
) -> Result<Bindings, MatchError> {
    match_with_limits(pattern, data, env, mode, &Limits::default())
}

/// As [`match_bitstring`], with explicit size caps.
pub fn match_with_limits(
    pattern: &[Segment],
    data: &BitString,
    env: &dyn Environment,
    mode: MatchMode,
    limits: &Limits,
) -> Result<Bindings, MatchError> {
    validate_pattern_shape(pattern)?;

    match run_match(pattern, data, env, limits) {
        Ok(bindings) => Ok(bindings),
        Err(MatchFailure::Error(e)) => Err(e),
        Err(MatchFailure::Mismatch(m)) => match mode {
            MatchMode::Statement => Err(m.into()),
            MatchMode::Assignment => {
                #[cfg(feature = "trace")]
                debug!("structural mismatch in assignment mode, yielding empty bindings");
                Ok(HashMap::new())
            }
        },
    }
}

/// §4.D Rest semantics, checked before any data is consumed: only the final
/// segment may omit size, and only for binary/bitstring/utf* — a string
/// literal is always self-sized and may omit size anywhere.
fn validate_pattern_shape(pattern: &[Segment]) -> Result<(), MatchError> {
    let last_idx = pattern.len().saturating_sub(1);
    for (idx, seg) in pattern.iter().enumerate() {
        if !matches!(seg.size, SizeSpec::Unspecified) {
            continue;
        }
        if matches!(seg.value, SegmentValue::Literal(Literal::Str(_))) {
            continue;
        }
        if idx != last_idx {
            return Err(MatchError::InvalidPattern {
                segment: idx,
                msg: "only the final segment may omit a size".to_string(),
            });
        }
        let ty = pattern_type(seg);
        if !matches!(
            ty,
            SegmentType::Binary | SegmentType::BitString | SegmentType::Utf8 | SegmentType::Utf16 | SegmentType::Utf32
        ) {
            return Err(MatchError::InvalidPattern {
                segment: idx,
                msg: "a sizeless final segment must be binary, bitstring or utf*".to_string(),
            });
        }
    }
    Ok(())
}

fn pattern_type(seg: &Segment) -> SegmentType {
    let specs = Specifiers::resolve(&seg.specifiers).unwrap_or_default();
    if !matches!(specs.ty, SegmentType::Inferred) {
        return specs.ty;
    }
    match &seg.value {
        SegmentValue::Literal(Literal::Float(_)) => SegmentType::Float,
        SegmentValue::Literal(Literal::Bytes(_)) => SegmentType::Binary,
        SegmentValue::Literal(Literal::Bits(_)) => SegmentType::BitString,
        _ => SegmentType::Integer,
    }
}

fn run_match(
    pattern: &[Segment],
    data: &BitString,
    env: &dyn Environment,
    limits: &Limits,
) -> Result<Bindings, MatchFailure> {
    let mut bindings = Bindings::new();
    let mut scoped: HashMap<String, Value> = HashMap::new();
    let mut literal_checks: Vec<(usize, BigInt, BigInt)> = Vec::new();
    let mut offset: u64 = 0;
    let total_bits = data.length_bits();
    let last_idx = pattern.len().saturating_sub(1);

    for (idx, seg) in pattern.iter().enumerate() {
        let specs = Specifiers::resolve(&seg.specifiers).map_err(|source| {
            MatchFailure::Error(MatchError::SpecifierParse { segment: idx, source })
        })?;
        let is_last = idx == last_idx;
        let endian = specs.endianness.resolved();

        // String literal: always self-sized, checked immediately.
        if let SegmentValue::Literal(Literal::Str(s)) = &seg.value {
            let needed = (s.len() as u64) * 8;
            let available = total_bits - offset;
            if needed > available {
                return Err(MatchFailure::Mismatch(Mismatch::InsufficientBits {
                    segment: idx,
                    needed,
                    available,
                }));
            }
            let (chunk, _) = split_at(data, offset, needed);
            if chunk.to_bytes() != s.as_bytes() {
                return Err(MatchFailure::Mismatch(Mismatch::ConstantMismatch { segment: idx }));
            }
            offset += needed;
            continue;
        }

        let ty = match specs.ty {
            SegmentType::Inferred => pattern_type(seg),
            other => other,
        };

        let is_rest = is_last && matches!(seg.size, SizeSpec::Unspecified);

        let effective_bits = if is_rest {
            None // resolved per-type below
        } else {
            Some(resolve_effective_bits(idx, ty, &seg.size, &specs, &scoped, env, limits)?)
        };

        match ty {
            SegmentType::Integer => {
                let bits = effective_bits.expect("integer segments always have an effective size");
                let available = total_bits - offset;
                if bits > available {
                    return Err(MatchFailure::Mismatch(Mismatch::InsufficientBits {
                        segment: idx,
                        needed: bits,
                        available,
                    }));
                }
                let (chunk, _) = split_at(data, offset, bits);
                let big = decode_integer_bits(chunk.as_bitslice(), specs.signed, endian);
                offset += bits;
                bind_or_check(idx, &seg.value, value_from_bigint(big.clone()), &big, &mut bindings, &mut scoped, &mut literal_checks)?;
            }
            SegmentType::Float => {
                let bits = effective_bits.expect("float segments always have an effective size");
                if bits != 16 && bits != 32 && bits != 64 {
                    return Err(MatchFailure::Error(MatchError::InvalidPattern {
                        segment: idx,
                        msg: format!("float segment width must be 16, 32 or 64 bits, got {bits}"),
                    }));
                }
                let available = total_bits - offset;
                if bits > available {
                    return Err(MatchFailure::Mismatch(Mismatch::InsufficientBits {
                        segment: idx,
                        needed: bits,
                        available,
                    }));
                }
                let (chunk, _) = split_at(data, offset, bits);
                let f = decode_float_bits(&chunk.to_bytes(), bits, endian);
                offset += bits;
                bind_value(idx, &seg.value, Value::F64(f), &mut bindings, &mut scoped)?;
            }
            SegmentType::Binary => {
                let (value, consumed) =
                    extract_binary(idx, data, offset, effective_bits, total_bits, is_rest)?;
                offset += consumed;
                bind_value(idx, &seg.value, value, &mut bindings, &mut scoped)?;
            }
            SegmentType::BitString => {
                let bits = effective_bits.unwrap_or(total_bits - offset);
                let available = total_bits - offset;
                if bits > available {
                    return Err(MatchFailure::Mismatch(Mismatch::InsufficientBits {
                        segment: idx,
                        needed: bits,
                        available,
                    }));
                }
                let (chunk, _) = split_at(data, offset, bits);
                offset += bits;
                bind_value(idx, &seg.value, Value::Bits(chunk), &mut bindings, &mut scoped)?;
            }
            SegmentType::Utf8 | SegmentType::Utf16 | SegmentType::Utf32 => {
                if let Some(bits) = effective_bits {
                    let available = total_bits - offset;
                    if bits > available {
                        return Err(MatchFailure::Mismatch(Mismatch::InsufficientBits {
                            segment: idx,
                            needed: bits,
                            available,
                        }));
                    }
                    let (chunk, _) = split_at(data, offset, bits);
                    let big = decode_integer_bits(chunk.as_bitslice(), false, endian);
                    offset += bits;
                    bind_or_check(idx, &seg.value, value_from_bigint(big.clone()), &big, &mut bindings, &mut scoped, &mut literal_checks)?;
                } else {
                    let remaining = chunk_bytes_rounded(data, offset, total_bits);
                    let s = decode_utf_string(&remaining, ty, endian)
                        .ok_or(MatchFailure::Mismatch(Mismatch::DecodeFailure { segment: idx }))?;
                    offset = total_bits;
                    bind_value(idx, &seg.value, Value::Str(s), &mut bindings, &mut scoped)?;
                }
            }
            SegmentType::Inferred => unreachable!("resolved above"),
        }

        #[cfg(feature = "trace")]
        trace!("segment {idx}: type={:?} consumed up to offset {offset}", ty);
    }

    let last_is_rest = pattern.last().is_some_and(|seg| {
        matches!(seg.size, SizeSpec::Unspecified)
            && !matches!(seg.value, SegmentValue::Literal(Literal::Str(_)))
    });
    if !last_is_rest && offset != total_bits {
        return Err(MatchFailure::Mismatch(Mismatch::SizeMismatch {
            expected: offset,
            actual: total_bits,
        }));
    }

    for (idx, expected, actual) in literal_checks {
        if expected != actual {
            return Err(MatchFailure::Mismatch(Mismatch::ConstantMismatch { segment: idx }));
        }
    }

    Ok(bindings)
}

fn value_from_bigint(big: BigInt) -> Value {
    match big.to_i64() {
        Some(i) => Value::I64(i),
        None => Value::BigInt(big),
    }
}

fn bind_value(
    idx: usize,
    value: &SegmentValue,
    decoded: Value,
    bindings: &mut Bindings,
    scoped: &mut HashMap<String, Value>,
) -> Result<(), MatchFailure> {
    match value {
        SegmentValue::Wildcard => Ok(()),
        SegmentValue::Variable(name) => {
            scoped.insert(name.clone(), decoded.clone());
            bindings.insert(name.clone(), decoded);
            Ok(())
        }
        SegmentValue::Literal(lit) => match lit {
            Literal::Bytes(expected) => {
                if decoded.as_bytes() == Some(expected.as_slice()) {
                    Ok(())
                } else {
                    Err(MatchFailure::Mismatch(Mismatch::ConstantMismatch { segment: idx }))
                }
            }
            Literal::Bits(expected) => match &decoded {
                Value::Bits(actual) if actual == expected => Ok(()),
                _ => Err(MatchFailure::Mismatch(Mismatch::ConstantMismatch { segment: idx })),
            },
            Literal::Float(expected) => match decoded.as_f64() {
                Some(actual) if actual == *expected => Ok(()),
                _ => Err(MatchFailure::Mismatch(Mismatch::ConstantMismatch { segment: idx })),
            },
            _ => Ok(()),
        },
    }
}

/// Integer-literal pattern segments defer equality validation to a second
/// pass over `literal_checks`, per the Design Notes (post-match validation
/// iterates segments, not a side table); everything else binds immediately.
fn bind_or_check(
    idx: usize,
    value: &SegmentValue,
    decoded: Value,
    big: &BigInt,
    bindings: &mut Bindings,
    scoped: &mut HashMap<String, Value>,
    literal_checks: &mut Vec<(usize, BigInt, BigInt)>,
) -> Result<(), MatchFailure> {
    match value {
        SegmentValue::Literal(Literal::Int(expected)) => {
            literal_checks.push((idx, expected.clone(), big.clone()));
            Ok(())
        }
        SegmentValue::Literal(Literal::Bool(expected)) => {
            let want = BigInt::from(*expected as i64);
            if &want == big {
                Ok(())
            } else {
                Err(MatchFailure::Mismatch(Mismatch::ConstantMismatch { segment: idx }))
            }
        }
        _ => bind_value(idx, value, decoded, bindings, scoped),
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_effective_bits(
    idx: usize,
    ty: SegmentType,
    size: &SizeSpec,
    specs: &Specifiers,
    scoped: &HashMap<String, Value>,
    env: &dyn Environment,
    limits: &Limits,
) -> Result<u64, MatchFailure> {
    let default_size = match ty {
        SegmentType::Integer => 8,
        SegmentType::Float => 64,
        _ => 0,
    };
    let base = match size {
        SizeSpec::Unspecified => default_size,
        SizeSpec::Const(n) => *n,
        SizeSpec::Dynamic(expr) => {
            let resolve = |name: &str| -> Option<BigInt> {
                scoped.get(name).and_then(Value::as_bigint).or_else(|| {
                    env.resolve(name).and_then(|v| v.as_bigint())
                })
            };
            let big = expr.eval(&resolve).map_err(|source| {
                MatchFailure::Error(MatchError::Eval { segment: idx, source })
            })?;
            if big.sign() == num_bigint::Sign::Minus {
                return Err(MatchFailure::Error(MatchError::Eval {
                    segment: idx,
                    source: EvalError::NegativeSize,
                }));
            }
            big.to_u64().ok_or(MatchFailure::Error(MatchError::Eval {
                segment: idx,
                source: EvalError::Overflow,
            }))?
        }
    };
    let bits = base * u64::from(specs.unit).max(1);
    let cap = match ty {
        SegmentType::Integer | SegmentType::Utf8 | SegmentType::Utf16 | SegmentType::Utf32 => {
            limits.max_integer_bits
        }
        SegmentType::Binary | SegmentType::BitString => limits.max_binary_bits,
        SegmentType::Float | SegmentType::Inferred => u64::MAX,
    };
    if bits > cap {
        return Err(MatchFailure::Error(MatchError::Eval {
            segment: idx,
            source: EvalError::Overflow,
        }));
    }
    Ok(bits)
}

fn extract_binary(
    idx: usize,
    data: &BitString,
    offset: u64,
    effective_bits: Option<u64>,
    total_bits: u64,
    is_rest: bool,
) -> Result<(Value, u64), MatchFailure> {
    let available = total_bits - offset;
    let bits = effective_bits.unwrap_or(available);
    if bits > available {
        return Err(MatchFailure::Mismatch(Mismatch::InsufficientBits {
            segment: idx,
            needed: bits,
            available,
        }));
    }
    let (chunk, _) = split_at(data, offset, bits);
    if is_rest {
        let bytes = chunk.to_bytes();
        let value = match std::str::from_utf8(&bytes) {
            Ok(s) => Value::Str(s.to_string()),
            Err(_) => Value::Bits(chunk),
        };
        Ok((value, bits))
    } else {
        Ok((Value::Bytes(chunk.to_bytes()), bits))
    }
}

fn split_at(data: &BitString, offset: u64, len: u64) -> (BitString, BitString) {
    let (_, tail) = data
        .split_at_bits(offset)
        .expect("offset within bounds, checked by caller");
    tail.split_at_bits(len).expect("len within bounds, checked by caller")
}

fn chunk_bytes_rounded(data: &BitString, offset: u64, total_bits: u64) -> Vec<u8> {
    let (chunk, _) = split_at(data, offset, total_bits - offset);
    chunk.to_bytes()
}

fn decode_utf_string(bytes: &[u8], ty: SegmentType, endian: ResolvedEndianness) -> Option<String> {
    let mut out = String::new();
    let mut rest = bytes;
    while !rest.is_empty() {
        let (cp, consumed) = utf::decode_codepoint(rest, ty, endian)?;
        out.push(char::from_u32(cp)?);
        rest = &rest[consumed..];
    }
    Some(out)
}

fn decode_float_bits(bytes: &[u8], bits: u64, endian: ResolvedEndianness) -> f64 {
    match bits {
        64 => {
            let arr: [u8; 8] = bytes[..8].try_into().expect("8 bytes for a 64-bit float");
            let raw = match endian {
                ResolvedEndianness::Big => u64::from_be_bytes(arr),
                ResolvedEndianness::Little => u64::from_le_bytes(arr),
            };
            f64::from_bits(raw)
        }
        32 => {
            let arr: [u8; 4] = bytes[..4].try_into().expect("4 bytes for a 32-bit float");
            let raw = match endian {
                ResolvedEndianness::Big => u32::from_be_bytes(arr),
                ResolvedEndianness::Little => u32::from_le_bytes(arr),
            };
            f32::from_bits(raw) as f64
        }
        16 => {
            let arr: [u8; 2] = bytes[..2].try_into().expect("2 bytes for a 16-bit float");
            let raw = match endian {
                ResolvedEndianness::Big => u16::from_be_bytes(arr),
                ResolvedEndianness::Little => u16::from_le_bytes(arr),
            };
            f16_bits_to_f32(raw) as f64
        }
        _ => unreachable!("caller validated bits in {{16,32,64}}"),
    }
}

fn f16_bits_to_f32(bits: u16) -> f32 {
    let sign = (bits & 0x8000) as u32;
    let exp = ((bits >> 10) & 0x1F) as u32;
    let mantissa = (bits & 0x03FF) as u32;

    let bits32 = if exp == 0 {
        if mantissa == 0 {
            sign << 16
        } else {
            // subnormal half -> normalize into a normal f32
            let mut mantissa = mantissa;
            let mut e = 1i32;
            while mantissa & 0x0400 == 0 {
                mantissa <<= 1;
                e -= 1;
            }
            mantissa &= 0x03FF;
            let exp32 = (127 - 15 + e) as u32;
            (sign << 16) | (exp32 << 23) | (mantissa << 13)
        }
    } else if exp == 0x1F {
        (sign << 16) | 0x7F80_0000 | (mantissa << 13)
    } else {
        let exp32 = exp + (127 - 15);
        (sign << 16) | (exp32 << 23) | (mantissa << 13)
    };
    f32::from_bits(bits32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvironment;
    use crate::eval::Expr;

    #[test]
    fn literal_match_success_and_failure() {
        let pattern = vec![Segment::int(42, 8, &["integer"]), Segment::var("x", 8, &["integer"])];
        let data = BitString::from_bytes(&[0x2A, 0x05]);
        let bindings =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap();
        assert_eq!(bindings.get("x"), Some(&Value::I64(5)));

        let data = BitString::from_bytes(&[0x2B, 0x05]);
        let err =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap_err();
        assert!(matches!(err, MatchError::SegmentConstantMismatch { segment: 0 }));

        let bindings =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Assignment).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn dynamic_length_prefixed_binary() {
        let pattern = vec![
            Segment::var("len", 8, &["integer"]),
            Segment::new(
                SegmentValue::Variable("payload".to_string()),
                SizeSpec::Dynamic(Expr::Var("len".to_string())),
                vec!["binary".to_string()],
            ),
        ];
        let data = BitString::from_bytes(&[0x03, b'a', b'b', b'c']);
        let bindings =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap();
        assert_eq!(bindings.get("len"), Some(&Value::I64(3)));
        assert_eq!(bindings.get("payload"), Some(&Value::Bytes(b"abc".to_vec())));
    }

    #[test]
    fn dynamic_size_resolution_order_bit_width() {
        // <<a:8, b:a>> on 0x04, 0xFF -> a=4, b=15 (4 bits 1111)
        let pattern = vec![
            Segment::var("a", 8, &["integer"]),
            Segment::new(
                SegmentValue::Variable("b".to_string()),
                SizeSpec::var("a"),
                vec!["integer".to_string()],
            ),
        ];
        let data = BitString::from_bytes(&[0x04, 0xFF]);
        let bindings =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap();
        assert_eq!(bindings.get("a"), Some(&Value::I64(4)));
        assert_eq!(bindings.get("b"), Some(&Value::I64(0b1111)));
    }

    #[test]
    fn utf8_codepoint_pattern() {
        let pattern = vec![Segment::rest(SegmentValue::Variable("cp".to_string()), &["utf8"])];
        let data = BitString::from_bytes(&[0xE2, 0x82, 0xAC]);
        let bindings =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap();
        assert_eq!(bindings.get("cp"), Some(&Value::Str("\u{20AC}".to_string())));
    }

    #[test]
    fn overflow_in_dynamic_size_propagates_in_both_modes() {
        let pattern = vec![
            Segment::var("len", 64, &["integer"]),
            Segment::new(
                SegmentValue::Wildcard,
                SizeSpec::Dynamic(Expr::Mul(
                    Box::new(Expr::Var("len".to_string())),
                    Box::new(Expr::Var("len".to_string())),
                )),
                vec!["integer".to_string()],
            ),
        ];
        let big_len: u64 = 1u64 << 40;
        let mut bytes = big_len.to_be_bytes().to_vec();
        bytes.push(0);
        let data = BitString::from_bytes(&bytes);

        let err =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap_err();
        assert!(matches!(err, MatchError::Eval { source: EvalError::Overflow, .. }));

        let err =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Assignment).unwrap_err();
        assert!(matches!(err, MatchError::Eval { source: EvalError::Overflow, .. }));
    }

    #[test]
    fn size_mismatch_without_rest_segment() {
        let pattern = vec![Segment::int(1, 8, &["integer"])];
        let data = BitString::from_bytes(&[1, 2]);
        let err =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap_err();
        assert!(matches!(err, MatchError::SizeMismatch { expected: 8, actual: 16 }));
    }

    #[test]
    fn trailing_string_literal_is_not_treated_as_rest() {
        let pattern = vec![Segment::new(
            SegmentValue::Literal(Literal::Str("ok".to_string())),
            SizeSpec::Unspecified,
            vec![],
        )];
        let data = BitString::from_bytes(b"ok  ");

        let err =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap_err();
        assert!(matches!(err, MatchError::SizeMismatch { expected: 16, actual: 32 }));

        let bindings =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Assignment).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn rest_binary_binds_string_when_valid_utf8_else_bitstring() {
        let pattern = vec![Segment::rest(SegmentValue::Variable("rest".to_string()), &["binary"])];
        let data = BitString::from_bytes(b"hello");
        let bindings =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap();
        assert_eq!(bindings.get("rest"), Some(&Value::Str("hello".to_string())));

        let data = BitString::from_bytes(&[0xFF, 0xFE]);
        let bindings =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap();
        assert!(matches!(bindings.get("rest"), Some(Value::Bits(_))));
    }

    #[test]
    fn non_final_sizeless_non_literal_is_invalid_pattern() {
        let pattern = vec![
            Segment::rest(SegmentValue::Variable("a".to_string()), &["binary"]),
            Segment::int(1, 8, &["integer"]),
        ];
        let data = BitString::from_bytes(&[1, 2]);
        let err =
            match_bitstring(&pattern, &data, &MapEnvironment::new(), MatchMode::Statement).unwrap_err();
        assert!(matches!(err, MatchError::InvalidPattern { segment: 0, .. }));
    }
}
