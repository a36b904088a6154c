use crate::error::SpecifierError;

/// Segment value/type family, as resolved from a `type` specifier token.
///
/// `""` (the parser default before any type token is seen) means "infer from
/// value" and is represented here as `SegmentType::Inferred`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentType {
    Inferred,
    Integer,
    Float,
    Binary,
    BitString,
    Utf8,
    Utf16,
    Utf32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
    Native,
}

impl Endianness {
    /// Resolve `Native` to the build host's actual byte order.
    pub fn resolved(self) -> ResolvedEndianness {
        match self {
            Endianness::Big => ResolvedEndianness::Big,
            Endianness::Little => ResolvedEndianness::Little,
            Endianness::Native => {
                #[cfg(target_endian = "big")]
                {
                    ResolvedEndianness::Big
                }
                #[cfg(target_endian = "little")]
                {
                    ResolvedEndianness::Little
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedEndianness {
    Big,
    Little,
}

/// A normalized specifier record, per spec.md §3/§4.B.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Specifiers {
    pub ty: SegmentType,
    pub signed: bool,
    pub endianness: Endianness,
    pub unit: u32,
}

impl Default for Specifiers {
    fn default() -> Self {
        Specifiers {
            ty: SegmentType::Inferred,
            signed: false,
            endianness: Endianness::Big,
            unit: 1,
        }
    }
}

impl Specifiers {
    /// Resolve an ordered list of specifier tokens into a normalized record.
    ///
    /// Each token is matched whole first (covering literal compound words
    /// like `big-endian`); a token that doesn't match whole and contains a
    /// `-` is split and each piece applied in order, with `unit:<N>` allowed
    /// only as the final piece.
    pub fn resolve<S: AsRef<str>>(tokens: &[S]) -> Result<Specifiers, SpecifierError> {
        let mut specs = Specifiers::default();
        let mut unit_explicit = false;
        for token in tokens {
            let token = token.as_ref();
            if apply_whole_token(&mut specs, token)? {
                if token.starts_with("unit:") {
                    unit_explicit = true;
                }
                continue;
            }
            if token.contains('-') {
                let pieces: Vec<&str> = token.split('-').collect();
                for (i, piece) in pieces.iter().enumerate() {
                    let is_last = i + 1 == pieces.len();
                    if piece.starts_with("unit:") {
                        if !is_last {
                            return Err(SpecifierError::UnitNotLast(token.to_string()));
                        }
                        specs.unit = parse_unit(piece)?;
                        unit_explicit = true;
                    } else if !apply_simple_word(&mut specs, piece)? {
                        return Err(SpecifierError::UnknownToken(token.to_string()));
                    }
                }
            } else {
                return Err(SpecifierError::UnknownToken(token.to_string()));
            }
        }
        if !unit_explicit && matches!(specs.ty, SegmentType::Binary) {
            specs.unit = 8;
        }
        Ok(specs)
    }
}

fn parse_unit(piece: &str) -> Result<u32, SpecifierError> {
    let n = piece
        .strip_prefix("unit:")
        .expect("caller checked prefix");
    let value: u32 = n
        .parse()
        .map_err(|_| SpecifierError::InvalidUnit(piece.to_string()))?;
    if value == 0 {
        return Err(SpecifierError::InvalidUnit(piece.to_string()));
    }
    Ok(value)
}

/// Try to apply `token` as a single, whole recognized token (including the
/// literal `big-endian`/`little-endian`/`native-endian` compounds and a
/// standalone `unit:<N>`). Returns `Ok(true)` if it matched.
fn apply_whole_token(specs: &mut Specifiers, token: &str) -> Result<bool, SpecifierError> {
    match token {
        "big-endian" => {
            specs.endianness = Endianness::Big;
            Ok(true)
        }
        "little-endian" => {
            specs.endianness = Endianness::Little;
            Ok(true)
        }
        "native-endian" => {
            specs.endianness = Endianness::Native;
            Ok(true)
        }
        _ if token.starts_with("unit:") => {
            specs.unit = parse_unit(token)?;
            Ok(true)
        }
        _ => apply_simple_word(specs, token),
    }
}

/// Apply `word` as one of the atomic single-word tokens (used both
/// standalone and as a piece of a compound token). Returns `Ok(true)` if
/// recognized.
fn apply_simple_word(specs: &mut Specifiers, word: &str) -> Result<bool, SpecifierError> {
    match word {
        "signed" => {
            specs.signed = true;
            Ok(true)
        }
        "unsigned" => {
            specs.signed = false;
            Ok(true)
        }
        "big" => {
            specs.endianness = Endianness::Big;
            Ok(true)
        }
        "little" => {
            specs.endianness = Endianness::Little;
            Ok(true)
        }
        "native" => {
            specs.endianness = Endianness::Native;
            Ok(true)
        }
        "integer" => {
            specs.ty = SegmentType::Integer;
            Ok(true)
        }
        "float" => {
            specs.ty = SegmentType::Float;
            Ok(true)
        }
        "binary" | "bytes" => {
            specs.ty = SegmentType::Binary;
            Ok(true)
        }
        "bitstring" | "bits" => {
            specs.ty = SegmentType::BitString;
            Ok(true)
        }
        "utf8" | "utf" => {
            specs.ty = SegmentType::Utf8;
            Ok(true)
        }
        "utf16" => {
            specs.ty = SegmentType::Utf16;
            Ok(true)
        }
        "utf32" => {
            specs.ty = SegmentType::Utf32;
            Ok(true)
        }
        _ => Ok(false),
    }
}
