//! UTF-8/16/32 codepoint encoding, shared between the builder and matcher.

use crate::specifier::{ResolvedEndianness, SegmentType};

/// Encode a single codepoint per `ty` (one of the UTF variants), in `endian`
/// order for utf16/utf32 (utf8 has no byte-order ambiguity).
pub fn encode_codepoint(
    cp: u32,
    ty: SegmentType,
    endian: ResolvedEndianness,
) -> Result<Vec<u8>, ()> {
    let ch = char::from_u32(cp).ok_or(())?;
    match ty {
        SegmentType::Utf8 => {
            let mut buf = [0u8; 4];
            Ok(ch.encode_utf8(&mut buf).as_bytes().to_vec())
        }
        SegmentType::Utf16 => {
            let mut buf = [0u16; 2];
            let units = ch.encode_utf16(&mut buf);
            let mut out = Vec::with_capacity(units.len() * 2);
            for unit in units {
                match endian {
                    ResolvedEndianness::Big => out.extend_from_slice(&unit.to_be_bytes()),
                    ResolvedEndianness::Little => out.extend_from_slice(&unit.to_le_bytes()),
                }
            }
            Ok(out)
        }
        SegmentType::Utf32 => Ok(match endian {
            ResolvedEndianness::Big => cp.to_be_bytes().to_vec(),
            ResolvedEndianness::Little => cp.to_le_bytes().to_vec(),
        }),
        _ => Err(()),
    }
}

/// Encode a whole string as UTF-8 bytes (for a `utf8`/`utf` string-valued segment).
pub fn encode_utf8_str(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Decode one codepoint from the front of `bytes`, per `ty`/`endian`.
/// Returns the codepoint and the number of bytes consumed.
pub fn decode_codepoint(
    bytes: &[u8],
    ty: SegmentType,
    endian: ResolvedEndianness,
) -> Option<(u32, usize)> {
    match ty {
        SegmentType::Utf8 => {
            let s = std::str::from_utf8(bytes).ok()?;
            let ch = s.chars().next()?;
            Some((ch as u32, ch.len_utf8()))
        }
        SegmentType::Utf16 => {
            if bytes.len() < 2 {
                return None;
            }
            let read_u16 = |b: &[u8]| -> u16 {
                match endian {
                    ResolvedEndianness::Big => u16::from_be_bytes([b[0], b[1]]),
                    ResolvedEndianness::Little => u16::from_le_bytes([b[0], b[1]]),
                }
            };
            let first = read_u16(&bytes[0..2]);
            if (0xD800..=0xDBFF).contains(&first) {
                if bytes.len() < 4 {
                    return None;
                }
                let second = read_u16(&bytes[2..4]);
                let units = [first, second];
                let ch = char::decode_utf16(units.iter().copied())
                    .next()?
                    .ok()?;
                Some((ch as u32, 4))
            } else {
                let ch = char::decode_utf16([first].iter().copied()).next()?.ok()?;
                Some((ch as u32, 2))
            }
        }
        SegmentType::Utf32 => {
            if bytes.len() < 4 {
                return None;
            }
            let raw = match endian {
                ResolvedEndianness::Big => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
                ResolvedEndianness::Little => {
                    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
                }
            };
            char::from_u32(raw)?;
            Some((raw, 4))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_codepoint_round_trips() {
        // Euro sign, 3-byte UTF-8 sequence: E2 82 AC
        let bytes = encode_codepoint(0x20AC, SegmentType::Utf8, ResolvedEndianness::Big).unwrap();
        assert_eq!(bytes, vec![0xE2, 0x82, 0xAC]);
        let (cp, consumed) = decode_codepoint(&bytes, SegmentType::Utf8, ResolvedEndianness::Big).unwrap();
        assert_eq!(cp, 0x20AC);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn utf32_big_endian_round_trips() {
        let bytes = encode_codepoint(0x1F600, SegmentType::Utf32, ResolvedEndianness::Big).unwrap();
        assert_eq!(bytes, vec![0x00, 0x01, 0xF6, 0x00]);
        let (cp, consumed) = decode_codepoint(&bytes, SegmentType::Utf32, ResolvedEndianness::Big).unwrap();
        assert_eq!(cp, 0x1F600);
        assert_eq!(consumed, 4);
    }

    #[test]
    fn utf16_surrogate_pair_round_trips() {
        let bytes = encode_codepoint(0x1F600, SegmentType::Utf16, ResolvedEndianness::Big).unwrap();
        assert_eq!(bytes.len(), 4);
        let (cp, consumed) = decode_codepoint(&bytes, SegmentType::Utf16, ResolvedEndianness::Big).unwrap();
        assert_eq!(cp, 0x1F600);
        assert_eq!(consumed, 4);
    }

    #[test]
    fn invalid_codepoint_fails_to_encode() {
        // 0xD800 is a lone surrogate, not a valid scalar value.
        assert!(encode_codepoint(0xD800, SegmentType::Utf8, ResolvedEndianness::Big).is_err());
    }
}
