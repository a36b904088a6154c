//! Bit-exact integer truncation/encoding/decoding shared by the builder and
//! the matcher (§4.C integer encoding policy, §4.D integer extraction).

use bitvec::order::Msb0;
use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};

use crate::bitstring::BitString;
use crate::specifier::ResolvedEndianness;

fn euclid_mod(value: &BigInt, modulus: &BigInt) -> BigInt {
    let r = value % modulus;
    if r.is_negative() {
        r + modulus
    } else {
        r
    }
}

/// Truncate `value` to `bits` bits per the spec's asymmetric policy:
/// unsigned wraps modulo `2^bits`; signed in-range (or out-of-range
/// *positive*) also wraps modulo `2^bits`; signed out-of-range *negative*
/// saturates to all-ones (`2^bits - 1`).
pub fn mask_to_width(value: &BigInt, bits: u64, signed: bool) -> BigUint {
    let modulus = BigInt::from(BigUint::one() << bits as usize);
    if signed {
        let half = BigInt::from(BigUint::one() << (bits.saturating_sub(1)) as usize);
        if *value < -&half {
            return (&modulus - BigInt::one()).to_biguint().expect("positive");
        }
    }
    euclid_mod(value, &modulus)
        .to_biguint()
        .expect("euclid_mod is non-negative")
}

/// Encode `value`, truncated/masked to `bits` bits, into a [`BitString`] of
/// exactly `bits` bits, in the requested endianness.
pub fn encode_integer_bits(
    value: &BigInt,
    bits: u64,
    signed: bool,
    endian: ResolvedEndianness,
) -> BitString {
    if bits == 0 {
        return BitString::new_empty();
    }
    let masked = mask_to_width(value, bits, signed);
    let byte_len = ((bits + 7) / 8) as usize;
    let be_bytes = masked.to_bytes_be();
    let mut full = vec![0u8; byte_len - be_bytes.len()];
    full.extend_from_slice(&be_bytes);

    let ordered = match endian {
        ResolvedEndianness::Big => full,
        ResolvedEndianness::Little => {
            full.reverse();
            full
        }
    };

    if bits % 8 == 0 {
        BitString::from_bytes(&ordered)
    } else {
        let skip = byte_len * 8 - bits as usize;
        let full_bits: BitVec<u8, Msb0> = BitVec::from_slice(&ordered);
        BitString::from_bits(full_bits[skip..].iter().map(|b| *b))
    }
}

/// Decode a `bits`-bit big-endian-ordered (pre-reversal) two's-complement
/// style bit pattern back into a [`BigInt`], inverting [`encode_integer_bits`].
pub fn decode_integer_bits(
    slice: &BitSlice<u8, Msb0>,
    signed: bool,
    endian: ResolvedEndianness,
) -> BigInt {
    let bits = slice.len() as u64;
    if bits == 0 {
        return BigInt::zero();
    }
    let byte_len = ((bits + 7) / 8) as usize;
    let skip = byte_len * 8 - bits as usize;

    let mut padded: BitVec<u8, Msb0> = BitVec::with_capacity(byte_len * 8);
    for _ in 0..skip {
        padded.push(false);
    }
    padded.extend_from_bitslice(slice);
    let mut bytes = padded.into_vec();

    if let ResolvedEndianness::Little = endian {
        bytes.reverse();
    }

    let masked = BigUint::from_bytes_be(&bytes);

    if signed {
        let half = BigUint::one() << (bits - 1) as usize;
        if masked >= half {
            let modulus = BigUint::one() << bits as usize;
            return BigInt::from_biguint(Sign::Minus, modulus - masked);
        }
    }
    BigInt::from_biguint(Sign::Plus, masked)
}
