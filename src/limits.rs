/// Configurable size caps for segment encoding.
///
/// Spec.md §9 Open Question (c) leaves these caps advisory; this crate makes
/// them an explicit, overridable knob rather than hardwired constants, so a
/// host can tighten them (e.g. for untrusted input) or loosen them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Hard cap, in bits, for a single `integer` segment. Default 2²³ (1 MiB).
    pub max_integer_bits: u64,
    /// Hard cap, in bits, for a single `binary`/`bitstring` segment. Default 2²³.
    pub max_binary_bits: u64,
}

/// The spec's own default caps: 2²³ bits for both integer and binary segments.
pub const DEFAULT_MAX_BITS: u64 = 1 << 23;

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_integer_bits: DEFAULT_MAX_BITS,
            max_binary_bits: DEFAULT_MAX_BITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let limits = Limits::default();
        assert_eq!(limits.max_integer_bits, 1 << 23);
        assert_eq!(limits.max_binary_bits, 1 << 23);
    }
}
