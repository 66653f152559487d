//! Integer semantics shared by evaluation and lowering

use std::fmt;

/// How `Int` values behave on overflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntSemantics {
    /// Mathematical integers; `/` and `%` are Euclidean
    #[default]
    Unbounded,

    /// Two's-complement wraparound at `bits` width; signed comparisons,
    /// truncating `/` and `%`
    Wrapping { bits: u32 },
}

impl IntSemantics {
    /// Bring an exact result into the domain, `None` when not representable
    pub fn normalize(&self, value: i128) -> Option<i64> {
        match self {
            Self::Unbounded => i64::try_from(value).ok(),
            Self::Wrapping { bits } => Some(wrap(value, *bits)),
        }
    }

    pub fn is_wrapping(&self) -> bool {
        matches!(self, Self::Wrapping { .. })
    }
}

impl fmt::Display for IntSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Wrapping { bits } => write!(f, "wrapping({} bits)", bits),
        }
    }
}

/// Truncate to `bits` and sign-extend back to `i64`
pub fn wrap(value: i128, bits: u32) -> i64 {
    let bits = bits.clamp(1, 64);
    let shift = 128 - bits;
    ((value << shift) >> shift) as i64
}

/// Sign-extend the low `bits` of a raw bit-vector value
pub fn sign_extend(raw: u64, bits: u32) -> i64 {
    wrap(raw as i128, bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_8_bits() {
        assert_eq!(wrap(127, 8), 127);
        assert_eq!(wrap(128, 8), -128);
        assert_eq!(wrap(255, 8), -1);
        assert_eq!(wrap(256, 8), 0);
        assert_eq!(wrap(-129, 8), 127);
    }

    #[test]
    fn test_wrap_64_bits() {
        assert_eq!(wrap(i64::MAX as i128 + 1, 64), i64::MIN);
        assert_eq!(wrap(-1, 64), -1);
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0xFF, 8), -1);
        assert_eq!(sign_extend(0x7F, 8), 127);
        assert_eq!(sign_extend(u64::MAX, 64), -1);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(IntSemantics::Unbounded.normalize(i64::MAX as i128 + 1), None);
        assert_eq!(
            IntSemantics::Wrapping { bits: 32 }.normalize(i32::MAX as i128 + 1),
            Some(i32::MIN as i64)
        );
    }
}
