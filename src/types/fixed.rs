//! Fixed-point value and amount utilities.
//!
//! ## Overview
//!
//! Node values and oracle indices are `rust_decimal::Decimal`: a 96-bit
//! mantissa with up to 28 fractional digits. Token amounts are `u64` base
//! units. Nothing in this crate touches floating point.
//!
//! ## Canonical Encoding
//!
//! Decimals embedded in node parameters use the 16-byte `Decimal::serialize`
//! layout of the *normalized* value, so `1.5` and `1.50` encode identically
//! and therefore hash to the same node identifier.
//!
//! ## Examples
//!
//! ```
//! use rate_dag::types::fixed::{decode_decimal, encode_decimal};
//! use rust_decimal::Decimal;
//!
//! let bytes = encode_decimal(Decimal::new(150, 2)); // 1.50
//! assert_eq!(decode_decimal(&bytes), Some(Decimal::new(15, 1)));
//! ```

use rust_decimal::Decimal;

/// Length of a canonically encoded decimal.
pub const DECIMAL_ENCODED_LEN: usize = 16;

/// Largest scale `Decimal` supports.
const MAX_SCALE: u8 = 28;

/// Sign bit inside the high flag byte.
const SIGN_FLAG: u8 = 0x80;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Encode a decimal into its canonical 16-byte form.
pub fn encode_decimal(d: Decimal) -> [u8; DECIMAL_ENCODED_LEN] {
    d.normalize().serialize()
}

/// Decode a canonical 16-byte decimal.
///
/// # Returns
///
/// * `Some(Decimal)` - The decoded value
/// * `None` - Wrong length, unused flag bits set, or scale above 28
pub fn decode_decimal(bytes: &[u8]) -> Option<Decimal> {
    let raw: [u8; DECIMAL_ENCODED_LEN] = bytes.try_into().ok()?;

    // Flags word: bytes 0-1 unused, byte 2 scale, byte 3 sign bit only.
    if raw[0] != 0 || raw[1] != 0 || raw[2] > MAX_SCALE || raw[3] & !SIGN_FLAG != 0 {
        return None;
    }

    Some(Decimal::deserialize(raw))
}

/// Convert a whole-unit `u64` amount into a decimal.
pub fn amount_to_decimal(amount: u64) -> Decimal {
    Decimal::from(amount)
}

// ============================================================================
// Arithmetic Functions
// ============================================================================

/// Full-precision `a * b / denominator`, rounded down.
///
/// The product is computed in `u128` so it cannot overflow; the only rounding
/// is the final division.
///
/// # Returns
///
/// * `Some(u64)` - The quotient
/// * `None` - If `denominator` is zero or the quotient exceeds `u64::MAX`
///
/// # Example
///
/// ```
/// use rate_dag::types::fixed::mul_div_floor;
///
/// assert_eq!(mul_div_floor(u64::MAX, 2, 4), Some(u64::MAX / 2));
/// assert_eq!(mul_div_floor(10, 1, 3), Some(3));
/// assert_eq!(mul_div_floor(1, 1, 0), None);
/// ```
pub fn mul_div_floor(a: u64, b: u64, denominator: u64) -> Option<u64> {
    if denominator == 0 {
        return None;
    }

    let product = u128::from(a) * u128::from(b);
    u64::try_from(product / u128::from(denominator)).ok()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_encoding_is_canonical() {
        assert_eq!(encode_decimal(dec("1.5")), encode_decimal(dec("1.500")));
        assert_ne!(encode_decimal(dec("1.5")), encode_decimal(dec("1.05")));
    }

    #[test]
    fn test_decode_rejects_bad_bytes() {
        assert_eq!(decode_decimal(&[0u8; 15]), None);
        assert_eq!(decode_decimal(&[0u8; 17]), None);

        let mut bad_scale = encode_decimal(dec("1.5"));
        bad_scale[2] = 29;
        assert_eq!(decode_decimal(&bad_scale), None);

        let mut stray_flag = encode_decimal(dec("1.5"));
        stray_flag[0] = 1;
        assert_eq!(decode_decimal(&stray_flag), None);
    }

    #[test]
    fn test_decode_negative() {
        let bytes = encode_decimal(dec("-42.125"));
        assert_eq!(decode_decimal(&bytes), Some(dec("-42.125")));
    }

    #[test]
    fn test_mul_div_floor() {
        assert_eq!(mul_div_floor(100, 3, 2), Some(150));
        assert_eq!(mul_div_floor(7, 1, 2), Some(3));
        // Intermediate product exceeds u64 but the quotient fits.
        assert_eq!(mul_div_floor(u64::MAX, u64::MAX, u64::MAX), Some(u64::MAX));
        // Quotient does not fit.
        assert_eq!(mul_div_floor(u64::MAX, 2, 1), None);
        assert_eq!(mul_div_floor(5, 5, 0), None);
    }
}
