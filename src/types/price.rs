//! Fixed-point price and quantity utilities.
//!
//! All prices and quantities are `u64` scaled by 10^8. Conversions go through
//! `rust_decimal` so no floating point is ever involved.
//!
//! ```
//! use price_level::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("50000.12345678").unwrap();
//! assert_eq!(price, 5_000_012_345_678);
//! assert_eq!(from_fixed(price), "50000.12345678");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

/// Convert a decimal string to fixed-point.
///
/// # Arguments
///
/// * `s` - Decimal string, e.g. `"50000.12345678"`
///
/// # Returns
///
/// The value scaled by 10^8, or `None` for unparsable, negative or
/// out-of-range input
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a `Decimal` to fixed-point, rounding to the nearest unit.
///
/// # Returns
///
/// `None` if `d` is negative or does not fit in a `u64` once scaled
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Exact `Decimal` value of a fixed-point number
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Render a fixed-point value with 8 decimal places.
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed("1"), Some(100_000_000));
        assert_eq!(to_fixed("0.00000001"), Some(1));
        assert_eq!(to_fixed("100.5"), Some(10_050_000_000));
        assert_eq!(to_fixed("-1.0"), None);
        assert_eq!(to_fixed("abc"), None);
    }

    #[test]
    fn test_from_fixed() {
        assert_eq!(from_fixed(100_000_000), "1.00000000");
        assert_eq!(from_fixed(0), "0.00000000");
        assert_eq!(from_fixed(5_000_012_345_678), "50000.12345678");
    }

    #[test]
    fn test_precision_roundtrip() {
        let value = "123456789.12345678";
        let fixed = to_fixed(value).unwrap();
        assert_eq!(from_fixed(fixed), value);
    }
}
