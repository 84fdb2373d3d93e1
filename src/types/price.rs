//! Fixed-point price utilities and the TWAP average.
//!
//! ## Overview
//!
//! Prices are stored as u64 scaled by 10^8 (the deposit swap bounds use this
//! form). The oracle's price accumulator is the running sum of
//! `price * seconds` in the same scale, so the time-weighted average over a
//! window is `(acc_end - acc_start) / elapsed`.
//!
//! Executors in different processes must agree on the realized price, so
//! nothing here touches `f64`.
//!
//! ```
//! use twap_delay::types::price::{average_price, within_swap_bounds};
//! use rust_decimal::Decimal;
//!
//! // 2.5 held for 300 seconds
//! let start = 1_000u128;
//! let end = start + 250_000_000u128 * 300;
//! let avg = average_price(start, end, 300).unwrap();
//! assert_eq!(avg, Decimal::new(25, 1));
//! assert!(within_swap_bounds(avg, 200_000_000, 300_000_000));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point prices: 10^8
pub const SCALE: u64 = 100_000_000;

// ============================================================================
// Fixed-point conversion
// ============================================================================

/// Decimal price to 10^8 fixed point, rounded to the nearest unit.
///
/// `None` for negative values or values past `u64::MAX / SCALE`.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }
    d.checked_mul(Decimal::from(SCALE))?.round_dp(0).to_u64()
}

pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Whether `price` lies in a deposit's `[min_swap_price, max_swap_price]`
/// after rounding to fixed point.
pub fn within_swap_bounds(price: Decimal, min_swap_price: u64, max_swap_price: u64) -> bool {
    match decimal_to_fixed(price) {
        Some(fixed) => (min_swap_price..=max_swap_price).contains(&fixed),
        None => false,
    }
}

// ============================================================================
// TWAP
// ============================================================================

/// Time-weighted average price between two accumulator readings.
///
/// `acc_start` is the snapshot stored on the order at enqueue, `acc_end` the
/// reading taken at execution, `elapsed` the seconds between them.
///
/// Returns `None` when no time has elapsed, the accumulator went backwards,
/// or the difference does not fit a 96-bit decimal mantissa.
pub fn average_price(acc_start: u128, acc_end: u128, elapsed: u64) -> Option<Decimal> {
    if elapsed == 0 {
        return None;
    }

    let diff = acc_end.checked_sub(acc_start)?;
    let diff = Decimal::from_u128(diff)?;
    diff.checked_div(Decimal::from(elapsed))?
        .checked_div(Decimal::from(SCALE))
}

/// Reciprocal price, used when an order's `inverted` flag is set.
pub fn invert_price(price: Decimal) -> Option<Decimal> {
    if price.is_zero() {
        return None;
    }
    Decimal::ONE.checked_div(price)
}

/// Average price seen from the caller's orientation.
pub fn oriented_average_price(
    acc_start: u128,
    acc_end: u128,
    elapsed: u64,
    inverted: bool,
) -> Option<Decimal> {
    let price = average_price(acc_start, acc_end, elapsed)?;
    if inverted {
        invert_price(price)
    } else {
        Some(price)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_conversion() {
        assert_eq!(decimal_to_fixed(Decimal::new(15, 1)), Some(150_000_000));
        assert_eq!(decimal_to_fixed(Decimal::new(1, 9)), Some(0));
        assert_eq!(decimal_to_fixed(Decimal::from(-1)), None);
        assert_eq!(fixed_to_decimal(1), Decimal::new(1, 8));
    }

    #[test]
    fn test_within_swap_bounds() {
        let price = Decimal::new(25, 1);
        assert!(within_swap_bounds(price, 250_000_000, 250_000_000));
        assert!(!within_swap_bounds(price, 0, 249_999_999));
        assert!(!within_swap_bounds(Decimal::from(-1), 0, u64::MAX));
    }

    #[test]
    fn test_average_price_constant() {
        // price 3.0 for 60 seconds
        let start = 42u128;
        let end = start + 300_000_000u128 * 60;
        assert_eq!(average_price(start, end, 60), Some(Decimal::from(3)));
    }

    #[test]
    fn test_average_price_mixed_window() {
        // 1.0 for 100s then 2.0 for 100s -> 1.5
        let end = 100_000_000u128 * 100 + 200_000_000u128 * 100;
        assert_eq!(average_price(0, end, 200), Some(Decimal::new(15, 1)));
    }

    #[test]
    fn test_average_price_rejects_bad_windows() {
        assert_eq!(average_price(10, 20, 0), None);
        assert_eq!(average_price(20, 10, 5), None);
        assert_eq!(average_price(0, u128::MAX, 5), None);
    }

    #[test]
    fn test_invert_price() {
        assert_eq!(invert_price(Decimal::from(4)), Some(Decimal::new(25, 2)));
        assert_eq!(invert_price(Decimal::ZERO), None);
    }

    #[test]
    fn test_oriented_average_price() {
        let end = 200_000_000u128 * 10;
        assert_eq!(oriented_average_price(0, end, 10, false), Some(Decimal::from(2)));
        assert_eq!(oriented_average_price(0, end, 10, true), Some(Decimal::new(5, 1)));
    }
}
