//! Mathematical utility functions

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Fraction digits kept when a price is rounded for display and ATH
/// comparison.
pub const DISPLAY_PRECISION: u32 = 4;

pub fn pow10(n: i32) -> Decimal {
    match n {
        0 => dec!(1),
        6 => dec!(1_000_000),
        18 => dec!(1_000_000_000_000_000_000),
        _ => {
            let mut result = dec!(1);
            if n > 0 {
                for _ in 0..n {
                    result *= dec!(10);
                }
            } else {
                for _ in 0..(-n) {
                    result /= dec!(10);
                }
            }
            result
        }
    }
}

/// Round-half-up to the fixed display precision.
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Lenient numeric argument parsing for user-supplied command input.
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    Decimal::from_str(input.trim()).ok()
}
