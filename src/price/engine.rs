//! Triangulated price derivation
//!
//! Pure reserve math: no I/O, no retries, no state. The token price in USD
//! terms is chained through two pools: token -> base asset in the primary
//! pool, base asset -> stable in the reference pool. Reserve amounts come
//! in raw on-chain units and are scaled DOWN to whole-asset units before
//! ratioing; dividing keeps even the largest raw reserves inside
//! `Decimal`'s range, where multiplying up would not.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{DerivedPrice, ReserveSnapshot};
use crate::utils::{pow10, round_display};

/// Fraction digits of the base asset, the stable, and LP tokens.
const BASE_DECIMALS: i32 = 18;

/// Scale a raw token reserve down to whole-token units.
pub fn normalize_token_reserve(raw: Decimal, decimals: u32) -> Decimal {
    raw / pow10(decimals as i32)
}

/// Base-asset unit price from the reference pool: stable / base.
///
/// Both sides carry 18 fraction digits, so the raw ratio is already the
/// unit price. A zero base reserve is a degenerate pool, not a fault; it
/// prices at 0.
pub fn base_asset_price(reference: &ReserveSnapshot) -> Decimal {
    if reference.base.is_zero() {
        return Decimal::ZERO;
    }
    reference.counter / reference.base
}

/// Token unit price in USD terms, rounded half-up to display precision.
///
/// `ratio` is the token's share of pool value for weighted pools, as a
/// percentage from 1 to 99; each side of a two-asset pool backs half the
/// pool's paired value, so the reserve ratio is reweighted by
/// `2*r/100 : 2*(100-r)/100` before triangulating (the paired factors of
/// 2 cancel). Unweighted pools and `ratio = 50` agree by construction.
pub fn derive_price(
    pool: &ReserveSnapshot,
    reference: &ReserveSnapshot,
    decimals: u32,
    ratio: Option<u32>,
) -> Decimal {
    let token_reserve = normalize_token_reserve(pool.counter, decimals);
    let base_reserve = pool.base / pow10(BASE_DECIMALS);
    let base_price = base_asset_price(reference);

    if token_reserve.is_zero() || base_reserve.is_zero() {
        return Decimal::ZERO;
    }

    let reserve_ratio = match ratio {
        Some(r) => {
            let r = Decimal::from(r) / dec!(100);
            (base_reserve * r).checked_div(token_reserve * (dec!(1) - r))
        }
        None => base_reserve.checked_div(token_reserve),
    };

    // A ratio too extreme for Decimal is degenerate data; price it at 0
    // like the zero-reserve cases rather than panicking mid-tick.
    match reserve_ratio.and_then(|ratio| ratio.checked_mul(base_price)) {
        Some(price) => round_display(price),
        None => Decimal::ZERO,
    }
}

/// Run a full derivation and capture the whole-unit reserves it was
/// computed from.
pub fn derive(
    pool: &ReserveSnapshot,
    reference: &ReserveSnapshot,
    decimals: u32,
    ratio: Option<u32>,
) -> DerivedPrice {
    DerivedPrice {
        token_usd: derive_price(pool, reference, decimals, ratio),
        base_usd: base_asset_price(reference),
        base_reserve: pool.base / pow10(BASE_DECIMALS),
        token_reserve: normalize_token_reserve(pool.counter, decimals),
        at: Utc::now(),
    }
}

/// Composition and USD value of one LP token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LpShareValue {
    pub token_per_lp: Decimal,
    pub base_per_lp: Decimal,
    pub usd_per_lp: Decimal,
}

/// Total-supply-normalized LP valuation: each LP token is worth its share
/// of both reserves, valued at the current derived prices. `total_supply`
/// is the raw on-chain amount; LP tokens carry 18 fraction digits.
pub fn lp_share_value(price: &DerivedPrice, total_supply: Decimal) -> Option<LpShareValue> {
    let supply = total_supply / pow10(BASE_DECIMALS);
    if supply.is_zero() {
        return None;
    }

    let token_per_lp = price.token_reserve / supply;
    let base_per_lp = price.base_reserve / supply;

    Some(LpShareValue {
        token_per_lp,
        base_per_lp,
        usd_per_lp: token_per_lp * price.token_usd + base_per_lp * price.base_usd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(base: Decimal, counter: Decimal) -> ReserveSnapshot {
        ReserveSnapshot::new(base, counter)
    }

    /// Raw amount of an 18-fraction-digit asset.
    fn wei(amount: Decimal) -> Decimal {
        amount * pow10(18)
    }

    #[test]
    fn triangulates_through_the_reference_pool() {
        // base price = 300_000 / 1_000 = 300; token = (500 / 1_000_000) * 300
        let pool = snapshot(wei(dec!(500)), wei(dec!(1_000_000)));
        let reference = snapshot(wei(dec!(1_000)), wei(dec!(300_000)));

        assert_eq!(derive_price(&pool, &reference, 18, None), dec!(0.15));
    }

    #[test]
    fn weighted_pool_reweights_reserves() {
        // base price 10; (200*2*0.8) / (50*2*0.2) * 10 = 160
        let pool = snapshot(wei(dec!(200)), wei(dec!(50)));
        let reference = snapshot(wei(dec!(100)), wei(dec!(1_000)));

        assert_eq!(derive_price(&pool, &reference, 18, Some(80)), dec!(160));
    }

    #[test]
    fn ratio_fifty_matches_unweighted() {
        let pool = snapshot(wei(dec!(731)), wei(dec!(90_201)));
        let reference = snapshot(wei(dec!(1_250)), wei(dec!(411_000)));

        assert_eq!(
            derive_price(&pool, &reference, 18, Some(50)),
            derive_price(&pool, &reference, 18, None),
        );
    }

    #[test]
    fn zero_token_reserve_prices_at_zero() {
        let pool = snapshot(wei(dec!(500)), dec!(0));
        let reference = snapshot(wei(dec!(1_000)), wei(dec!(300_000)));

        assert_eq!(derive_price(&pool, &reference, 18, None), dec!(0));
        assert_eq!(derive_price(&pool, &reference, 18, Some(80)), dec!(0));
    }

    #[test]
    fn zero_base_reserve_in_reference_prices_at_zero() {
        let pool = snapshot(wei(dec!(500)), wei(dec!(1_000_000)));
        let reference = snapshot(dec!(0), wei(dec!(300_000)));

        assert_eq!(derive_price(&pool, &reference, 18, None), dec!(0));
    }

    #[test]
    fn positive_reserves_give_positive_price() {
        // (10 / 1_000) * (3 / 7) = 0.00428... stays visible at 4 digits
        let pool = snapshot(wei(dec!(10)), wei(dec!(1_000)));
        let reference = snapshot(wei(dec!(7)), wei(dec!(3)));

        assert_eq!(derive_price(&pool, &reference, 18, None), dec!(0.0043));
    }

    #[test]
    fn fewer_token_decimals_normalize_to_the_same_price() {
        // 9-decimal token: raw reserve is 1e9 smaller for the same holding,
        // so normalization must leave the price unchanged.
        let pool_18 = snapshot(wei(dec!(500)), wei(dec!(1_000_000)));
        let pool_9 = snapshot(wei(dec!(500)), dec!(1_000_000) * pow10(9));
        let reference = snapshot(wei(dec!(1_000)), wei(dec!(300_000)));

        assert_eq!(
            derive_price(&pool_9, &reference, 9, None),
            derive_price(&pool_18, &reference, 18, None),
        );
        assert_eq!(derive_price(&pool_9, &reference, 9, None), dec!(0.15));
    }

    #[test]
    fn huge_low_decimal_reserve_derives_without_overflow() {
        // 1e20 raw units of a 6-decimal token is 1e14 whole tokens; scaling
        // that up to 18 digits would blow past Decimal's ceiling, scaling
        // down keeps it well inside.
        let pool = snapshot(pow10(26), pow10(20));
        let reference = snapshot(wei(dec!(1_000)), wei(dec!(300_000)));

        // (1e8 / 1e14) * 300 = 0.0003
        assert_eq!(derive_price(&pool, &reference, 6, None), dec!(0.0003));
        // (1e8 * 0.8) / (1e14 * 0.2) * 300 = 0.0012
        assert_eq!(derive_price(&pool, &reference, 6, Some(80)), dec!(0.0012));
    }

    #[test]
    fn price_rounds_half_up_to_four_digits() {
        // raw price = (1 / 3) * 1 = 0.3333...
        let reference = snapshot(wei(dec!(1)), wei(dec!(1)));
        let pool = snapshot(wei(dec!(1)), wei(dec!(3)));
        assert_eq!(derive_price(&pool, &reference, 18, None), dec!(0.3333));

        // raw price = 0.00005 exactly; half-up keeps it
        let pool = snapshot(wei(dec!(1)), wei(dec!(20_000)));
        assert_eq!(derive_price(&pool, &reference, 18, None), dec!(0.0001));
    }

    #[test]
    fn lp_share_value_uses_total_supply_normalization() {
        let price = DerivedPrice {
            token_usd: dec!(0.15),
            base_usd: dec!(300),
            base_reserve: dec!(500),
            token_reserve: dec!(1_000_000),
            at: Utc::now(),
        };

        let share = lp_share_value(&price, wei(dec!(10_000))).unwrap();
        assert_eq!(share.token_per_lp, dec!(100));
        assert_eq!(share.base_per_lp, dec!(0.05));
        assert_eq!(share.usd_per_lp, dec!(30));

        assert!(lp_share_value(&price, dec!(0)).is_none());
    }
}
