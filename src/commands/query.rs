//! Price query command handlers

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::errors::OracleError;
use crate::oracle::Oracle;
use crate::price::lp_share_value;
use crate::utils::parse_decimal;

const NO_PRICE_YET: &str = "Price is not available yet, try again shortly.";

/// Malformed or zero numeric arguments fall back to 1 rather than failing
/// the command or answering with all zeros.
fn multiplier(arg: Option<&str>) -> Decimal {
    match arg {
        None => dec!(1),
        Some(raw) => match parse_decimal(raw) {
            Some(value) if !value.is_zero() => value.abs(),
            Some(_) => dec!(1),
            None => {
                let err = OracleError::Validation {
                    input: raw.to_string(),
                    reason: "not a decimal".to_string(),
                };
                debug!("{}; using default of 1", err);
                dec!(1)
            }
        },
    }
}

pub async fn price(oracle: &Oracle) -> String {
    match oracle.price_snapshot().await {
        Some(price) => format!(
            "{} ${:.4} ({:.4} BNB)",
            oracle.token.icon,
            price.token_usd,
            price.token_in_base()
        ),
        None => NO_PRICE_YET.to_string(),
    }
}

pub async fn ath(oracle: &Oracle) -> String {
    match oracle.ath_snapshot().await {
        Some(record) => format!(
            "{} ATH ${:.4} ({})",
            oracle.token.icon,
            record.price,
            record.timestamp.format("%Y-%m-%d %H:%M UTC")
        ),
        None => "No all-time high recorded yet.".to_string(),
    }
}

pub async fn convert(oracle: &Oracle, arg: Option<&str>) -> String {
    let multi = multiplier(arg);

    let Some(price) = oracle.price_snapshot().await else {
        return NO_PRICE_YET.to_string();
    };
    if price.token_reserve.is_zero() {
        return NO_PRICE_YET.to_string();
    }

    let token_in_base = price.base_reserve / price.token_reserve;
    format!(
        "{:.4} {} ≈ {:.4} BNB (${:.4})",
        multi,
        oracle.token.name,
        token_in_base * multi,
        token_in_base * price.base_usd * multi
    )
}

/// LP valuation issues a fresh total-supply read; the pricing lock is not
/// held across that network round-trip.
pub async fn lp(oracle: &Oracle, arg: Option<&str>) -> String {
    let multi = multiplier(arg);

    let Some(price) = oracle.price_snapshot().await else {
        return NO_PRICE_YET.to_string();
    };

    let total_supply = match oracle.source.lp_total_supply().await {
        Ok(supply) => supply,
        Err(e) => {
            warn!("LP query ledger read failed: {}", e);
            return "Could not read the ledger right now, try again later.".to_string();
        }
    };

    match lp_share_value(&price, total_supply) {
        Some(share) => format!(
            "{:.4} {}/BNB LP ≈ {:.4} {} + {:.4} BNB (${:.4})",
            multi,
            oracle.token.name,
            share.token_per_lp * multi,
            oracle.token.name,
            share.base_per_lp * multi,
            share.usd_per_lp * multi
        ),
        None => "The pool has no LP supply yet.".to_string(),
    }
}
