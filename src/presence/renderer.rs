//! Display-string rendering for presence updates

use crate::price::LpShareValue;
use crate::types::{DerivedPrice, TokenConfig};

/// Nickname shown next to the bot: icon, USD price, and the price
/// expressed in the base asset.
pub fn format_nickname(token: &TokenConfig, price: &DerivedPrice) -> String {
    format!(
        "{} ${:.4} ({:.4})",
        token.icon,
        price.token_usd,
        price.token_in_base()
    )
}

/// Status line summarizing one LP token's composition and value.
pub fn format_lp_status(share: &LpShareValue) -> String {
    format!(
        "LP ≈${:.2} | {:.4} + {:.4} BNB",
        share.usd_per_lp, share.token_per_lp, share.base_per_lp
    )
}
