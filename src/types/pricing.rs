//! Pricing state types shared between the scheduler and query commands

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reserves of a two-asset pool at one read instant.
///
/// Both amounts are raw on-chain integer amounts, exactly as read from the
/// contracts; the price engine scales them down to whole-asset units.
/// Never persisted; rebuilt every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReserveSnapshot {
    /// Base-asset side (e.g. WBNB).
    pub base: Decimal,
    /// Counter-asset side (tracked token, or the stable in the reference pool).
    pub counter: Decimal,
}

impl ReserveSnapshot {
    pub fn new(base: Decimal, counter: Decimal) -> Self {
        Self { base, counter }
    }
}

/// Result of one successful price derivation.
///
/// The scheduler overwrites this on every successful tick; on a failed tick
/// the previous value stays authoritative for on-demand queries.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedPrice {
    /// Token unit price in USD-equivalent terms, rounded for display.
    pub token_usd: Decimal,
    /// Intermediate base-asset price used for triangulation.
    pub base_usd: Decimal,
    /// Base-asset reserve of the primary pool, in whole base units.
    pub base_reserve: Decimal,
    /// Token reserve of the primary pool, in whole tokens.
    pub token_reserve: Decimal,
    pub at: DateTime<Utc>,
}

impl DerivedPrice {
    /// Token price expressed in the base asset rather than USD.
    pub fn token_in_base(&self) -> Decimal {
        if self.base_usd.is_zero() {
            return Decimal::ZERO;
        }
        self.token_usd / self.base_usd
    }
}

/// Highest price ever observed for one token, persisted across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthRecord {
    pub token: String,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}
