//! Per-instance token configuration

use alloy::primitives::Address;

/// Immutable description of the token an oracle instance tracks.
///
/// Loaded once at startup and never mutated. Each instance owns its own
/// copy; nothing here is shared across token instances.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// ERC-20 contract of the tracked token.
    pub contract: Address,
    /// Primary liquidity pool holding token + base asset reserves.
    pub lp_contract: Address,
    /// Reference pool holding base asset + stable reserves.
    pub reference_lp: Address,
    /// Fraction digits the token contract uses (base asset uses 18).
    pub decimals: u32,
    /// Token's share of pool value for weighted pools, percent 1-99.
    /// `None` for ordinary 50/50 pools.
    pub ratio: Option<u32>,
    pub name: String,
    pub icon: String,
}
