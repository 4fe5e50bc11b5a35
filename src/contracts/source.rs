//! Reserve reads grouped per oracle instance
//!
//! `ReserveSource` is the seam between pricing logic and the chain: the
//! scheduler and query commands consume the trait, production wires in
//! `ChainReserveSource`, tests substitute a canned double.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::{
    ConcreteProvider,
    contracts::reader::{read_balance, read_scalar, u256_to_decimal},
    errors::OracleResult,
    network::retry::{RetryConfig, retry_with_backoff},
    types::{BUSD, ReserveSnapshot, TokenConfig, WBNB},
};

#[async_trait]
pub trait ReserveSource: Send + Sync {
    /// Primary pool reserves: base asset + tracked token, raw amounts.
    async fn pool_reserves(&self) -> OracleResult<ReserveSnapshot>;

    /// Reference pool reserves: base asset + stable, raw amounts.
    async fn reference_reserves(&self) -> OracleResult<ReserveSnapshot>;

    /// Raw LP token supply of the primary pool.
    async fn lp_total_supply(&self) -> OracleResult<Decimal>;
}

/// Production source reading reserves over RPC with retry.
pub struct ChainReserveSource {
    provider: Arc<ConcreteProvider>,
    token: TokenConfig,
    retry: RetryConfig,
}

impl ChainReserveSource {
    pub fn new(provider: Arc<ConcreteProvider>, token: TokenConfig) -> Self {
        Self {
            provider,
            token,
            retry: RetryConfig {
                max_attempts: 3,
                initial_delay_ms: 200,
                ..Default::default()
            },
        }
    }

    async fn pair_balances(
        &self,
        pool: alloy::primitives::Address,
        counter_asset: alloy::primitives::Address,
        context: &str,
    ) -> OracleResult<ReserveSnapshot> {
        let snapshot = retry_with_backoff(
            || async {
                let base = read_balance(self.provider.as_ref(), WBNB, pool).await?;
                let counter = read_balance(self.provider.as_ref(), counter_asset, pool).await?;
                Ok((base, counter))
            },
            &self.retry,
            context,
        )
        .await?;

        Ok(ReserveSnapshot::new(
            u256_to_decimal(snapshot.0, WBNB)?,
            u256_to_decimal(snapshot.1, counter_asset)?,
        ))
    }
}

#[async_trait]
impl ReserveSource for ChainReserveSource {
    async fn pool_reserves(&self) -> OracleResult<ReserveSnapshot> {
        self.pair_balances(
            self.token.lp_contract,
            self.token.contract,
            &format!("{} pool reserves", self.token.name),
        )
        .await
    }

    async fn reference_reserves(&self) -> OracleResult<ReserveSnapshot> {
        self.pair_balances(self.token.reference_lp, BUSD, "reference pool reserves")
            .await
    }

    async fn lp_total_supply(&self) -> OracleResult<Decimal> {
        let supply = retry_with_backoff(
            || async {
                read_scalar(self.provider.as_ref(), self.token.lp_contract, "totalSupply")
                    .await
                    .map_err(anyhow::Error::from)
            },
            &self.retry,
            "LP total supply",
        )
        .await?;

        u256_to_decimal(supply, self.token.lp_contract)
    }
}
