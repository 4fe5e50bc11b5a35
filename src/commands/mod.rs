//! Command dispatch
//!
//! The chat connection layer hands every recognized invocation to
//! `dispatch` with its channel context. The restriction gate runs before
//! any handler; denied or unknown commands no-op silently.

pub mod admin;
pub mod query;
pub mod registry;

pub use registry::*;

use tracing::warn;

use crate::oracle::Oracle;
use crate::restrictions::GateDecision;

#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// `None` for direct messages, which are never restricted.
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: Option<u64>,
    /// Set by the external dispatcher after its privilege check.
    pub is_privileged: bool,
    pub arg: Option<String>,
}

pub async fn dispatch(
    oracle: &Oracle,
    registry: &Registry,
    name: &str,
    ctx: &CommandContext,
) -> Option<String> {
    let command = registry.resolve(name)?;

    if let Some(guild_id) = ctx.guild_id {
        let decision =
            oracle
                .restrictions
                .read()
                .await
                .check(guild_id, ctx.channel_id, ctx.is_privileged);

        if decision == GateDecision::Deny {
            if let Some(message_id) = ctx.message_id {
                if let Err(e) = oracle.presence.delete_message(ctx.channel_id, message_id).await {
                    warn!("Could not delete restricted message: {}", e);
                }
            }
            return None;
        }
    }

    let response = match command {
        Command::Price => query::price(oracle).await,
        Command::Ath => query::ath(oracle).await,
        Command::Convert => query::convert(oracle, ctx.arg.as_deref()).await,
        Command::Lp => query::lp(oracle, ctx.arg.as_deref()).await,
        Command::RestrictionList => admin::list(oracle, admin_guild(ctx)?).await,
        Command::RestrictionAdd => {
            admin::add(oracle, admin_guild(ctx)?, ctx.arg.as_deref()).await
        }
        Command::RestrictionRemove => {
            admin::remove(oracle, admin_guild(ctx)?, ctx.arg.as_deref()).await
        }
        Command::RestrictionClear => admin::clear(oracle, admin_guild(ctx)?).await,
    };

    Some(response)
}

/// Admin commands only run in a guild and only for privileged actors.
fn admin_guild(ctx: &CommandContext) -> Option<u64> {
    if ctx.is_privileged { ctx.guild_id } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ath::AthTracker;
    use crate::contracts::ReserveSource;
    use crate::errors::{OracleError, OracleResult};
    use crate::oracle::Oracle;
    use crate::presence::PresenceSink;
    use crate::types::{DerivedPrice, ReserveSnapshot, TokenConfig};
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use crate::utils::pow10;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn wei(amount: Decimal) -> Decimal {
        amount * pow10(18)
    }

    struct FixedSource {
        total_supply: OracleResult<Decimal>,
    }

    #[async_trait]
    impl ReserveSource for FixedSource {
        async fn pool_reserves(&self) -> OracleResult<ReserveSnapshot> {
            Ok(ReserveSnapshot::new(wei(dec!(500)), wei(dec!(1_000_000))))
        }

        async fn reference_reserves(&self) -> OracleResult<ReserveSnapshot> {
            Ok(ReserveSnapshot::new(wei(dec!(1_000)), wei(dec!(300_000))))
        }

        async fn lp_total_supply(&self) -> OracleResult<Decimal> {
            match &self.total_supply {
                Ok(supply) => Ok(*supply),
                Err(_) => Err(OracleError::Transport {
                    message: "ledger unavailable".to_string(),
                    source: None,
                    retry_count: 3,
                }),
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        deletions: AtomicUsize,
    }

    #[async_trait]
    impl PresenceSink for RecordingSink {
        async fn update_nickname(&self, _nickname: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn update_presence(&self, _status: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn send_message(&self, _channel_id: u64, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn delete_message(&self, _channel_id: u64, _message_id: u64) -> anyhow::Result<()> {
            self.deletions.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn token() -> TokenConfig {
        TokenConfig {
            contract: Default::default(),
            lp_contract: Default::default(),
            reference_lp: Default::default(),
            decimals: 18,
            ratio: None,
            name: "CAKE".to_string(),
            icon: "🥞".to_string(),
        }
    }

    fn oracle_with(
        total_supply: OracleResult<Decimal>,
    ) -> (Oracle, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let oracle = Oracle::new(
            token(),
            Arc::new(FixedSource { total_supply }),
            AthTracker::in_memory(),
            sink.clone(),
        );
        (oracle, sink)
    }

    async fn seed_price(oracle: &Oracle) {
        oracle.state.write().await.price = Some(DerivedPrice {
            token_usd: dec!(0.15),
            base_usd: dec!(300),
            base_reserve: dec!(500),
            token_reserve: dec!(1_000_000),
            at: Utc::now(),
        });
    }

    fn ctx() -> CommandContext {
        CommandContext {
            guild_id: Some(1),
            channel_id: 10,
            message_id: Some(99),
            is_privileged: false,
            arg: None,
        }
    }

    #[tokio::test]
    async fn unknown_commands_are_a_silent_noop() {
        let (oracle, _) = oracle_with(Ok(wei(dec!(10_000))));
        let registry = Registry::builtin();

        assert!(dispatch(&oracle, &registry, "moon", &ctx()).await.is_none());
    }

    #[tokio::test]
    async fn price_uses_the_cached_snapshot() {
        let (oracle, _) = oracle_with(Ok(wei(dec!(10_000))));
        seed_price(&oracle).await;
        let registry = Registry::builtin();

        let response = dispatch(&oracle, &registry, "price", &ctx()).await.unwrap();
        assert!(response.contains("$0.1500"), "got {response}");
        assert!(response.contains("0.0005"), "got {response}");
    }

    #[tokio::test]
    async fn price_before_first_tick_reports_unavailable() {
        let (oracle, _) = oracle_with(Ok(wei(dec!(10_000))));
        let registry = Registry::builtin();

        let response = dispatch(&oracle, &registry, "price", &ctx()).await.unwrap();
        assert!(response.contains("not available"), "got {response}");
    }

    #[tokio::test]
    async fn restricted_channel_is_denied_and_message_deleted() {
        let (oracle, sink) = oracle_with(Ok(wei(dec!(10_000))));
        seed_price(&oracle).await;
        oracle.restrictions.write().await.add(1, 11);
        let registry = Registry::builtin();

        assert!(dispatch(&oracle, &registry, "price", &ctx()).await.is_none());
        assert_eq!(sink.deletions.load(Ordering::SeqCst), 1);

        // privileged actors bypass the gate
        let mut privileged = ctx();
        privileged.is_privileged = true;
        assert!(dispatch(&oracle, &registry, "price", &privileged).await.is_some());
    }

    #[tokio::test]
    async fn convert_falls_back_to_one_on_malformed_argument() {
        let (oracle, _) = oracle_with(Ok(wei(dec!(10_000))));
        seed_price(&oracle).await;
        let registry = Registry::builtin();

        let mut bad_arg = ctx();
        bad_arg.arg = Some("ten".to_string());
        let fallback = dispatch(&oracle, &registry, "convert", &bad_arg).await.unwrap();

        let mut unit = ctx();
        unit.arg = None;
        let default = dispatch(&oracle, &registry, "convert", &unit).await.unwrap();

        assert_eq!(fallback, default);
        assert!(default.contains("0.0005 BNB"), "got {default}");
    }

    #[tokio::test]
    async fn convert_treats_an_explicit_zero_as_the_unit_amount() {
        let (oracle, _) = oracle_with(Ok(wei(dec!(10_000))));
        seed_price(&oracle).await;
        let registry = Registry::builtin();

        let mut zero = ctx();
        zero.arg = Some("0".to_string());
        let zeroed = dispatch(&oracle, &registry, "convert", &zero).await.unwrap();

        let mut unit = ctx();
        unit.arg = None;
        let default = dispatch(&oracle, &registry, "convert", &unit).await.unwrap();

        assert_eq!(zeroed, default);
        assert!(zeroed.contains("1.0000 CAKE"), "got {zeroed}");
    }

    #[tokio::test]
    async fn lp_query_surfaces_ledger_failures_to_the_caller() {
        let (oracle, _) = oracle_with(Err(OracleError::Transport {
            message: "down".to_string(),
            source: None,
            retry_count: 3,
        }));
        seed_price(&oracle).await;
        let registry = Registry::builtin();

        let response = dispatch(&oracle, &registry, "lp", &ctx()).await.unwrap();
        assert!(response.contains("Could not read the ledger"), "got {response}");
    }

    #[tokio::test]
    async fn lp_query_values_shares_against_total_supply() {
        let (oracle, _) = oracle_with(Ok(wei(dec!(10_000))));
        seed_price(&oracle).await;
        let registry = Registry::builtin();

        let response = dispatch(&oracle, &registry, "lp", &ctx()).await.unwrap();
        assert!(response.contains("100.0000 CAKE"), "got {response}");
        assert!(response.contains("$30.0000"), "got {response}");
    }

    #[tokio::test]
    async fn restriction_admin_round_trip() {
        let (oracle, _) = oracle_with(Ok(wei(dec!(10_000))));
        let registry = Registry::builtin();

        let mut admin = ctx();
        admin.is_privileged = true;

        admin.arg = Some("10".to_string());
        let added = dispatch(&oracle, &registry, "restriction add", &admin).await.unwrap();
        assert!(added.contains("Restricted to <#10>"), "got {added}");

        let again = dispatch(&oracle, &registry, "restriction add", &admin).await.unwrap();
        assert!(again.contains("already restricted"), "got {again}");

        let removed = dispatch(&oracle, &registry, "restriction remove", &admin).await.unwrap();
        assert!(removed.contains("Removed restriction"), "got {removed}");

        let absent = dispatch(&oracle, &registry, "restriction remove", &admin).await.unwrap();
        assert!(absent.contains("don't have a restriction"), "got {absent}");

        // unprivileged actors never reach the handlers
        let mut plain = ctx();
        plain.arg = Some("10".to_string());
        assert!(dispatch(&oracle, &registry, "restriction add", &plain).await.is_none());
    }
}
