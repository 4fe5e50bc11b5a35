//! Polling scheduler
//!
//! Drives periodic recomputation for one token instance. A tick either
//! commits fully (price cache, ATH record, presence update) or skips
//! entirely, so one RPC hiccup never blanks the displayed price or
//! asserts a false ATH. Ticks never overlap: the loop awaits each tick
//! inline and missed interval slots are skipped, not queued.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{
    errors::OracleResult,
    oracle::Oracle,
    presence::{format_lp_status, format_nickname},
    price::{derive, lp_share_value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Not started; no tick has run yet.
    Idle,
    /// First tick completed, periodic loop active.
    Running,
}

pub struct Poller {
    oracle: Arc<Oracle>,
    refresh: Duration,
    phase: SchedulerPhase,
}

impl Poller {
    pub fn new(oracle: Arc<Oracle>, refresh: Duration) -> Self {
        Self {
            oracle,
            refresh,
            phase: SchedulerPhase::Idle,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// Run one synchronous tick, then the periodic loop until shutdown.
    ///
    /// The first tick completes before the loop starts so dependent
    /// display state is settled when the process reports ready.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        self.tick_logged().await;
        self.phase = SchedulerPhase::Running;
        info!("Polling every {}s", self.refresh.as_secs());

        let mut interval = time::interval(self.refresh);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // the interval fires immediately once; the first tick already ran
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick_logged().await;
                }
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping poller");
                    break;
                }
            }
        }
    }

    async fn tick_logged(&self) {
        if let Err(e) = self.tick().await {
            warn!("Tick skipped, cached price stays authoritative: {}", e);
        }
    }

    /// One full derivation cycle. Nothing is mutated until both reserve
    /// reads have succeeded.
    pub async fn tick(&self) -> OracleResult<()> {
        let token = &self.oracle.token;

        let pool = self.oracle.source.pool_reserves().await?;
        let reference = self.oracle.source.reference_reserves().await?;

        let price = derive(&pool, &reference, token.decimals, token.ratio);
        debug!(
            "Derived {} price ${} (base ${})",
            token.name, price.token_usd, price.base_usd
        );

        let nickname = {
            let mut state = self.oracle.state.write().await;
            state.price = Some(price.clone());
            state.ath.record_if_higher(&token.name, price.token_usd);
            format_nickname(token, &price)
        };

        if let Err(e) = self.oracle.presence.update_nickname(&nickname).await {
            warn!("Nickname update failed: {}", e);
        }

        // Status line needs a total-supply read; best effort, outside the
        // pricing lock.
        match self.oracle.source.lp_total_supply().await {
            Ok(supply) => {
                if let Some(share) = lp_share_value(&price, supply) {
                    if let Err(e) = self.oracle.presence.update_presence(&format_lp_status(&share)).await
                    {
                        warn!("Status update failed: {}", e);
                    }
                }
            }
            Err(e) => debug!("LP status skipped this tick: {}", e),
        }

        Ok(())
    }
}
