//! Per-token oracle instance state

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    ath::AthTracker,
    contracts::ReserveSource,
    presence::PresenceSink,
    restrictions::RestrictionGate,
    types::{AthRecord, DerivedPrice, TokenConfig},
};

/// Mutable pricing state with a single writer: the polling scheduler.
/// Query handlers only ever take read snapshots, so a reader can observe
/// the previous tick's value but never a half-written one.
pub struct PricingState {
    pub price: Option<DerivedPrice>,
    pub ath: AthTracker,
}

impl PricingState {
    pub fn new(ath: AthTracker) -> Self {
        Self { price: None, ath }
    }
}

/// One tracked token: its configuration, contract handles, pricing state,
/// restriction map, and chat boundary. Instances share nothing.
pub struct Oracle {
    pub token: TokenConfig,
    pub source: Arc<dyn ReserveSource>,
    pub state: Arc<RwLock<PricingState>>,
    pub restrictions: Arc<RwLock<RestrictionGate>>,
    pub presence: Arc<dyn PresenceSink>,
}

impl Oracle {
    pub fn new(
        token: TokenConfig,
        source: Arc<dyn ReserveSource>,
        ath: AthTracker,
        presence: Arc<dyn PresenceSink>,
    ) -> Self {
        Self {
            token,
            source,
            state: Arc::new(RwLock::new(PricingState::new(ath))),
            restrictions: Arc::new(RwLock::new(RestrictionGate::new())),
            presence,
        }
    }

    /// Clone of the last committed price, if any tick has succeeded yet.
    pub async fn price_snapshot(&self) -> Option<DerivedPrice> {
        self.state.read().await.price.clone()
    }

    pub async fn ath_snapshot(&self) -> Option<AthRecord> {
        self.state.read().await.ath.current(&self.token.name).cloned()
    }
}
