//! RPC provider setup

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    ConcreteProvider,
    config::Config,
    network::retry::{RetryConfig, retry_with_backoff},
};

pub async fn setup_provider(config: &Config) -> Result<Arc<ConcreteProvider>> {
    let provider: Arc<ConcreteProvider> = Arc::new(
        ProviderBuilder::new()
            .on_http(config.rpc_node.parse()?)
            .boxed(),
    );

    info!("Testing connection to {}...", config.rpc_node);
    let block = retry_with_backoff(
        || async {
            provider
                .get_block_number()
                .await
                .context("Failed to get block number")
        },
        &RetryConfig {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 10000,
            exponential_base: 2.0,
        },
        "chain connection",
    )
    .await
    .map_err(|e| {
        warn!("Network connection attempt failed: {}", e);
        anyhow::anyhow!("Network connection failed: {}", e)
    })?;

    info!("Connected at block {}", block);
    Ok(provider)
}
