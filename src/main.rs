//! LP Price Oracle - Main Entry Point

use anyhow::Result;
use lp_price_oracle::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let _logging_guard = utils::setup_logging()?;
    utils::setup_output_directories()?;

    // Load configuration; a missing required setting must stop the
    // process before any polling starts
    let config = Config::load()?;

    info!("LP Price Oracle v0.2.0");
    info!("📋 Configuration:");
    info!("   Token: {} {}", config.token_name, config.token_icon);
    info!("   Contract: {}", config.token_contract);
    info!("   Pool: {}", config.lp_contract);
    info!("   Reference Pool: {}", config.reference_lp);
    if let Some(ratio) = config.ratio {
        info!("   Weighted Pool Ratio: {}%", ratio);
    }
    info!("   Refresh: {}s", config.refresh_secs);

    // Setup network provider
    let provider = network::setup_provider(&config).await?;

    // Resolve token precision, from config or from the contract itself
    let decimals = match config.token_decimals {
        Some(decimals) => decimals,
        None => {
            let raw =
                contracts::read_scalar(provider.as_ref(), config.token_contract, "decimals")
                    .await?;
            let decimals = u32::try_from(raw)
                .map_err(|_| anyhow::anyhow!("decimals() out of range: {}", raw))?;
            let decimals = config::validate_decimals(decimals)?;
            info!("   Discovered token decimals: {}", decimals);
            decimals
        }
    };

    let token = config.token_config(decimals);
    let source = Arc::new(contracts::ChainReserveSource::new(
        provider.clone(),
        token.clone(),
    ));
    let ath_tracker = ath::AthTracker::open(ath::AthStore::new(&config.ath_state_path));

    let presence: Arc<dyn presence::PresenceSink> = match &config.chat_token {
        Some(chat_token) => Arc::new(presence::DiscordSink::new(
            chat_token.clone(),
            config.guild_ids.clone(),
        )?),
        None => {
            info!("CHAT_API_TOKEN not configured, presence updates go to the log");
            Arc::new(presence::LogOnlySink)
        }
    };

    let oracle = Arc::new(oracle::Oracle::new(token, source, ath_tracker, presence));

    // Setup shutdown handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let shutdown_tx = Arc::new(tokio::sync::Mutex::new(Some(shutdown_tx)));

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("📛 Received shutdown signal (Ctrl+C)...");
        if let Some(tx) = shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }
    });

    info!("🚀 Starting polling loop...");

    scheduler::Poller::new(oracle, Duration::from_secs(config.refresh_secs))
        .run(shutdown_rx)
        .await;

    info!("Shut down cleanly");
    Ok(())
}
