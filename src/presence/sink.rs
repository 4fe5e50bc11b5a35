//! Chat-platform boundary
//!
//! The oracle talks to the chat platform through this narrow interface.
//! Delivery failures are the caller's to log; none of them are fatal.

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PresenceSink: Send + Sync {
    async fn update_nickname(&self, nickname: &str) -> Result<()>;

    async fn update_presence(&self, status: &str) -> Result<()>;

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<()>;

    /// Best-effort removal of a message denied by the restriction gate.
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()>;
}

/// Sink used when no chat token is configured; prices still derive and
/// persist, presence updates just go to the log.
pub struct LogOnlySink;

#[async_trait]
impl PresenceSink for LogOnlySink {
    async fn update_nickname(&self, nickname: &str) -> Result<()> {
        tracing::info!("presence nickname: {}", nickname);
        Ok(())
    }

    async fn update_presence(&self, status: &str) -> Result<()> {
        tracing::info!("presence status: {}", status);
        Ok(())
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<()> {
        tracing::info!("message to {}: {}", channel_id, text);
        Ok(())
    }

    async fn delete_message(&self, _channel_id: u64, _message_id: u64) -> Result<()> {
        Ok(())
    }
}
