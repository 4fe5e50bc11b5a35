//! Discord REST adapter for the presence boundary

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::presence::sink::PresenceSink;

const API_BASE: &str = "https://discord.com/api/v10";

pub struct DiscordSink {
    client: reqwest::Client,
    token: String,
    guild_ids: Vec<u64>,
    api_base: String,
}

impl DiscordSink {
    pub fn new(token: String, guild_ids: Vec<u64>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            token,
            guild_ids,
            api_base: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn patch_nickname(&self, guild_id: u64, nickname: &str) -> Result<()> {
        let response = self
            .client
            .patch(format!("{}/guilds/{guild_id}/members/@me", self.api_base))
            .header("Authorization", self.auth())
            .json(&serde_json::json!({ "nick": nickname }))
            .send()
            .await
            .context("Nickname request failed")?;

        self.check(response, "Nickname update").await
    }

    async fn check(&self, response: reqwest::Response, context: &str) -> Result<()> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("{context} failed: {status} - {body}"));
        }
        Ok(())
    }
}

#[async_trait]
impl PresenceSink for DiscordSink {
    /// Each guild is updated independently; one guild rejecting the rename
    /// must not keep the rest stale.
    async fn update_nickname(&self, nickname: &str) -> Result<()> {
        for &guild_id in &self.guild_ids {
            if let Err(e) = self.patch_nickname(guild_id, nickname).await {
                warn!("Nickname update failed for guild {}: {:#}", guild_id, e);
            }
        }
        Ok(())
    }

    async fn update_presence(&self, status: &str) -> Result<()> {
        // Activity status rides on the gateway session owned by the chat
        // connection layer, not the REST API; record it for that layer.
        debug!("presence status: {}", status);
        Ok(())
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/channels/{channel_id}/messages", self.api_base))
            .header("Authorization", self.auth())
            .json(&serde_json::json!({ "content": text }))
            .send()
            .await
            .context("Message request failed")?;

        self.check(response, "Message send").await
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        let response = self
            .client
            .delete(format!(
                "{}/channels/{channel_id}/messages/{message_id}",
                self.api_base
            ))
            .header("Authorization", self.auth())
            .send()
            .await
            .context("Delete request failed")?;

        self.check(response, "Message delete").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nickname_failures_are_logged_not_propagated() {
        // Unroutable endpoint: every guild's request fails, the walk still
        // covers all of them and reports success to the scheduler.
        let sink = DiscordSink::new("token".to_string(), vec![1, 2])
            .unwrap()
            .with_api_base("http://127.0.0.1:9");

        assert!(sink.update_nickname("🥞 $0.1500").await.is_ok());
    }
}
