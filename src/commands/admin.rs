//! Restriction administration handlers
//!
//! Privilege is verified by the external command dispatcher before these
//! run; the handlers only mutate the map and report what changed.

use crate::oracle::Oracle;
use crate::restrictions::{AddOutcome, RemoveOutcome};

fn channel_arg(arg: Option<&str>) -> Option<u64> {
    arg?.trim()
        .trim_start_matches("<#")
        .trim_end_matches('>')
        .parse()
        .ok()
}

const BAD_CHANNEL: &str = "That doesn't look like a channel id.";

pub async fn list(oracle: &Oracle, guild_id: u64) -> String {
    let channels = oracle.restrictions.read().await.list(guild_id);
    if channels.is_empty() {
        return "No restrictions on this server".to_string();
    }

    let mentions: Vec<String> = channels.iter().map(|id| format!("<#{id}>")).collect();
    format!(
        "Restricted to the following channels: {}",
        mentions.join(" ")
    )
}

pub async fn add(oracle: &Oracle, guild_id: u64, arg: Option<&str>) -> String {
    let Some(channel_id) = channel_arg(arg) else {
        return BAD_CHANNEL.to_string();
    };

    match oracle.restrictions.write().await.add(guild_id, channel_id) {
        AddOutcome::Added => format!("Restricted to <#{channel_id}>"),
        AddOutcome::AlreadyRestricted => format!("<#{channel_id}> is already restricted"),
    }
}

pub async fn remove(oracle: &Oracle, guild_id: u64, arg: Option<&str>) -> String {
    let Some(channel_id) = channel_arg(arg) else {
        return BAD_CHANNEL.to_string();
    };

    match oracle.restrictions.write().await.remove(guild_id, channel_id) {
        RemoveOutcome::Removed => format!("Removed restriction for <#{channel_id}>"),
        RemoveOutcome::NoSuchRestriction => {
            "I don't have a restriction for that channel!".to_string()
        }
    }
}

pub async fn clear(oracle: &Oracle, guild_id: u64) -> String {
    let dropped = oracle.restrictions.write().await.clear(guild_id);
    format!("Cleared {dropped} restriction(s).")
}
