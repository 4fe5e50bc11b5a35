//! Per-guild command restriction gate
//!
//! A guild with no entry is unrestricted. A guild with an entry only
//! allows queries from channels in its allow-set; privileged actors
//! always pass. Deny carries the request to delete the triggering
//! message, which the chat-platform adapter performs if it can.

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Denied; the triggering message should be deleted where permitted.
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyRestricted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NoSuchRestriction,
}

#[derive(Debug, Default)]
pub struct RestrictionGate {
    map: HashMap<u64, BTreeSet<u64>>,
}

impl RestrictionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, guild_id: u64, channel_id: u64, privileged: bool) -> GateDecision {
        if privileged {
            return GateDecision::Allow;
        }

        match self.map.get(&guild_id) {
            None => GateDecision::Allow,
            Some(channels) if channels.contains(&channel_id) => GateDecision::Allow,
            Some(_) => GateDecision::Deny,
        }
    }

    pub fn is_allowed(&self, guild_id: u64, channel_id: u64, privileged: bool) -> bool {
        self.check(guild_id, channel_id, privileged) == GateDecision::Allow
    }

    /// Idempotent: adding a channel twice is a visible no-op.
    pub fn add(&mut self, guild_id: u64, channel_id: u64) -> AddOutcome {
        if self.map.entry(guild_id).or_default().insert(channel_id) {
            AddOutcome::Added
        } else {
            AddOutcome::AlreadyRestricted
        }
    }

    /// Idempotent: removing an absent channel is a visible no-op. An
    /// emptied entry is dropped so the guild reverts to unrestricted.
    pub fn remove(&mut self, guild_id: u64, channel_id: u64) -> RemoveOutcome {
        let Some(channels) = self.map.get_mut(&guild_id) else {
            return RemoveOutcome::NoSuchRestriction;
        };

        if !channels.remove(&channel_id) {
            return RemoveOutcome::NoSuchRestriction;
        }
        if channels.is_empty() {
            self.map.remove(&guild_id);
        }
        RemoveOutcome::Removed
    }

    /// Drop every restriction for `guild_id`, returning how many were set.
    pub fn clear(&mut self, guild_id: u64) -> usize {
        self.map.remove(&guild_id).map(|c| c.len()).unwrap_or(0)
    }

    pub fn list(&self, guild_id: u64) -> Vec<u64> {
        self.map
            .get(&guild_id)
            .map(|channels| channels.iter().copied().collect())
            .unwrap_or_default()
    }
}
