//! LP Price Oracle - continuous on-chain token pricing
//!
//! Derives a token's USD price by triangulating through two liquidity
//! pools, tracks the all-time high across restarts, and publishes the
//! result to a chat presence and on-demand query commands.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod contracts;
pub mod price;
pub mod ath;
pub mod restrictions;
pub mod oracle;
pub mod scheduler;
pub mod commands;
pub mod presence;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::{OracleError, OracleResult};
pub use types::*;

// Type alias for our concrete provider
pub type ConcreteProvider = alloy::providers::RootProvider<alloy::transports::BoxTransport>;
