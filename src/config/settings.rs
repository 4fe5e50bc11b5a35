//! Oracle configuration and environment variable handling

use alloy::primitives::Address;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::{OracleError, OracleResult};
use crate::types::{TokenConfig, amm_reference_pool};

// Configuration constants
pub const DEFAULT_REFRESH_SECS: u64 = 15; // every ~5 BSC blocks
pub const MIN_REFRESH_SECS: u64 = 3;
pub const DEFAULT_AMM: &str = "pancakeswap";
pub const DEFAULT_ATH_STATE_PATH: &str = "output/state/ath.json";
/// ERC-20 `decimals()` is a u8 in practice; anything past `Decimal`'s 28
/// fraction digits cannot be scaled anyway.
pub const MAX_TOKEN_DECIMALS: u32 = 28;

/// Reject token precisions the price math cannot represent, whether they
/// come from the environment or from the contract itself.
pub fn validate_decimals(decimals: u32) -> OracleResult<u32> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(OracleError::configuration(format!(
            "Token decimals must be at most {MAX_TOKEN_DECIMALS}, got {decimals}"
        )));
    }
    Ok(decimals)
}

/// Process configuration, loaded once at startup.
///
/// Each token instance gets its own `Config`; nothing here is global.
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_node: String,
    pub refresh_secs: u64,
    pub chat_token: Option<String>,
    pub guild_ids: Vec<u64>,
    pub ath_state_path: PathBuf,
    pub token_contract: Address,
    pub lp_contract: Address,
    pub reference_lp: Address,
    /// `None` means read `decimals()` from the token contract at startup.
    pub token_decimals: Option<u32>,
    pub ratio: Option<u32>,
    pub token_name: String,
    pub token_icon: String,
}

impl Config {
    /// Load from the environment. Missing or malformed required settings
    /// are fatal; the process must not start half-configured.
    pub fn load() -> OracleResult<Self> {
        let rpc_node = env::var("RPC_NODE")
            .map_err(|_| OracleError::configuration("Required setting RPC_NODE not configured"))?;

        let token_name = env::var("TOKEN_NAME")
            .map_err(|_| OracleError::configuration("Required setting TOKEN_NAME not configured"))?;

        let amm = env::var("AMM").unwrap_or_else(|_| DEFAULT_AMM.to_string());
        let reference_lp = amm_reference_pool(&amm).ok_or_else(|| {
            OracleError::configuration(format!("{token_name}'s AMM {amm} does not exist"))
        })?;

        let token_decimals = match env::var("TOKEN_DECIMALS") {
            Ok(raw) => {
                let decimals: u32 = raw.parse().map_err(|_| {
                    OracleError::configuration(format!("TOKEN_DECIMALS {raw:?} is not an integer"))
                })?;
                Some(validate_decimals(decimals)?)
            }
            Err(_) => None,
        };

        let ratio = match env::var("TOKEN_RATIO") {
            Ok(raw) => {
                let ratio: u32 = raw.parse().map_err(|_| {
                    OracleError::configuration(format!("TOKEN_RATIO {raw:?} is not an integer"))
                })?;
                if !(1..=99).contains(&ratio) {
                    return Err(OracleError::configuration(format!(
                        "TOKEN_RATIO must be a percentage between 1 and 99, got {ratio}"
                    )));
                }
                Some(ratio)
            }
            Err(_) => None,
        };

        Ok(Self {
            rpc_node,
            refresh_secs: env::var("REFRESH_RATE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REFRESH_SECS)
                .max(MIN_REFRESH_SECS),
            chat_token: env::var("CHAT_API_TOKEN").ok(),
            guild_ids: env::var("GUILD_IDS")
                .map(|s| {
                    s.split(',')
                        .filter_map(|id| id.trim().parse().ok())
                        .collect()
                })
                .unwrap_or_default(),
            ath_state_path: env::var("ATH_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ATH_STATE_PATH)),
            token_contract: required_address("TOKEN_CONTRACT")?,
            lp_contract: required_address("TOKEN_LP")?,
            reference_lp,
            token_decimals,
            ratio,
            token_icon: env::var("TOKEN_ICON").unwrap_or_else(|_| token_name.clone()),
            token_name,
        })
    }

    /// Finalize the immutable token description once `decimals` is known
    /// (configured or discovered on chain).
    pub fn token_config(&self, decimals: u32) -> TokenConfig {
        TokenConfig {
            contract: self.token_contract,
            lp_contract: self.lp_contract,
            reference_lp: self.reference_lp,
            decimals,
            ratio: self.ratio,
            name: self.token_name.clone(),
            icon: self.token_icon.clone(),
        }
    }
}

fn required_address(var: &str) -> OracleResult<Address> {
    let raw = env::var(var)
        .map_err(|_| OracleError::configuration(format!("Required setting {var} not configured")))?;
    Address::from_str(&raw).map_err(|_| {
        OracleError::configuration(format!("{var} is not a valid contract address: {raw}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_token_precisions_pass_validation() {
        for decimals in [0, 6, 8, 9, 18, MAX_TOKEN_DECIMALS] {
            assert_eq!(validate_decimals(decimals).unwrap(), decimals);
        }
    }

    #[test]
    fn out_of_range_decimals_are_a_configuration_error() {
        for decimals in [MAX_TOKEN_DECIMALS + 1, u32::MAX] {
            assert!(matches!(
                validate_decimals(decimals),
                Err(OracleError::Configuration { .. })
            ));
        }
    }
}
