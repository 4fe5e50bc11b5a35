//! Custom error types for the oracle

use alloy::primitives::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        retry_count: u32,
    },

    #[error("Contract interaction failed: {contract} - {message}")]
    Contract {
        contract: Address,
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid numeric argument {input:?}: {reason}")]
    Validation { input: String, reason: String },

    #[error("Storage error: {context}")]
    Storage {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type OracleResult<T> = Result<T, OracleError>;

impl OracleError {
    pub fn configuration(message: impl Into<String>) -> Self {
        OracleError::Configuration {
            message: message.into(),
        }
    }
}
