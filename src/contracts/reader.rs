//! On-chain contract field reads
//!
//! Thin, stateless wrappers over `eth_call`. No retries and no caching
//! here; retry policy belongs to the scheduler path and every call
//! reflects the latest queryable chain state.

use alloy::{
    primitives::{Address, U256, keccak256},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
    sol_types::SolValue,
};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::{OracleError, OracleResult};

/// ERC-20 `balanceOf(holder)` on `contract`.
pub async fn read_balance(
    provider: &dyn Provider,
    contract: Address,
    holder: Address,
) -> OracleResult<U256> {
    let mut data = keccak256("balanceOf(address)")[..4].to_vec();
    data.extend_from_slice(&holder.abi_encode());

    call_u256(provider, contract, data, "balanceOf").await
}

/// Zero-argument numeric getter (`totalSupply()`, `decimals()`, ...) on
/// `contract`.
pub async fn read_scalar(
    provider: &dyn Provider,
    contract: Address,
    field: &str,
) -> OracleResult<U256> {
    let data = keccak256(format!("{field}()").as_bytes())[..4].to_vec();

    call_u256(provider, contract, data, field).await
}

async fn call_u256(
    provider: &dyn Provider,
    contract: Address,
    data: Vec<u8>,
    field: &str,
) -> OracleResult<U256> {
    let tx = TransactionRequest::default().to(contract).input(data.into());

    let result = provider
        .call(&tx)
        .await
        .map_err(|e| OracleError::Transport {
            message: format!("eth_call for {field} on {contract} failed"),
            source: Some(e.into()),
            retry_count: 0,
        })?;

    <U256>::abi_decode(&result, true).map_err(|e| OracleError::Contract {
        contract,
        message: format!("Failed to decode {field} result"),
        source: e.into(),
    })
}

/// Convert a raw on-chain amount into `Decimal` without rescaling.
pub fn u256_to_decimal(value: U256, contract: Address) -> OracleResult<Decimal> {
    Decimal::from_str(&value.to_string()).map_err(|e| OracleError::Contract {
        contract,
        message: format!("Amount {value} exceeds representable range"),
        source: e.into(),
    })
}
