use crate::error::{GatewayError, Result};
use crate::models::{ContractCheck, GasPrice, WalletBalance};
use crate::rpc::RpcClient;
use alloy_primitives::utils::format_units;
use alloy_primitives::{Address, U256};

/// Scale a raw integer amount down by `decimals` into a plain decimal number.
pub fn to_decimal(raw: U256, decimals: u8) -> Result<f64> {
    let formatted = format_units(raw, decimals)
        .map_err(|e| GatewayError::Decode(format!("Cannot format {}: {}", raw, e)))?;
    formatted
        .parse::<f64>()
        .map_err(|e| GatewayError::Decode(format!("Cannot parse {}: {}", formatted, e)))
}

pub async fn get_wallet_balance(
    client: &RpcClient,
    address: Address,
    display_address: &str,
) -> Result<WalletBalance> {
    let wei = client.get_balance(address).await?;

    Ok(WalletBalance {
        balance: to_decimal(wei, 18)?,
        address: display_address.to_string(),
        chain_id: client.chain_id(),
    })
}

pub async fn get_gas_price(client: &RpcClient) -> Result<GasPrice> {
    let wei = client.get_gas_price().await?;

    Ok(GasPrice {
        wei: wei.to_string(),
        gwei: to_decimal(U256::from(wei), 9)?,
    })
}

pub async fn get_block_number(client: &RpcClient) -> Result<u64> {
    client.get_block_number().await
}

pub async fn validate_contract(
    client: &RpcClient,
    address: Address,
    display_address: &str,
) -> Result<ContractCheck> {
    let code = client.get_code(address).await?;

    Ok(ContractCheck {
        is_contract: !code.is_empty(),
        address: display_address.to_string(),
        chain_id: client.chain_id(),
    })
}
