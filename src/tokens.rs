use crate::abi::{decimalsCall, decode_decimals, decode_string_return, nameCall, symbolCall};
use crate::error::{GatewayError, Result};
use crate::models::{TokenBalance, TokenMetadata};
use crate::rpc::RpcClient;
use crate::wallet::to_decimal;
use alloy_primitives::{Address, U256};
use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBalancesResponse {
    #[serde(default)]
    token_balances: Vec<RawTokenBalance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTokenBalance {
    contract_address: String,
    token_balance: Option<String>,
    error: Option<serde_json::Value>,
}

impl RawTokenBalance {
    /// Raw amount held, or `None` for errored, empty or zero entries.
    fn amount(&self) -> Option<U256> {
        if self.error.is_some() {
            return None;
        }
        let raw = self.token_balance.as_deref()?;
        let hex = raw.trim_start_matches("0x");
        if hex.is_empty() {
            return None;
        }
        U256::from_str_radix(hex, 16)
            .ok()
            .filter(|amount| !amount.is_zero())
    }
}

pub async fn get_token_info(
    client: &RpcClient,
    token: Address,
    display_address: &str,
) -> Result<TokenMetadata> {
    let (name, symbol, decimals) = tokio::try_join!(
        client.call_contract(token, nameCall {}),
        client.call_contract(token, symbolCall {}),
        client.call_contract(token, decimalsCall {}),
    )?;

    Ok(TokenMetadata {
        address: display_address.to_string(),
        chain_id: client.chain_id(),
        name: decode_string_return(&name),
        symbol: decode_string_return(&symbol),
        decimals: decode_decimals(&decimals),
    })
}

/// Non-zero ERC-20 balances of `owner`, each with its token metadata.
pub async fn get_token_balances(client: &RpcClient, owner: Address) -> Result<Vec<TokenBalance>> {
    let response: TokenBalancesResponse = client
        .raw_request(
            "alchemy_getTokenBalances",
            vec![json!(owner.to_string()), json!("erc20")],
        )
        .await?;

    let held: Vec<(Address, String, U256)> = response
        .token_balances
        .into_iter()
        .filter_map(|entry| {
            let amount = entry.amount()?;
            match Address::from_str(&entry.contract_address) {
                Ok(token) => Some((token, entry.contract_address, amount)),
                Err(_) => {
                    warn!("Skipping invalid token address {}", entry.contract_address);
                    None
                }
            }
        })
        .collect();

    info!("{} holds {} tokens with a balance", owner, held.len());

    let lookups = held.iter().map(|(token, display, amount)| async move {
        let metadata = get_token_info(client, *token, display).await?;
        let balance = to_decimal(*amount, metadata.decimals)?;
        Ok::<_, GatewayError>(TokenBalance {
            token: metadata,
            balance,
        })
    });

    let balances = join_all(lookups)
        .await
        .into_iter()
        .zip(held.iter())
        .filter_map(|(result, (_, token_display, _))| match result {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!("Failed to fetch metadata for token {}: {}", token_display, e);
                None
            }
        })
        .collect();

    Ok(balances)
}
