use crate::action::{Action, ChainRequest};
use crate::config::Config;
use crate::credit::{get_credit_score_data, get_wallet_age};
use crate::error::{GatewayError, Result};
use crate::nfts::get_nfts_for_wallet;
use crate::prices::{PriceSource, price_source};
use crate::rpc::RpcClient;
use crate::tokens::{get_token_balances, get_token_info};
use crate::transfers::get_transaction_history;
use crate::wallet::{get_block_number, get_gas_price, get_wallet_balance, validate_contract};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Stateless dispatcher from actions to chain queries. Cheap to clone.
#[derive(Clone)]
pub struct Gateway {
    config: Arc<Config>,
    http: reqwest::Client,
    prices: Arc<dyn PriceSource>,
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).map_err(GatewayError::from)
}

impl Gateway {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let prices = price_source(&config, http.clone());

        Ok(Gateway {
            config: Arc::new(config),
            http,
            prices,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn handle(&self, request: &ChainRequest) -> Result<Value> {
        let action = Action::parse(request)?;
        self.execute(action).await
    }

    pub async fn execute(&self, action: Action) -> Result<Value> {
        let started = Instant::now();
        let name = action.name();
        let client = RpcClient::new(&self.config, action.chain_id())?;

        let result = match action {
            Action::GetWalletBalance { address, .. } => {
                to_value(get_wallet_balance(&client, address.address, &address.raw).await?)
            }
            Action::GetTransactionHistory { address, .. } => {
                to_value(get_transaction_history(&client, address.address).await?)
            }
            Action::GetWalletAge { address, .. } => {
                to_value(get_wallet_age(&client, address.address).await?)
            }
            Action::GetCreditScoreData { address, .. } => {
                to_value(get_credit_score_data(&client, address.address, &address.raw).await?)
            }
            Action::GetTokenInfo { token, .. } => {
                to_value(get_token_info(&client, token.address, &token.raw).await?)
            }
            Action::GetTokenBalances { address, .. } => {
                to_value(get_token_balances(&client, address.address).await?)
            }
            Action::GetNftsForWallet { address, chain_id } => to_value(
                get_nfts_for_wallet(&self.http, &self.config, chain_id, address.address).await?,
            ),
            Action::GetTokenPrices { tokens, .. } => {
                to_value(self.prices.token_prices(&client, &tokens).await?)
            }
            Action::GetGasPrice { .. } => to_value(get_gas_price(&client).await?),
            Action::GetBlockNumber { .. } => to_value(get_block_number(&client).await?),
            Action::ValidateContract { address, .. } => {
                to_value(validate_contract(&client, address.address, &address.raw).await?)
            }
        }?;

        info!(
            "{} on {} completed in {:?}",
            name,
            client.network().as_str(),
            started.elapsed()
        );
        Ok(result)
    }
}
