use crate::chains::Network;
use crate::config::{Config, PriceSourceKind};
use crate::error::{GatewayError, Result};
use crate::models::TokenPrice;
use crate::rpc::RpcClient;
use crate::tokens::get_token_info;
use alloy_primitives::Address;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

pub const STATIC_SYMBOL: &str = "TOKEN";
pub const STATIC_PRICE: f64 = 1.0;
pub const STATIC_CHANGE_24H: f64 = 0.0;

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn token_prices(
        &self,
        client: &RpcClient,
        addresses: &[String],
    ) -> Result<Vec<TokenPrice>>;
}

pub fn price_source(config: &Config, http: reqwest::Client) -> Arc<dyn PriceSource> {
    match config.price_source {
        PriceSourceKind::Static => Arc::new(StaticPrices),
        PriceSourceKind::CoinGecko => Arc::new(CoinGeckoPrices::new(
            http,
            config.coingecko_api_url.clone(),
            config.request_timeout,
        )),
    }
}

/// Fixed placeholder quotes, one per requested address. No upstream is contacted.
pub struct StaticPrices;

#[async_trait]
impl PriceSource for StaticPrices {
    async fn token_prices(
        &self,
        _client: &RpcClient,
        addresses: &[String],
    ) -> Result<Vec<TokenPrice>> {
        Ok(addresses
            .iter()
            .map(|address| TokenPrice {
                address: address.clone(),
                symbol: STATIC_SYMBOL.to_string(),
                price: STATIC_PRICE,
                change_24h: STATIC_CHANGE_24H,
            })
            .collect())
    }
}

/// Live USD quotes from the CoinGecko token price API.
pub struct CoinGeckoPrices {
    http: reqwest::Client,
    base_url: String,
    timeout: std::time::Duration,
}

#[derive(Debug, Deserialize)]
struct CoinGeckoQuote {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

impl CoinGeckoPrices {
    pub fn new(http: reqwest::Client, base_url: String, timeout: std::time::Duration) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn fetch_quotes(
        &self,
        network: Network,
        addresses: &[String],
    ) -> Result<HashMap<String, CoinGeckoQuote>> {
        let url = format!(
            "{}/simple/token_price/{}",
            self.base_url,
            network.coingecko_platform()
        );
        let contracts = addresses
            .iter()
            .map(|a| a.to_lowercase())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("contract_addresses", contracts.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::ExternalApi(format!(
                "Price API error: {}",
                response.status()
            )));
        }

        let quotes: HashMap<String, CoinGeckoQuote> = response.json().await?;
        Ok(quotes
            .into_iter()
            .map(|(address, quote)| (address.to_lowercase(), quote))
            .collect())
    }

    async fn symbol_of(&self, client: &RpcClient, address: &str) -> String {
        let Ok(token) = Address::from_str(address) else {
            return String::new();
        };
        match get_token_info(client, token, address).await {
            Ok(metadata) => metadata.symbol,
            Err(e) => {
                warn!("Failed to fetch symbol for {}: {}", address, e);
                String::new()
            }
        }
    }
}

#[async_trait]
impl PriceSource for CoinGeckoPrices {
    async fn token_prices(
        &self,
        client: &RpcClient,
        addresses: &[String],
    ) -> Result<Vec<TokenPrice>> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        let (quotes, symbols) = tokio::join!(
            self.fetch_quotes(client.network(), addresses),
            join_all(addresses.iter().map(|a| self.symbol_of(client, a))),
        );
        let quotes = quotes?;
        info!("Fetched {} price quotes", quotes.len());

        Ok(addresses
            .iter()
            .zip(symbols)
            .map(|(address, symbol)| {
                let quote = quotes.get(&address.to_lowercase());
                TokenPrice {
                    address: address.clone(),
                    symbol,
                    price: quote.and_then(|q| q.usd).unwrap_or(0.0),
                    change_24h: quote.and_then(|q| q.usd_24h_change).unwrap_or(0.0),
                }
            })
            .collect())
    }
}
