use crate::chains::Network;
use crate::config::Config;
use crate::error::{GatewayError, Result};
use alloy::network::TransactionBuilder;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use alloy_primitives::{Address, Bytes, U256};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

/// JSON-RPC client bound to the provider endpoint of a single chain.
#[derive(Clone)]
pub struct RpcClient {
    provider: DynProvider,
    network: Network,
    chain_id: u64,
    max_retries: usize,
    request_timeout: Duration,
}

impl RpcClient {
    pub fn new(config: &Config, chain_id: u64) -> Result<Self> {
        let network = Network::from_chain_id(chain_id);
        let url = config.rpc_url(network.as_str());

        let parsed_url = url
            .parse()
            .map_err(|_| GatewayError::Internal(format!("Invalid RPC URL: {}", url)))?;
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(parsed_url)
            .erased();

        debug!("RPC client for chain {} using {}", chain_id, network.as_str());

        Ok(RpcClient {
            provider,
            network,
            chain_id,
            max_retries: config.max_retries,
            request_timeout: config.request_timeout,
        })
    }

    /// The chain id as requested by the caller, even when it fell back to another network.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn network(&self) -> Network {
        self.network
    }

    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(100)
            .factor(2)
            .max_delay(Duration::from_secs(10))
            .map(jitter)
            .take(self.max_retries)
    }

    fn handle_error(&self, method: &str, error_str: &str) -> GatewayError {
        warn!("RPC error on {} ({}): {}", self.network.as_str(), method, error_str);
        GatewayError::Rpc(error_str.to_string())
    }

    fn handle_timeout(&self, method: &str) -> GatewayError {
        warn!(
            "Request timeout after {} seconds on {} ({})",
            self.request_timeout.as_secs(),
            self.network.as_str(),
            method
        );
        GatewayError::Timeout(self.request_timeout.as_secs())
    }

    async fn request<T, E, F, Fut>(&self, method: &'static str, call: F) -> Result<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        Retry::spawn(self.retry_strategy(), || {
            let future = call(self.provider.clone());
            async move {
                match timeout(self.request_timeout, future).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(self.handle_error(method, &e.to_string())),
                    Err(_) => Err(self.handle_timeout(method)),
                }
            }
        })
        .await
    }

    pub async fn get_balance(&self, address: Address) -> Result<U256> {
        self.request("eth_getBalance", |provider| async move {
            provider.get_balance(address).await
        })
        .await
    }

    pub async fn get_block_number(&self) -> Result<u64> {
        self.request("eth_blockNumber", |provider| async move {
            provider.get_block_number().await
        })
        .await
    }

    pub async fn get_gas_price(&self) -> Result<u128> {
        self.request("eth_gasPrice", |provider| async move {
            provider.get_gas_price().await
        })
        .await
    }

    pub async fn get_code(&self, address: Address) -> Result<Bytes> {
        self.request("eth_getCode", |provider| async move {
            provider.get_code_at(address).await
        })
        .await
    }

    /// Executes an `eth_call` and returns the raw return data, which may be empty.
    pub async fn call_contract<C: SolCall>(&self, address: Address, call: C) -> Result<Bytes> {
        let input = Bytes::from(call.abi_encode());
        self.request("eth_call", |provider| {
            let tx = TransactionRequest::default()
                .with_to(address)
                .with_input(input.clone());
            async move { provider.call(tx).await }
        })
        .await
    }

    /// Calls a provider extension method that has no typed wrapper.
    pub async fn raw_request<P, T>(&self, method: &'static str, params: P) -> Result<T>
    where
        P: Serialize + Clone + std::fmt::Debug + Send + Sync + Unpin + 'static,
        T: DeserializeOwned,
    {
        let value: serde_json::Value = self
            .request(method, |provider| {
                let params = params.clone();
                async move {
                    provider
                        .raw_request::<_, serde_json::Value>(method.into(), params)
                        .await
                }
            })
            .await?;

        serde_json::from_value(value)
            .map_err(|e| GatewayError::Decode(format!("{} response: {}", method, e)))
    }
}
